//! Endpoint Catalog
//!
//! One [`ToolSpec`] per Token Metrics endpoint. Adding a tool means adding
//! an entry here.

use crate::schema::ParamSpec;
use crate::spec::{DateRange, PageConfig, ToolSpec};

/// Records per page for most endpoints
const PAGE_SIZE: usize = 50;
/// Candle and ranking endpoints serve larger pages
const LARGE_PAGE_SIZE: usize = 100;
/// Longest date range the time-series endpoints accept in one query
const MAX_RANGE_DAYS: u32 = 29;
const DEFAULT_LIMIT: i64 = 100;

const SIGNALS: &[&str] = &["1", "-1", "0"];
const INDICES_TYPES: &[&str] = &["active", "passive"];
const INDEX_TYPES: &[&str] = &["momentum", "value", "growth", "quality", "multi_factor"];
const STRATEGIES: &[&str] = &["long_only", "long_short", "market_neutral", "arbitrage"];
const RISK_PROFILES: &[&str] = &["conservative", "moderate", "aggressive"];
const REBALANCE_FREQUENCIES: &[&str] = &["daily", "weekly", "monthly"];

fn token_id() -> ParamSpec {
    ParamSpec::string(
        "token_id",
        "Comma-separated Token Metrics token IDs (e.g. '3375,3306' for BTC and ETH)",
    )
}

fn symbol() -> ParamSpec {
    ParamSpec::string("symbol", "Comma-separated token symbols (e.g. 'BTC,ETH')")
}

fn token_name() -> ParamSpec {
    ParamSpec::string("token_name", "Comma-separated token names (e.g. 'Bitcoin,Ethereum')")
}

fn category() -> ParamSpec {
    ParamSpec::string("category", "Comma-separated categories (e.g. 'layer-1,defi')")
}

fn exchange() -> ParamSpec {
    ParamSpec::string("exchange", "Comma-separated exchanges (e.g. 'binance,coinbase')")
}

fn marketcap() -> ParamSpec {
    ParamSpec::float("marketcap", "Minimum market cap in USD").min(0.0)
}

fn volume() -> ParamSpec {
    ParamSpec::float("volume", "Minimum 24h trading volume in USD").min(0.0)
}

fn fdv() -> ParamSpec {
    ParamSpec::float("fdv", "Minimum fully diluted valuation in USD").min(0.0)
}

fn start_date() -> ParamSpec {
    ParamSpec::date("start_date", "Start date, YYYY-MM-DD").wire("startDate")
}

fn end_date() -> ParamSpec {
    ParamSpec::date("end_date", "End date, YYYY-MM-DD").wire("endDate")
}

fn limit() -> ParamSpec {
    ParamSpec::int("limit", "Maximum number of records to return")
        .default_value(DEFAULT_LIMIT)
        .min(1.0)
}

fn paged() -> PageConfig {
    PageConfig::new(PAGE_SIZE).capped_by("limit")
}

fn dated() -> DateRange {
    DateRange::new("start_date", "end_date")
}

/// Every tool the client exposes
#[allow(clippy::too_many_lines)]
pub fn catalog() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new(
            "get_token_info",
            "/tokens",
            "Look up cryptocurrencies by ID, name, symbol, category, exchange or contract \
             address. Returns token IDs, names, symbols, exchanges, categories and contract \
             addresses. Use it to find the token ID other tools expect.",
        )
        .params([
            token_id(),
            token_name(),
            symbol(),
            category(),
            exchange(),
            ParamSpec::string("blockchain_address", "Comma-separated chain:address pairs"),
            limit(),
        ])
        .paginated(paged())
        .category("reference")
        .empty_message("No tokens found matching the specified criteria.")
        .summary_fields(&["TOKEN_ID", "TOKEN_NAME", "TOKEN_SYMBOL", "EXCHANGE_LIST", "CATEGORY_LIST"]),
        ToolSpec::new(
            "get_crypto_price",
            "/price",
            "Get the current price of one or more cryptocurrencies by token ID \
             (e.g. '3375' for BTC).",
        )
        .param(token_id().required())
        .empty_message("No price data found for the specified tokens.")
        .summary_fields(&["TOKEN_ID", "TOKEN_NAME", "TOKEN_SYMBOL", "CURRENT_PRICE"]),
        ToolSpec::new(
            "get_hourly_ohlcv",
            "/hourly-ohlcv",
            "Get hourly open, high, low, close and volume data for intraday analysis.",
        )
        .params([token_id(), symbol(), token_name(), start_date(), end_date(), limit()])
        .paginated(paged())
        .dates(dated().chunked(MAX_RANGE_DAYS))
        .empty_message("No hourly OHLCV data found for the specified criteria.")
        .summary_fields(&["TOKEN_SYMBOL", "TIMESTAMP", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME"]),
        ToolSpec::new(
            "get_daily_ohlcv",
            "/daily-ohlcv",
            "Get daily open, high, low, close and volume data for historical price analysis.",
        )
        .params([token_id(), symbol(), token_name(), start_date(), end_date(), limit()])
        .paginated(PageConfig::new(LARGE_PAGE_SIZE).capped_by("limit"))
        .dates(dated().chunked(MAX_RANGE_DAYS))
        .empty_message("No daily OHLCV data found for the specified criteria.")
        .summary_fields(&["TOKEN_SYMBOL", "DATE", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME"]),
        ToolSpec::new(
            "get_investor_grades",
            "/investor-grades",
            "Get long-term investment grades covering fundamentals, technology and \
             valuation of cryptocurrencies.",
        )
        .params([
            token_id(),
            symbol(),
            start_date(),
            end_date(),
            category(),
            exchange(),
            marketcap(),
            fdv(),
            volume(),
            ParamSpec::float("investor_grade", "Minimum investor grade (0-100)").min(0.0),
            limit(),
        ])
        .paginated(paged())
        .dates(dated().chunked(MAX_RANGE_DAYS))
        .category("grades")
        .empty_message("No investor grades data found for the specified criteria.")
        .summary_fields(&[
            "TOKEN_SYMBOL",
            "DATE",
            "TM_INVESTOR_GRADE",
            "TM_INVESTOR_GRADE_7D_PCT_CHANGE",
            "FUNDAMENTAL_GRADE",
            "TECHNOLOGY_GRADE",
            "VALUATION_GRADE",
        ]),
        ToolSpec::new(
            "get_trader_grades",
            "/trader-grades",
            "Get short-term trader grades combining technical and quantitative analysis.",
        )
        .params([
            token_id(),
            symbol(),
            start_date(),
            end_date(),
            category(),
            exchange(),
            marketcap(),
            fdv(),
            volume(),
            ParamSpec::float("trader_grade", "Minimum trader grade (0-100)").min(0.0),
            ParamSpec::float(
                "trader_grade_percent_change",
                "Minimum 24h percent change of the trader grade",
            ),
            limit(),
        ])
        .paginated(paged())
        .dates(dated().chunked(MAX_RANGE_DAYS))
        .category("grades")
        .empty_message("No trader grades data found for the specified criteria.")
        .summary_fields(&[
            "TOKEN_SYMBOL",
            "DATE",
            "TM_TRADER_GRADE",
            "TM_TRADER_GRADE_24H_PCT_CHANGE",
            "TA_GRADE",
            "QUANT_GRADE",
        ]),
        ToolSpec::new(
            "get_market_metrics",
            "/market-metrics",
            "Get market-wide analytics: total crypto market cap, the share of tokens \
             with bullish grades, and the overall market signal.",
        )
        .params([start_date(), end_date(), limit()])
        .paginated(paged())
        .dates(dated().chunked(MAX_RANGE_DAYS))
        .category("market")
        .empty_message("No market metrics data found for the specified criteria.")
        .summary_fields(&[
            "DATE",
            "TOTAL_CRYPTO_MCAP",
            "TM_GRADE_PERC_HIGH_COINS",
            "TM_GRADE_SIGNAL",
            "LAST_TM_GRADE_SIGNAL",
        ]),
        ToolSpec::new(
            "get_trading_signals",
            "/trading-signals",
            "Get AI-generated long/short trading signals. signal: 1 bullish, -1 bearish, \
             0 no signal.",
        )
        .params([
            token_id(),
            symbol(),
            start_date(),
            end_date(),
            category(),
            exchange(),
            marketcap(),
            volume(),
            fdv(),
            ParamSpec::choice("signal", SIGNALS, "Signal filter: 1 bullish, -1 bearish, 0 none"),
            limit(),
        ])
        .paginated(paged())
        .dates(dated().chunked(MAX_RANGE_DAYS))
        .category("signals")
        .empty_message("No trading signals found for the specified criteria.")
        .summary_fields(&[
            "TOKEN_SYMBOL",
            "DATE",
            "TRADING_SIGNAL",
            "TOKEN_TREND",
            "TRADING_SIGNALS_RETURNS",
            "HOLDING_RETURNS",
        ]),
        ToolSpec::new(
            "get_market_sentiment",
            "/sentiments",
            "Get market sentiment grades and summaries from Twitter, Reddit and news.",
        )
        .param(limit())
        .paginated(paged())
        .category("market")
        .empty_message("No sentiment data found.")
        .summary_fields(&[
            "DATETIME",
            "MARKET_SENTIMENT_GRADE",
            "MARKET_SENTIMENT_LABEL",
            "NEWS_SENTIMENT_LABEL",
            "REDDIT_SENTIMENT_LABEL",
            "TWITTER_SENTIMENT_LABEL",
        ]),
        ToolSpec::new(
            "analyze_resistance_support_levels",
            "/resistance-support",
            "Get historical resistance and support price levels for a token. Provide a \
             token ID or a symbol.",
        )
        .params([token_id(), symbol(), limit()])
        .paginated(paged())
        .require_one_of(&["token_id", "symbol"])
        .category("analysis")
        .empty_message("No resistance and support levels found for the specified criteria.")
        .summary_fields(&["TOKEN_SYMBOL", "DATE", "HISTORICAL_RESISTANCE_SUPPORT_LEVELS"]),
        ToolSpec::new(
            "analyze_quant_metrics",
            "/quantmetrics",
            "Get quantitative risk and return metrics: volatility, Sharpe, Sortino, \
             drawdown, CAGR and more.",
        )
        .params([
            token_id(),
            symbol(),
            category(),
            exchange(),
            marketcap(),
            volume(),
            fdv(),
            limit(),
        ])
        .paginated(paged())
        .category("analysis")
        .empty_message("No quantitative metrics found for the specified criteria.")
        .summary_fields(&[
            "TOKEN_SYMBOL",
            "DATE",
            "VOLATILITY",
            "SHARPE",
            "SORTINO",
            "MAX_DRAWDOWN",
            "CAGR",
            "ALL_TIME_RETURN",
        ]),
        ToolSpec::new(
            "analyze_market_scenarios",
            "/scenario-analysis",
            "Get price predictions for a token under different market scenarios.",
        )
        .params([token_id(), symbol(), limit()])
        .paginated(paged())
        .category("analysis")
        .empty_message("No scenario analysis results found for the specified criteria.")
        .summary_fields(&["TOKEN_SYMBOL", "DATE", "SCENARIO_PREDICTION"]),
        ToolSpec::new(
            "analyze_correlations",
            "/correlation",
            "Get the tokens most correlated with a given token.",
        )
        .params([token_id(), symbol(), category(), exchange(), limit()])
        .paginated(paged())
        .category("analysis")
        .empty_message("No correlation data found for the specified criteria.")
        .summary_fields(&["TOKEN_SYMBOL", "DATE", "TOP_CORRELATION"]),
        ToolSpec::new(
            "analyze_crypto_investors",
            "/crypto-investors",
            "Get major crypto investors with their funding round counts and ROI.",
        )
        .param(limit())
        .paginated(paged())
        .category("analysis")
        .empty_message("No investor data found.")
        .summary_fields(&["INVESTOR_NAME", "ROUND_COUNT", "ROI_AVERAGE", "ROI_MEDIAN"]),
        ToolSpec::new(
            "get_top_tokens",
            "/top-market-cap-tokens",
            "Get the top cryptocurrencies ranked by market capitalization.",
        )
        .param(
            ParamSpec::int("top_k", "Number of top tokens to return")
                .default_value(DEFAULT_LIMIT)
                .min(1.0),
        )
        .paginated(PageConfig::new(LARGE_PAGE_SIZE).capped_by("top_k"))
        .category("market")
        .empty_message("No top tokens found.")
        .summary_fields(&["TOKEN_ID", "TOKEN_NAME", "TOKEN_SYMBOL", "CATEGORY_LIST"]),
        ToolSpec::new(
            "analyze_sector_indices_holdings",
            "/indices-holdings",
            "Get the current holdings and weights of a sector index.",
        )
        .param(ParamSpec::string("id", "Index ID").required())
        .category("indices")
        .empty_message("No holdings data found for the specified criteria.")
        .summary_fields(&[
            "TOKEN_SYMBOL",
            "WEIGHT",
            "PRICE",
            "MARKET_CAP",
            "CURRENT_ROI",
            "TRADER_GRADE",
        ]),
        ToolSpec::new(
            "analyze_sector_indices_performance",
            "/indices-performance",
            "Get the historical performance of a sector index over a date range.",
        )
        .params([
            ParamSpec::string("id", "Index ID").required(),
            start_date().required(),
            end_date().required(),
            limit(),
        ])
        .paginated(paged())
        .dates(dated())
        .category("indices")
        .empty_message("No performance data found for the specified criteria.")
        .summary_fields(&["DATE", "INDEX_CUMULATIVE_ROI", "MARKET_CAP", "VOLUME", "FDV"]),
        ToolSpec::new(
            "get_indices",
            "/indices",
            "List cryptocurrency indices with price, returns, market cap and grade.",
        )
        .params([
            ParamSpec::choice("indices_type", INDICES_TYPES, "Index type: active or passive")
                .wire("indicesType"),
            limit(),
        ])
        .paginated(paged())
        .category("indices")
        .empty_message("No indices found for the specified criteria.")
        .summary_fields(&["ID", "NAME", "TICKER", "PRICE", "24H", "7D", "1M", "INDEX_GRADE"]),
        ToolSpec::new(
            "analyze_trading_indices",
            "/trader-indices",
            "Get AI-generated trading portfolios filtered by strategy, risk profile and \
             performance.",
        )
        .params([
            ParamSpec::choice("index_type", INDEX_TYPES, "Index methodology"),
            ParamSpec::choice("strategy", STRATEGIES, "Trading strategy"),
            ParamSpec::choice("risk_profile", RISK_PROFILES, "Risk profile"),
            token_id(),
            symbol(),
            ParamSpec::float("min_aum", "Minimum assets under management in USD").min(0.0),
            ParamSpec::float("min_return", "Minimum return, in percent"),
            ParamSpec::choice("rebalance_frequency", REBALANCE_FREQUENCIES, "Rebalance frequency"),
            start_date(),
            end_date(),
            limit(),
        ])
        .paginated(paged())
        .dates(dated())
        .category("indices")
        .empty_message("No trading indices found for the specified criteria.")
        .summary_fields(&["INDEX_NAME", "STRATEGY", "RISK_PROFILE", "AUM", "RETURN", "DATE"]),
        ToolSpec::new(
            "ask_tmai_agent",
            "/tmai",
            "Ask the Token Metrics AI assistant a free-form question about crypto markets.",
        )
        .param(ParamSpec::string("user_query", "Question for the assistant").required())
        .category("assistant")
        .empty_message("The assistant returned no answer."),
    ]
}
