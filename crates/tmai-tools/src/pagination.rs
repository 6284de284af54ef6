//! Pagination Driver
//!
//! Walks a paged endpoint until the data runs out, the caller's cap is
//! met, or the page budget is spent. Requests are strictly sequential.

use chrono::{Days, NaiveDate};
use tracing::{debug, warn};

use crate::error::Result;
use crate::normalize::{Record, extract_records, more_hint};
use crate::request::ApiRequest;
use crate::spec::PageConfig;
use crate::transport::Transport;

/// Position of one paginated invocation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageCursor {
    /// Page number within the current window
    pub page: u64,
    /// Records kept so far, across windows
    pub fetched: usize,
    /// Requests issued so far, across windows
    pub requests: usize,
}

impl PageCursor {
    fn new(config: &PageConfig) -> Self {
        Self {
            page: config.first_page,
            fetched: 0,
            requests: 0,
        }
    }

    fn rewind(&mut self, first_page: u64) {
        self.page = first_page;
    }

    fn advance(&mut self) {
        self.page += 1;
    }
}

/// Why a window stopped paging
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    EmptyPage,
    ShortPage,
    CapReached,
    /// The server reported no further pages
    LastPage,
    PageBudget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageState {
    Start,
    Fetching,
    More,
    Done(StopReason),
}

/// Records gathered by one driver run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageOutcome {
    pub records: Vec<Record>,
    pub requests: usize,
    /// The page budget ran out while more data was expected
    pub truncated: bool,
}

pub struct PaginationDriver<'a> {
    transport: &'a dyn Transport,
    config: &'a PageConfig,
    cap: Option<usize>,
    max_pages: usize,
}

impl<'a> PaginationDriver<'a> {
    pub fn new(transport: &'a dyn Transport, config: &'a PageConfig, max_pages: usize) -> Self {
        Self {
            transport,
            config,
            cap: None,
            max_pages,
        }
    }

    /// Stop once `cap` records are gathered; `None` pages until exhaustion
    #[must_use]
    pub fn with_cap(mut self, cap: Option<usize>) -> Self {
        self.cap = cap;
        self
    }

    /// Page through every window in order. Cap and page budget are shared
    /// by all windows. The first error aborts the run.
    pub async fn run(&self, windows: &[ApiRequest]) -> Result<PageOutcome> {
        let mut cursor = PageCursor::new(self.config);
        let mut outcome = PageOutcome::default();

        for window in windows {
            if self.remaining(cursor.fetched) == Some(0) {
                break;
            }
            if cursor.requests >= self.max_pages {
                self.budget_spent(&cursor, &mut outcome);
                break;
            }
            cursor.rewind(self.config.first_page);

            let mut state = PageState::Start;
            loop {
                state = match state {
                    PageState::Start => PageState::Fetching,
                    PageState::Fetching => self.fetch(window, &mut cursor, &mut outcome).await?,
                    PageState::More if cursor.requests >= self.max_pages => {
                        self.budget_spent(&cursor, &mut outcome);
                        PageState::Done(StopReason::PageBudget)
                    }
                    PageState::More => {
                        cursor.advance();
                        PageState::Fetching
                    }
                    PageState::Done(reason) => {
                        debug!(path = %window.path, ?reason, fetched = cursor.fetched, "Pagination stopped");
                        break;
                    }
                };
            }

            if outcome.truncated {
                break;
            }
        }

        outcome.requests = cursor.requests;
        Ok(outcome)
    }

    async fn fetch(
        &self,
        window: &ApiRequest,
        cursor: &mut PageCursor,
        outcome: &mut PageOutcome,
    ) -> Result<PageState> {
        // The server offsets page N by (N - 1) * limit, so only the first
        // page of a window may ask for fewer than a full page.
        let limit = if cursor.page == self.config.first_page {
            self.remaining(cursor.fetched)
                .map_or(self.config.page_size, |left| left.min(self.config.page_size))
        } else {
            self.config.page_size
        };

        let request = window
            .clone()
            .with_query(self.config.page_param, cursor.page)
            .with_query(self.config.limit_param, limit);

        debug!(path = %request.path, page = cursor.page, limit, "Fetching page");
        cursor.requests += 1;
        let body = self.transport.get(&request).await?;
        let page = extract_records(&body)?;

        let received = page.len();
        let keep = self.remaining(cursor.fetched).map_or(received, |left| left.min(received));
        outcome.records.extend(page.into_iter().take(keep));
        cursor.fetched += keep;

        let state = if received == 0 {
            PageState::Done(StopReason::EmptyPage)
        } else if self.remaining(cursor.fetched) == Some(0) {
            PageState::Done(StopReason::CapReached)
        } else if received < limit {
            PageState::Done(StopReason::ShortPage)
        } else if more_hint(&body, cursor.page) == Some(false) {
            PageState::Done(StopReason::LastPage)
        } else {
            PageState::More
        };
        Ok(state)
    }

    fn remaining(&self, fetched: usize) -> Option<usize> {
        self.cap.map(|cap| cap.saturating_sub(fetched))
    }

    fn budget_spent(&self, cursor: &PageCursor, outcome: &mut PageOutcome) {
        warn!(
            max_pages = self.max_pages,
            fetched = cursor.fetched,
            "Page budget exhausted; returning partial results"
        );
        outcome.truncated = true;
    }
}

/// Split `start..=end` into consecutive, non-overlapping windows whose end
/// lies at most `max_days` after their start
pub fn date_chunks(start: NaiveDate, end: NaiveDate, max_days: u32) -> Vec<(NaiveDate, NaiveDate)> {
    if start >= end {
        return vec![(start, end)];
    }

    let mut chunks = Vec::new();
    let mut from = start;
    loop {
        let to = from
            .checked_add_days(Days::new(u64::from(max_days)))
            .map_or(end, |d| d.min(end));
        chunks.push((from, to));
        match to.succ_opt() {
            Some(next) if to < end => from = next,
            _ => break,
        }
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use crate::transport::MockTransport;
    use serde_json::{Value, json};

    fn rows(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!({"ID": i})).collect()
    }

    fn base() -> Vec<ApiRequest> {
        vec![ApiRequest::get("http://x", "/top-market-cap-tokens")]
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_full_pages_then_empty() {
        let transport = MockTransport::dataset(rows(6));
        let config = PageConfig::new(3);
        let outcome = PaginationDriver::new(&transport, &config, 50)
            .run(&base())
            .await
            .unwrap();

        // two full pages plus the empty page that ends the loop
        assert_eq!(outcome.records.len(), 6);
        assert_eq!(outcome.requests, 3);
        assert!(!outcome.truncated);

        let pages: Vec<String> = transport
            .requests()
            .iter()
            .map(|r| r.query_value("page").unwrap().to_string())
            .collect();
        assert_eq!(pages, ["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_short_page_stops() {
        let transport = MockTransport::dataset(rows(5));
        let config = PageConfig::new(3);
        let outcome = PaginationDriver::new(&transport, &config, 50)
            .run(&base())
            .await
            .unwrap();
        assert_eq!(outcome.records.len(), 5);
        assert_eq!(outcome.requests, 2);
    }

    #[tokio::test]
    async fn test_small_cap_is_one_request() {
        let transport = MockTransport::dataset(rows(500));
        let config = PageConfig::new(100).capped_by("top_k");
        let outcome = PaginationDriver::new(&transport, &config, 50)
            .with_cap(Some(10))
            .run(&base())
            .await
            .unwrap();

        assert_eq!(outcome.records.len(), 10);
        assert_eq!(outcome.requests, 1);
        assert_eq!(transport.requests()[0].query_value("limit"), Some("10"));
    }

    #[tokio::test]
    async fn test_cap_trims_oversized_pages() {
        // a server that ignores the requested limit
        let transport = MockTransport::fixed(json!({"data": rows(7)}));
        let config = PageConfig::new(5);
        let outcome = PaginationDriver::new(&transport, &config, 50)
            .with_cap(Some(12))
            .run(&base())
            .await
            .unwrap();

        assert_eq!(outcome.records.len(), 12);
        assert_eq!(outcome.requests, 2);
        assert_eq!(transport.requests()[1].query_value("limit"), Some("5"));
    }

    #[tokio::test]
    async fn test_uneven_cap_keeps_server_order() {
        let transport = MockTransport::dataset(rows(300));
        let config = PageConfig::new(50).capped_by("limit");
        let outcome = PaginationDriver::new(&transport, &config, 50)
            .with_cap(Some(120))
            .run(&base())
            .await
            .unwrap();

        let ids: Vec<u64> = outcome
            .records
            .iter()
            .map(|r| r["ID"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, (0..120).collect::<Vec<u64>>());
        assert_eq!(outcome.requests, 3);

        let limits: Vec<String> = transport
            .requests()
            .iter()
            .map(|r| r.query_value("limit").unwrap().to_string())
            .collect();
        assert_eq!(limits, ["50", "50", "50"]);
    }

    #[tokio::test]
    async fn test_page_budget_truncates() {
        let transport = MockTransport::fixed(json!({"data": rows(2)}));
        let config = PageConfig::new(2);
        let outcome = PaginationDriver::new(&transport, &config, 4)
            .run(&base())
            .await
            .unwrap();

        assert_eq!(outcome.requests, 4);
        assert_eq!(outcome.records.len(), 8);
        assert!(outcome.truncated);
    }

    #[tokio::test]
    async fn test_server_hint_ends_paging() {
        let transport = MockTransport::fixed(json!({
            "data": rows(2),
            "pagination": {"totalPages": 1},
        }));
        let config = PageConfig::new(2);
        let outcome = PaginationDriver::new(&transport, &config, 50)
            .run(&base())
            .await
            .unwrap();
        assert_eq!(outcome.requests, 1);
    }

    #[tokio::test]
    async fn test_error_discards_partial_results() {
        let transport = MockTransport::new(|request| {
            if request.query_value("page") == Some("1") {
                Ok(json!({"data": [{"ID": 1}, {"ID": 2}]}))
            } else {
                Err(ToolError::Api { status: 503, message: "busy".into() })
            }
        });
        let config = PageConfig::new(2);
        let err = PaginationDriver::new(&transport, &config, 50)
            .run(&base())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_windows_share_cap() {
        let transport = MockTransport::dataset(rows(3));
        let config = PageConfig::new(100);
        let windows = vec![
            ApiRequest::get("http://x", "/daily-ohlcv").with_query("startDate", "2023-01-01"),
            ApiRequest::get("http://x", "/daily-ohlcv").with_query("startDate", "2023-01-31"),
            ApiRequest::get("http://x", "/daily-ohlcv").with_query("startDate", "2023-03-02"),
        ];
        let outcome = PaginationDriver::new(&transport, &config, 50)
            .with_cap(Some(5))
            .run(&windows)
            .await
            .unwrap();

        assert_eq!(outcome.records.len(), 5);
        assert_eq!(outcome.requests, 2);
        let second = &transport.requests()[1];
        assert_eq!(second.query_value("startDate"), Some("2023-01-31"));
        assert_eq!(second.query_value("page"), Some("1"));
        assert_eq!(second.query_value("limit"), Some("2"));
    }

    #[test]
    fn test_short_range_single_chunk() {
        let chunks = date_chunks(date("2023-06-01"), date("2023-06-07"), 29);
        assert_eq!(chunks, vec![(date("2023-06-01"), date("2023-06-07"))]);
    }

    #[test]
    fn test_chunks_do_not_overlap() {
        let chunks = date_chunks(date("2023-01-01"), date("2023-04-15"), 29);
        assert_eq!(chunks.first().unwrap().0, date("2023-01-01"));
        assert_eq!(chunks.last().unwrap().1, date("2023-04-15"));
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].1.succ_opt().unwrap(), pair[1].0);
        }
        for (from, to) in &chunks {
            assert!((*to - *from).num_days() <= 29);
        }
    }
}
