//! Mock Transport
//!
//! Answers from a closure and records every request it sees. Used by the
//! test suites and for offline demos.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::{Value, json};

use super::Transport;
use crate::error::Result;
use crate::request::ApiRequest;

type Handler = dyn Fn(&ApiRequest) -> Result<Value> + Send + Sync;

/// Recording transport with canned responses
pub struct MockTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with the same body
    pub fn fixed(body: Value) -> Self {
        Self::new(move |_| Ok(body.clone()))
    }

    /// Serve `records` page by page, honouring the `page` (1-based) and
    /// `limit` query parameters the way the live API does
    pub fn dataset(records: Vec<Value>) -> Self {
        Self::new(move |request| {
            let page: usize = request
                .query_value("page")
                .and_then(|p| p.parse().ok())
                .unwrap_or(1);
            let limit: usize = request
                .query_value("limit")
                .and_then(|l| l.parse().ok())
                .unwrap_or(records.len());
            let start = page.saturating_sub(1).saturating_mul(limit);
            let slice: Vec<Value> = records.iter().skip(start).take(limit).cloned().collect();
            Ok(json!({"success": true, "length": slice.len(), "data": slice}))
        })
    }

    /// Requests seen so far, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ApiRequest>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, request: &ApiRequest) -> Result<Value> {
        self.lock().push(request.clone());
        (self.handler)(request)
    }

    fn name(&self) -> &str {
        "mock"
    }
}
