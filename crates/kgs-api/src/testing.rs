use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    StatusCode,
};
use serde_json::Value;

use crate::fetch::{Body, Exchange, Fetch, Request, Response};

/// In-memory [`Fetch`] that serves canned bodies and records every path asked for.
#[derive(Clone, Debug, Default)]
pub(crate) struct MockFetcher {
    routes: Arc<HashMap<String, (StatusCode, Body)>>,
    log: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    fn with(mut self, path: &str, status: StatusCode, body: Body) -> Self {
        Arc::make_mut(&mut self.routes).insert(path.to_string(), (status, body));
        self
    }

    pub fn with_json(self, path: &str, body: Value) -> Self {
        self.with(path, StatusCode::OK, Body::Json(body))
    }

    pub fn with_status(self, path: &str, status: u16) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.with(path, status, Body::Text(String::new()))
    }

    pub fn requests(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl Fetch for MockFetcher {
    async fn fetch(&self, path: &str) -> Exchange {
        self.log.lock().unwrap().push(path.to_string());
        let (status, body) = self
            .routes
            .get(path)
            .cloned()
            .unwrap_or((StatusCode::NOT_FOUND, Body::Text("not found".into())));
        let mut headers = HeaderMap::new();
        if let Body::Json(_) = body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        Exchange {
            request: Request::get(format!("mock://{path}")),
            response: Ok(Response {
                status,
                headers,
                body,
            }),
        }
    }
}
