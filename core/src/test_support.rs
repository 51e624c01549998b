//! In-memory transport used by unit tests.
//!
//! Replies are matched in insertion order on method, path suffix and
//! (optionally) the exact query. One-shot replies are consumed when they
//! match, which lets a test script "before" and "after" responses for the
//! same endpoint. Every executed request is recorded.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::HttpTransport;
use crate::types::{Category, Landmark, LandmarkId};

pub(crate) const BASE_URL: &str = "http://test.invalid";

#[derive(Debug, Clone)]
pub(crate) struct Reply {
    outcome: Result<HttpResponse, ApiError>,
    delay: Duration,
}

impl Reply {
    pub(crate) fn json(status: u16, body: &impl Serialize) -> Self {
        let body = serde_json::to_string(body).unwrap();
        Self::raw(status, &body)
    }

    pub(crate) fn raw(status: u16, body: &str) -> Self {
        Self {
            outcome: Ok(HttpResponse::new(status, body)),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn network(message: &str) -> Self {
        Self {
            outcome: Err(ApiError::network(message)),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

struct Rule {
    method: HttpMethod,
    path: String,
    query: Option<Vec<(String, String)>>,
    once: bool,
    reply: Reply,
}

impl Rule {
    fn matches(&self, request: &HttpRequest) -> bool {
        self.method == request.method
            && request.url.ends_with(&self.path)
            && self.query.as_ref().map_or(true, |query| *query == request.query)
    }
}

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    rules: Mutex<Vec<Rule>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, method: HttpMethod, path: &str, query: Option<Vec<(String, String)>>, once: bool, reply: Reply) {
        self.rules.lock().push(Rule {
            method,
            path: path.to_string(),
            query,
            once,
            reply,
        });
    }

    /// Reply to every matching request, whatever its query.
    pub(crate) fn reply(&self, method: HttpMethod, path: &str, reply: Reply) {
        self.push(method, path, None, false, reply);
    }

    /// Reply to the next matching request only.
    pub(crate) fn reply_once(&self, method: HttpMethod, path: &str, reply: Reply) {
        self.push(method, path, None, true, reply);
    }

    /// Reply to list requests whose only filter is `search=text`.
    pub(crate) fn reply_to_search(&self, text: &str, reply: Reply) {
        let query = vec![("search".to_string(), text.to_string())];
        self.push(HttpMethod::Get, "/api/landmarks/", Some(query), false, reply);
    }

    /// Reply to list requests carrying no filters.
    pub(crate) fn reply_to_unfiltered_list(&self, reply: Reply) {
        self.push(HttpMethod::Get, "/api/landmarks/", Some(Vec::new()), false, reply);
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let reply = {
            let mut rules = self.rules.lock();
            let position = rules.iter().position(|rule| rule.matches(&request));
            match position {
                Some(index) if rules[index].once => Some(rules.remove(index).reply),
                Some(index) => Some(rules[index].reply.clone()),
                None => None,
            }
        };
        let description = format!("{} {} {:?}", request.method.as_str(), request.url, request.query);
        self.requests.lock().push(request);

        let Some(reply) = reply else {
            return Err(ApiError::network(format!("unscripted request: {description}")));
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.outcome
    }
}

pub(crate) fn landmark(id: LandmarkId, title: &str) -> Landmark {
    Landmark {
        id,
        title: title.to_string(),
        category: Category::Historical,
        description: String::new(),
        country: None,
        image_url: None,
        latitude: 41.0,
        longitude: 29.0,
    }
}
