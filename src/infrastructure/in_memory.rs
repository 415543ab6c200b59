use crate::domain::ports::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A scripted transport that answers from canned responses.
///
/// Responses are keyed by method and by the URL path after the merchant
/// prefix is stripped, so `/customers/c1` matches
/// `http://localhost:3000/merchants/m/customers/c1`. Unscripted requests get
/// an empty 404. Every request is recorded for later inspection.
///
/// `Clone` shares the underlying state, so a test can keep a handle while
/// the gateway owns a boxed copy.
#[derive(Default, Clone)]
pub struct InMemoryTransport {
    responses: Arc<RwLock<HashMap<(HttpMethod, String), HttpResponse>>>,
    requests: Arc<RwLock<Vec<HttpRequest>>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the response for `method` on `path`.
    pub async fn respond(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        let mut responses = self.responses.write().await;
        responses.insert(
            (method, path.to_string()),
            HttpResponse {
                status,
                body: body.to_string(),
            },
        );
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<HttpRequest> {
        self.requests.read().await.clone()
    }
}

fn resource_path(url: &str) -> &str {
    match url.find("/merchants/") {
        Some(idx) => {
            let rest = &url[idx + "/merchants/".len()..];
            rest.find('/').map_or("/", |slash| &rest[slash..])
        }
        None => url,
    }
}

#[async_trait]
impl HttpTransport for InMemoryTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let key = (request.method, resource_path(&request.url).to_string());
        self.requests.write().await.push(request);

        let responses = self.responses.read().await;
        Ok(responses.get(&key).cloned().unwrap_or(HttpResponse {
            status: 404,
            body: String::new(),
        }))
    }
}
