use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use tracing::warn;

/// An [`HttpClient`] wrapper that sends `Authorization: Bearer <token>`.
///
/// Borrows the inner client so a fresh wrapper can be made per request with
/// whatever token the session holds at that moment.
pub struct BearerAuth<'a, C> {
    pub inner: &'a C,
    pub token: &'a str,
}

impl<'a, C> BearerAuth<'a, C> {
    pub fn new(inner: &'a C, token: &'a str) -> Self {
        Self { inner, token }
    }
}

#[async_trait]
impl<'a, C: HttpClient> HttpClient for BearerAuth<'a, C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        match HeaderValue::from_str(&format!("Bearer {}", self.token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                req.headers_mut().insert(AUTHORIZATION, value);
            }
            // sent without credentials; the backend answers 401
            Err(_) => warn!("Session token is not a valid header value"),
        }
        self.inner.execute(req).await
    }
}
