mod basic;
mod client;
pub mod auth;

pub use auth::BearerAuth;
pub use basic::BasicClient;
pub use client::HttpClient;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ErrorKind;

/// Issues a GET and decodes the JSON body.
pub async fn fetch_json<C: HttpClient, T: DeserializeOwned>(
    client: &C,
    url: reqwest::Url,
) -> Result<T, ErrorKind> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);
    send_json(client, req).await
}

/// Executes `req` and decodes the JSON body, classifying any failure.
pub async fn send_json<C: HttpClient, T: DeserializeOwned>(
    client: &C,
    req: reqwest::Request,
) -> Result<T, ErrorKind> {
    let path = req.url().path().to_string();
    let resp = client
        .execute(req)
        .await
        .map_err(ErrorKind::from_transport)?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        debug!(%path, status = status.as_u16(), "Backend returned an error status");
        return Err(ErrorKind::from_status(status.as_u16(), &body));
    }

    resp.json::<T>().await.map_err(|e| {
        if e.is_timeout() {
            ErrorKind::Timeout
        } else {
            ErrorKind::ServerError(format!("failed to decode {path} response: {e}"))
        }
    })
}
