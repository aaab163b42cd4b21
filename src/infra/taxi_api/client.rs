use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::error::ErrorKind;
use crate::fetch::{BasicClient, BearerAuth, HttpClient, fetch_json, send_json};
use crate::models::{DailyAggregatesPage, DatasetStatistics, SummaryStats, TripPage};
use crate::services::{DashboardApi, FetchRequest};

const SUMMARY_PATH: &str = "/api/summary";
const AGGREGATES_PATH: &str = "/api/aggregates/daily";
const TRIPS_PATH: &str = "/api/trips";
const STATISTICS_PATH: &str = "/api/statistics";
const TOKEN_PATH: &str = "/token";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
}

/// Which optional query parameters an endpoint accepts.
#[derive(Debug, Clone, Copy)]
struct Scope {
    paged: bool,
    borough: bool,
}

const SUMMARY_SCOPE: Scope = Scope {
    paged: false,
    borough: false,
};
const AGGREGATES_SCOPE: Scope = Scope {
    paged: true,
    borough: false,
};
const TRIPS_SCOPE: Scope = Scope {
    paged: true,
    borough: true,
};

/// Client for the trip analytics REST backend.
pub struct TaxiApiClient<C: HttpClient = BasicClient> {
    base_url: String,
    http: C,
}

impl TaxiApiClient<BasicClient> {
    pub fn from_config(config: &DashboardConfig) -> reqwest::Result<Self> {
        let http = BasicClient::with_timeout(config.timeout())?;
        Ok(Self::new(&config.api_url, http))
    }
}

impl<C: HttpClient> TaxiApiClient<C> {
    pub fn new(base_url: &str, http: C) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchanges analyst credentials for a bearer token.
    #[tracing::instrument(skip(self, password), fields(base_url = %self.base_url))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ErrorKind> {
        let url = format!("{}{}", self.base_url, TOKEN_PATH);
        let req = reqwest::Client::new()
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .build()
            .map_err(|e| ErrorKind::ServerError(format!("invalid login request: {e}")))?;

        let token: TokenResponse = send_json(&self.http, req).await?;
        if token.access_token.is_empty() {
            return Err(ErrorKind::ServerError("login returned an empty token".to_string()));
        }

        info!(
            token_type = token.token_type.as_deref().unwrap_or("bearer"),
            "Logged in"
        );
        Ok(token.access_token)
    }

    fn endpoint_url(
        &self,
        path: &str,
        req: &FetchRequest,
        scope: Scope,
    ) -> Result<reqwest::Url, ErrorKind> {
        let filter = &req.filter;
        let mut params: Vec<(&str, String)> = vec![
            ("start_date", filter.start().format("%Y-%m-%d").to_string()),
            ("end_date", filter.end().format("%Y-%m-%d").to_string()),
        ];
        if let Some(service_type) = filter.service_type() {
            params.push(("service_type", service_type.to_string()));
        }
        if scope.borough {
            if let Some(borough) = filter.borough() {
                params.push(("borough", borough.to_string()));
            }
        }
        if scope.paged {
            params.push(("page", req.page.to_string()));
            params.push(("page_size", req.page_size.to_string()));
        }

        let url = format!("{}{}", self.base_url, path);
        reqwest::Url::parse_with_params(&url, &params)
            .map_err(|e| ErrorKind::ServerError(format!("invalid URL '{url}': {e}")))
    }

    fn statistics_url(&self) -> Result<reqwest::Url, ErrorKind> {
        let url = format!("{}{}", self.base_url, STATISTICS_PATH);
        reqwest::Url::parse(&url)
            .map_err(|e| ErrorKind::ServerError(format!("invalid URL '{url}': {e}")))
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        req: &FetchRequest,
        scope: Scope,
    ) -> Result<T, ErrorKind> {
        let url = self.endpoint_url(path, req, scope)?;
        debug!(%url, "Requesting");
        let authed = BearerAuth::new(&self.http, &req.credential);
        fetch_json(&authed, url).await
    }
}

#[async_trait]
impl<C: HttpClient> DashboardApi for TaxiApiClient<C> {
    async fn fetch_summary(&self, req: &FetchRequest) -> Result<SummaryStats, ErrorKind> {
        self.get(SUMMARY_PATH, req, SUMMARY_SCOPE).await
    }

    async fn fetch_daily_aggregates(
        &self,
        req: &FetchRequest,
    ) -> Result<DailyAggregatesPage, ErrorKind> {
        self.get(AGGREGATES_PATH, req, AGGREGATES_SCOPE).await
    }

    async fn fetch_trip_page(&self, req: &FetchRequest) -> Result<TripPage, ErrorKind> {
        self.get(TRIPS_PATH, req, TRIPS_SCOPE).await
    }

    async fn fetch_statistics(&self, credential: &str) -> Result<DatasetStatistics, ErrorKind> {
        let url = self.statistics_url()?;
        debug!(%url, "Requesting");
        fetch_json(&BearerAuth::new(&self.http, credential), url).await
    }
}
