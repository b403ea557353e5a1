use crate::config::CrawlConfig;
use crate::models::{GeoBounds, PlanType, SessionIdentity};
use crate::scrapers::types::{article_query, plan_query, MarkerFilter};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, REFERER, USER_AGENT,
};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How a single endpoint call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Ok,
    HttpError(u16),
    Timeout,
    DecodeError,
    NetworkError,
}

/// Decoded payload (only on `Ok`) plus status
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub payload: Option<Value>,
    pub status: FetchStatus,
}

impl FetchOutcome {
    fn ok(payload: Value) -> Self {
        Self {
            payload: Some(payload),
            status: FetchStatus::Ok,
        }
    }

    fn failed(status: FetchStatus) -> Self {
        Self {
            payload: None,
            status,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == FetchStatus::Ok
    }
}

/// Client for the land map JSON endpoints
///
/// Every call is isolated: failures come back as a [`FetchStatus`] and never
/// as an error, so one missing record cannot abort a crawl.
pub struct EndpointFetcher {
    client: Client,
    base_url: String,
    referer: String,
}

impl EndpointFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).gzip(true).build()?;
        let base_url = base_url.trim_end_matches('/').to_string();
        let referer = format!("{}/", base_url);

        Ok(Self {
            client,
            base_url,
            referer,
        })
    }

    pub fn from_config(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.api_root(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `base_url + path` and decode the body as JSON
    pub async fn fetch_json(
        &self,
        path: &str,
        query: &[(&str, String)],
        identity: &SessionIdentity,
    ) -> FetchOutcome {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} ({} params)", url, query.len());

        let response = match self
            .client
            .get(&url)
            .query(query)
            .headers(self.build_headers(identity))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Self::transport_failure(&url, e),
        };

        let status = response.status();
        if status != StatusCode::OK {
            warn!("{} returned status: {}", path, status);
            return FetchOutcome::failed(FetchStatus::HttpError(status.as_u16()));
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return Self::transport_failure(&url, e),
        };

        match serde_json::from_slice::<Value>(&body) {
            Ok(payload) => FetchOutcome::ok(payload),
            Err(e) => {
                warn!("{} returned a body that is not JSON ({} bytes): {}", path, body.len(), e);
                FetchOutcome::failed(FetchStatus::DecodeError)
            }
        }
    }

    fn transport_failure(url: &str, error: reqwest::Error) -> FetchOutcome {
        if error.is_timeout() {
            warn!("Request to {} timed out", url);
            FetchOutcome::failed(FetchStatus::Timeout)
        } else {
            warn!("Request to {} failed: {}", url, error);
            FetchOutcome::failed(FetchStatus::NetworkError)
        }
    }

    /// Browser-like headers carrying the session identity
    fn build_headers(&self, identity: &SessionIdentity) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(user_agent) = HeaderValue::from_str(&identity.user_agent) {
            headers.insert(USER_AGENT, user_agent);
        }
        if let Ok(referer) = HeaderValue::from_str(&self.referer) {
            headers.insert(REFERER, referer);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ko-KR,ko;q=0.9,en;q=0.8"),
        );

        // Origin checks on the API reject requests without fetch metadata
        headers.insert(
            HeaderName::from_static("sec-fetch-dest"),
            HeaderValue::from_static("empty"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-mode"),
            HeaderValue::from_static("cors"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-site"),
            HeaderValue::from_static("same-origin"),
        );

        if let Some(cookie) = identity.cookie_header() {
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    headers.insert(COOKIE, value);
                }
                Err(_) => warn!("Session cookies contain invalid header characters, sending none"),
            }
        }

        headers
    }

    /// Complex markers inside `bounds`; empty on any failure
    pub async fn complex_markers(
        &self,
        bounds: &GeoBounds,
        filter: &MarkerFilter,
        identity: &SessionIdentity,
    ) -> Vec<Value> {
        let outcome = self
            .fetch_json(
                "/api/complexes/single-markers/2.0",
                &filter.query(bounds),
                identity,
            )
            .await;

        match outcome.payload {
            Some(Value::Array(complexes)) => {
                info!("Collected {} complex markers", complexes.len());
                complexes
            }
            Some(other) => {
                warn!("Marker endpoint returned a non-array payload: {}", json_kind(&other));
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    /// Detail record of one complex, if the call succeeded
    pub async fn complex_detail(&self, complex_no: &str, identity: &SessionIdentity) -> Option<Value> {
        let path = format!("/api/complexes/detail/{}", complex_no);
        let detail = self.fetch_json(&path, &[], identity).await.payload;
        if detail.is_some() {
            info!("Collected detail for complex {}", complex_no);
        }
        detail
    }

    /// Articles listed for one complex, taken from the `articleList` envelope field
    pub async fn complex_articles(
        &self,
        complex_no: &str,
        trade_type: &str,
        identity: &SessionIdentity,
    ) -> Vec<Value> {
        let path = format!("/api/articles/complex/{}", complex_no);
        let outcome = self
            .fetch_json(&path, &article_query(complex_no, trade_type), identity)
            .await;

        let articles = match outcome.payload {
            Some(mut envelope) => match envelope.get_mut("articleList").map(Value::take) {
                Some(Value::Array(articles)) => articles,
                _ => {
                    debug!("No articleList in response for complex {}", complex_no);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        info!("Collected {} articles for complex {}", articles.len(), complex_no);
        articles
    }

    /// Development plans of one category inside `bounds`; empty on any failure
    pub async fn development_plans(
        &self,
        bounds: &GeoBounds,
        plan: PlanType,
        zoom: u8,
        identity: &SessionIdentity,
    ) -> Vec<Value> {
        let path = format!("/api/developmentplan/{}/list", plan);
        let outcome = self.fetch_json(&path, &plan_query(zoom, bounds), identity).await;

        match outcome.payload {
            Some(Value::Array(plans)) => {
                info!("Collected {} {} development plans", plans.len(), plan);
                plans
            }
            Some(other) => {
                warn!("{} plan endpoint returned a non-array payload: {}", plan, json_kind(&other));
                Vec::new()
            }
            None => Vec::new(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
