//! HTTP client for the travel planner backend
//!
//! The backend exposes two form endpoints (`search_transport`,
//! `generate_itinerary`) plus a destination catalogue and a health probe.
//! Every call is a single attempt: no retries and, unless configured, no
//! timeout.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::models::{
    ApiPayload, ApiReply, Envelope, HealthStatus, ItineraryRequest, ItineraryResult,
    LocationCatalogue, LocationSummary, TransportResult, TransportSearchRequest,
};
use crate::{PlannerError, Result};

const SEARCH_TRANSPORT_PATH: &str = "api/search_transport";
const GENERATE_ITINERARY_PATH: &str = "api/generate_itinerary";
const LOCATIONS_PATH: &str = "api/locations";
const HEALTH_PATH: &str = "api/health";

/// Responses slower than this are logged as a warning
const SLOW_RESPONSE_SECS: u64 = 5;

/// The backend operations the page forms submit to
#[async_trait]
pub trait TravelApi: Send + Sync {
    /// Ask for transport recommendations
    async fn search_transport(
        &self,
        request: &TransportSearchRequest,
    ) -> Result<ApiReply<TransportResult>>;

    /// Ask for a day-by-day itinerary
    async fn generate_itinerary(
        &self,
        request: &ItineraryRequest,
    ) -> Result<ApiReply<ItineraryResult>>;
}

/// reqwest-backed implementation of [`TravelApi`]
#[derive(Debug, Clone)]
pub struct HttpTravelApi {
    client: Client,
    base_url: Url,
}

impl HttpTravelApi {
    /// Create a client for the configured backend
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&config.base_url)?,
        })
    }

    /// The backend root every endpoint is resolved against
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List the destinations the backend knows about
    #[instrument(skip(self))]
    pub async fn locations(&self) -> Result<ApiReply<Vec<LocationSummary>>> {
        let value = self.get_value(LOCATIONS_PATH).await?;
        let reply = ApiReply::<LocationCatalogue>::from_value(value)?;
        Ok(match reply {
            ApiReply::Success(catalogue) => ApiReply::Success(catalogue.locations),
            ApiReply::Failure(message) => ApiReply::Failure(message),
        })
    }

    /// Probe the backend health endpoint
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthStatus> {
        let value = self.get_value(HEALTH_PATH).await?;
        let health: HealthStatus = serde_json::from_value(value)?;
        debug!("Backend reports status '{}'", health.status);
        Ok(health)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| PlannerError::config(format!("Invalid endpoint path '{path}': {e}")))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<ApiReply<T>>
    where
        B: Serialize + Sync,
        T: ApiPayload + Send,
    {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);

        let start_time = Instant::now();
        let response = self.client.post(url.clone()).json(body).send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            PlannerError::network(e.to_string())
        })?;

        let value = Self::read_body(response, &url, start_time).await?;
        ApiReply::from_value(value)
    }

    async fn get_value(&self, path: &str) -> Result<Value> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);

        let start_time = Instant::now();
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            PlannerError::network(e.to_string())
        })?;

        Self::read_body(response, &url, start_time).await
    }

    /// Read a JSON body. Non-2xx answers only pass through when they carry
    /// the backend's failure envelope.
    async fn read_body(response: reqwest::Response, url: &Url, start_time: Instant) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;
        let total_duration = start_time.elapsed();

        debug!(
            "HTTP response {} from {} in {:.3}s",
            status,
            url,
            total_duration.as_secs_f64()
        );

        if total_duration.as_secs() > SLOW_RESPONSE_SECS {
            warn!(
                "Slow backend response detected: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        let parsed = serde_json::from_str::<Value>(&text);

        if !status.is_success() {
            return match parsed {
                Ok(value) if carries_failure(&value) => {
                    info!("Backend rejected request with {}", status);
                    Ok(value)
                }
                _ => {
                    error!("Unexpected HTTP status {} from {}", status, url);
                    Err(PlannerError::api(status_message(status)))
                }
            };
        }

        let value = parsed.map_err(|e| {
            error!("Response from {} is not valid JSON: {}", url, e);
            PlannerError::decode(format!("Response is not valid JSON: {e}"))
        })?;

        info!(
            "Backend request to {} completed in {:.3}s",
            url.path(),
            total_duration.as_secs_f64()
        );
        Ok(value)
    }
}

#[async_trait]
impl TravelApi for HttpTravelApi {
    #[instrument(skip(self, request), fields(mode = %request.mode, location = %request.location))]
    async fn search_transport(
        &self,
        request: &TransportSearchRequest,
    ) -> Result<ApiReply<TransportResult>> {
        self.post_json(SEARCH_TRANSPORT_PATH, request).await
    }

    #[instrument(skip(self, request), fields(location = %request.location, duration = ?request.duration))]
    async fn generate_itinerary(
        &self,
        request: &ItineraryRequest,
    ) -> Result<ApiReply<ItineraryResult>> {
        self.post_json(GENERATE_ITINERARY_PATH, request).await
    }
}

/// Parse the base URL and make sure relative endpoint paths append to it
fn normalize_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| PlannerError::config(format!("Invalid API base URL '{base_url}': {e}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn carries_failure(value: &Value) -> bool {
    Envelope::peek(value).is_some_and(|envelope| !envelope.success && envelope.error.is_some())
}

fn status_message(status: StatusCode) -> String {
    format!(
        "HTTP {} - {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown error")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("http://localhost:5000", "http://localhost:5000/api/search_transport")]
    #[case("http://localhost:5000/", "http://localhost:5000/api/search_transport")]
    #[case("https://planner.test/v2", "https://planner.test/v2/api/search_transport")]
    fn test_endpoint_resolution(#[case] base: &str, #[case] expected: &str) {
        let config = ApiConfig {
            base_url: base.to_string(),
            ..ApiConfig::default()
        };
        let api = HttpTravelApi::new(&config).unwrap();
        assert_eq!(api.endpoint(SEARCH_TRANSPORT_PATH).unwrap().as_str(), expected);
    }

    #[test]
    fn test_invalid_base_url_is_a_config_error() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            ..ApiConfig::default()
        };
        let err = HttpTravelApi::new(&config).unwrap_err();
        assert!(matches!(err, PlannerError::Config { .. }));
    }

    #[test]
    fn test_carries_failure() {
        assert!(carries_failure(&json!({"success": false, "error": "Location is required"})));
        assert!(!carries_failure(&json!({"success": false})));
        assert!(!carries_failure(&json!({"detail": "Not Found"})));
        assert!(!carries_failure(&json!("oops")));
    }

    #[test]
    fn test_status_message() {
        assert_eq!(
            status_message(StatusCode::BAD_GATEWAY),
            "HTTP 502 - Bad Gateway"
        );
    }
}
