//! HTTP gateway to the farmer-support backend.
//!
//! The gateway is the only component permitted to perform network I/O.
//! It is stateless and safe to share across feature controllers via
//! `Arc<dyn Backend>`; concurrent calls for independent endpoints are
//! fine. Every transport failure — connection error, non-2xx status,
//! unparseable body — is normalized into a [`GatewayError`] before it
//! reaches a controller.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::config::BackendConfig;
use crate::error::{ClientError, GatewayError};
use crate::geo::GeoCoordinate;
use crate::models::{CropAnalysis, PriceQuote, VideoCatalog, WeatherReport};

/// Operations the backend exposes.
///
/// Controllers depend on this trait rather than [`HttpGateway`] directly
/// so tests can substitute scripted fakes.
#[async_trait]
pub trait Backend: Send + Sync {
    /// POST the selected photo to `/analyze-crop` and return the report.
    async fn analyze_crop(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<CropAnalysis, GatewayError>;

    /// GET `/weather` for the given coordinates.
    async fn weather(&self, coordinate: GeoCoordinate) -> Result<WeatherReport, GatewayError>;

    /// GET the full `/market-prices` listing.
    async fn market_prices(&self) -> Result<Vec<PriceQuote>, GatewayError>;

    /// GET `/videos`, optionally filtered to one category.
    async fn videos(&self, category: Option<&str>) -> Result<VideoCatalog, GatewayError>;

    /// POST the raw query text to `/ask-query` and return the answer.
    async fn ask_query(&self, query: &str) -> Result<String, GatewayError>;
}

/// HTTP implementation of [`Backend`] over a single configured base address.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpGateway {
    /// Build a gateway from backend config.
    ///
    /// # Errors
    ///
    /// Returns a config error when the base URL does not parse or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &BackendConfig) -> crate::error::Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ClientError::Config(format!(
                "invalid backend base_url '{}': {e}",
                config.base_url
            ))
        })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }
}

#[derive(Debug, Deserialize)]
struct PricesEnvelope {
    prices: Vec<PriceQuote>,
}

#[derive(Debug, Deserialize)]
struct AnswerEnvelope {
    response: String,
}

#[async_trait]
impl Backend for HttpGateway {
    async fn analyze_crop(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<CropAnalysis, GatewayError> {
        tracing::debug!(file = file_name, size = bytes.len(), "uploading crop photo");
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str(mime_type)
            .map_err(|e| {
                GatewayError::MalformedResponse(format!("invalid MIME type '{mime_type}': {e}"))
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("/analyze-crop"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        let analysis: CropAnalysis = read_json(response).await?;
        tracing::debug!(crop = %analysis.crop.name, "crop analysis complete");
        Ok(analysis)
    }

    async fn weather(&self, coordinate: GeoCoordinate) -> Result<WeatherReport, GatewayError> {
        tracing::debug!(
            lat = coordinate.latitude,
            lon = coordinate.longitude,
            "fetching weather"
        );
        let response = self
            .client
            .get(self.endpoint("/weather"))
            .query(&[
                ("lat", coordinate.latitude),
                ("lon", coordinate.longitude),
            ])
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        read_json(response).await
    }

    async fn market_prices(&self) -> Result<Vec<PriceQuote>, GatewayError> {
        tracing::debug!("fetching market prices");
        let response = self
            .client
            .get(self.endpoint("/market-prices"))
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        let envelope: PricesEnvelope = read_json(response).await?;
        Ok(envelope.prices)
    }

    async fn videos(&self, category: Option<&str>) -> Result<VideoCatalog, GatewayError> {
        tracing::debug!(category = category.unwrap_or("<all>"), "fetching videos");
        let mut request = self.client.get(self.endpoint("/videos"));
        if let Some(category) = category {
            request = request.query(&[("category", category)]);
        }
        let response = request.send().await.map_err(transport_error)?;
        let response = check_status(response).await?;
        read_json(response).await
    }

    async fn ask_query(&self, query: &str) -> Result<String, GatewayError> {
        tracing::debug!("submitting query");
        let response = self
            .client
            .post(self.endpoint("/ask-query"))
            .form(&[("query", query)])
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        let envelope: AnswerEnvelope = read_json(response).await?;
        Ok(envelope.response)
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    GatewayError::NetworkUnavailable(e.to_string())
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::ServerError {
        status: status.as_u16(),
        detail: extract_error_detail(&body),
    })
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
    let body = response.text().await.map_err(|e| {
        GatewayError::NetworkUnavailable(format!("failed to read response body: {e}"))
    })?;
    serde_json::from_str(&body).map_err(|e| GatewayError::MalformedResponse(e.to_string()))
}

/// Pull a human-readable message out of a backend error body.
///
/// The backend reports errors as `{"detail": "..."}`; anything else is
/// passed through verbatim.
fn extract_error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .and_then(|d| d.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_owned())
}
