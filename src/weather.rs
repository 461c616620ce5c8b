//! Geolocated weather fetching.
//!
//! The weather feature runs in two stages: acquire coordinates from the
//! injected [`LocationSource`], then fetch conditions through the
//! gateway. Denied or unsupported location fails the feature immediately
//! without touching the network.

use std::sync::Arc;

use crate::error::GatewayError;
use crate::gateway::Backend;
use crate::geo::{GeoCoordinate, LocationSource};
use crate::models::WeatherReport;
use crate::state::{FetchPhase, FetchState, RequestToken};

/// Fixed message stored in `Failed` when location cannot be acquired.
const LOCATION_FAILED: &str = "Unable to get your location. Please enable location services.";
/// Fixed message stored in `Failed` when the weather fetch fails.
const WEATHER_FAILED: &str = "Failed to fetch weather data.";

/// Observable phase of the weather feature.
///
/// Extends the usual fetch lifecycle with an `AcquiringLocation` stage
/// before `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherPhase {
    Idle,
    AcquiringLocation,
    Pending,
    Succeeded,
    Failed,
}

/// Drives location acquisition and the weather fetch.
pub struct WeatherController {
    gateway: Arc<dyn Backend>,
    locator: Arc<dyn LocationSource>,
    state: FetchState<WeatherReport>,
    acquiring: bool,
    coordinate: Option<GeoCoordinate>,
}

impl WeatherController {
    pub fn new(gateway: Arc<dyn Backend>, locator: Arc<dyn LocationSource>) -> Self {
        Self {
            gateway,
            locator,
            state: FetchState::new(),
            acquiring: false,
            coordinate: None,
        }
    }

    /// The current phase of the feature.
    pub fn phase(&self) -> WeatherPhase {
        if self.acquiring {
            return WeatherPhase::AcquiringLocation;
        }
        match self.state.phase() {
            FetchPhase::Idle => WeatherPhase::Idle,
            FetchPhase::Pending { .. } => WeatherPhase::Pending,
            FetchPhase::Succeeded { .. } => WeatherPhase::Succeeded,
            FetchPhase::Failed { .. } => WeatherPhase::Failed,
        }
    }

    /// The fetched report, if the last run succeeded.
    pub fn report(&self) -> Option<&WeatherReport> {
        self.state.value()
    }

    /// The failure message, if the last run failed.
    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    /// The coordinates the last successful acquisition produced.
    pub fn coordinate(&self) -> Option<GeoCoordinate> {
        self.coordinate
    }

    /// First half of the fetch stage: transition to `Pending` for
    /// `coordinate`. Returns `None` while a run is already in flight.
    pub fn begin_fetch(&mut self, coordinate: GeoCoordinate) -> Option<RequestToken> {
        if self.acquiring || self.state.is_pending() {
            tracing::debug!("weather request already in flight; ignoring");
            return None;
        }
        self.coordinate = Some(coordinate);
        Some(self.state.start())
    }

    /// Second half of the fetch stage: apply the gateway outcome for
    /// `token`. Stale outcomes are discarded; returns whether the outcome
    /// was applied.
    pub fn finish_fetch(
        &mut self,
        token: RequestToken,
        result: Result<WeatherReport, GatewayError>,
    ) -> bool {
        match result {
            Ok(report) => self.state.resolve(token, report),
            Err(e) => {
                tracing::warn!(error = %e, "weather fetch failed");
                self.state.reject(token, WEATHER_FAILED)
            }
        }
    }

    /// Acquire coordinates, then fetch current conditions and forecast.
    ///
    /// On denial or missing location capability the feature fails
    /// immediately without a gateway call. Ignored while an earlier run
    /// is still in flight.
    pub async fn request_weather(&mut self) {
        if self.acquiring || self.state.is_pending() {
            tracing::debug!("weather request already in flight; ignoring");
            return;
        }

        self.acquiring = true;
        tracing::debug!("acquiring device location");
        let acquired = self.locator.current_location().await;
        self.acquiring = false;

        let coordinate = match acquired {
            Ok(coordinate) => coordinate,
            Err(e) => {
                tracing::warn!(error = %e, "location acquisition failed");
                // The hop through Pending is atomic; the public phase goes
                // AcquiringLocation -> Failed with no gateway call issued.
                let token = self.state.start();
                self.state.reject(token, LOCATION_FAILED);
                return;
            }
        };

        let Some(token) = self.begin_fetch(coordinate) else {
            return;
        };
        let result = self.gateway.weather(coordinate).await;
        self.finish_fetch(token, result);
    }

    /// Re-run the whole acquisition-then-fetch sequence.
    pub async fn refresh(&mut self) {
        self.request_weather().await;
    }
}
