//! Device coordinate acquisition.
//!
//! A headless client has no browser geolocation API, so acquisition is a
//! trait seam: the renderer host injects whatever [`LocationSource`] the
//! platform offers. [`FixedLocator`] serves coordinates the user
//! configured and reports unavailability otherwise — it never invents a
//! position.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LocationConfig;
use crate::error::LocationError;

/// A position in floating-point degrees.
///
/// Only ever produced by a successful acquisition; never defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Source of the device's current coordinates.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Acquire the current coordinates.
    async fn current_location(&self) -> Result<GeoCoordinate, LocationError>;
}

/// Locator serving a fixed, user-configured position.
#[derive(Debug, Clone, Default)]
pub struct FixedLocator {
    coordinate: Option<GeoCoordinate>,
}

impl FixedLocator {
    /// A locator that always yields `coordinate`.
    pub fn new(coordinate: GeoCoordinate) -> Self {
        Self {
            coordinate: Some(coordinate),
        }
    }

    /// Build from config. Both latitude and longitude must be set;
    /// otherwise the locator reports unavailability.
    pub fn from_config(config: &LocationConfig) -> Self {
        let coordinate = match (config.latitude, config.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoCoordinate {
                latitude,
                longitude,
            }),
            _ => None,
        };
        Self { coordinate }
    }
}

#[async_trait]
impl LocationSource for FixedLocator {
    async fn current_location(&self) -> Result<GeoCoordinate, LocationError> {
        self.coordinate.ok_or_else(|| {
            LocationError::Unsupported("no coordinates configured".to_owned())
        })
    }
}
