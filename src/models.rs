//! Wire types for backend responses.
//!
//! These mirror the JSON shapes the farmer-support backend returns.
//! Unknown fields are ignored so the backend can grow its payloads
//! without breaking older clients.

use serde::{Deserialize, Serialize};

/// Structured crop report returned by `/analyze-crop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropReport {
    /// Identified crop name.
    pub name: String,
    /// Short description of the crop.
    pub description: String,
    /// Growing season the crop suits.
    pub suitable_season: String,
    /// Expected time to harvest.
    pub harvest_time: String,
    /// Cultivation advice.
    pub advice: String,
    /// Known diseases for this crop.
    #[serde(default)]
    pub diseases: Vec<String>,
}

/// Full `/analyze-crop` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropAnalysis {
    /// The identified crop and its advisory data.
    pub crop: CropReport,
    /// Where the backend stored the uploaded image, if it reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// When the analysis ran, if the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_date: Option<String>,
}

/// Current conditions from `/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in °C.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Wind speed in m/s.
    pub wind_speed: f64,
    /// Textual description, e.g. "partly cloudy".
    pub description: String,
    /// Atmospheric pressure in hPa, when the provider reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
}

/// One day of the multi-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Day label, e.g. "Tomorrow".
    pub day: String,
    /// Textual description.
    pub description: String,
    /// Expected maximum temperature in °C.
    pub temp_max: f64,
    /// Expected minimum temperature in °C.
    pub temp_min: f64,
}

/// Payload of a successful `/weather` fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Current conditions.
    pub weather: CurrentConditions,
    /// Forecast days in chronological order; empty when the backend
    /// sends none.
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
}

/// How a market price is quoted.
///
/// The backend sends exactly one of `price_per_kg` or `price_per_quintal`
/// per item; the flattened untagged enum enforces that in the type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceBasis {
    /// Retail quote in currency per kilogram.
    PerKg {
        /// Price per kilogram.
        price_per_kg: f64,
    },
    /// Wholesale quote in currency per quintal (100 kg).
    PerQuintal {
        /// Price per quintal.
        price_per_quintal: f64,
    },
}

impl PriceBasis {
    /// The quoted amount, whichever basis it uses.
    pub fn amount(&self) -> f64 {
        match self {
            Self::PerKg { price_per_kg } => *price_per_kg,
            Self::PerQuintal { price_per_quintal } => *price_per_quintal,
        }
    }

    /// True for per-kilogram quotes.
    pub fn is_per_kg(&self) -> bool {
        matches!(self, Self::PerKg { .. })
    }
}

/// One commodity quote from `/market-prices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Commodity name.
    pub name: String,
    /// The quoted price and its basis.
    #[serde(flatten)]
    pub basis: PriceBasis,
    /// Display unit, e.g. "Rs/kg".
    pub unit: String,
    /// Market the quote was observed at.
    pub market: String,
}

/// One entry from the `/videos` catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoItem {
    /// Catalog identifier.
    pub id: u32,
    /// Playback/embed URL.
    pub url: String,
    /// Video title.
    pub title: String,
    /// Short description.
    pub description: String,
    /// Category the video belongs to.
    pub category: String,
    /// Duration label, e.g. "15:30".
    pub duration: String,
}

/// Video listing together with the category set available for filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoCatalog {
    /// Videos matching the requested filter.
    pub videos: Vec<VideoItem>,
    /// All known categories, regardless of the filter.
    #[serde(default)]
    pub categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn crop_analysis_parses_backend_payload() {
        let json = r#"{
            "success": true,
            "crop": {
                "name": "Tomato",
                "description": "Fruit vegetable crop",
                "suitable_season": "All seasons with proper care",
                "harvest_time": "60-90 days",
                "advice": "Provide support, prune suckers, regular watering",
                "diseases": ["Late Blight", "Early Blight"]
            },
            "image_url": "/uploads/abc.jpg",
            "analysis_date": "2026-08-30T10:00:00"
        }"#;
        let analysis: CropAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.crop.name, "Tomato");
        assert_eq!(analysis.crop.diseases.len(), 2);
        assert_eq!(analysis.image_url.as_deref(), Some("/uploads/abc.jpg"));
    }

    #[test]
    fn crop_report_diseases_default_empty() {
        let json = r#"{
            "name": "Wheat",
            "description": "Cereal grain crop",
            "suitable_season": "Rabi (Winter)",
            "harvest_time": "90-120 days",
            "advice": "Water regularly"
        }"#;
        let report: CropReport = serde_json::from_str(json).unwrap();
        assert!(report.diseases.is_empty());
    }

    #[test]
    fn weather_report_forecast_is_optional() {
        let json = r#"{
            "weather": {
                "temperature": 28,
                "humidity": 65,
                "description": "Partly cloudy",
                "wind_speed": 12,
                "pressure": 1013
            }
        }"#;
        let report: WeatherReport = serde_json::from_str(json).unwrap();
        assert!(report.forecast.is_empty());
        assert_eq!(report.weather.pressure, Some(1013.0));
    }

    #[test]
    fn weather_report_parses_forecast_in_order() {
        let json = r#"{
            "weather": {"temperature": 28, "humidity": 65, "description": "Clear", "wind_speed": 12},
            "forecast": [
                {"day": "Tomorrow", "temp_max": 30, "temp_min": 22, "description": "Sunny"},
                {"day": "Day 2", "temp_max": 29, "temp_min": 21, "description": "Cloudy"}
            ]
        }"#;
        let report: WeatherReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.forecast.len(), 2);
        assert_eq!(report.forecast[0].day, "Tomorrow");
        assert_eq!(report.forecast[1].temp_min, 21.0);
    }

    #[test]
    fn price_quote_per_kg() {
        let json = r#"{"name": "Tomato", "price_per_kg": 25, "unit": "Rs/kg", "market": "Local Mandi"}"#;
        let quote: PriceQuote = serde_json::from_str(json).unwrap();
        assert!(quote.basis.is_per_kg());
        assert_eq!(quote.basis.amount(), 25.0);
    }

    #[test]
    fn price_quote_per_quintal() {
        let json =
            r#"{"name": "Wheat", "price_per_quintal": 2100, "unit": "Rs/quintal", "market": "APMC"}"#;
        let quote: PriceQuote = serde_json::from_str(json).unwrap();
        assert!(!quote.basis.is_per_kg());
        assert_eq!(quote.basis.amount(), 2100.0);
    }

    #[test]
    fn price_quote_without_any_basis_is_rejected() {
        let json = r#"{"name": "Onion", "unit": "Rs/kg", "market": "Local Mandi"}"#;
        let quote: Result<PriceQuote, _> = serde_json::from_str(json);
        assert!(quote.is_err());
    }

    #[test]
    fn video_catalog_parses() {
        let json = r#"{
            "videos": [{
                "id": 3,
                "title": "Pest Management in Vegetables",
                "description": "Effective pest control strategies",
                "url": "https://example.com/embed/3",
                "category": "Pest Control",
                "duration": "18:20"
            }],
            "categories": ["Crop Management", "Pest Control"]
        }"#;
        let catalog: VideoCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.videos.len(), 1);
        assert_eq!(catalog.videos[0].category, "Pest Control");
        assert_eq!(catalog.categories.len(), 2);
    }

    #[test]
    fn price_quote_serde_round_trip() {
        let quote = PriceQuote {
            name: "Potato".into(),
            basis: PriceBasis::PerKg { price_per_kg: 18.0 },
            unit: "Rs/kg".into(),
            market: "Local Mandi".into(),
        };
        let json = serde_json::to_string(&quote).unwrap();
        assert!(json.contains("price_per_kg"));
        assert!(!json.contains("price_per_quintal"));
        let parsed: PriceQuote = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, quote);
    }
}
