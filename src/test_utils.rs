//! Shared fakes for controller unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::GatewayError;
use crate::gateway::Backend;
use crate::geo::GeoCoordinate;
use crate::models::{
    CropAnalysis, CropReport, PriceQuote, VideoCatalog, VideoItem, WeatherReport,
};

/// Scripted [`Backend`] that counts calls and replays queued responses.
///
/// Each operation pops the next scripted result for its endpoint; an
/// unscripted call fails with `NetworkUnavailable` so tests notice.
#[derive(Default)]
pub struct FakeBackend {
    calls: AtomicUsize,
    crop: Mutex<VecDeque<Result<CropAnalysis, GatewayError>>>,
    weather: Mutex<VecDeque<Result<WeatherReport, GatewayError>>>,
    prices: Mutex<VecDeque<Result<Vec<PriceQuote>, GatewayError>>>,
    videos: Mutex<VecDeque<Result<VideoCatalog, GatewayError>>>,
    answers: Mutex<VecDeque<Result<String, GatewayError>>>,
    seen_categories: Mutex<Vec<Option<String>>>,
    seen_queries: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total gateway calls across all endpoints.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn push_crop(&self, result: Result<CropAnalysis, GatewayError>) {
        self.crop.lock().unwrap().push_back(result);
    }

    pub fn push_weather(&self, result: Result<WeatherReport, GatewayError>) {
        self.weather.lock().unwrap().push_back(result);
    }

    pub fn push_prices(&self, result: Result<Vec<PriceQuote>, GatewayError>) {
        self.prices.lock().unwrap().push_back(result);
    }

    pub fn push_videos(&self, result: Result<VideoCatalog, GatewayError>) {
        self.videos.lock().unwrap().push_back(result);
    }

    pub fn push_answer(&self, result: Result<String, GatewayError>) {
        self.answers.lock().unwrap().push_back(result);
    }

    /// Category filters seen by `videos`, in call order.
    pub fn seen_categories(&self) -> Vec<Option<String>> {
        self.seen_categories.lock().unwrap().clone()
    }

    /// Query strings seen by `ask_query`, in call order.
    pub fn seen_queries(&self) -> Vec<String> {
        self.seen_queries.lock().unwrap().clone()
    }

    fn pop<T>(queue: &Mutex<VecDeque<Result<T, GatewayError>>>) -> Result<T, GatewayError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::NetworkUnavailable("unscripted call".into())))
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn analyze_crop(
        &self,
        _file_name: &str,
        _mime_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<CropAnalysis, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.crop)
    }

    async fn weather(&self, _coordinate: GeoCoordinate) -> Result<WeatherReport, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.weather)
    }

    async fn market_prices(&self) -> Result<Vec<PriceQuote>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.prices)
    }

    async fn videos(&self, category: Option<&str>) -> Result<VideoCatalog, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_categories
            .lock()
            .unwrap()
            .push(category.map(str::to_owned));
        Self::pop(&self.videos)
    }

    async fn ask_query(&self, query: &str) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_queries.lock().unwrap().push(query.to_owned());
        Self::pop(&self.answers)
    }
}

/// A crop analysis payload matching the backend's sample database.
pub fn sample_analysis() -> CropAnalysis {
    CropAnalysis {
        crop: CropReport {
            name: "Tomato".into(),
            description: "Fruit vegetable crop".into(),
            suitable_season: "All seasons with proper care".into(),
            harvest_time: "60-90 days".into(),
            advice: "Provide support, prune suckers, regular watering".into(),
            diseases: vec!["Late Blight".into(), "Early Blight".into()],
        },
        image_url: None,
        analysis_date: None,
    }
}

/// A small video catalog with two categories.
pub fn sample_catalog() -> VideoCatalog {
    VideoCatalog {
        videos: vec![VideoItem {
            id: 3,
            url: "https://example.com/embed/3".into(),
            title: "Pest Management in Vegetables".into(),
            description: "Effective pest control strategies".into(),
            category: "Pest Control".into(),
            duration: "18:20".into(),
        }],
        categories: vec!["Crop Management".into(), "Pest Control".into()],
    }
}
