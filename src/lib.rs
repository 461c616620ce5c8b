//! Farmhand: client-side orchestrator for a farmer-support backend.
//!
//! The backend owns all business logic — crop identification, weather,
//! market prices, video catalog, Q&A — and this crate drives the HTTP
//! requests and holds the renderable state for each feature:
//!
//! - [`gateway::HttpGateway`]: the only component that touches the network
//! - [`state::FetchState`]: the per-feature `Idle → Pending → Succeeded/Failed` machine
//! - [`upload::UploadController`]: crop photo selection, preview, analysis
//! - [`weather::WeatherController`]: geolocation-fed weather fetches
//! - [`listing::ListController`]: filterable lists (market prices, videos)
//! - [`conversation::ConversationController`]: the Q&A transcript
//!
//! Controllers never share mutable state; each owns its machine and talks
//! to the backend through the [`gateway::Backend`] seam, which also makes
//! every feature testable against scripted fakes. Late responses from
//! superseded requests are discarded by token comparison, so a slow fetch
//! can never clobber a newer one.

pub mod config;
pub mod conversation;
pub mod error;
pub mod gateway;
pub mod geo;
pub mod listing;
pub mod models;
pub mod state;
pub mod upload;
pub mod weather;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::ClientConfig;
pub use error::{ClientError, GatewayError, LocationError, Result};
pub use gateway::{Backend, HttpGateway};
pub use state::{FetchPhase, FetchState, RequestToken};
