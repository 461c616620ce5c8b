//! Filterable list fetching (market prices, videos).
//!
//! One generic controller drives both listing features. The displayed
//! items are stale-while-revalidate: a refetch leaves the previous items
//! visible and replaces them only when the newer fetch succeeds.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::GatewayError;
use crate::gateway::Backend;
use crate::models::{PriceQuote, VideoItem};
use crate::state::{FetchState, RequestToken};

/// One page of list items plus the categories available for filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    /// Items matching the requested filter.
    pub items: Vec<T>,
    /// All categories offered for filtering; empty for listings without
    /// a category dimension.
    pub categories: Vec<String>,
}

/// Fetches one kind of list from the backend.
#[async_trait]
pub trait ListSource: Send + Sync {
    /// The item type this source lists.
    type Item: Send;

    /// Fetch the page for `category` (`None` = unfiltered).
    async fn fetch(&self, category: Option<&str>) -> Result<ListPage<Self::Item>, GatewayError>;

    /// User-facing message stored in `Failed` when a fetch fails.
    fn failure_message(&self) -> &'static str;
}

/// Market price listing backed by `/market-prices`. Has no categories.
pub struct MarketPriceSource {
    gateway: Arc<dyn Backend>,
}

impl MarketPriceSource {
    pub fn new(gateway: Arc<dyn Backend>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ListSource for MarketPriceSource {
    type Item = PriceQuote;

    async fn fetch(&self, _category: Option<&str>) -> Result<ListPage<PriceQuote>, GatewayError> {
        let items = self.gateway.market_prices().await?;
        Ok(ListPage {
            items,
            categories: Vec::new(),
        })
    }

    fn failure_message(&self) -> &'static str {
        "Failed to fetch market prices."
    }
}

/// Video catalog backed by `/videos` with its category filter.
pub struct VideoSource {
    gateway: Arc<dyn Backend>,
}

impl VideoSource {
    pub fn new(gateway: Arc<dyn Backend>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ListSource for VideoSource {
    type Item = VideoItem;

    async fn fetch(&self, category: Option<&str>) -> Result<ListPage<VideoItem>, GatewayError> {
        let catalog = self.gateway.videos(category).await?;
        Ok(ListPage {
            items: catalog.videos,
            categories: catalog.categories,
        })
    }

    fn failure_message(&self) -> &'static str {
        "Failed to fetch videos."
    }
}

/// Generic filterable-list controller.
pub struct ListController<S: ListSource> {
    source: S,
    state: FetchState<()>,
    items: Vec<S::Item>,
    available_categories: Vec<String>,
    active_category: Option<String>,
}

/// Controller for the market price listing.
pub type MarketPriceController = ListController<MarketPriceSource>;
/// Controller for the video catalog.
pub type VideoController = ListController<VideoSource>;

impl<S: ListSource> ListController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: FetchState::new(),
            items: Vec::new(),
            available_categories: Vec::new(),
            active_category: None,
        }
    }

    /// The most recently fetched items. During a refetch these are the
    /// previous page (stale-while-revalidate); they are replaced only
    /// when a newer fetch succeeds.
    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    /// Categories available for filtering.
    pub fn available_categories(&self) -> &[String] {
        &self.available_categories
    }

    /// The active category filter, if any.
    pub fn active_category(&self) -> Option<&str> {
        self.active_category.as_deref()
    }

    /// True while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.is_pending()
    }

    /// The failure message, if the last fetch failed.
    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    /// First half of [`load`](Self::load): transition to `Pending` for a
    /// fetch of the active category. Returns `None` while a fetch is
    /// already in flight (repeat triggers are idempotent).
    pub fn begin_load(&mut self) -> Option<RequestToken> {
        if self.state.is_pending() {
            tracing::debug!("list fetch already in flight; ignoring");
            return None;
        }
        Some(self.state.start())
    }

    /// First half of [`set_filter`](Self::set_filter): record the new
    /// filter and transition to `Pending`, superseding any in-flight
    /// fetch — its response becomes stale and will be discarded.
    pub fn begin_set_filter(&mut self, category: &str) -> RequestToken {
        let category = category.trim();
        self.active_category = if category.is_empty() {
            None
        } else {
            Some(category.to_owned())
        };
        self.state.start()
    }

    /// Second half of a fetch: apply the outcome for `token`. Stale
    /// outcomes are discarded; returns whether the outcome was applied.
    pub fn finish_load(
        &mut self,
        token: RequestToken,
        result: Result<ListPage<S::Item>, GatewayError>,
    ) -> bool {
        match result {
            Ok(page) => {
                if !self.state.resolve(token, ()) {
                    return false;
                }
                self.items = page.items;
                self.available_categories = page.categories;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "list fetch failed");
                self.state.reject(token, self.source.failure_message())
            }
        }
    }

    /// Fetch the list for the active category.
    ///
    /// No-op while a fetch is already in flight.
    pub async fn load(&mut self) {
        let Some(token) = self.begin_load() else {
            return;
        };
        let category = self.active_category.clone();
        let result = self.source.fetch(category.as_deref()).await;
        self.finish_load(token, result);
    }

    /// Record `category` as the active filter and fetch it.
    ///
    /// An empty or whitespace category requests the unfiltered set.
    pub async fn set_filter(&mut self, category: &str) {
        let token = self.begin_set_filter(category);
        let active = self.active_category.clone();
        let result = self.source.fetch(active.as_deref()).await;
        self.finish_load(token, result);
    }

    /// Re-fetch the list for the current filter.
    pub async fn refresh(&mut self) {
        self.load().await;
    }
}
