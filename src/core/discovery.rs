use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::Instrument;

use crate::core::distance::haversine_km;
use crate::core::promotion::{PromotionSource, TemplatePromotion};
use crate::models::{Coordinate, DiscoveredMarket};

/// Default search anchor (Araraquara, SP)
pub const DEFAULT_ANCHOR: Coordinate = Coordinate::new(-21.6034, -48.3665);
pub const DEFAULT_RADIUS_M: u32 = 2000;
pub const DEFAULT_CATEGORY: &str = "supermarket";

/// Errors raised while discovering or selecting markets
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscoveryError {
    #[error("Places search returned status {status}")]
    QueryFailed { status: String },

    #[error("Places provider error: {0}")]
    Provider(String),

    #[error("Unknown place: {0}")]
    UnknownPlace(String),
}

/// Anything that can resolve its own coordinate
pub trait Locatable {
    fn location(&self) -> Coordinate;
}

/// Raw result returned by a places provider
pub trait RawPlace: Locatable {
    fn place_id(&self) -> &str;
    fn name(&self) -> &str;
}

/// Nearby search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbySearch {
    pub anchor: Coordinate,
    pub radius_m: u32,
    pub categories: BTreeSet<String>,
}

impl Default for NearbySearch {
    fn default() -> Self {
        Self {
            anchor: DEFAULT_ANCHOR,
            radius_m: DEFAULT_RADIUS_M,
            categories: BTreeSet::from([DEFAULT_CATEGORY.to_string()]),
        }
    }
}

/// Provider-level outcome of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Ok,
    NotOk(String),
}

#[derive(Debug, Clone)]
pub struct SearchResponse<P> {
    pub status: SearchStatus,
    pub results: Vec<P>,
}

impl<P> SearchResponse<P> {
    pub fn ok(results: Vec<P>) -> Self {
        Self {
            status: SearchStatus::Ok,
            results,
        }
    }

    pub fn not_ok(status: impl Into<String>) -> Self {
        Self {
            status: SearchStatus::NotOk(status.into()),
            results: Vec::new(),
        }
    }
}

/// Geospatial places service
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    type Place: RawPlace + Send;
    type Error: std::fmt::Display + Send;

    async fn nearby_search(
        &self,
        request: &NearbySearch,
    ) -> Result<SearchResponse<Self::Place>, Self::Error>;
}

/// Queries the provider and turns raw places into display-ready markets
pub struct MarketDiscovery<P, S = TemplatePromotion> {
    provider: P,
    promotions: S,
    request: NearbySearch,
}

impl<P: PlacesProvider> MarketDiscovery<P> {
    pub fn new(provider: P, request: NearbySearch) -> Self {
        Self::with_promotions(provider, request, TemplatePromotion::default())
    }
}

impl<P: PlacesProvider, S: PromotionSource> MarketDiscovery<P, S> {
    pub fn with_promotions(provider: P, request: NearbySearch, promotions: S) -> Self {
        Self {
            provider,
            promotions,
            request,
        }
    }

    pub fn request(&self) -> &NearbySearch {
        &self.request
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Map one raw place into a market record, keeping its provider identity
    pub fn to_market(&self, place: &P::Place) -> DiscoveredMarket {
        let location = place.location();
        DiscoveredMarket {
            place_id: place.place_id().to_string(),
            name: place.name().to_string(),
            location,
            distance_km: haversine_km(self.request.anchor, location),
            promotion: self.promotions.promotion_for(place.name()),
        }
    }

    /// Run one nearby search
    ///
    /// Provider order is preserved. A non-OK status or transport failure is
    /// an error here; callers decide how to publish it.
    pub async fn search(&self) -> Result<Vec<DiscoveredMarket>, DiscoveryError> {
        let response = self
            .provider
            .nearby_search(&self.request)
            .await
            .map_err(|e| DiscoveryError::Provider(e.to_string()))?;

        match response.status {
            SearchStatus::Ok => Ok(response.results.iter().map(|p| self.to_market(p)).collect()),
            SearchStatus::NotOk(status) => Err(DiscoveryError::QueryFailed { status }),
        }
    }
}

/// Published discovery results plus the marker selection
#[derive(Debug, Clone, Default)]
pub struct MarketBoard {
    markets: Vec<DiscoveredMarket>,
    selected: Option<DiscoveredMarket>,
    applied_seq: u64,
    published_at: Option<DateTime<Utc>>,
}

impl MarketBoard {
    pub fn markets(&self) -> &[DiscoveredMarket] {
        &self.markets
    }

    pub fn selected(&self) -> Option<&DiscoveredMarket> {
        self.selected.as_ref()
    }

    /// Sequence number of the request whose response is currently shown
    pub fn applied_seq(&self) -> u64 {
        self.applied_seq
    }

    /// When the current collection was published, `None` before any search
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Info-window text for a place
    pub fn promotion_for(&self, place_id: &str) -> Option<&str> {
        self.markets
            .iter()
            .find(|m| m.place_id == place_id)
            .map(|m| m.promotion.as_str())
    }

    /// Replace the whole collection. The selection is left as is.
    pub fn replace(&mut self, markets: Vec<DiscoveredMarket>, seq: u64) {
        self.markets = markets;
        self.applied_seq = seq;
        self.published_at = Some(Utc::now());
    }

    pub fn select(&mut self, place_id: &str) -> Result<&DiscoveredMarket, DiscoveryError> {
        let market = self
            .markets
            .iter()
            .find(|m| m.place_id == place_id)
            .cloned()
            .ok_or_else(|| DiscoveryError::UnknownPlace(place_id.to_string()))?;
        Ok(&*self.selected.insert(market))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

/// Which response is allowed to overwrite the board when requests overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Whatever arrives last wins, regardless of issue order
    #[default]
    LastArrival,
    /// Only the most recently issued request may publish
    LatestIssued,
}

/// Result of an activation or refresh
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    /// Provider not ready; nothing was queried
    Deferred,
    /// Discovery already ran for this mount
    AlreadyActive,
    Published { seq: u64, count: usize },
    /// Search failed and the board was emptied
    Failed { seq: u64, reason: String },
    /// Response superseded by a newer request and dropped
    Stale { seq: u64 },
}

/// Map view state: discovery results, selection and the mount guard
pub struct MarketMap<P, S = TemplatePromotion> {
    discovery: MarketDiscovery<P, S>,
    board: RwLock<MarketBoard>,
    activated: AtomicBool,
    issued: AtomicU64,
    ordering: ResponseOrdering,
}

impl<P: PlacesProvider, S: PromotionSource> MarketMap<P, S> {
    pub fn new(discovery: MarketDiscovery<P, S>) -> Self {
        Self::with_ordering(discovery, ResponseOrdering::default())
    }

    pub fn with_ordering(discovery: MarketDiscovery<P, S>, ordering: ResponseOrdering) -> Self {
        Self {
            discovery,
            board: RwLock::new(MarketBoard::default()),
            activated: AtomicBool::new(false),
            issued: AtomicU64::new(0),
            ordering,
        }
    }

    pub fn discovery(&self) -> &MarketDiscovery<P, S> {
        &self.discovery
    }

    /// Mount-time activation: runs discovery at most once per mount
    ///
    /// If the provider is not ready the call is deferred and a later
    /// activation may still run.
    pub async fn activate(&self, provider_ready: bool) -> Activation {
        if !provider_ready {
            tracing::warn!("Places provider not ready, deferring discovery");
            return Activation::Deferred;
        }

        if self.activated.swap(true, Ordering::SeqCst) {
            tracing::debug!("Discovery already activated for this mount");
            return Activation::AlreadyActive;
        }

        self.refresh().await
    }

    /// Allow the next activation to query again
    pub fn remount(&self) {
        self.activated.store(false, Ordering::SeqCst);
    }

    /// Issue one search and publish its result, bypassing the mount guard
    pub async fn refresh(&self) -> Activation {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let span = tracing::info_span!("nearby_discovery", seq);

        let result = self.discovery.search().instrument(span).await;

        let mut board = self.board.write().await;

        if self.ordering == ResponseOrdering::LatestIssued
            && seq != self.issued.load(Ordering::SeqCst)
        {
            tracing::debug!(seq, "Dropping superseded discovery response");
            return Activation::Stale { seq };
        }

        match result {
            Ok(markets) => {
                let count = markets.len();
                board.replace(markets, seq);
                tracing::info!(seq, "Published {} nearby markets", count);
                Activation::Published { seq, count }
            }
            Err(e) => {
                board.replace(Vec::new(), seq);
                tracing::warn!(seq, "Nearby market discovery failed: {}", e);
                Activation::Failed {
                    seq,
                    reason: e.to_string(),
                }
            }
        }
    }

    pub async fn board(&self) -> RwLockReadGuard<'_, MarketBoard> {
        self.board.read().await
    }

    pub async fn markets(&self) -> Vec<DiscoveredMarket> {
        self.board.read().await.markets().to_vec()
    }

    pub async fn selected(&self) -> Option<DiscoveredMarket> {
        self.board.read().await.selected().cloned()
    }

    /// Marker click: select a market from the current collection
    pub async fn select_market(&self, place_id: &str) -> Result<DiscoveredMarket, DiscoveryError> {
        let mut board = self.board.write().await;
        board.select(place_id).cloned()
    }

    /// Info-window close
    pub async fn clear_selection(&self) {
        self.board.write().await.clear_selection();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::oneshot;
    use tokio_test::{assert_pending, assert_ready};

    #[derive(Debug, Clone)]
    struct TestPlace {
        id: String,
        name: String,
        lat: f64,
        lng: f64,
    }

    impl Locatable for TestPlace {
        fn location(&self) -> Coordinate {
            Coordinate::new(self.lat, self.lng)
        }
    }

    impl RawPlace for TestPlace {
        fn place_id(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn place(id: &str, name: &str) -> TestPlace {
        TestPlace {
            id: id.to_string(),
            name: name.to_string(),
            lat: -21.6,
            lng: -48.36,
        }
    }

    /// Replays canned responses in order
    struct ScriptedProvider {
        responses: Mutex<VecDeque<SearchResponse<TestPlace>>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<SearchResponse<TestPlace>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl PlacesProvider for ScriptedProvider {
        type Place = TestPlace;
        type Error = String;

        async fn nearby_search(
            &self,
            _request: &NearbySearch,
        ) -> Result<SearchResponse<TestPlace>, String> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| "no scripted response".to_string())
        }
    }

    /// Each call waits for the test to release its response
    struct GatedProvider {
        gates: Mutex<VecDeque<oneshot::Receiver<SearchResponse<TestPlace>>>>,
    }

    #[async_trait]
    impl PlacesProvider for GatedProvider {
        type Place = TestPlace;
        type Error = String;

        async fn nearby_search(
            &self,
            _request: &NearbySearch,
        ) -> Result<SearchResponse<TestPlace>, String> {
            let gate = self.gates.lock().unwrap().pop_front();
            match gate {
                Some(rx) => rx.await.map_err(|e| e.to_string()),
                None => Err("no gate".to_string()),
            }
        }
    }

    fn scripted_map(responses: Vec<SearchResponse<TestPlace>>) -> MarketMap<ScriptedProvider> {
        MarketMap::new(MarketDiscovery::new(
            ScriptedProvider::new(responses),
            NearbySearch::default(),
        ))
    }

    fn gated_map(
        ordering: ResponseOrdering,
    ) -> (
        MarketMap<GatedProvider>,
        Vec<oneshot::Sender<SearchResponse<TestPlace>>>,
    ) {
        let (senders, receivers): (Vec<_>, VecDeque<_>) =
            (0..2).map(|_| oneshot::channel()).unzip();
        let provider = GatedProvider {
            gates: Mutex::new(receivers),
        };
        let map = MarketMap::with_ordering(
            MarketDiscovery::new(provider, NearbySearch::default()),
            ordering,
        );
        (map, senders)
    }

    #[test]
    fn test_default_request() {
        let request = NearbySearch::default();
        assert_eq!(request.radius_m, 2000);
        assert!(request.categories.contains("supermarket"));
        assert_eq!(request.anchor, Coordinate::new(-21.6034, -48.3665));
    }

    #[tokio::test]
    async fn test_discovery_maps_places() {
        let map = scripted_map(vec![SearchResponse::ok(vec![
            place("p1", "Sonia Supermercado"),
            place("p2", "Barraca Supermercado"),
        ])]);

        let outcome = map.activate(true).await;
        assert_eq!(outcome, Activation::Published { seq: 1, count: 2 });

        let markets = map.markets().await;
        assert_eq!(markets[0].place_id, "p1");
        assert_eq!(markets[1].promotion, "Promoção de 10% em Barraca Supermercado!");
        assert!(markets[0].distance_km < 2.0);
        assert_eq!(
            map.board().await.promotion_for("p1"),
            Some("Promoção de 10% em Sonia Supermercado!")
        );
    }

    #[tokio::test]
    async fn test_not_ready_defers() {
        let map = scripted_map(vec![SearchResponse::ok(vec![place("p1", "A")])]);

        assert_eq!(map.activate(false).await, Activation::Deferred);
        assert!(map.markets().await.is_empty());

        // deferral does not consume the mount guard
        assert!(matches!(map.activate(true).await, Activation::Published { .. }));
    }

    #[tokio::test]
    async fn test_activation_runs_once_per_mount() {
        let map = scripted_map(vec![
            SearchResponse::ok(vec![place("p1", "A")]),
            SearchResponse::ok(vec![place("p2", "B")]),
        ]);

        map.activate(true).await;
        assert_eq!(map.activate(true).await, Activation::AlreadyActive);
        assert_eq!(map.markets().await[0].place_id, "p1");

        map.remount();
        map.activate(true).await;
        assert_eq!(map.markets().await[0].place_id, "p2");
    }

    #[tokio::test]
    async fn test_failure_empties_board_and_keeps_selection() {
        let map = scripted_map(vec![
            SearchResponse::ok(vec![place("p1", "A")]),
            SearchResponse::not_ok("ZERO_RESULTS"),
        ]);

        assert!(map.board().await.published_at().is_none());
        map.refresh().await;
        assert!(map.board().await.published_at().is_some());
        map.select_market("p1").await.unwrap();

        let outcome = map.refresh().await;
        assert!(matches!(outcome, Activation::Failed { seq: 2, .. }));
        assert!(map.markets().await.is_empty());
        assert_eq!(map.selected().await.map(|m| m.place_id), Some("p1".to_string()));
    }

    #[tokio::test]
    async fn test_transport_error_is_failure() {
        let map = scripted_map(vec![]);
        let outcome = map.refresh().await;
        assert_eq!(
            outcome,
            Activation::Failed {
                seq: 1,
                reason: "Places provider error: no scripted response".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_single_selection() {
        let map = scripted_map(vec![SearchResponse::ok(vec![
            place("p1", "A"),
            place("p2", "B"),
        ])]);
        map.refresh().await;

        map.select_market("p1").await.unwrap();
        map.select_market("p2").await.unwrap();
        assert_eq!(map.selected().await.map(|m| m.place_id), Some("p2".to_string()));

        assert_eq!(
            map.select_market("nope").await,
            Err(DiscoveryError::UnknownPlace("nope".to_string()))
        );
        assert_eq!(map.selected().await.map(|m| m.place_id), Some("p2".to_string()));

        map.clear_selection().await;
        assert!(map.selected().await.is_none());
    }

    #[test]
    fn test_last_arrival_wins() {
        let (map, mut senders) = gated_map(ResponseOrdering::LastArrival);

        let mut first = tokio_test::task::spawn(map.refresh());
        let mut second = tokio_test::task::spawn(map.refresh());
        assert_pending!(first.poll());
        assert_pending!(second.poll());

        let first_tx = senders.remove(0);
        let second_tx = senders.remove(0);

        // the second request answers first
        second_tx.send(SearchResponse::ok(vec![place("new", "Newer")])).unwrap();
        assert_ready!(second.poll());
        first_tx.send(SearchResponse::ok(vec![place("old", "Older")])).unwrap();
        assert_eq!(
            assert_ready!(first.poll()),
            Activation::Published { seq: 1, count: 1 }
        );
        drop((first, second));

        let board = tokio_test::block_on(map.board());
        assert_eq!(board.markets()[0].place_id, "old");
        assert_eq!(board.applied_seq(), 1);
    }

    #[test]
    fn test_latest_issued_drops_stale_response() {
        let (map, mut senders) = gated_map(ResponseOrdering::LatestIssued);

        let mut first = tokio_test::task::spawn(map.refresh());
        let mut second = tokio_test::task::spawn(map.refresh());
        assert_pending!(first.poll());
        assert_pending!(second.poll());

        let first_tx = senders.remove(0);
        let second_tx = senders.remove(0);

        second_tx.send(SearchResponse::ok(vec![place("new", "Newer")])).unwrap();
        assert_ready!(second.poll());
        first_tx.send(SearchResponse::ok(vec![place("old", "Older")])).unwrap();
        assert_eq!(assert_ready!(first.poll()), Activation::Stale { seq: 1 });
        drop((first, second));

        let board = tokio_test::block_on(map.board());
        assert_eq!(board.markets()[0].place_id, "new");
        assert_eq!(board.applied_seq(), 2);
    }
}
