// Core exports
pub mod cart;
pub mod catalog;
pub mod discovery;
pub mod distance;
pub mod engine;
pub mod filters;
pub mod promotion;
pub mod state;

pub use cart::{Cart, CartGate, CartOutcome, Session};
pub use catalog::Catalog;
pub use discovery::{
    Activation, DiscoveryError, Locatable, MarketBoard, MarketDiscovery, MarketMap, NearbySearch,
    PlacesProvider, RawPlace, ResponseOrdering, SearchResponse, SearchStatus,
};
pub use distance::{haversine_km, is_within_radius};
pub use engine::{apply, FilterEngine};
pub use filters::{matches_selected_markets, passes_economy_mode, within_price_range, STAGES};
pub use promotion::{PromotionSource, TemplatePromotion};
pub use state::{FilterState, Listing};
