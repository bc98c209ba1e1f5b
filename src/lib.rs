//! Pexinxa storefront core - product filtering and nearby-market discovery
//!
//! This library holds the decision logic behind the storefront pages: the
//! staged filter pipeline over the product catalog, the filter state that
//! drives it, and discovery of nearby markets with their promotions.

pub mod config;
pub mod core;
pub mod models;
pub mod services;
pub mod storefront;

// Re-export commonly used types
pub use crate::core::{Catalog, FilterEngine, FilterState, Listing, MarketDiscovery, MarketMap, NearbySearch};
pub use crate::models::{DiscoveredMarket, FilterCriteria, PriceRange, Product};
pub use crate::storefront::{Storefront, StorefrontError};
