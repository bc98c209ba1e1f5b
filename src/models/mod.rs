// Model exports
pub mod criteria;
pub mod domain;

pub use criteria::{FilterCriteria, PriceRange, ECONOMY_THRESHOLD};
pub use domain::{Coordinate, DiscoveredMarket, MarketRef, Product, User};
