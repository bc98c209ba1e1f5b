use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market a product is sold by, as embedded in catalog records
///
/// Markets have no id of their own here; the name is both the filter key
/// and the display label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketRef {
    pub name: String,
    pub logo: String,
}

impl MarketRef {
    pub fn new(name: impl Into<String>, logo: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logo: logo.into(),
        }
    }
}

/// Purchasable product from the static catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    /// Unit price in BRL
    pub price: Decimal,
    pub market: MarketRef,
    pub image: String,
}

impl Product {
    /// Price formatted the way the product card shows it, e.g. `R$ 9.50`
    pub fn display_price(&self) -> String {
        format!("R$ {:.2}", self.price)
    }
}

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self { latitude, longitude }
    }
}

/// Market found by nearby discovery, ready to be drawn as a map marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredMarket {
    #[serde(rename = "placeId")]
    pub place_id: String,
    pub name: String,
    pub location: Coordinate,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    pub promotion: String,
}

/// Signed-in shopper, as exposed by the auth collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}
