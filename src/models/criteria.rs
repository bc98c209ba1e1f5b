use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Products must be priced strictly below this to pass economy mode
pub const ECONOMY_THRESHOLD: Decimal = dec!(10.00);

/// Inclusive price interval
///
/// `min <= max` is expected but not enforced; an inverted range simply
/// matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    pub const fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }

    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

/// User-selected constraints applied to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Reserved; no predicate reads it yet
    #[serde(rename = "selectedCategories", default)]
    pub selected_categories: BTreeSet<String>,
    /// Market names to include. Empty means every market.
    #[serde(rename = "selectedMarkets", default)]
    pub selected_markets: BTreeSet<String>,
    #[serde(rename = "priceRange")]
    pub price_range: PriceRange,
    #[serde(rename = "economyMode", default)]
    pub economy_mode: bool,
}

impl FilterCriteria {
    /// Unrestricted criteria over the given price range
    pub fn new(price_range: PriceRange) -> Self {
        Self {
            selected_categories: BTreeSet::new(),
            selected_markets: BTreeSet::new(),
            price_range,
            economy_mode: false,
        }
    }

    pub fn with_markets<I, S>(mut self, markets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_markets = markets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_economy_mode(mut self, economy_mode: bool) -> Self {
        self.economy_mode = economy_mode;
        self
    }
}
