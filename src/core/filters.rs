use crate::models::{FilterCriteria, Product, ECONOMY_THRESHOLD};

/// Signature shared by every filter stage
pub type Predicate = fn(&Product, &FilterCriteria) -> bool;

/// One named stage of the filtering pipeline
#[derive(Clone, Copy)]
pub struct FilterStage {
    pub name: &'static str,
    pub predicate: Predicate,
}

impl std::fmt::Debug for FilterStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterStage").field("name", &self.name).finish()
    }
}

/// Stages in evaluation order. Economy mode runs last so it can only
/// narrow the range-filtered set.
pub const STAGES: [FilterStage; 3] = [
    FilterStage {
        name: "market",
        predicate: matches_selected_markets,
    },
    FilterStage {
        name: "price_range",
        predicate: within_price_range,
    },
    FilterStage {
        name: "economy",
        predicate: passes_economy_mode,
    },
];

/// Stage 1: market selection
///
/// An empty selection places no restriction on the market.
#[inline]
pub fn matches_selected_markets(product: &Product, criteria: &FilterCriteria) -> bool {
    criteria.selected_markets.is_empty()
        || criteria.selected_markets.contains(&product.market.name)
}

/// Stage 2: inclusive `min <= price <= max`
#[inline]
pub fn within_price_range(product: &Product, criteria: &FilterCriteria) -> bool {
    criteria.price_range.contains(product.price)
}

/// Stage 3: economy mode keeps products strictly below the threshold
#[inline]
pub fn passes_economy_mode(product: &Product, criteria: &FilterCriteria) -> bool {
    !criteria.economy_mode || product.price < ECONOMY_THRESHOLD
}
