use crate::core::filters::STAGES;
use crate::models::{FilterCriteria, Product};

/// Pure filtering pipeline over the catalog
///
/// # Pipeline Stages
/// 1. Market selection
/// 2. Price range
/// 3. Economy mode
///
/// Output keeps catalog order and never contains anything that was not in
/// the input. Degenerate criteria produce an empty result, never an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterEngine;

impl FilterEngine {
    pub fn new() -> Self {
        Self
    }

    /// Apply every stage, in order, to the full catalog
    pub fn apply(&self, catalog: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
        if criteria.price_range.is_inverted() {
            tracing::debug!(
                min = %criteria.price_range.min,
                max = %criteria.price_range.max,
                "Inverted price range, nothing can match"
            );
        }

        let mut remaining: Vec<&Product> = catalog.iter().collect();

        for stage in STAGES.iter() {
            let before = remaining.len();
            remaining.retain(|product| (stage.predicate)(product, criteria));
            tracing::trace!(stage = stage.name, before, after = remaining.len(), "Filter stage applied");
        }

        tracing::debug!(
            "Filtered catalog: {} of {} products kept",
            remaining.len(),
            catalog.len()
        );

        remaining.into_iter().cloned().collect()
    }
}

/// Convenience wrapper around [`FilterEngine::apply`]
pub fn apply(catalog: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
    FilterEngine::new().apply(catalog, criteria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Catalog;
    use crate::models::PriceRange;
    use rust_decimal_macros::dec;

    fn ids(products: &[Product]) -> Vec<u32> {
        products.iter().map(|p| p.id).collect()
    }

    fn default_criteria() -> FilterCriteria {
        FilterCriteria::new(PriceRange::new(dec!(2), dec!(100)))
    }

    #[test]
    fn test_unrestricted_keeps_catalog_order() {
        let catalog = Catalog::builtin();
        let result = apply(catalog.products(), &default_criteria());
        assert_eq!(ids(&result), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_economy_applies_after_market() {
        let catalog = Catalog::builtin();
        let criteria = default_criteria()
            .with_markets(["Barraca Supermercado", "Assalá Atacadista"])
            .with_economy_mode(true);
        assert_eq!(ids(&apply(catalog.products(), &criteria)), vec![4]);
    }

    #[test]
    fn test_empty_catalog() {
        assert!(apply(&[], &default_criteria()).is_empty());
    }

    #[test]
    fn test_inverted_range_yields_empty() {
        let catalog = Catalog::builtin();
        let criteria = FilterCriteria::new(PriceRange::new(dec!(50), dec!(3)));
        assert!(apply(catalog.products(), &criteria).is_empty());
    }

    #[test]
    fn test_unknown_market_yields_empty() {
        let catalog = Catalog::builtin();
        let criteria = default_criteria().with_markets(["Nowhere Mart"]);
        assert!(apply(catalog.products(), &criteria).is_empty());
    }
}
