use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::core::{Catalog, FilterEngine};
use crate::models::{FilterCriteria, Product};

/// What the product grid should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing<'a> {
    /// No filter pass has run yet
    NotComputed,
    /// A pass ran and matched nothing ("no products found")
    NoProducts,
    Products(&'a [Product]),
}

/// Owns the mutable filter criteria and the last filtered result
///
/// Every mutator recomputes synchronously from the full catalog before
/// returning, so results never depend on a previous filtered subset.
#[derive(Debug, Clone)]
pub struct FilterState {
    catalog: Arc<Catalog>,
    engine: FilterEngine,
    criteria: FilterCriteria,
    filtered: Option<Vec<Product>>,
}

impl FilterState {
    /// Default criteria: full catalog bounds, no market restriction, economy off
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let criteria = FilterCriteria::new(catalog.bounds());
        Self::with_criteria(catalog, criteria)
    }

    pub fn with_criteria(catalog: Arc<Catalog>, criteria: FilterCriteria) -> Self {
        Self {
            catalog,
            engine: FilterEngine::new(),
            criteria,
            filtered: None,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run the pipeline against the current criteria
    pub fn apply(&mut self) -> &[Product] {
        let result = self.engine.apply(self.catalog.products(), &self.criteria);
        self.filtered.insert(result)
    }

    /// Last computed result, `None` before the first pass
    pub fn filtered_products(&self) -> Option<&[Product]> {
        self.filtered.as_deref()
    }

    pub fn listing(&self) -> Listing<'_> {
        match self.filtered.as_deref() {
            None => Listing::NotComputed,
            Some([]) => Listing::NoProducts,
            Some(products) => Listing::Products(products),
        }
    }

    /// Add the market if absent, remove it if present
    pub fn toggle_market(&mut self, name: &str) -> &[Product] {
        toggle(&mut self.criteria.selected_markets, name);
        tracing::debug!(market = name, selected = ?self.criteria.selected_markets, "Market toggled");
        self.apply()
    }

    /// Same toggle semantics as markets. Categories do not affect results yet.
    pub fn toggle_category(&mut self, name: &str) -> &[Product] {
        toggle(&mut self.criteria.selected_categories, name);
        self.apply()
    }

    /// Move the upper bound; the floor stays at the catalog minimum
    pub fn set_price_range(&mut self, max: Decimal) -> &[Product] {
        self.criteria.price_range.min = self.catalog.bounds().min;
        self.criteria.price_range.max = max;
        tracing::debug!(min = %self.criteria.price_range.min, max = %max, "Price range updated");
        self.apply()
    }

    pub fn set_economy_mode(&mut self, enabled: bool) -> &[Product] {
        self.criteria.economy_mode = enabled;
        self.apply()
    }

    /// Back to default criteria, then recompute
    pub fn reset(&mut self) -> &[Product] {
        self.criteria = FilterCriteria::new(self.catalog.bounds());
        self.apply()
    }
}

fn toggle(set: &mut BTreeSet<String>, name: &str) {
    if !set.remove(name) {
        set.insert(name.to_string());
    }
}
