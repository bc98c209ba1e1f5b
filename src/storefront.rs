use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

use crate::core::{
    Activation, Cart, CartGate, CartOutcome, Catalog, DiscoveryError, FilterState, Listing,
    MarketMap, PlacesProvider, PromotionSource, Session, TemplatePromotion,
};
use crate::models::{DiscoveredMarket, FilterCriteria, Product};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorefrontError {
    #[error("Unknown product: {0}")]
    UnknownProduct(u32),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Everything the storefront pages read from and write to
///
/// Auth, cart and the places provider are injected so the core can run
/// without an application context.
pub struct Storefront<A, C, P, S = TemplatePromotion> {
    filters: FilterState,
    cart: CartGate<A, C>,
    map: MarketMap<P, S>,
}

impl<A, C, P, S> Storefront<A, C, P, S>
where
    A: Session,
    C: Cart,
    P: PlacesProvider,
    S: PromotionSource,
{
    pub fn new(catalog: Arc<Catalog>, session: A, cart: C, map: MarketMap<P, S>) -> Self {
        Self {
            filters: FilterState::new(catalog),
            cart: CartGate::new(session, cart),
            map,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.filters.catalog()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        self.filters.criteria()
    }

    /// Run a filter pass with the current criteria
    pub fn apply_filters(&mut self) -> &[Product] {
        self.filters.apply()
    }

    pub fn listing(&self) -> Listing<'_> {
        self.filters.listing()
    }

    pub fn filtered_products(&self) -> Option<&[Product]> {
        self.filters.filtered_products()
    }

    pub fn toggle_market(&mut self, name: &str) -> &[Product] {
        self.filters.toggle_market(name)
    }

    pub fn toggle_category(&mut self, name: &str) -> &[Product] {
        self.filters.toggle_category(name)
    }

    pub fn set_price_range(&mut self, max: Decimal) -> &[Product] {
        self.filters.set_price_range(max)
    }

    pub fn set_economy_mode(&mut self, enabled: bool) -> &[Product] {
        self.filters.set_economy_mode(enabled)
    }

    pub fn reset_filters(&mut self) -> &[Product] {
        self.filters.reset()
    }

    /// Add a catalog product to the cart, gated on a signed-in user
    pub fn add_to_cart(&mut self, product_id: u32) -> Result<CartOutcome, StorefrontError> {
        let product = self
            .filters
            .catalog()
            .get(product_id)
            .cloned()
            .ok_or(StorefrontError::UnknownProduct(product_id))?;
        Ok(self.cart.add_item(&product))
    }

    pub fn login_prompt(&self) -> bool {
        self.cart.login_prompt()
    }

    pub fn dismiss_login_prompt(&mut self) {
        self.cart.dismiss_login_prompt();
    }

    pub fn cart(&self) -> &C {
        self.cart.cart()
    }

    pub fn market_map(&self) -> &MarketMap<P, S> {
        &self.map
    }

    pub async fn activate_map(&self, provider_ready: bool) -> Activation {
        self.map.activate(provider_ready).await
    }

    pub async fn discovered_markets(&self) -> Vec<DiscoveredMarket> {
        self.map.markets().await
    }

    pub async fn selected_market(&self) -> Option<DiscoveredMarket> {
        self.map.selected().await
    }

    pub async fn select_market(&self, place_id: &str) -> Result<DiscoveredMarket, StorefrontError> {
        Ok(self.map.select_market(place_id).await?)
    }

    pub async fn clear_selection(&self) {
        self.map.clear_selection().await;
    }
}
