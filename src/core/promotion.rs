/// Source of the promotion text attached to each discovered market
///
/// Swapping the implementation must not require touching discovery itself.
pub trait PromotionSource: Send + Sync {
    fn promotion_for(&self, market_name: &str) -> String;
}

/// Fixed-format promotion: `Promoção de {percent}% em {market}!`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplatePromotion {
    pub percent: u8,
}

impl TemplatePromotion {
    pub const fn new(percent: u8) -> Self {
        Self { percent }
    }
}

impl Default for TemplatePromotion {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PromotionSource for TemplatePromotion {
    fn promotion_for(&self, market_name: &str) -> String {
        format!("Promoção de {}% em {}!", self.percent, market_name)
    }
}
