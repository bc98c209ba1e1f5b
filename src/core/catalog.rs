use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{MarketRef, PriceRange, Product};

/// Immutable, ordered product catalog
///
/// Every filter pass reads from here; nothing in the crate mutates it after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
    bounds: PriceRange,
}

impl Catalog {
    /// Build a catalog whose price bounds are the observed min/max
    ///
    /// An empty catalog gets a zero-width range at 0.
    pub fn new(products: Vec<Product>) -> Self {
        let min = products.iter().map(|p| p.price).min().unwrap_or(Decimal::ZERO);
        let max = products.iter().map(|p| p.price).max().unwrap_or(Decimal::ZERO);
        Self {
            products,
            bounds: PriceRange::new(min, max),
        }
    }

    /// Build a catalog with explicit slider bounds
    pub fn with_bounds(products: Vec<Product>, bounds: PriceRange) -> Self {
        Self { products, bounds }
    }

    /// The storefront's built-in partner-market catalog
    pub fn builtin() -> Self {
        let sonia = MarketRef::new("Sonia Supermercado", "/markets/sonia.png");
        let barraca = MarketRef::new("Barraca Supermercado", "/markets/barraca.png");
        let amarelao = MarketRef::new("Amarelão Supermercado", "/markets/amarelao.png");
        let assala = MarketRef::new("Assalá Atacadista", "/markets/assala.png");

        let products = vec![
            Product {
                id: 1,
                name: "Óleo De Girassol Soya Garrafa 900ml".to_string(),
                price: dec!(9.50),
                market: sonia,
                image: "/products/oleo.png".to_string(),
            },
            Product {
                id: 2,
                name: "Arroz Branco Camil Pacote 5kg".to_string(),
                price: dec!(27.99),
                market: barraca,
                image: "/products/camil.png".to_string(),
            },
            Product {
                id: 3,
                name: "Arroz Branco Kiarroz Pacote 5kg".to_string(),
                price: dec!(35.00),
                market: amarelao,
                image: "/products/kiarroz.png".to_string(),
            },
            Product {
                id: 4,
                name: "Açúcar Refinado Especial União 1kg".to_string(),
                price: dec!(5.90),
                market: assala,
                image: "/products/acucar.png".to_string(),
            },
        ];

        Self::with_bounds(products, PriceRange::new(dec!(2), dec!(100)))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Slider bounds; `min` is the fixed price floor
    pub fn bounds(&self) -> PriceRange {
        self.bounds
    }

    pub fn get(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Distinct market names in first-seen order
    pub fn market_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for product in &self.products {
            if !names.contains(&product.market.name.as_str()) {
                names.push(&product.market.name);
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
