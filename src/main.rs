use pexinxa_storefront::config::Settings;
use pexinxa_storefront::core::{Catalog, Listing, MarketDiscovery, MarketMap};
use pexinxa_storefront::models::{Product, User};
use pexinxa_storefront::services::GooglePlacesClient;
use pexinxa_storefront::Storefront;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting Pexinxa storefront core...");

    let settings = Settings::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");

    let places = GooglePlacesClient::new(
        settings.places.endpoint.clone(),
        settings.places.api_key.clone(),
        settings.places.timeout(),
    )?;
    let provider_ready = places.is_ready();

    if !provider_ready {
        warn!("No places API key configured, map discovery will be deferred");
    }

    let discovery = MarketDiscovery::new(places, settings.discovery.nearby_search());
    let map = MarketMap::with_ordering(discovery, settings.discovery.ordering);

    let catalog = Arc::new(Catalog::builtin());
    let mut storefront = Storefront::new(catalog, None::<User>, Vec::<Product>::new(), map);

    let shown = storefront.apply_filters().len();
    info!("Catalog loaded: {} products shown", shown);

    let economy = storefront.set_economy_mode(true).len();
    info!("Economy mode: {} products under R$ 10.00", economy);

    if let Listing::Products(products) = storefront.listing() {
        for product in products {
            info!(id = product.id, market = %product.market.name, "{} {}", product.name, product.display_price());
        }
    }

    let activation = storefront.activate_map(provider_ready).await;
    info!(?activation, "Map activation finished");

    for market in storefront.discovered_markets().await {
        info!(
            place_id = %market.place_id,
            distance_km = market.distance_km,
            "{}: {}",
            market.name,
            market.promotion
        );
    }

    Ok(())
}
