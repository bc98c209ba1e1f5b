// Service exports
pub mod places;

pub use places::{GooglePlace, GooglePlacesClient, PlacesError};
