//! `TravelPlanner` - Page controller for the travel planning site
//!
//! This library drives the site's transport search and itinerary pages:
//! mode selection, the search bar redirect, deep-link prefill, and the two
//! backend-bound forms whose JSON answers are rendered into HTML.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod page;
pub mod render;
pub mod runtime;
pub mod view;

// Re-export core types for public API
pub use api::{HttpTravelApi, TravelApi};
pub use config::PlannerConfig;
pub use error::PlannerError;
pub use models::{ApiReply, ItineraryResult, TransportResult};
pub use page::{Container, Page};
pub use render::Renderer;
pub use runtime::Controller;
pub use view::{Command, Effect, RequestId, RequestState, View};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
