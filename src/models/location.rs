//! Destination catalogue and backend health models

use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{ApiPayload, display_number, star_rating};

/// One destination the backend can plan for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub name: String,
    /// Kind of destination, e.g. `city`
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<String>,
    pub rating: f64,
    /// Month range such as `October-March`
    pub best_time: String,
}

/// Payload of `GET /api/locations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCatalogue {
    pub locations: Vec<LocationSummary>,
}

impl ApiPayload for LocationCatalogue {}

/// Payload of `GET /api/health`, which has no success envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    /// Server-local time without offset
    pub timestamp: NaiveDateTime,
}

impl HealthStatus {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

impl Display for LocationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} ({})", self.name, self.kind)?;
        writeln!(
            f,
            "   ⭐ {} {}",
            star_rating(self.rating),
            display_number(self.rating)
        )?;
        writeln!(f, "   📅 Best time: {}", self.best_time)?;
        if !self.features.is_empty() {
            writeln!(f, "   🏷️ {}", self.features.join(", "))?;
        }
        Ok(())
    }
}
