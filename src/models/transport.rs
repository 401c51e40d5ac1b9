//! Transport search request and recommendation models

use serde::{Deserialize, Serialize};

use super::ApiPayload;

/// Body of `POST /api/search_transport`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportSearchRequest {
    /// Preferred travel mode (train, aeroplane, bus, mixed)
    pub mode: String,
    /// Destination name
    pub location: String,
    /// Travel date as entered in the form
    pub date: String,
}

/// Successful transport search payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportResult {
    pub location: String,
    pub date: String,
    /// Estimated distance to the destination in kilometers
    pub distance_km: f64,
    /// Options ordered best first
    pub recommendations: Vec<TransportOption>,
}

impl ApiPayload for TransportResult {}

/// One suggested way of getting there
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportOption {
    pub name: String,
    pub description: String,
    /// Free text such as `"12h"` or `"Variable"`
    pub estimated_time: String,
    pub estimated_cost: f64,
    /// Comfort on a 0-5 scale
    pub comfort_rating: f64,
    pub availability: String,
    /// Backend key of the mode this option was scored for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_rating: Option<f64>,
}
