//! Data models for the travel planner backend
//!
//! This module contains the request and response shapes organized by concern:
//! - Transport: search requests and transport recommendations
//! - Itinerary: itinerary requests, day plans and similar locations
//! - Location: catalogue entries and backend health

pub mod itinerary;
pub mod location;
pub mod transport;

pub use itinerary::{DayPlan, Itinerary, ItineraryRequest, ItineraryResult, SimilarLocation};
pub use location::{HealthStatus, LocationCatalogue, LocationSummary};
pub use transport::{TransportOption, TransportResult, TransportSearchRequest};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::PlannerError;

/// Shown when the backend reports a failure without saying why
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Outcome the backend reported through its `success` flag
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply<T> {
    Success(T),
    Failure(String),
}

/// The `{success, error}` pair every endpoint wraps its payload in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub success: bool,
    pub error: Option<String>,
}

impl Envelope {
    /// Read the envelope fields from a response body, if it is an object.
    ///
    /// Only `success: true` counts as success. An `error` that is not a
    /// string is ignored.
    #[must_use]
    pub fn peek(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            success: object.get("success").and_then(Value::as_bool) == Some(true),
            error: object
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    fn failure_message(self) -> String {
        self.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string())
    }
}

/// A success payload carried next to the envelope fields
pub trait ApiPayload: DeserializeOwned {
    /// An error the backend reports inside an otherwise successful payload
    fn embedded_error(_value: &Value) -> Option<String> {
        None
    }
}

impl<T: ApiPayload> ApiReply<T> {
    /// Decode a JSON response body into a reply
    pub fn from_value(value: Value) -> crate::Result<Self> {
        let envelope = Envelope::peek(&value)
            .ok_or_else(|| PlannerError::decode("Response body is not a JSON object"))?;

        if !envelope.success {
            return Ok(ApiReply::Failure(envelope.failure_message()));
        }

        if let Some(message) = T::embedded_error(&value) {
            return Ok(ApiReply::Failure(message));
        }

        let payload = serde_json::from_value(value)?;
        Ok(ApiReply::Success(payload))
    }
}

/// Format a number the way a browser prints it: `450`, `4.6`, `1e+21`
#[must_use]
pub fn display_number(value: f64) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".to_string()
        } else if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    // Negative zero prints as `0`.
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        return exponential(value);
    }
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Shortest exponential form with an explicit exponent sign, e.g. `1.5e+21`
fn exponential(value: f64) -> String {
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

/// Star glyphs for a 0-5 rating, rounded half up
#[must_use]
pub fn star_rating(rating: f64) -> String {
    let count = if rating.is_finite() {
        (rating + 0.5).floor().clamp(0.0, 5.0) as usize
    } else {
        0
    };
    "★".repeat(count)
}

/// Parse the leading integer of a form value, like `parseInt(value, 10)`
#[must_use]
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
