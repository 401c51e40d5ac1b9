//! Itinerary request and response models

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::ApiPayload;

/// Body of `POST /api/generate_itinerary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryRequest {
    pub location: String,
    /// Trip length in days; `null` when the form value was not a number
    pub duration: Option<i64>,
}

/// Successful itinerary payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryResult {
    pub itinerary: Itinerary,
    /// Absent, `null` and empty all mean "no suggestions"
    #[serde(default, deserialize_with = "null_as_empty")]
    pub similar_locations: Vec<SimilarLocation>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<SimilarLocation>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<SimilarLocation>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ApiPayload for ItineraryResult {
    /// The backend answers an unknown location with `success: true` and
    /// `itinerary: {"error": "..."}`.
    fn embedded_error(value: &Value) -> Option<String> {
        value
            .get("itinerary")?
            .get("error")?
            .as_str()
            .map(str::to_string)
    }
}

/// A multi-day plan for one destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub location: String,
    /// Number of days
    pub duration: u32,
    pub best_time_to_visit: String,
    /// Destination rating on a 0-5 scale
    pub rating: f64,
    pub total_estimated_cost: f64,
    pub days: Vec<DayPlan>,
}

/// Activities planned for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// 1-based day index
    pub day: u32,
    pub activities: Vec<String>,
}

/// A destination the backend considers similar to the requested one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarLocation {
    pub name: String,
    pub rating: f64,
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApiReply;
    use rstest::rstest;
    use serde_json::json;

    fn itinerary_json() -> Value {
        json!({
            "location": "Hyderabad",
            "duration": 2,
            "total_estimated_cost": 4000,
            "best_time_to_visit": "October-March",
            "rating": 4.2,
            "days": [
                {"day": 1, "activities": ["Visit Charminar", "Shopping", "Nightlife"]},
                {"day": 2, "activities": ["Visit Golconda Fort", "Relax at parks", "Sunset views"]}
            ]
        })
    }

    #[test]
    fn test_itinerary_with_similar_locations() {
        let body = json!({
            "success": true,
            "itinerary": itinerary_json(),
            "similar_locations": [
                {"name": "Delhi", "similarity_score": 0.81, "features": ["historical", "political", "culture"], "rating": 4.1}
            ]
        });

        let ApiReply::Success(result) = ApiReply::<ItineraryResult>::from_value(body).unwrap()
        else {
            panic!("expected a successful reply");
        };
        assert_eq!(result.itinerary.duration, 2);
        assert_eq!(result.itinerary.days[1].activities[0], "Visit Golconda Fort");
        assert_eq!(result.similar_locations[0].similarity_score, Some(0.81));
    }

    #[rstest]
    #[case(json!({"success": true, "itinerary": itinerary_json()}))]
    #[case(json!({"success": true, "itinerary": itinerary_json(), "similar_locations": null}))]
    #[case(json!({"success": true, "itinerary": itinerary_json(), "similar_locations": []}))]
    fn test_no_similar_locations_decodes_to_empty(#[case] body: Value) {
        let ApiReply::Success(result) = ApiReply::<ItineraryResult>::from_value(body).unwrap()
        else {
            panic!("expected a successful reply");
        };
        assert_eq!(result.itinerary.location, "Hyderabad");
        assert!(result.similar_locations.is_empty());
    }

    #[test]
    fn test_unknown_location_is_reported_as_failure() {
        let body = json!({
            "success": true,
            "itinerary": {"error": "Location not found"},
            "similar_locations": []
        });
        let reply = ApiReply::<ItineraryResult>::from_value(body).unwrap();
        assert_eq!(reply, ApiReply::Failure("Location not found".to_string()));
    }

    #[test]
    fn test_unparseable_duration_serializes_as_null() {
        let request = ItineraryRequest {
            location: "Delhi".to_string(),
            duration: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"location": "Delhi", "duration": null})
        );
    }
}
