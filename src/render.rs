//! HTML fragments for the result containers
//!
//! Fragments are rendered with Tera from templates compiled into the binary.
//! Template names end in `.html`, so every interpolated value is escaped.

use serde::Serialize;
use tera::{Context, Tera};

use crate::Result;
use crate::models::{
    ItineraryResult, TransportOption, TransportResult, display_number, star_rating,
};

/// Placeholder while a transport search is outstanding
pub const TRANSPORT_LOADING: &str = "<p>Loading travel options...</p>";
/// Shown when a transport search could not be completed
pub const TRANSPORT_FAILED: &str =
    "<p class=\"error\">Failed to load travel options. Please try again.</p>";
/// Placeholder while an itinerary is being generated
pub const ITINERARY_LOADING: &str = "<p>Generating your personalized itinerary...</p>";
/// Shown when itinerary generation could not be completed
pub const ITINERARY_FAILED: &str =
    "<p class=\"error\">Failed to generate itinerary. Please try again.</p>";

const ERROR_TEMPLATE: &str = "error.html";
const TRANSPORT_TEMPLATE: &str = "transport_results.html";
const ITINERARY_TEMPLATE: &str = "itinerary.html";

mod embedded {
    pub const ERROR: &str = r#"<p class="error">Error: {{ message }}</p>"#;

    pub const TRANSPORT_RESULTS: &str = r#"<h3>Travel Options for {{ location }} on {{ date }}</h3><p><strong>Estimated Distance:</strong> {{ distance_km }} km</p><div class="transport-recommendations">{% for option in options %}
    <div class="transport-option">
        <h4>{{ option.name }}</h4>
        <p>{{ option.description }}</p>
        <div class="option-details">
            <span><strong>Estimated Time:</strong> {{ option.estimated_time }}</span>
            <span><strong>Cost:</strong> {{ currency }}{{ option.cost }}</span>
            <span><strong>Comfort:</strong> {{ option.stars }}</span>
            <span><strong>Availability:</strong> {{ option.availability }}</span>
        </div>
    </div>
{% endfor %}</div>"#;

    pub const ITINERARY: &str = r#"
<div class="itinerary-header">
    <h3>{{ duration }}-Day Itinerary for {{ location }}</h3>
    <div class="itinerary-meta">
        <span><strong>Best Time to Visit:</strong> {{ best_time_to_visit }}</span>
        <span><strong>Rating:</strong> {{ stars }}</span>
        <span><strong>Estimated Cost:</strong> {{ currency }}{{ total_cost }}</span>
    </div>
</div>
{% for day in days %}<div class="day-plan"><h4>Day {{ day.day }}</h4><ul>{% for activity in day.activities %}<li>{{ activity }}</li>{% endfor %}</ul></div>{% endfor %}{% if similar | length > 0 %}<div class="similar-locations"><h4>You might also like:</h4><div class="similar-grid">{% for place in similar %}
    <div class="similar-location">
        <h5>{{ place.name }}</h5>
        <p>Rating: {{ place.stars }}</p>
        <p>Features: {{ place.features | join(sep=", ") }}</p>
    </div>
{% endfor %}</div></div>{% endif %}"#;
}

#[derive(Serialize)]
struct TransportView<'a> {
    location: &'a str,
    date: &'a str,
    distance_km: String,
    currency: &'a str,
    options: Vec<OptionView<'a>>,
}

#[derive(Serialize)]
struct OptionView<'a> {
    name: &'a str,
    description: &'a str,
    estimated_time: &'a str,
    cost: String,
    stars: String,
    availability: &'a str,
}

impl<'a> From<&'a TransportOption> for OptionView<'a> {
    fn from(option: &'a TransportOption) -> Self {
        Self {
            name: &option.name,
            description: &option.description,
            estimated_time: &option.estimated_time,
            cost: display_number(option.estimated_cost),
            stars: star_rating(option.comfort_rating),
            availability: &option.availability,
        }
    }
}

#[derive(Serialize)]
struct ItineraryView<'a> {
    duration: u32,
    location: &'a str,
    best_time_to_visit: &'a str,
    stars: String,
    currency: &'a str,
    total_cost: String,
    days: Vec<DayView<'a>>,
    similar: Vec<SimilarView<'a>>,
}

#[derive(Serialize)]
struct DayView<'a> {
    day: u32,
    activities: &'a [String],
}

#[derive(Serialize)]
struct SimilarView<'a> {
    name: &'a str,
    stars: String,
    features: &'a [String],
}

/// Renders API payloads into the markup the result containers hold
#[derive(Debug)]
pub struct Renderer {
    tera: Tera,
    currency_symbol: String,
}

impl Renderer {
    /// Compile the embedded templates
    pub fn new(currency_symbol: impl Into<String>) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (ERROR_TEMPLATE, embedded::ERROR),
            (TRANSPORT_TEMPLATE, embedded::TRANSPORT_RESULTS),
            (ITINERARY_TEMPLATE, embedded::ITINERARY),
        ])?;

        Ok(Self {
            tera,
            currency_symbol: currency_symbol.into(),
        })
    }

    /// Application-level failure, message shown verbatim
    pub fn error(&self, message: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("message", message);
        Ok(self.tera.render(ERROR_TEMPLATE, &context)?)
    }

    /// Transport recommendations for one search
    pub fn transport_results(&self, result: &TransportResult) -> Result<String> {
        let view = TransportView {
            location: &result.location,
            date: &result.date,
            distance_km: display_number(result.distance_km),
            currency: &self.currency_symbol,
            options: result.recommendations.iter().map(OptionView::from).collect(),
        };
        let context = Context::from_serialize(&view)?;
        Ok(self.tera.render(TRANSPORT_TEMPLATE, &context)?)
    }

    /// Itinerary header, day plans and, when present, similar destinations
    pub fn itinerary(&self, result: &ItineraryResult) -> Result<String> {
        let itinerary = &result.itinerary;
        let view = ItineraryView {
            duration: itinerary.duration,
            location: &itinerary.location,
            best_time_to_visit: &itinerary.best_time_to_visit,
            stars: star_rating(itinerary.rating),
            currency: &self.currency_symbol,
            total_cost: display_number(itinerary.total_estimated_cost),
            days: itinerary
                .days
                .iter()
                .map(|day| DayView {
                    day: day.day,
                    activities: &day.activities,
                })
                .collect(),
            similar: result
                .similar_locations
                .iter()
                .map(|place| SimilarView {
                    name: &place.name,
                    stars: star_rating(place.rating),
                    features: &place.features,
                })
                .collect(),
        };
        let context = Context::from_serialize(&view)?;
        Ok(self.tera.render(ITINERARY_TEMPLATE, &context)?)
    }
}
