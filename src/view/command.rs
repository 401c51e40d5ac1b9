//! Inputs and outputs of the view reducer

use std::fmt::Display;

use url::Url;

use crate::Result;
use crate::models::{
    ApiReply, ItineraryRequest, ItineraryResult, TransportResult, TransportSearchRequest,
};
use crate::page::Container;

/// Identity of one submitted request, unique across both forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something the user did, or a network call that finished
#[derive(Debug)]
pub enum Command {
    /// The page finished loading at `url`
    PageLoaded { url: Url },
    /// A `mode-option` element was clicked
    ModeOptionClicked { index: usize, mode: String },
    /// The search button was clicked with the current input value
    SearchClicked { input: String },
    /// A key was pressed inside the search input
    SearchKeyPressed { key: String, input: String },
    /// The travel form was submitted
    TravelFormSubmitted { mode: String, location: String, date: String },
    /// The itinerary form was submitted; `duration` is the raw field value
    ItineraryFormSubmitted { location: String, duration: String },
    /// `POST /api/search_transport` finished
    TransportResponded {
        id: RequestId,
        outcome: Result<ApiReply<TransportResult>>,
    },
    /// `POST /api/generate_itinerary` finished
    ItineraryResponded {
        id: RequestId,
        outcome: Result<ApiReply<ItineraryResult>>,
    },
}

/// A change the runtime must apply to the page or the outside world
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Mark option `index` selected and every other option unselected
    MarkModeSelected { index: usize },
    /// Write a form field value; a no-op when the page has no such field
    SetField { id: &'static str, value: String },
    /// Leave the page for `href`, relative to the current URL
    Navigate { href: String },
    /// Replace the markup of a result container
    Render { target: Container, html: String },
    /// Start a transport search
    SearchTransport {
        id: RequestId,
        request: TransportSearchRequest,
    },
    /// Start itinerary generation
    GenerateItinerary { id: RequestId, request: ItineraryRequest },
    /// Diagnostic for a failure the user only sees as a generic message
    ReportError {
        context: &'static str,
        message: String,
    },
}
