//! View controller
//!
//! Every user action and every finished network call arrives as a
//! [`Command`]. [`View::update`] folds it into the view state and returns the
//! [`Effect`]s the runtime must apply, in order. The reducer performs no I/O.
//!
//! Each form tracks its latest request by [`RequestId`]. A response is only
//! applied while its form is still pending on that id; responses to
//! superseded submissions are dropped, so the most recent submission always
//! decides what the container shows.

pub mod command;
pub mod state;

pub use command::{Command, Effect, RequestId};
pub use state::{ModeSelection, RequestState};

use tracing::debug;
use url::Url;

use crate::Result;
use crate::config::DisplayConfig;
use crate::models::{ApiReply, ItineraryRequest, TransportSearchRequest, parse_leading_int};
use crate::page::{Container, ids};
use crate::render::{self, Renderer};

/// Static description of one form's result area
struct FormSurface {
    target: Container,
    loading: &'static str,
    failed: &'static str,
    context: &'static str,
}

const TRANSPORT_SURFACE: FormSurface = FormSurface {
    target: Container::Results,
    loading: render::TRANSPORT_LOADING,
    failed: render::TRANSPORT_FAILED,
    context: "search_transport",
};

const ITINERARY_SURFACE: FormSurface = FormSurface {
    target: Container::ItineraryResults,
    loading: render::ITINERARY_LOADING,
    failed: render::ITINERARY_FAILED,
    context: "generate_itinerary",
};

/// State of the page controller
#[derive(Debug)]
pub struct View {
    renderer: Renderer,
    itinerary_page: String,
    selected_mode: Option<ModeSelection>,
    transport: RequestState,
    itinerary: RequestState,
    last_request_id: u64,
}

impl View {
    #[must_use]
    pub fn new(renderer: Renderer, itinerary_page: impl Into<String>) -> Self {
        Self {
            renderer,
            itinerary_page: itinerary_page.into(),
            selected_mode: None,
            transport: RequestState::Idle,
            itinerary: RequestState::Idle,
            last_request_id: 0,
        }
    }

    /// Build a view with the configured currency and redirect target
    pub fn from_config(display: &DisplayConfig) -> Result<Self> {
        let renderer = Renderer::new(display.currency_symbol.clone())?;
        Ok(Self::new(renderer, display.itinerary_page.clone()))
    }

    #[must_use]
    pub fn selected_mode(&self) -> Option<&ModeSelection> {
        self.selected_mode.as_ref()
    }

    #[must_use]
    pub fn transport_state(&self) -> RequestState {
        self.transport
    }

    #[must_use]
    pub fn itinerary_state(&self) -> RequestState {
        self.itinerary
    }

    /// Apply one command and return the effects it causes
    pub fn update(&mut self, command: Command) -> Vec<Effect> {
        match command {
            Command::PageLoaded { url } => Self::prefill_location(&url),
            Command::ModeOptionClicked { index, mode } => {
                self.selected_mode = Some(ModeSelection {
                    index,
                    mode: mode.clone(),
                });
                vec![
                    Effect::MarkModeSelected { index },
                    Effect::SetField {
                        id: ids::MODE,
                        value: mode,
                    },
                ]
            }
            Command::SearchClicked { input } => self.search(&input),
            Command::SearchKeyPressed { key, input } => {
                if key == "Enter" {
                    self.search(&input)
                } else {
                    Vec::new()
                }
            }
            Command::TravelFormSubmitted {
                mode,
                location,
                date,
            } => {
                let id = self.next_request_id();
                self.transport = RequestState::Pending(id);
                debug!("Submitting transport search {} for '{}'", id, location);
                vec![
                    loading(&TRANSPORT_SURFACE),
                    Effect::SearchTransport {
                        id,
                        request: TransportSearchRequest {
                            mode,
                            location,
                            date,
                        },
                    },
                ]
            }
            Command::ItineraryFormSubmitted { location, duration } => {
                let id = self.next_request_id();
                self.itinerary = RequestState::Pending(id);
                debug!("Submitting itinerary request {} for '{}'", id, location);
                vec![
                    loading(&ITINERARY_SURFACE),
                    Effect::GenerateItinerary {
                        id,
                        request: ItineraryRequest {
                            location,
                            duration: parse_leading_int(&duration),
                        },
                    },
                ]
            }
            Command::TransportResponded { id, outcome } => {
                let renderer = &self.renderer;
                resolve(
                    &mut self.transport,
                    &TRANSPORT_SURFACE,
                    id,
                    outcome,
                    renderer,
                    |result| renderer.transport_results(result),
                )
            }
            Command::ItineraryResponded { id, outcome } => {
                let renderer = &self.renderer;
                resolve(
                    &mut self.itinerary,
                    &ITINERARY_SURFACE,
                    id,
                    outcome,
                    renderer,
                    |result| renderer.itinerary(result),
                )
            }
        }
    }

    fn next_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        RequestId(self.last_request_id)
    }

    fn search(&self, input: &str) -> Vec<Effect> {
        let location = input.trim();
        if location.is_empty() {
            return Vec::new();
        }
        vec![Effect::Navigate {
            href: format!(
                "{}?location={}",
                self.itinerary_page,
                urlencoding::encode(location)
            ),
        }]
    }

    fn prefill_location(url: &Url) -> Vec<Effect> {
        let location = url
            .query_pairs()
            .find(|(key, _)| key == "location")
            .map(|(_, value)| value.into_owned());

        match location {
            Some(value) if !value.is_empty() => vec![Effect::SetField {
                id: ids::ITINERARY_LOCATION,
                value,
            }],
            _ => Vec::new(),
        }
    }
}

fn loading(surface: &FormSurface) -> Effect {
    Effect::Render {
        target: surface.target,
        html: surface.loading.to_string(),
    }
}

/// Settle a form's pending request with its response
fn resolve<T>(
    state: &mut RequestState,
    surface: &FormSurface,
    id: RequestId,
    outcome: Result<ApiReply<T>>,
    renderer: &Renderer,
    render_success: impl FnOnce(&T) -> Result<String>,
) -> Vec<Effect> {
    if !state.awaits(id) {
        debug!(
            "Discarding stale {} response {} (form is {:?})",
            surface.context, id, state
        );
        return Vec::new();
    }

    let rendered = outcome.and_then(|reply| match reply {
        ApiReply::Success(payload) => render_success(&payload),
        ApiReply::Failure(message) => renderer.error(&message),
    });

    match rendered {
        Ok(html) => {
            *state = RequestState::Resolved(id);
            vec![Effect::Render {
                target: surface.target,
                html,
            }]
        }
        Err(e) => {
            *state = RequestState::Failed(id);
            vec![
                Effect::ReportError {
                    context: surface.context,
                    message: e.to_string(),
                },
                Effect::Render {
                    target: surface.target,
                    html: surface.failed.to_string(),
                },
            ]
        }
    }
}
