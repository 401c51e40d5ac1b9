//! Event loop that binds page events to the view and performs effects
//!
//! The controller owns the [`Page`] and the [`View`]. Event bindings read
//! the page the way the site's handlers do and dispatch a [`Command`].
//! Backend calls run as spawned tasks that post their completion back onto
//! the controller's queue; queued commands are processed one at a time, so
//! view updates never interleave.
//!
//! Bindings that submit a form spawn onto the current tokio runtime and must
//! be called from within one.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, warn};

use crate::api::TravelApi;
use crate::page::{Page, ids};
use crate::view::{Command, Effect, RequestId, View};
use crate::{PlannerError, Result};

/// Drives one page against a backend
pub struct Controller<A> {
    view: View,
    page: Page,
    api: Arc<A>,
    events_tx: UnboundedSender<Command>,
    events_rx: UnboundedReceiver<Command>,
    in_flight: usize,
}

impl<A> std::fmt::Debug for Controller<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("view", &self.view)
            .field("page", &self.page)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl<A: TravelApi + 'static> Controller<A> {
    #[must_use]
    pub fn new(view: View, page: Page, api: Arc<A>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            view,
            page,
            api,
            events_tx,
            events_rx,
            in_flight: 0,
        }
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Mutable access for typing into fields
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Number of backend calls whose completion has not been processed yet
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Page finished loading
    pub fn load(&mut self) {
        let url = self.page.url().clone();
        self.dispatch(Command::PageLoaded { url });
    }

    /// Click the `index`-th mode option. Returns false if there is none.
    pub fn click_mode(&mut self, index: usize) -> bool {
        let Some(option) = self.page.mode_options().get(index) else {
            return false;
        };
        let mode = option.mode.clone();
        self.dispatch(Command::ModeOptionClicked { index, mode });
        true
    }

    /// Click the search button
    pub fn click_search(&mut self) {
        if !self.has_search_bar() {
            return;
        }
        let input = self.page.form_value(ids::SEARCH_INPUT);
        self.dispatch(Command::SearchClicked { input });
    }

    /// Press a key inside the search input
    pub fn press_search_key(&mut self, key: &str) {
        if !self.has_search_bar() {
            return;
        }
        let input = self.page.form_value(ids::SEARCH_INPUT);
        self.dispatch(Command::SearchKeyPressed {
            key: key.to_string(),
            input,
        });
    }

    /// Submit the travel form. Returns false if the page has none.
    pub fn submit_travel_form(&mut self) -> bool {
        if !self.page.has_element(ids::TRAVEL_FORM) {
            return false;
        }
        let command = Command::TravelFormSubmitted {
            mode: self.page.form_value(ids::MODE),
            location: self.page.form_value(ids::LOCATION),
            date: self.page.form_value(ids::DATE),
        };
        self.dispatch(command);
        true
    }

    /// Submit the itinerary form. Returns false if the page has none.
    pub fn submit_itinerary_form(&mut self) -> bool {
        if !self.page.has_element(ids::ITINERARY_FORM) {
            return false;
        }
        let command = Command::ItineraryFormSubmitted {
            location: self.page.form_value(ids::ITINERARY_LOCATION),
            duration: self.page.form_value(ids::DURATION),
        };
        self.dispatch(command);
        true
    }

    /// Run one command through the view and apply its effects
    pub fn dispatch(&mut self, command: Command) {
        for effect in self.view.update(command) {
            self.apply(effect);
        }
    }

    /// Process the next backend completion. Returns false when nothing is in
    /// flight.
    pub async fn next_event(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        let Some(command) = self.events_rx.recv().await else {
            return false;
        };
        self.in_flight -= 1;
        self.dispatch(command);
        true
    }

    /// Process completions until no backend call is outstanding
    pub async fn settle(&mut self) {
        while self.next_event().await {}
    }

    fn has_search_bar(&self) -> bool {
        self.page.has_element(ids::SEARCH_BUTTON) && self.page.field(ids::SEARCH_INPUT).is_some()
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::MarkModeSelected { index } => self.page.select_mode(index),
            Effect::SetField { id, value } => {
                if !self.page.set_field(id, value) {
                    debug!("Page has no '{}' field, skipping", id);
                }
            }
            Effect::Navigate { href } => match self.page.navigate(&href) {
                Ok(url) => debug!("Navigated to {}", url),
                Err(e) => warn!("Cannot navigate to '{}': {}", href, e),
            },
            Effect::Render { target, html } => self.page.render(target, html),
            Effect::SearchTransport { id, request } => {
                let api = Arc::clone(&self.api);
                self.spawn_call(
                    id,
                    async move { api.search_transport(&request).await },
                    |id, outcome| Command::TransportResponded { id, outcome },
                );
            }
            Effect::GenerateItinerary { id, request } => {
                let api = Arc::clone(&self.api);
                self.spawn_call(
                    id,
                    async move { api.generate_itinerary(&request).await },
                    |id, outcome| Command::ItineraryResponded { id, outcome },
                );
            }
            Effect::ReportError { context, message } => {
                error!(context, "Error: {}", message);
            }
        }
    }

    /// Run a backend call on its own task and post its completion back.
    ///
    /// A call that panics or is cancelled still completes its request, as a
    /// network failure, so the form never stays pending.
    fn spawn_call<T, F>(
        &mut self,
        id: RequestId,
        call: F,
        respond: impl FnOnce(RequestId, Result<T>) -> Command + Send + 'static,
    ) where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let events = self.events_tx.clone();
        self.in_flight += 1;

        let call = tokio::spawn(call);
        tokio::spawn(async move {
            let outcome = call.await.unwrap_or_else(|e| {
                error!("Backend call {} did not complete: {}", id, e);
                Err(PlannerError::network(format!("request {id} aborted: {e}")))
            });
            // The controller may already be gone; nothing left to update.
            let _ = events.send(respond(id, outcome));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayConfig;
    use crate::models::{
        ApiReply, ItineraryRequest, ItineraryResult, TransportResult, TransportSearchRequest,
    };
    use crate::page::Container;
    use crate::render;
    use crate::view::RequestState;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::oneshot;
    use url::Url;

    /// Backend whose transport answers are released by the test
    #[derive(Default)]
    struct GatedApi {
        gates: Mutex<Vec<oneshot::Receiver<Result<ApiReply<TransportResult>>>>>,
        requests: Mutex<Vec<TransportSearchRequest>>,
    }

    impl GatedApi {
        fn gate(&self) -> oneshot::Sender<Result<ApiReply<TransportResult>>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().push(rx);
            tx
        }
    }

    #[async_trait]
    impl TravelApi for GatedApi {
        async fn search_transport(
            &self,
            request: &TransportSearchRequest,
        ) -> Result<ApiReply<TransportResult>> {
            self.requests.lock().unwrap().push(request.clone());
            let gate = self.gates.lock().unwrap().remove(0);
            gate.await
                .unwrap_or_else(|_| Err(PlannerError::network("gate dropped")))
        }

        async fn generate_itinerary(
            &self,
            _request: &ItineraryRequest,
        ) -> Result<ApiReply<ItineraryResult>> {
            Err(PlannerError::network("connection refused"))
        }
    }

    fn result_for(location: &str) -> TransportResult {
        TransportResult {
            location: location.to_string(),
            date: "2024-01-01".to_string(),
            distance_km: 320.0,
            recommendations: Vec::new(),
        }
    }

    fn controller(page: Page, api: Arc<GatedApi>) -> Controller<GatedApi> {
        let view = View::from_config(&DisplayConfig::default()).unwrap();
        Controller::new(view, page, api)
    }

    fn transport_page() -> Page {
        Page::transport(Url::parse("http://localhost:8000/modes.html").unwrap())
    }

    #[test]
    fn test_mode_clicks_keep_one_selection() {
        let mut controller = controller(transport_page(), Arc::new(GatedApi::default()));
        for index in [1, 3, 0] {
            assert!(controller.click_mode(index));
            let selected = controller.page().selected_modes();
            assert_eq!(selected.len(), 1);
            assert_eq!(selected[0], controller.page().mode_options()[index].mode);
            assert_eq!(controller.page().field(ids::MODE), Some(selected[0]));
        }
        assert!(!controller.click_mode(9));
    }

    #[test]
    fn test_search_bar_navigates_to_itinerary_page() {
        let mut controller = controller(transport_page(), Arc::new(GatedApi::default()));
        controller.page_mut().set_field(ids::SEARCH_INPUT, " Paris ");
        controller.press_search_key("Enter");

        let url = controller.page().url().clone();
        assert_eq!(url.path(), "/itinerary.html");
        let location: Vec<String> = url
            .query_pairs()
            .filter(|(key, _)| key == "location")
            .map(|(_, value)| value.into_owned())
            .collect();
        assert_eq!(location, vec!["Paris".to_string()]);
    }

    #[test]
    fn test_blank_search_does_not_navigate() {
        let mut controller = controller(transport_page(), Arc::new(GatedApi::default()));
        controller.page_mut().set_field(ids::SEARCH_INPUT, "   ");
        controller.click_search();
        assert!(controller.page().navigations().is_empty());
    }

    #[test]
    fn test_prefill_only_with_location_field() {
        let url = Url::parse("http://localhost:8000/itinerary.html?location=Goa").unwrap();

        let mut itinerary = controller(Page::itinerary(url.clone()), Arc::new(GatedApi::default()));
        itinerary.load();
        assert_eq!(itinerary.page().field(ids::ITINERARY_LOCATION), Some("Goa"));

        let mut transport = controller(Page::transport(url), Arc::new(GatedApi::default()));
        transport.load();
        assert_eq!(transport.page().field(ids::ITINERARY_LOCATION), None);
    }

    #[test]
    fn test_pages_without_forms_ignore_submission() {
        let page = Page::new(Url::parse("http://localhost:8000/index.html").unwrap());
        let mut controller = controller(page, Arc::new(GatedApi::default()));
        assert!(!controller.submit_travel_form());
        assert!(!controller.submit_itinerary_form());
        assert_eq!(controller.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_latest_submission_wins_when_older_resolves_last() {
        let api = Arc::new(GatedApi::default());
        let first_gate = api.gate();
        let second_gate = api.gate();
        let mut controller = controller(transport_page(), Arc::clone(&api));

        controller.page_mut().set_field(ids::LOCATION, "Goa");
        controller.submit_travel_form();
        assert_eq!(
            controller.page().container(Container::Results),
            Some(render::TRANSPORT_LOADING)
        );
        // Let the first task take its gate before the second is spawned.
        tokio::task::yield_now().await;

        controller.page_mut().set_field(ids::LOCATION, "Pune");
        controller.submit_travel_form();
        assert_eq!(controller.in_flight(), 2);

        second_gate.send(Ok(ApiReply::Success(result_for("Pune")))).unwrap();
        assert!(controller.next_event().await);
        let html = controller.page().container(Container::Results).unwrap().to_string();
        assert!(html.contains("Travel Options for Pune"));

        first_gate.send(Ok(ApiReply::Success(result_for("Goa")))).unwrap();
        controller.settle().await;
        assert_eq!(controller.page().container(Container::Results), Some(html.as_str()));
        assert!(matches!(
            controller.view().transport_state(),
            RequestState::Resolved(_)
        ));
        assert_eq!(controller.in_flight(), 0);

        let locations: Vec<String> = api
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.location.clone())
            .collect();
        assert_eq!(locations, vec!["Goa".to_string(), "Pune".to_string()]);
    }

    #[tokio::test]
    async fn test_rejected_call_renders_generic_failure() {
        let mut controller = controller(
            Page::itinerary(Url::parse("http://localhost:8000/itinerary.html").unwrap()),
            Arc::new(GatedApi::default()),
        );
        controller.page_mut().set_field(ids::ITINERARY_LOCATION, "Delhi");
        assert!(controller.submit_itinerary_form());
        controller.settle().await;

        assert_eq!(
            controller.page().container(Container::ItineraryResults),
            Some(render::ITINERARY_FAILED)
        );
        assert!(matches!(
            controller.view().itinerary_state(),
            RequestState::Failed(_)
        ));
    }

    #[tokio::test]
    async fn test_settle_without_requests_returns_immediately() {
        let mut controller = controller(transport_page(), Arc::new(GatedApi::default()));
        controller.settle().await;
        assert!(!controller.next_event().await);
    }

    /// Backend whose calls panic before answering
    struct PanickingApi;

    #[async_trait]
    impl TravelApi for PanickingApi {
        async fn search_transport(
            &self,
            _request: &TransportSearchRequest,
        ) -> Result<ApiReply<TransportResult>> {
            panic!("transport backend crashed");
        }

        async fn generate_itinerary(
            &self,
            _request: &ItineraryRequest,
        ) -> Result<ApiReply<ItineraryResult>> {
            panic!("itinerary backend crashed");
        }
    }

    #[tokio::test]
    async fn test_panicking_call_fails_the_form_instead_of_hanging() {
        let view = View::from_config(&DisplayConfig::default()).unwrap();
        let mut controller = Controller::new(view, transport_page(), Arc::new(PanickingApi));

        controller.page_mut().set_field(ids::LOCATION, "Goa");
        assert!(controller.submit_travel_form());
        tokio::time::timeout(Duration::from_secs(2), controller.settle())
            .await
            .expect("settle should finish once the call task dies");

        assert_eq!(
            controller.page().container(Container::Results),
            Some(render::TRANSPORT_FAILED)
        );
        assert!(matches!(
            controller.view().transport_state(),
            RequestState::Failed(_)
        ));
        assert_eq!(controller.in_flight(), 0);
    }
}
