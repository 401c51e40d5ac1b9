//! Headless model of the pages the controller is bound to
//!
//! Holds exactly the parts of the document the controller reads or writes:
//! mode options, form field values, result container markup and the current
//! location. Element ids follow the site's markup.

use std::collections::{BTreeMap, BTreeSet};

use url::Url;

/// Element ids the controller binds to
pub mod ids {
    /// Hidden field mirroring the selected travel mode
    pub const MODE: &str = "mode";
    pub const SEARCH_BUTTON: &str = "searchButton";
    pub const SEARCH_INPUT: &str = "searchInput";
    pub const TRAVEL_FORM: &str = "travelForm";
    pub const ITINERARY_FORM: &str = "itineraryForm";
    pub const RESULTS: &str = "results";
    pub const ITINERARY_RESULTS: &str = "itineraryResults";
    pub const ITINERARY_LOCATION: &str = "itineraryLocation";
    /// Travel form destination field
    pub const LOCATION: &str = "location";
    pub const DATE: &str = "date";
    pub const DURATION: &str = "duration";
}

/// Modes offered on the transport page, in page order
pub const DEFAULT_MODES: [&str; 4] = ["train", "aeroplane", "bus", "mixed"];

/// A result area whose markup the controller replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Results,
    ItineraryResults,
}

impl Container {
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Container::Results => ids::RESULTS,
            Container::ItineraryResults => ids::ITINERARY_RESULTS,
        }
    }
}

/// One `mode-option` element and its `data-mode` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeOption {
    pub mode: String,
    pub selected: bool,
}

/// The live state of one page
#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    elements: BTreeSet<String>,
    mode_options: Vec<ModeOption>,
    fields: BTreeMap<String, String>,
    containers: BTreeMap<String, String>,
    navigations: Vec<Url>,
}

impl Page {
    /// An empty page at `url`
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url,
            elements: BTreeSet::new(),
            mode_options: Vec::new(),
            fields: BTreeMap::new(),
            containers: BTreeMap::new(),
            navigations: Vec::new(),
        }
    }

    /// The transport page: mode picker, travel form, results and search bar
    #[must_use]
    pub fn transport(url: Url) -> Self {
        Self::new(url)
            .with_search_bar()
            .with_mode_options(DEFAULT_MODES)
            .with_element(ids::TRAVEL_FORM)
            .with_field(ids::MODE, "")
            .with_field(ids::LOCATION, "")
            .with_field(ids::DATE, "")
            .with_container(Container::Results)
    }

    /// The itinerary page: itinerary form, results and search bar
    #[must_use]
    pub fn itinerary(url: Url) -> Self {
        Self::new(url)
            .with_search_bar()
            .with_element(ids::ITINERARY_FORM)
            .with_field(ids::ITINERARY_LOCATION, "")
            .with_field(ids::DURATION, "3")
            .with_container(Container::ItineraryResults)
    }

    #[must_use]
    pub fn with_element(mut self, id: &str) -> Self {
        self.elements.insert(id.to_string());
        self
    }

    #[must_use]
    pub fn with_search_bar(self) -> Self {
        self.with_element(ids::SEARCH_BUTTON)
            .with_field(ids::SEARCH_INPUT, "")
    }

    #[must_use]
    pub fn with_mode_options<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mode_options = modes
            .into_iter()
            .map(|mode| ModeOption {
                mode: mode.into(),
                selected: false,
            })
            .collect();
        self
    }

    #[must_use]
    pub fn with_field(mut self, id: &str, value: &str) -> Self {
        self.elements.insert(id.to_string());
        self.fields.insert(id.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_container(mut self, container: Container) -> Self {
        self.elements.insert(container.id().to_string());
        self.containers
            .insert(container.id().to_string(), String::new());
        self
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn has_element(&self, id: &str) -> bool {
        self.elements.contains(id)
    }

    #[must_use]
    pub fn mode_options(&self) -> &[ModeOption] {
        &self.mode_options
    }

    #[must_use]
    pub fn selected_modes(&self) -> Vec<&str> {
        self.mode_options
            .iter()
            .filter(|option| option.selected)
            .map(|option| option.mode.as_str())
            .collect()
    }

    /// Current value of a field, `None` when the page has no such field
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&str> {
        self.fields.get(id).map(String::as_str)
    }

    /// Value of a form field; missing fields read as empty
    #[must_use]
    pub fn form_value(&self, id: &str) -> String {
        self.field(id).unwrap_or_default().to_string()
    }

    /// Markup of a result container, `None` when the page lacks it
    #[must_use]
    pub fn container(&self, container: Container) -> Option<&str> {
        self.containers.get(container.id()).map(String::as_str)
    }

    /// Every location this page navigated to, oldest first
    #[must_use]
    pub fn navigations(&self) -> &[Url] {
        &self.navigations
    }

    /// Type into a field. Returns false when the field does not exist.
    pub fn set_field(&mut self, id: &str, value: impl Into<String>) -> bool {
        match self.fields.get_mut(id) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Mark exactly one option selected
    pub fn select_mode(&mut self, index: usize) {
        for (i, option) in self.mode_options.iter_mut().enumerate() {
            option.selected = i == index;
        }
    }

    /// Replace a container's markup; ignored when the page lacks it
    pub fn render(&mut self, container: Container, html: String) {
        if let Some(slot) = self.containers.get_mut(container.id()) {
            *slot = html;
        }
    }

    /// Follow `href` relative to the current location
    pub fn navigate(&mut self, href: &str) -> Result<&Url, url::ParseError> {
        let target = self.url.join(href)?;
        self.navigations.push(target.clone());
        self.url = target;
        Ok(&self.url)
    }
}
