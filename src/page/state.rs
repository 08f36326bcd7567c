//! Page state read by the poller.

use dashmap::DashMap;

/// Embedded page state, as rendered by the host.
pub trait Page {
    /// Value of the named input field, if the field exists.
    fn input_value(&self, name: &str) -> Option<String>;

    /// Value of a `data-*` attribute on the element with the given id.
    fn data_attribute(&self, element_id: &str, attribute: &str) -> Option<String>;

    /// Replace the text content of an element.
    fn set_text(&self, element_id: &str, text: &str);

    /// Set the CSS width of an element.
    fn set_width(&self, element_id: &str, width: &str);
}

/// In-memory page for headless hosts and tests.
///
/// Fields may be filled in after the session has started, modelling an
/// identifier that is rendered late.
#[derive(Debug, Default)]
pub struct StaticPage {
    inputs: DashMap<String, String>,
    attributes: DashMap<(String, String), String>,
    texts: DashMap<String, String>,
    widths: DashMap<String, String>,
}

impl StaticPage {
    /// Create an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style input setter.
    pub fn with_input(self, name: &str, value: &str) -> Self {
        self.set_input(name, value);
        self
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(self, element_id: &str, attribute: &str, value: &str) -> Self {
        self.attributes
            .insert((element_id.to_string(), attribute.to_string()), value.to_string());
        self
    }

    /// Set or replace an input value.
    pub fn set_input(&self, name: &str, value: &str) {
        self.inputs.insert(name.to_string(), value.to_string());
    }

    /// Remove an input field entirely.
    pub fn remove_input(&self, name: &str) {
        self.inputs.remove(name);
    }

    /// Current text of an element.
    pub fn text(&self, element_id: &str) -> Option<String> {
        self.texts.get(element_id).map(|t| t.clone())
    }

    /// Current width of an element.
    pub fn width(&self, element_id: &str) -> Option<String> {
        self.widths.get(element_id).map(|w| w.clone())
    }
}

impl Page for StaticPage {
    fn input_value(&self, name: &str) -> Option<String> {
        self.inputs.get(name).map(|v| v.clone())
    }

    fn data_attribute(&self, element_id: &str, attribute: &str) -> Option<String> {
        self.attributes
            .get(&(element_id.to_string(), attribute.to_string()))
            .map(|v| v.clone())
    }

    fn set_text(&self, element_id: &str, text: &str) {
        self.texts.insert(element_id.to_string(), text.to_string());
    }

    fn set_width(&self, element_id: &str, width: &str) {
        self.widths.insert(element_id.to_string(), width.to_string());
    }
}
