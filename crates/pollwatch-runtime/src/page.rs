//! Page model: elements addressed by id, each with `data-*` attributes and
//! an inner-markup slot.
//!
//! This is the contract the poller attaches to. The binary builds a page
//! with [`results_page`]; tests assemble pages by hand to cover missing
//! elements and attributes.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::output::{ContentTarget, OutputError};

/// Id of the element carrying the poll id.
pub const CONTAINER_ID: &str = "live-poll-results";
/// Id of the element the results are rendered into.
pub const CONTENT_ID: &str = "poll-results-content";
/// `data-*` key (without the prefix) holding the poll id.
pub const POLL_ID_ATTR: &str = "poll-id";

/// A page element. Cloning yields another handle to the same markup slot.
#[derive(Clone)]
pub struct Element {
    id: String,
    dataset: HashMap<String, String>,
    markup: Arc<Mutex<String>>,
    target: Option<Arc<dyn ContentTarget>>,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dataset: HashMap::new(),
            markup: Arc::new(Mutex::new(String::new())),
            target: None,
        }
    }

    /// Set a `data-*` attribute (key given without the `data-` prefix).
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dataset.insert(key.into(), value.into());
        self
    }

    /// Publish every markup change to `target`.
    #[must_use]
    pub fn with_target(mut self, target: Arc<dyn ContentTarget>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }

    pub async fn inner_html(&self) -> String {
        self.markup.lock().await.clone()
    }

    /// Replace the markup and publish it.
    ///
    /// The in-memory markup is updated even when publishing fails. The lock
    /// is held across the publish so concurrent writers land in the target
    /// in the same order as in memory.
    pub async fn set_inner_html(&self, markup: String) -> Result<(), OutputError> {
        let mut slot = self.markup.lock().await;
        *slot = markup;
        match &self.target {
            Some(target) => target.publish(&slot).await,
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("dataset", &self.dataset)
            .field("has_target", &self.target.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default, Clone)]
pub struct Page {
    elements: HashMap<String, Element>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element, replacing any element with the same id.
    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.insert(element.id.clone(), element);
        self
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }
}

/// The standard results page: a container (with `data-poll-id` only when
/// `poll_id` is given) and a content element publishing to `target`.
pub fn results_page(poll_id: Option<&str>, target: Option<Arc<dyn ContentTarget>>) -> Page {
    let mut container = Element::new(CONTAINER_ID);
    if let Some(id) = poll_id {
        container = container.with_data(POLL_ID_ATTR, id);
    }

    let mut content = Element::new(CONTENT_ID);
    if let Some(target) = target {
        content = content.with_target(target);
    }

    Page::new().with_element(container).with_element(content)
}
