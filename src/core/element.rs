use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Host-owned node a binding attaches to.
///
/// The host framework owns the element; a binding only reads its identity
/// and touches the config and error attributes it was configured with.
pub trait HostElement {
    /// Stable identity string. May be empty for anonymous elements.
    fn id(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;
    fn set_attribute(&mut self, name: &str, value: String);
    fn remove_attribute(&mut self, name: &str) -> Option<String>;
}

/// In-memory host element used by headless hosts and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    id: String,
    /// `IndexMap` keeps attribute order stable, like a DOM attribute list.
    attributes: IndexMap<String, String>,
}

impl Element {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

impl HostElement for Element {
    fn id(&self) -> &str {
        &self.id
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn set_attribute(&mut self, name: &str, value: String) {
        self.attributes.insert(name.to_owned(), value);
    }

    fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }
}
