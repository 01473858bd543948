use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// The user-facing identity of an element: unique (per dataset) name plus a
/// free-form description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementMeta {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A stored element: metadata plus its insertion index and the workspace
/// key of its content blob. `index` is assigned once at insertion and never
/// reassigned; it is the sole sort key for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    #[serde(flatten)]
    pub meta: ElementMeta,
    pub index: usize,
    pub file: String,
    /// True when the stored blob is opaque bytes rather than UTF-8 text.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub binary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMeta {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Element content, exactly one representation populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementContent {
    Text(String),
    Binary(Vec<u8>),
}

impl ElementContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ElementContent::Text(text) => text.as_bytes(),
            ElementContent::Binary(bytes) => bytes,
        }
    }

    /// Content length in budget units (bytes).
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, ElementContent::Binary(_))
    }

    /// Render for a JSON payload: text as-is, binary as base64.
    pub fn into_display_string(self) -> String {
        match self {
            ElementContent::Text(text) => text,
            ElementContent::Binary(bytes) => BASE64.encode(bytes),
        }
    }
}

impl From<String> for ElementContent {
    fn from(text: String) -> Self {
        ElementContent::Text(text)
    }
}

impl From<&str> for ElementContent {
    fn from(text: &str) -> Self {
        ElementContent::Text(text.to_string())
    }
}

impl From<Vec<u8>> for ElementContent {
    fn from(bytes: Vec<u8>) -> Self {
        ElementContent::Binary(bytes)
    }
}
