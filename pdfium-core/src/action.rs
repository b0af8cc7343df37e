//! Link actions
//!
//! Actions describe what happens when a link without an in-document
//! destination is activated: navigate inside this document, navigate to
//! another document, open a URI, or launch an application.

use serde::Serialize;

/// A resolved action attached to a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfAction {
    kind: ActionType,
    uri: Option<String>,
}

impl PdfAction {
    pub(crate) fn new(kind: ActionType, uri: Option<String>) -> Self {
        Self { kind, uri }
    }

    /// The action type.
    pub fn kind(&self) -> ActionType {
        self.kind
    }

    /// The decoded URI payload.
    ///
    /// Only [`ActionType::Uri`] actions carry one, and even those come back
    /// without a payload when the raw bytes were not valid ASCII.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }
}

/// Type of a link action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionType {
    /// Unsupported or unknown action type
    Unsupported,
    /// Go to a destination within the current document
    GoTo,
    /// Go to a destination within another document
    RemoteGoTo,
    /// Open a Universal Resource Identifier
    Uri,
    /// Launch an application or open a file
    Launch,
}

impl ActionType {
    /// Map the engine's raw action type tag to a variant.
    pub fn from_raw(value: u32) -> Self {
        match value {
            1 => ActionType::GoTo,
            2 => ActionType::RemoteGoTo,
            3 => ActionType::Uri,
            4 => ActionType::Launch,
            _ => ActionType::Unsupported,
        }
    }
}
