//! Draft persistence format
//!
//! A draft is the last parse payload plus the edited collection, stored as
//! JSON in [`crate::slots::DRAFT_SLOT`]. Restoring performs no validation
//! and no expiry check.

use crate::types::{EditableComponent, ParseResponse};
use serde::{Deserialize, Serialize};

/// A draft as read back from its slot
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    #[serde(default, deserialize_with = "crate::lenient::optional")]
    pub parse_result: Option<ParseResponse>,
    #[serde(default, deserialize_with = "crate::lenient::rows")]
    pub editable_components: Vec<EditableComponent>,
    /// Epoch milliseconds at save time
    #[serde(default, deserialize_with = "crate::lenient::millis")]
    pub timestamp: i64,
}

/// Borrowed view of the store's state for writing a draft
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot<'a> {
    pub parse_result: Option<&'a ParseResponse>,
    pub editable_components: &'a [EditableComponent],
    pub timestamp: i64,
}

impl DraftSnapshot<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Draft {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
