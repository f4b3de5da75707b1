//! Derived views over the store's state
//!
//! Nothing here is cached; callers recompute on every read.

use crate::types::{EditableComponent, ParseResponse, Status};
use serde::Serialize;
use std::collections::BTreeMap;

/// Status counts over the current collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total: usize,
    pub equal: usize,
    pub not_equal: usize,
    pub new_items: usize,
}

impl Statistics {
    pub fn from_components(components: &[EditableComponent]) -> Self {
        components
            .iter()
            .fold(Statistics::default(), |mut stats, c| {
                stats.total += 1;
                match c.component.status {
                    Status::Equal => stats.equal += 1,
                    Status::NotEqual => stats.not_equal += 1,
                    Status::New => stats.new_items += 1,
                }
                stats
            })
    }
}

/// Field name to value lookup over the payload's `table1`
///
/// A later row with the same field name wins.
pub fn technical_params(parse_result: Option<&ParseResponse>) -> BTreeMap<String, String> {
    parse_result
        .and_then(|r| r.data.as_ref())
        .map(|data| {
            data.table1
                .iter()
                .map(|row| (row.field.clone(), row.value.clone()))
                .collect()
        })
        .unwrap_or_default()
}
