//! Core reconciliation layer for drawparse
//!
//! This crate provides the wire contract shared with the drawing-parsing
//! backend, the normalizer that migrates legacy component records, and the
//! store that owns the editable component table, its statistics and its
//! saved draft. Network access and the save-as side effect are supplied by
//! the caller through the traits in [`collab`].

pub mod collab;
pub mod draft;
pub mod error;
mod lenient;
pub mod normalizer;
pub mod slots;
pub mod stats;
pub mod store;
pub mod types;

pub use collab::{DirectorySaveTarget, SaveTarget, Transport};
pub use error::StoreError;
pub use slots::{FileSlots, MemorySlots, SlotStore, CREDENTIAL_SLOT, DRAFT_SLOT};
pub use stats::Statistics;
pub use store::ReconciliationStore;
pub use types::*;
