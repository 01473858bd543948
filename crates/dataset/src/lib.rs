//! # Dataset Core
//!
//! A lightweight, file-backed data store that organizes named binary/text
//! blobs ("elements") into ordered, uniquely-identified collections
//! ("datasets"), plus read-only views over pre-existing workspace content.
//!
//! ## Architecture
//!
//! ```text
//! Catalog ──creates/loads──> Dataset ──reads/writes──> Workspace
//!                               │
//!                               └─ elements: name → { index, file }
//!
//! parse_source ──inspects──> ContentView (file | array | folder)
//!                               └─ nth / range, computed lazily
//!
//! render_dataset_refs ──scans text──> budgeted JSON dump per dataset
//! ```
//!
//! Datasets are append-only: element names are unique within a dataset,
//! indexes are dense and assigned in insertion order, and nothing is ever
//! removed. Every load is a fresh deserialization of the persisted record;
//! there is no in-process cache and no cross-writer coordination.

mod budget;
mod catalog;
mod dataset;
mod error;
mod names;
mod parse;
mod types;
mod view;

pub use budget::{
    find_dataset_refs, render_dataset_refs, render_dataset_refs_with_budget,
    DEFAULT_CONTENT_BUDGET,
};
pub use catalog::Catalog;
pub use dataset::Dataset;
pub use error::{DatasetError, Result};
pub use names::{ensure_unique, to_file_name, MAX_UNIQUE_ATTEMPTS};
pub use parse::parse_source;
pub use types::{DatasetMeta, Element, ElementContent, ElementMeta};
pub use view::{ContentView, IterationMethod, ViewKind, MAX_SOURCE_BYTES};
