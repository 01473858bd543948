//! # Dataset Workspace
//!
//! The narrow storage contract the dataset layer is written against: a
//! key-addressed byte-blob service with `read`, `write`, and `list`.
//!
//! Keys are `/`-separated strings relative to the workspace root
//! (for example `datasets/meta/<id>`). The production implementation,
//! [`FsWorkspace`], maps keys onto a root directory; tests and alternate
//! backends implement [`Workspace`] directly.

mod error;
mod fs;

pub use error::{Result, WorkspaceError};
pub use fs::FsWorkspace;

use async_trait::async_trait;

/// Key-addressed blob storage. All dataset records and element contents
/// live behind this contract.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Read the blob stored at `key`. Absence is reported as
    /// [`WorkspaceError::NotFound`], distinct from any other I/O failure.
    async fn read(&self, key: &str) -> Result<Vec<u8>>;

    /// Write `contents` at `key`, replacing any existing blob.
    async fn write(&self, key: &str, contents: &[u8]) -> Result<()>;

    /// List every key under `prefix`, sorted. A prefix with no entries
    /// yields an empty list, not an error.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
