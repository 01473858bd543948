use crate::dataset::{Dataset, DatasetRecord};
use crate::error::{DatasetError, Result};
use crate::types::DatasetMeta;
use dataset_workspace::Workspace;
use std::fmt::Write as _;
use std::sync::Arc;

pub(crate) const DATASET_FOLDER: &str = "datasets";
pub(crate) const DATASET_META_FOLDER: &str = "datasets/meta";

/// Creates, enumerates, and loads datasets. Holds no live dataset cache:
/// every [`Catalog::get_dataset`] is a fresh read-and-deserialize against
/// the workspace, so concurrent writers race with last-write-wins.
pub struct Catalog {
    workspace: Arc<dyn Workspace>,
}

impl Catalog {
    pub fn new(workspace: Arc<dyn Workspace>) -> Self {
        Self { workspace }
    }

    /// Create an empty dataset with a fresh id and persist it immediately,
    /// so it is durable and listable before any element is added.
    pub async fn new_dataset(&self, name: &str, description: &str) -> Result<Dataset> {
        let id = random_id()?;
        log::info!("creating dataset {id} ({name})");

        let dataset = Dataset::new(
            DatasetMeta {
                id,
                name: name.to_string(),
                description: description.to_string(),
            },
            self.workspace.clone(),
        );
        dataset.save().await?;
        Ok(dataset)
    }

    /// Load a dataset by id. Absence is [`DatasetError::NotFound`]; any
    /// other read failure surfaces as an I/O error.
    pub async fn get_dataset(&self, id: &str) -> Result<Dataset> {
        let key = format!("{DATASET_META_FOLDER}/{id}");
        let bytes = self.workspace.read(&key).await.map_err(|err| {
            if err.is_not_found() {
                DatasetError::NotFound(format!("dataset {id}"))
            } else {
                err.into()
            }
        })?;

        let record: DatasetRecord = serde_json::from_slice(&bytes)
            .map_err(|err| DatasetError::Validation(format!("dataset record {id}: {err}")))?;
        Ok(Dataset::from_record(record, self.workspace.clone()))
    }

    /// Metadata headers of every persisted dataset, sorted by id. The
    /// backend's enumeration order is not guaranteed stable, so we sort for
    /// determinism.
    pub async fn list_datasets(&self) -> Result<Vec<DatasetMeta>> {
        let keys = self.workspace.list(DATASET_META_FOLDER).await?;

        let mut datasets = Vec::with_capacity(keys.len());
        for key in keys {
            let bytes = self.workspace.read(&key).await?;
            let record: DatasetRecord = serde_json::from_slice(&bytes)
                .map_err(|err| DatasetError::Validation(format!("dataset record {key}: {err}")))?;
            datasets.push(record.meta);
        }
        datasets.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(datasets)
    }
}

/// A fresh dataset id: 16 random bytes, lowercase hex. Uniqueness is
/// probabilistic; ids are not checked against existing datasets.
fn random_id() -> Result<String> {
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes)
        .map_err(|err| DatasetError::Other(format!("failed to generate random id: {err}")))?;

    let mut id = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(id, "{b:02x}");
    }
    Ok(id)
}
