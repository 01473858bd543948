use crate::catalog::{DATASET_FOLDER, DATASET_META_FOLDER};
use crate::error::{DatasetError, Result};
use crate::names;
use crate::types::{DatasetMeta, Element, ElementContent, ElementMeta};
use dataset_workspace::Workspace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// The persisted shape of a dataset: its metadata header plus the element
/// map, written as one JSON record at `datasets/meta/<id>`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct DatasetRecord {
    #[serde(flatten)]
    pub meta: DatasetMeta,
    pub elements: HashMap<String, Element>,
}

/// An ordered, append-only collection of named elements. Element contents
/// live as separate blobs under `datasets/<id>/`; the record itself only
/// carries metadata and blob keys.
///
/// A `Dataset` handle is a fresh deserialization of the persisted record;
/// two handles for the same id do not observe each other's mutations.
pub struct Dataset {
    record: DatasetRecord,
    workspace: Arc<dyn Workspace>,
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

impl Dataset {
    pub(crate) fn new(meta: DatasetMeta, workspace: Arc<dyn Workspace>) -> Self {
        Self {
            record: DatasetRecord {
                meta,
                elements: HashMap::new(),
            },
            workspace,
        }
    }

    pub(crate) fn from_record(record: DatasetRecord, workspace: Arc<dyn Workspace>) -> Self {
        Self { record, workspace }
    }

    pub fn id(&self) -> &str {
        &self.record.meta.id
    }

    pub fn name(&self) -> &str {
        &self.record.meta.name
    }

    pub fn description(&self) -> &str {
        &self.record.meta.description
    }

    pub fn meta(&self) -> &DatasetMeta {
        &self.record.meta
    }

    pub fn len(&self) -> usize {
        self.record.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.elements.is_empty()
    }

    /// Element metadata in insertion order (ascending `index`).
    pub fn list_elements(&self) -> Vec<ElementMeta> {
        self.elements_by_index()
            .into_iter()
            .map(|e| e.meta.clone())
            .collect()
    }

    /// Full element records in insertion order.
    pub fn elements_by_index(&self) -> Vec<&Element> {
        let mut elements: Vec<&Element> = self.record.elements.values().collect();
        elements.sort_by_key(|e| e.index);
        elements
    }

    /// Read one element's content and record by name.
    pub async fn get_element(&self, name: &str) -> Result<(ElementContent, Element)> {
        let element = self
            .record
            .elements
            .get(name)
            .ok_or_else(|| DatasetError::NotFound(format!("element {name}")))?;

        let bytes = self.workspace.read(&element.file).await.map_err(|err| {
            if err.is_not_found() {
                DatasetError::NotFound(format!("content for element {name}"))
            } else {
                err.into()
            }
        })?;

        let content = if element.binary {
            ElementContent::Binary(bytes)
        } else {
            ElementContent::Text(String::from_utf8_lossy(&bytes).into_owned())
        };
        Ok((content, element.clone()))
    }

    /// Append a new element. Fails with [`DatasetError::DuplicateName`] if
    /// the name is already present, leaving the dataset untouched. On
    /// success the content blob is written, the element gets
    /// `index == len()` at the time of insertion, and the record is saved.
    pub async fn add_element(
        &mut self,
        name: &str,
        description: &str,
        content: ElementContent,
    ) -> Result<Element> {
        if self.record.elements.contains_key(name) {
            return Err(DatasetError::DuplicateName(name.to_string()));
        }

        let file = self.unique_content_key(&names::to_file_name(name)).await?;
        self.workspace
            .write(&file, content.as_bytes())
            .await
            .map_err(DatasetError::from)?;

        let element = Element {
            meta: ElementMeta {
                name: name.to_string(),
                description: description.to_string(),
            },
            index: self.record.elements.len(),
            file,
            binary: content.is_binary(),
        };

        log::debug!(
            "dataset {}: added element {} at index {}",
            self.id(),
            name,
            element.index
        );
        self.record.elements.insert(name.to_string(), element.clone());
        self.save().await?;
        Ok(element)
    }

    /// Serialize the record and write it to its catalog location.
    pub async fn save(&self) -> Result<()> {
        let record = serde_json::to_vec(&self.record)
            .map_err(|err| DatasetError::Other(format!("failed to serialize dataset: {err}")))?;
        let key = format!("{DATASET_META_FOLDER}/{}", self.id());
        self.workspace
            .write(&key, &record)
            .await
            .map_err(DatasetError::from)
    }

    /// Find a content key under `datasets/<id>/` that no existing blob
    /// occupies. A probe that fails for any reason other than absence
    /// aborts the resolution.
    async fn unique_content_key(&self, file_name: &str) -> Result<String> {
        let dir = format!("{DATASET_FOLDER}/{}", self.id());
        let workspace = &self.workspace;
        let name = names::ensure_unique(
            |candidate| {
                let workspace = Arc::clone(workspace);
                let key = format!("{dir}/{candidate}");
                async move {
                    match workspace.read(&key).await {
                        Ok(_) => Ok(true),
                        Err(err) if err.is_not_found() => Ok(false),
                        Err(err) => Err(err.into()),
                    }
                }
            },
            file_name,
        )
        .await?;
        Ok(format!("{dir}/{name}"))
    }
}

impl Serialize for Dataset {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}
