use crate::error::{DatasetError, Result};
use crate::view::{ArrayView, ContentView, FileView, FolderView, IterationMethod, MAX_SOURCE_BYTES};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A `.json` source can declare itself as a pointer to another file along
/// with the iteration method to apply to it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SourceMetadata {
    #[serde(default)]
    dataset_metadata: bool,
    #[serde(default)]
    file: String,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    splitter: String,
}

/// Present pre-existing content under `base` as a read-only view, without
/// copying it. `id` names a directory or file relative to `base`.
///
/// Strategy selection, in priority order:
/// 1. a directory becomes a folder view over every file beneath it;
/// 2. a file over 100 MiB is rejected outright;
/// 3. a `.json` file whose top-level object carries a `data` array becomes
///    an array view over that array;
/// 4. a `.json` file parsing as a metadata record (`datasetMetadata: true`)
///    resolves its `file` pointer and applies the declared method;
/// 5. anything else is a line view over the file's normalized content.
pub async fn parse_source(id: &str, base: &Path) -> Result<ContentView> {
    let path = base.join(id);
    let info = tokio::fs::metadata(&path).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            DatasetError::NotFound(format!("source {id}"))
        } else {
            DatasetError::Io(err)
        }
    })?;

    if info.is_dir() {
        return parse_dir(id, &path);
    }
    if info.len() > MAX_SOURCE_BYTES {
        return Err(DatasetError::SizeExceeded(format!("source {id}")));
    }

    let contents = tokio::fs::read(&path).await?;

    if id.ends_with(".json") {
        if let Ok(value) = serde_json::from_slice::<Value>(&contents) {
            if let Some(data) = value.get("data").and_then(Value::as_array) {
                return Ok(ContentView::Array(ArrayView::new(id, data.clone())));
            }

            if value.get("datasetMetadata").and_then(Value::as_bool) == Some(true) {
                // A malformed record falls through to the generic path.
                if let Ok(meta) = serde_json::from_value::<SourceMetadata>(value) {
                    if meta.dataset_metadata {
                        return parse_meta(id, base, meta).await;
                    }
                }
            }
        }
    }

    Ok(ContentView::File(FileView::new(
        id,
        IterationMethod::Line,
        "",
        normalize_line_endings(&contents),
    )))
}

async fn parse_meta(id: &str, base: &Path, meta: SourceMetadata) -> Result<ContentView> {
    let method = match meta.method.as_deref() {
        None | Some("") => IterationMethod::Line,
        Some(raw) => IterationMethod::parse(raw)?,
    };

    let file = PathBuf::from(&meta.file);
    let path = if file.is_absolute() { file } else { base.join(file) };

    let info = tokio::fs::metadata(&path).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            DatasetError::NotFound(format!("file for source {id}"))
        } else {
            DatasetError::Io(err)
        }
    })?;
    if info.is_dir() {
        return Err(DatasetError::Validation(format!(
            "file source {id} points to a directory"
        )));
    }

    let contents = tokio::fs::read(&path).await?;
    Ok(ContentView::File(FileView::new(
        id,
        method,
        meta.splitter,
        normalize_line_endings(&contents),
    )))
}

/// Flatten the tree below `path` into one ordered file sequence:
/// depth-first, entries sorted by name at each level, directories recursed
/// in place.
fn parse_dir(id: &str, path: &Path) -> Result<ContentView> {
    let mut files = Vec::new();
    for entry in WalkDir::new(path).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            DatasetError::Io(err.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "walk error")
            }))
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(ContentView::Folder(FolderView::new(id, files)))
}

fn normalize_line_endings(contents: &[u8]) -> String {
    String::from_utf8_lossy(contents).replace("\r\n", "\n")
}
