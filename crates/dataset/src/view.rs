use crate::error::{DatasetError, Result};
use serde_json::Value;
use std::path::PathBuf;

/// Ceiling on how many content bytes a single source file, or one `range`
/// call over a folder view, may load.
pub const MAX_SOURCE_BYTES: u64 = 100 * 1024 * 1024; // 100 MiB

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Array,
    File,
    Folder,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Array => "array",
            ViewKind::File => "file",
            ViewKind::Folder => "folder",
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a file view decomposes its content into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterationMethod {
    #[default]
    Line,
    Split,
    Whole,
}

impl IterationMethod {
    /// Parse a declared method name. Unrecognized names are a validation
    /// failure, not a silent default; absence of a declaration defaults to
    /// `Line` at the call site.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "line" => Ok(IterationMethod::Line),
            "split" => Ok(IterationMethod::Split),
            "whole" => Ok(IterationMethod::Whole),
            other => Err(DatasetError::Validation(format!(
                "unrecognized iteration method: {other}"
            ))),
        }
    }
}

/// A read-only, lazily evaluated view over pre-existing content. Closed set
/// of strategies behind one `kind`/`len`/`nth`/`range` surface; the record
/// sequence is a pure function of the strategy and the raw content.
#[derive(Debug)]
pub enum ContentView {
    File(FileView),
    Array(ArrayView),
    Folder(FolderView),
}

impl ContentView {
    pub fn id(&self) -> &str {
        match self {
            ContentView::File(v) => &v.id,
            ContentView::Array(v) => &v.id,
            ContentView::Folder(v) => &v.id,
        }
    }

    pub fn kind(&self) -> ViewKind {
        match self {
            ContentView::File(_) => ViewKind::File,
            ContentView::Array(_) => ViewKind::Array,
            ContentView::Folder(_) => ViewKind::Folder,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ContentView::File(v) => v.len(),
            ContentView::Array(v) => v.data.len(),
            ContentView::Folder(v) => v.files.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record `index`, materialized on demand.
    pub async fn nth(&self, index: usize) -> Result<String> {
        if index >= self.len() {
            return Err(DatasetError::InvalidRange(format!(
                "index {index} out of bounds for {} records",
                self.len()
            )));
        }
        match self {
            ContentView::File(v) => v.nth(index),
            ContentView::Array(v) => v.nth(index),
            ContentView::Folder(v) => v.nth(index).await,
        }
    }

    /// Records `start..=end`, in order.
    pub async fn range(&self, start: usize, end: usize) -> Result<Vec<String>> {
        if start > end {
            return Err(DatasetError::InvalidRange(format!(
                "start {start} is after end {end}"
            )));
        }
        if end >= self.len() {
            return Err(DatasetError::InvalidRange(format!(
                "end {end} out of bounds for {} records",
                self.len()
            )));
        }
        match self {
            ContentView::File(v) => Ok(v.range(start, end)),
            ContentView::Array(v) => v.range(start, end),
            ContentView::Folder(v) => v.range(start, end).await,
        }
    }
}

/// Line/split/whole decomposition of one file's normalized content.
#[derive(Debug)]
pub struct FileView {
    pub(crate) id: String,
    pub(crate) method: IterationMethod,
    pub(crate) splitter: String,
    pub(crate) contents: String,
}

impl FileView {
    pub(crate) fn new(
        id: impl Into<String>,
        method: IterationMethod,
        splitter: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            method,
            splitter: splitter.into(),
            contents: contents.into(),
        }
    }

    /// The record sequence. A trailing delimiter yields a trailing empty
    /// record; `Whole` is a single record equal to the entire content.
    fn segments(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self.method {
            IterationMethod::Line => Box::new(self.contents.split('\n')),
            IterationMethod::Split => Box::new(self.contents.split(self.splitter.as_str())),
            IterationMethod::Whole => Box::new(std::iter::once(self.contents.as_str())),
        }
    }

    fn len(&self) -> usize {
        self.segments().count()
    }

    fn nth(&self, index: usize) -> Result<String> {
        self.segments()
            .nth(index)
            .map(str::to_string)
            .ok_or_else(|| DatasetError::InvalidRange(format!("no record at index {index}")))
    }

    fn range(&self, start: usize, end: usize) -> Vec<String> {
        self.segments()
            .skip(start)
            .take(end - start + 1)
            .map(str::to_string)
            .collect()
    }
}

/// View over a pre-parsed JSON array; each record is the canonical
/// serialization of one value.
#[derive(Debug)]
pub struct ArrayView {
    pub(crate) id: String,
    pub(crate) data: Vec<Value>,
}

impl ArrayView {
    pub(crate) fn new(id: impl Into<String>, data: Vec<Value>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    fn nth(&self, index: usize) -> Result<String> {
        Ok(serde_json::to_string(&self.data[index])?)
    }

    fn range(&self, start: usize, end: usize) -> Result<Vec<String>> {
        self.data[start..=end]
            .iter()
            .map(|value| Ok(serde_json::to_string(value)?))
            .collect()
    }
}

/// View over a flattened directory tree; each record is the full contents
/// of one file, read on demand.
#[derive(Debug)]
pub struct FolderView {
    pub(crate) id: String,
    pub(crate) files: Vec<PathBuf>,
}

impl FolderView {
    pub(crate) fn new(id: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Self {
            id: id.into(),
            files,
        }
    }

    async fn nth(&self, index: usize) -> Result<String> {
        let bytes = tokio::fs::read(&self.files[index]).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads are capped in aggregate: one range call may not load more
    /// than [`MAX_SOURCE_BYTES`] across all of its files.
    async fn range(&self, start: usize, end: usize) -> Result<Vec<String>> {
        let mut total: u64 = 0;
        let mut records = Vec::with_capacity(end - start + 1);
        for file in &self.files[start..=end] {
            let bytes = tokio::fs::read(file).await?;
            total += bytes.len() as u64;
            if total > MAX_SOURCE_BYTES {
                return Err(DatasetError::SizeExceeded(format!("folder range of {}", self.id)));
            }
            records.push(String::from_utf8_lossy(&bytes).into_owned());
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn line_view(contents: &str) -> ContentView {
        ContentView::File(FileView::new("test", IterationMethod::Line, "", contents))
    }

    #[tokio::test]
    async fn line_view_splits_on_newlines() {
        let view = line_view("a\nb\nc");
        assert_eq!(view.kind().as_str(), "file");
        assert_eq!(view.len(), 3);
        assert_eq!(view.nth(0).await.expect("nth"), "a");
        assert_eq!(view.range(1, 2).await.expect("range"), vec!["b", "c"]);
    }

    #[tokio::test]
    async fn trailing_newline_yields_trailing_empty_record() {
        let view = line_view("a\n");
        assert_eq!(view.len(), 2);
        assert_eq!(view.nth(1).await.expect("nth"), "");
    }

    #[tokio::test]
    async fn split_view_uses_caller_delimiter() {
        let view = ContentView::File(FileView::new(
            "test",
            IterationMethod::Split,
            "---",
            "one---two---three",
        ));
        assert_eq!(view.len(), 3);
        assert_eq!(view.nth(2).await.expect("nth"), "three");
    }

    #[tokio::test]
    async fn whole_view_is_a_single_record() {
        let view = ContentView::File(FileView::new(
            "test",
            IterationMethod::Whole,
            "",
            "a\nb\nc",
        ));
        assert_eq!(view.len(), 1);
        assert_eq!(view.nth(0).await.expect("nth"), "a\nb\nc");

        let err = view.nth(1).await.unwrap_err();
        assert!(matches!(err, DatasetError::InvalidRange(_)));
    }

    #[tokio::test]
    async fn array_view_renders_canonical_json() {
        let view = ContentView::Array(ArrayView::new(
            "test",
            vec![json!("one"), json!(["three"]), json!({"four": true}), json!(6)],
        ));
        assert_eq!(view.kind().as_str(), "array");
        assert_eq!(view.nth(0).await.expect("nth"), "\"one\"");
        assert_eq!(
            view.range(1, 3).await.expect("range"),
            vec![r#"["three"]"#, r#"{"four":true}"#, "6"]
        );
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        let view = line_view("a\nb\nc");
        let err = view.range(2, 1).await.unwrap_err();
        assert!(matches!(err, DatasetError::InvalidRange(_)));
    }

    #[tokio::test]
    async fn out_of_bounds_is_rejected() {
        let view = line_view("a\nb\nc");
        assert!(view.nth(3).await.is_err());
        assert!(view.range(0, 3).await.is_err());
    }

    #[test]
    fn unrecognized_method_is_a_validation_error() {
        let err = IterationMethod::parse("chunk").unwrap_err();
        assert!(matches!(err, DatasetError::Validation(_)));
    }
}
