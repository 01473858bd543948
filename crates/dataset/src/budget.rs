use crate::catalog::Catalog;
use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write as _;

/// Default ceiling, in content bytes, on how much element data one render
/// pass may emit before truncating.
pub const DEFAULT_CONTENT_BUDGET: i64 = 30_000;

/// A dataset reference embedded in prose: `ds://` plus a catalog id.
static DATASET_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ds://[0-9a-f]{32}").expect("valid dataset ref pattern"));

/// Extract dataset ids referenced in `text`, first-appearance order,
/// duplicates collapsed.
pub fn find_dataset_refs(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for found in DATASET_REF.find_iter(text) {
        let id = found.as_str().trim_start_matches("ds://").to_string();
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }
    ids
}

#[derive(Debug, Serialize)]
struct DumpItem {
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    contents: String,
}

#[derive(Debug, Serialize)]
struct DatasetDump {
    id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    length: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    items: Vec<DumpItem>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    truncated: bool,
}

/// Render every dataset referenced in `text` with the default budget.
pub async fn render_dataset_refs(catalog: &Catalog, text: &str) -> Result<String> {
    render_dataset_refs_with_budget(catalog, text, DEFAULT_CONTENT_BUDGET).await
}

/// Walk the dataset references in `text` and serialize each dataset's
/// elements in index order, spending `budget` as content is admitted.
///
/// The budget is shared across the whole pass. An element whose content
/// would push the running budget negative is dropped along with the rest
/// of its dataset: the dataset's summary is emitted with `truncated` set,
/// a notice names how many items were withheld, and the walk moves on to
/// the next reference. Truncated datasets are never resumed, and later
/// references still get their own attempt against whatever budget remains.
pub async fn render_dataset_refs_with_budget(
    catalog: &Catalog,
    text: &str,
    budget: i64,
) -> Result<String> {
    let mut remaining = budget;
    let mut out = String::new();

    'refs: for id in find_dataset_refs(text) {
        let dataset = catalog.get_dataset(&id).await?;
        let elements = dataset.elements_by_index();

        let mut dump = DatasetDump {
            id: dataset.id().to_string(),
            name: dataset.name().to_string(),
            description: dataset.description().to_string(),
            length: elements.len(),
            items: Vec::new(),
            truncated: false,
        };

        for element in &elements {
            let (content, _) = dataset.get_element(&element.meta.name).await?;
            remaining -= content.len() as i64;
            if remaining < 0 {
                dump.truncated = true;
                out.push_str(&serde_json::to_string(&dump)?);
                out.push('\n');
                let _ = write!(
                    out,
                    "\nDataset {} truncated, {} of {} items not returned\n",
                    id,
                    elements.len() - dump.items.len(),
                    elements.len()
                );
                log::debug!("dataset {id} truncated with budget exhausted");
                continue 'refs;
            }
            dump.items.push(DumpItem {
                name: element.meta.name.clone(),
                description: element.meta.description.clone(),
                contents: content.into_display_string(),
            });
        }

        out.push_str(&serde_json::to_string(&dump)?);
        out.push('\n');
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_refs_in_first_appearance_order() {
        let a = "a".repeat(32);
        let b = "b".repeat(32);
        let text = format!("see ds://{b} and ds://{a}, also ds://{b} again");
        assert_eq!(find_dataset_refs(&text), vec![b, a]);
    }

    #[test]
    fn ignores_malformed_refs() {
        assert!(find_dataset_refs("ds://short ds://UPPERCASE").is_empty());
        assert!(find_dataset_refs("no references here").is_empty());
    }
}
