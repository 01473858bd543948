use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use dataset_core::Catalog;
use dataset_workspace::FsWorkspace;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::env;
use std::io::Read as _;
use std::sync::Arc;

const WORKSPACE_DIR_ENV: &str = "DATASETS_WORKSPACE_DIR";

pub fn catalog_from_env() -> Result<Catalog> {
    let root = required_env(WORKSPACE_DIR_ENV)?;
    Ok(Catalog::new(Arc::new(FsWorkspace::new(root))))
}

fn required_env(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .with_context(|| format!("{name} is not set"))
}

fn optional_env(name: &str) -> String {
    env::var(name).unwrap_or_default()
}

/// The element shape the commands read and print: contents inline, binary
/// contents rendered as base64.
#[derive(Debug, Serialize, Deserialize)]
struct ElementPayload {
    name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,
    #[serde(default)]
    contents: String,
}

pub async fn list_datasets(catalog: &Catalog) -> Result<()> {
    let datasets = catalog.list_datasets().await?;
    println!("{}", serde_json::to_string(&datasets)?);
    Ok(())
}

pub async fn list_elements(catalog: &Catalog) -> Result<()> {
    let dataset = catalog.get_dataset(&required_env("DATASET_ID")?).await?;
    println!("{}", serde_json::to_string(&dataset.list_elements())?);
    Ok(())
}

pub async fn get_element(catalog: &Catalog) -> Result<()> {
    let dataset = catalog.get_dataset(&required_env("DATASET_ID")?).await?;
    let (content, element) = dataset.get_element(&required_env("ELEMENT")?).await?;

    let payload = ElementPayload {
        name: element.meta.name,
        description: element.meta.description,
        contents: content.into_display_string(),
    };
    println!("{}", serde_json::to_string(&payload)?);
    Ok(())
}

pub async fn create_dataset(catalog: &Catalog) -> Result<()> {
    let dataset = catalog
        .new_dataset(
            &optional_env("DATASET_NAME"),
            &optional_env("DATASET_DESCRIPTION"),
        )
        .await?;
    println!("{}", serde_json::to_string(&dataset)?);
    Ok(())
}

pub async fn add_element(catalog: &Catalog) -> Result<()> {
    let mut dataset = catalog.get_dataset(&required_env("DATASET_ID")?).await?;
    let element = dataset
        .add_element(
            &required_env("ELEMENT_NAME")?,
            &optional_env("ELEMENT_DESCRIPTION"),
            optional_env("ELEMENT_CONTENT").into(),
        )
        .await?;
    println!("{}", serde_json::to_string(&element.meta)?);
    Ok(())
}

pub async fn add_elements(catalog: &Catalog) -> Result<()> {
    let raw = required_env("ELEMENTS")?;
    let inflated = inflate_envelope(&raw)?;
    let payloads: Vec<ElementPayload> =
        serde_json::from_str(&inflated).context("failed to parse ELEMENTS")?;

    let mut dataset = catalog.get_dataset(&required_env("DATASET_ID")?).await?;
    for payload in payloads {
        dataset
            .add_element(&payload.name, &payload.description, payload.contents.into())
            .await?;
    }
    println!("elements added successfully");
    Ok(())
}

pub async fn get_all_elements(catalog: &Catalog) -> Result<()> {
    let dataset = catalog.get_dataset(&required_env("DATASET_ID")?).await?;

    let mut payloads = Vec::with_capacity(dataset.len());
    for meta in dataset.list_elements() {
        let (content, element) = dataset.get_element(&meta.name).await?;
        payloads.push(ElementPayload {
            name: element.meta.name,
            description: element.meta.description,
            contents: content.into_display_string(),
        });
    }
    println!("{}", serde_json::to_string(&payloads)?);
    Ok(())
}

#[derive(Deserialize)]
struct GzEnvelope {
    #[serde(rename = "_gz")]
    content: String,
}

/// Large batch payloads may arrive as `{"_gz": "<base64 gzip>"}`. Anything
/// that does not parse as that envelope is passed through untouched.
fn inflate_envelope(raw: &str) -> Result<String> {
    let Ok(envelope) = serde_json::from_str::<GzEnvelope>(raw) else {
        return Ok(raw.to_string());
    };

    let compressed = BASE64
        .decode(envelope.content)
        .context("invalid base64 in _gz envelope")?;
    let mut inflated = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut inflated)
        .context("failed to decompress _gz envelope")?;
    Ok(inflated)
}
