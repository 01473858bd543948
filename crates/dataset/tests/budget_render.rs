use dataset_core::{
    render_dataset_refs, render_dataset_refs_with_budget, Catalog, DatasetError,
};
use dataset_workspace::FsWorkspace;
use std::sync::Arc;
use tempfile::TempDir;

fn catalog_in(temp: &TempDir) -> Catalog {
    Catalog::new(Arc::new(FsWorkspace::new(temp.path())))
}

async fn seed_dataset(catalog: &Catalog, name: &str, sizes: &[usize]) -> String {
    let mut dataset = catalog.new_dataset(name, "").await.expect("new dataset");
    for (i, size) in sizes.iter().enumerate() {
        dataset
            .add_element(&format!("item{i}"), "", "x".repeat(*size).into())
            .await
            .expect("add element");
    }
    dataset.id().to_string()
}

#[tokio::test]
async fn under_budget_dataset_is_emitted_whole() {
    let temp = TempDir::new().expect("tempdir");
    let catalog = catalog_in(&temp);
    let id = seed_dataset(&catalog, "small", &[100, 100]).await;

    let out = render_dataset_refs(&catalog, &format!("result: ds://{id}"))
        .await
        .expect("render");

    assert!(out.contains(&format!(r#""id":"{id}""#)), "out: {out}");
    assert!(out.contains(r#""name":"item0""#));
    assert!(out.contains(r#""name":"item1""#));
    assert!(out.contains(r#""length":2"#));
    assert!(!out.contains("truncated"));
}

#[tokio::test]
async fn over_budget_dataset_truncates_and_walk_continues() {
    let temp = TempDir::new().expect("tempdir");
    let catalog = catalog_in(&temp);
    // 4 elements of 10,000 bytes: the first three land exactly on the
    // budget, the fourth pushes it negative.
    let first = seed_dataset(&catalog, "big", &[10_000, 10_000, 10_000, 10_000]).await;
    let second = seed_dataset(&catalog, "after", &[10]).await;

    let text = format!("ds://{first} then ds://{second}");
    let out = render_dataset_refs_with_budget(&catalog, &text, 30_000)
        .await
        .expect("render");

    assert!(out.contains(r#""name":"item2""#), "third item admitted: {out}");
    assert!(!out.contains(r#""name":"item3""#), "fourth item dropped: {out}");
    assert!(out.contains(r#""truncated":true"#));
    assert!(
        out.contains(&format!("Dataset {first} truncated, 1 of 4 items not returned")),
        "out: {out}"
    );

    // The second dataset still gets its own attempt, against a budget that
    // is already exhausted, so it truncates immediately.
    assert!(out.contains(&format!(r#""id":"{second}""#)));
    assert!(
        out.contains(&format!("Dataset {second} truncated, 1 of 1 items not returned")),
        "out: {out}"
    );
}

#[tokio::test]
async fn duplicate_refs_are_rendered_once() {
    let temp = TempDir::new().expect("tempdir");
    let catalog = catalog_in(&temp);
    let id = seed_dataset(&catalog, "once", &[10]).await;

    let out = render_dataset_refs(&catalog, &format!("ds://{id} and again ds://{id}"))
        .await
        .expect("render");

    assert_eq!(out.matches(&format!(r#""id":"{id}""#)).count(), 1, "out: {out}");
}

#[tokio::test]
async fn unknown_ref_fails_with_not_found() {
    let temp = TempDir::new().expect("tempdir");
    let catalog = catalog_in(&temp);

    let text = format!("ds://{}", "0".repeat(32));
    let err = render_dataset_refs(&catalog, &text).await.unwrap_err();
    assert!(matches!(err, DatasetError::NotFound(_)), "got: {err}");
}

#[tokio::test]
async fn text_without_refs_renders_nothing() {
    let temp = TempDir::new().expect("tempdir");
    let catalog = catalog_in(&temp);

    let out = render_dataset_refs(&catalog, "no references here")
        .await
        .expect("render");
    assert!(out.is_empty());
}
