// Snapshot persistence integration tests

use crate::common::{create_test_services, ingest, scenario_documents, EchoSynthesizer, KeywordEmbedder};
use docmind::core::storage::{
    delete_snapshot, read_meta, snapshot_exists, IndexHandle, Metric, VectorIndex, VectorSearch,
};
use docmind::core::DocMindError;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_loaded_index_answers_like_the_original() {
    let temp = TempDir::new().unwrap();
    let embedder = Arc::new(KeywordEmbedder::new());
    let services = create_test_services(
        temp.path(),
        embedder.clone(),
        Arc::new(EchoSynthesizer::new()),
    );
    ingest(&services, &scenario_documents()).await;
    let path = &services.config.index.path;

    let loaded = VectorIndex::load(path).unwrap();
    let mut rebuilt = VectorIndex::new(Metric::L2);
    for entry in loaded.entries() {
        rebuilt
            .insert(embedder.vector_for(&entry.chunk.text), entry.chunk.clone())
            .unwrap();
    }

    for text in ["alpha", "beta", "gamma", "delta words"] {
        let v = embedder.vector_for(text);
        assert_eq!(
            loaded.query(&v, 3).unwrap(),
            rebuilt.query(&v, 3).unwrap(),
            "results differ for {text}"
        );
    }
}

#[tokio::test]
async fn test_meta_describes_snapshot() {
    let temp = TempDir::new().unwrap();
    let embedder = Arc::new(KeywordEmbedder::new());
    let services = create_test_services(
        temp.path(),
        embedder.clone(),
        Arc::new(EchoSynthesizer::new()),
    );
    ingest(&services, &scenario_documents()).await;

    let meta = read_meta(&services.config.index.path).unwrap();
    assert_eq!(meta.entries, 3);
    assert_eq!(meta.next_id, 3);
    assert_eq!(meta.dimension, Some(embedder.dimension()));
    assert_eq!(meta.metric, Metric::L2);
    assert!(meta.persisted_at >= meta.created_at);
}

#[test]
fn test_missing_snapshot_is_not_found() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nothing-here");

    assert!(!snapshot_exists(&path));
    assert!(matches!(
        VectorIndex::load(&path),
        Err(DocMindError::IndexNotFound(_))
    ));

    let handle = IndexHandle::empty();
    assert!(!handle.load_at_startup(&path));
    assert!(handle.require().err().unwrap().is_unavailable());
}

#[tokio::test]
async fn test_truncated_body_is_corrupt() {
    let temp = TempDir::new().unwrap();
    let services = create_test_services(
        temp.path(),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(EchoSynthesizer::new()),
    );
    ingest(&services, &scenario_documents()).await;
    let path = services.config.index.path.clone();

    let body = std::fs::read_to_string(path.join("index.json")).unwrap();
    std::fs::write(path.join("index.json"), &body[..body.len() / 2]).unwrap();

    assert!(matches!(
        VectorIndex::load(&path),
        Err(DocMindError::IndexCorrupt { .. })
    ));
    assert!(!services.load_index());
    assert!(!services.index.is_loaded());
}

#[tokio::test]
async fn test_delete_snapshot() {
    let temp = TempDir::new().unwrap();
    let services = create_test_services(
        temp.path(),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(EchoSynthesizer::new()),
    );
    ingest(&services, &scenario_documents()).await;
    let path = &services.config.index.path;

    assert!(snapshot_exists(path));
    assert!(delete_snapshot(path).unwrap());
    assert!(!snapshot_exists(path));
    assert!(!delete_snapshot(path).unwrap());
}
