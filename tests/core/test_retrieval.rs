// Retrieval and answer pipeline integration tests

use crate::common::{
    create_test_services, ingest, scenario_documents, EchoSynthesizer, FailingSynthesizer,
    KeywordEmbedder,
};
use docmind::core::answer::AnswerPipeline;
use docmind::core::storage::{Metric, VectorIndex, VectorSearch};
use docmind::core::types::Chunk;
use std::sync::Arc;
use tempfile::TempDir;

fn chunk(name: &str) -> Chunk {
    Chunk {
        text: format!("text of {name}"),
        document_id: name.to_string(),
        page: 1,
        chunk_index: 0,
        start_offset: 0,
        overlap: 0,
    }
}

fn line_index(points: &[f32]) -> VectorIndex {
    let mut index = VectorIndex::new(Metric::L2);
    for (i, x) in points.iter().enumerate() {
        index.insert(vec![*x, 0.0], chunk(&format!("p{i}"))).unwrap();
    }
    index
}

#[test]
fn test_top_three_nearest_first() {
    let index = line_index(&[0.0, 1.0, 2.0, 3.0, 5.0]);

    let hits = index.query(&[2.2, 0.0], 3).unwrap();
    let ids: Vec<u64> = hits.iter().map(|h| h.id).collect();

    assert_eq!(ids, vec![2, 3, 1]);
    assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
}

#[test]
fn test_equal_distances_break_by_id() {
    // 1.0 and 3.0 are both 1.0 away from 2.0, as are 0.0 and 4.0 at 2.0
    let index = line_index(&[3.0, 4.0, 1.0, 0.0]);

    let hits = index.query(&[2.0, 0.0], 4).unwrap();
    let ids: Vec<u64> = hits.iter().map(|h| h.id).collect();

    assert_eq!(ids, vec![0, 2, 1, 3]);
}

#[test]
fn test_k_larger_than_index_returns_all() {
    let index = line_index(&[0.0, 1.0]);
    assert_eq!(index.query(&[0.0, 0.0], 10).unwrap().len(), 2);
}

#[test]
fn test_query_dimension_mismatch_is_rejected() {
    let index = line_index(&[0.0, 1.0]);
    assert!(index.query(&[0.0, 0.0, 0.0], 1).is_err());
}

#[test]
fn test_cosine_ignores_magnitude() {
    let mut index = VectorIndex::new(Metric::Cosine);
    index.insert(vec![10.0, 0.0], chunk("x")).unwrap();
    index.insert(vec![1.0, 1.0], chunk("diag")).unwrap();

    let hits = index.query(&[0.1, 0.0], 2).unwrap();
    assert_eq!(hits[0].chunk.document_id, "x");
}

#[tokio::test]
async fn test_answer_cites_sources_in_rank_order() {
    let temp = TempDir::new().unwrap();
    let synthesizer = Arc::new(EchoSynthesizer::new());
    let services = create_test_services(
        temp.path(),
        Arc::new(KeywordEmbedder::new()),
        synthesizer.clone(),
    );
    ingest(&services, &scenario_documents()).await;
    assert!(services.load_index());

    let answer = services.answer.answer("gamma").await.unwrap();

    assert_eq!(answer.answer, "answer to: gamma");
    assert_eq!(answer.sources.len(), 3);
    assert_eq!(answer.sources[0].page, 2);
    for source in &answer.sources {
        assert!(source.content.ends_with("..."));
        assert_eq!(source.content.chars().count(), 203);
    }

    // Best chunk leads the context
    let context = synthesizer.last_context().unwrap();
    assert!(context.starts_with(&answer.sources[0].content[..200]));
}

#[tokio::test]
async fn test_answer_with_k_limits_sources() {
    let temp = TempDir::new().unwrap();
    let services = create_test_services(
        temp.path(),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(EchoSynthesizer::new()),
    );
    ingest(&services, &scenario_documents()).await;
    services.load_index();

    let answer = services.answer.answer_with_k("alpha", 1).await.unwrap();
    assert_eq!(answer.sources.len(), 1);
    assert_eq!(answer.sources[0].page, 1);

    let err = services.answer.answer_with_k("alpha", 0).await.unwrap_err();
    assert!(err.is_bad_request());
}

#[tokio::test]
async fn test_answer_without_index_is_unavailable() {
    let temp = TempDir::new().unwrap();
    let embedder = Arc::new(KeywordEmbedder::new());
    let services = create_test_services(
        temp.path(),
        embedder.clone(),
        Arc::new(EchoSynthesizer::new()),
    );

    assert!(!services.load_index());
    let err = services.answer.answer("anything").await.unwrap_err();

    assert!(err.is_unavailable());
    // Rejected before any model call
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn test_empty_query_is_rejected() {
    let temp = TempDir::new().unwrap();
    let services = create_test_services(
        temp.path(),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(EchoSynthesizer::new()),
    );

    let err = services.answer.answer("   ").await.unwrap_err();
    assert!(err.is_bad_request());
}

#[tokio::test]
async fn test_synthesis_failure_is_upstream_error() {
    let temp = TempDir::new().unwrap();
    let services = create_test_services(
        temp.path(),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(FailingSynthesizer),
    );
    ingest(&services, &scenario_documents()).await;
    services.load_index();

    let err = services.answer.answer("beta").await.unwrap_err();
    assert!(err.is_upstream());
    assert!(err.to_string().contains("synthesis"));
}

#[tokio::test]
async fn test_pipeline_shares_handle_with_services() {
    let temp = TempDir::new().unwrap();
    let services = create_test_services(
        temp.path(),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(EchoSynthesizer::new()),
    );
    let pipeline: &AnswerPipeline = &services.answer;

    assert!(!pipeline.index().is_loaded());
    ingest(&services, &scenario_documents()).await;
    services.load_index();
    assert!(pipeline.index().is_loaded());
    assert_eq!(pipeline.index().get().map(|i| i.len()), Some(3));
}
