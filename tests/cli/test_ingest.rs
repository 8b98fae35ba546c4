// Ingest command tests

use super::test_helpers::CliEnv;
use crate::common::filler;
use docmind::cli::commands::ingest::{execute, IngestArgs};
use docmind::cli::OutputFormat;
use docmind::core::storage::{snapshot_exists, VectorIndex, VectorSearch};

fn quiet_args() -> IngestArgs {
    IngestArgs {
        source: None,
        index: None,
        quiet: true,
    }
}

#[tokio::test]
async fn test_ingest_creates_missing_source_dir() {
    let env = CliEnv::new("DOCMIND_CLI_KEY_MISSING_DIR", true);
    let source = env.services.config.documents.source_dir.clone();
    assert!(!source.exists());

    execute(quiet_args(), &env.services, OutputFormat::Human)
        .await
        .unwrap();

    assert!(source.is_dir());
    assert!(!snapshot_exists(&env.services.config.index.path));
}

#[tokio::test]
async fn test_ingest_requires_api_key() {
    let env = CliEnv::new("DOCMIND_CLI_KEY_UNSET", false);
    env.add_document("a.txt", "alpha");

    let err = execute(quiet_args(), &env.services, OutputFormat::Human)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("DOCMIND_CLI_KEY_UNSET"));
    assert!(!snapshot_exists(&env.services.config.index.path));
}

#[tokio::test]
async fn test_ingest_empty_folder_is_not_an_error() {
    let env = CliEnv::new("DOCMIND_CLI_KEY_EMPTY", true);
    std::fs::create_dir_all(&env.services.config.documents.source_dir).unwrap();

    execute(quiet_args(), &env.services, OutputFormat::Json)
        .await
        .unwrap();

    assert!(!snapshot_exists(&env.services.config.index.path));
}

#[tokio::test]
async fn test_ingest_writes_index() {
    let env = CliEnv::new("DOCMIND_CLI_KEY_OK", true);
    env.add_document("a.txt", &filler("alpha", 600));
    env.add_document("b.md", &filler("beta", 300));

    execute(quiet_args(), &env.services, OutputFormat::Json)
        .await
        .unwrap();

    let index = VectorIndex::load(&env.services.config.index.path).unwrap();
    assert_eq!(index.len(), 2);
}

#[tokio::test]
async fn test_ingest_to_explicit_index_path() {
    let env = CliEnv::new("DOCMIND_CLI_KEY_PATH", true);
    env.add_document("a.txt", "alpha");
    let target = env.temp.path().join("elsewhere");

    let args = IngestArgs {
        index: Some(target.clone()),
        ..quiet_args()
    };
    execute(args, &env.services, OutputFormat::Human)
        .await
        .unwrap();

    assert!(snapshot_exists(&target));
    assert!(!snapshot_exists(&env.services.config.index.path));
}

#[tokio::test]
async fn test_ingest_abort_is_an_error_with_partial_index() {
    let env = CliEnv::poisoned("DOCMIND_CLI_KEY_ABORT");
    env.add_document("1.txt", "alpha ok");
    env.add_document("2.txt", "POISON");

    let err = execute(quiet_args(), &env.services, OutputFormat::Human)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("2.txt#0"));
    let index = VectorIndex::load(&env.services.config.index.path).unwrap();
    assert_eq!(index.len(), 1);
}
