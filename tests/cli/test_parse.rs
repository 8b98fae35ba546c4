// Argument parsing tests

use clap::Parser;
use docmind::cli::{Cli, Commands, OutputFormat};

#[test]
fn test_parse_ingest_defaults() {
    let cli = Cli::try_parse_from(["docmind", "ingest"]).unwrap();
    assert_eq!(cli.format, OutputFormat::Human);
    match cli.command {
        Commands::Ingest(args) => {
            assert!(args.source.is_none());
            assert!(args.index.is_none());
            assert!(!args.quiet);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_ingest_with_paths() {
    let cli =
        Cli::try_parse_from(["docmind", "ingest", "-s", "docs", "--index", "out", "-q"]).unwrap();
    match cli.command {
        Commands::Ingest(args) => {
            assert_eq!(args.source.unwrap().to_str(), Some("docs"));
            assert_eq!(args.index.unwrap().to_str(), Some("out"));
            assert!(args.quiet);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_ask_with_k_and_json() {
    let cli =
        Cli::try_parse_from(["docmind", "ask", "what is covered?", "-k", "5", "--format", "json"])
            .unwrap();
    assert_eq!(cli.format, OutputFormat::Json);
    match cli.command {
        Commands::Ask(args) => {
            assert_eq!(args.query, "what is covered?");
            assert_eq!(args.k, Some(5));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_ask_requires_query() {
    assert!(Cli::try_parse_from(["docmind", "ask"]).is_err());
}

#[test]
fn test_parse_index_commands() {
    assert!(matches!(
        Cli::try_parse_from(["docmind", "index-info"]).unwrap().command,
        Commands::IndexInfo(_)
    ));
    match Cli::try_parse_from(["docmind", "delete-index", "--yes"]).unwrap().command {
        Commands::DeleteIndex(args) => assert!(args.yes),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_show_config_and_completions() {
    match Cli::try_parse_from(["docmind", "show-config", "--all"]).unwrap().command {
        Commands::ShowConfig(args) => assert!(args.all),
        other => panic!("unexpected command {other:?}"),
    }
    assert!(matches!(
        Cli::try_parse_from(["docmind", "completions", "bash"]).unwrap().command,
        Commands::Completions(_)
    ));
    assert!(Cli::try_parse_from(["docmind", "completions", "tcsh"]).is_err());
}

#[test]
fn test_unknown_format_is_rejected() {
    assert!(Cli::try_parse_from(["docmind", "--format", "yaml", "index-info"]).is_err());
}
