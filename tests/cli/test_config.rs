// show-config command tests

use super::test_helpers::CliEnv;
use docmind::cli::commands::config::{self, ConfigArgs};
use docmind::cli::OutputFormat;
use docmind::core::config::{BackoffKind, Config};

#[tokio::test]
async fn test_show_config() {
    let env = CliEnv::new("DOCMIND_CLI_KEY_CONFIG", true);

    for all in [false, true] {
        for format in [OutputFormat::Human, OutputFormat::Json] {
            config::execute(ConfigArgs { all }, &env.services, format)
                .await
                .unwrap();
        }
    }
}

#[test]
fn test_full_config_output_is_a_valid_config_file() {
    let env = CliEnv::new("DOCMIND_CLI_KEY_CONFIG_TOML", true);
    let mut edited = (*env.services.config).clone();
    edited.embedding.backoff = BackoffKind::Fixed;
    edited.chunking.chunk_size = 640;

    // Same serialization `show-config --all` prints
    let text = toml::to_string_pretty(&edited).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();

    assert_eq!(parsed.embedding.backoff, BackoffKind::Fixed);
    assert_eq!(parsed.chunking.chunk_size, 640);
    assert_eq!(parsed.index.path, env.services.config.index.path);
    assert_eq!(
        parsed.documents.include_patterns,
        vec!["*.txt", "*.md", "*.pdf"]
    );
}
