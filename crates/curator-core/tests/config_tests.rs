use std::path::PathBuf;

use curator_core::config::{
    ConfigError, LLMConfig, DEFAULT_ANTHROPIC_MODEL, DEFAULT_BATCH_SIZE, DEFAULT_CACHE_FILE,
    DEFAULT_DATA_DIR, DEFAULT_GEMINI_MODEL, DEFAULT_LLM_PROVIDER, DEFAULT_OLLAMA_MODEL,
    DEFAULT_OPENAI_MODEL, DEFAULT_PLAYLIST_COUNT, DEFAULT_PRIVACY_STATUS, DEFAULT_STATE_FILE,
};
use curator_core::Config;
use tempfile::TempDir;

fn valid_config() -> Config {
    let mut config = Config::default();
    config.curation.source_playlist_ids = vec!["PLsource".to_string()];
    config.youtube.client_secrets_file = PathBuf::from("client_secret.json");
    config
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.curation.playlist_count, DEFAULT_PLAYLIST_COUNT);
    assert_eq!(config.youtube.batch_size, DEFAULT_BATCH_SIZE);
    assert_eq!(config.youtube.privacy_status, DEFAULT_PRIVACY_STATUS);
    assert_eq!(config.llm.provider, DEFAULT_LLM_PROVIDER);
    assert_eq!(config.storage.data_dir, DEFAULT_DATA_DIR);
    assert_eq!(config.storage.state_file, DEFAULT_STATE_FILE);
    assert_eq!(config.storage.cache_file, DEFAULT_CACHE_FILE);
}

#[test]
fn test_config_to_toml() {
    let toml_str = toml::to_string_pretty(&valid_config()).unwrap();
    assert!(toml_str.contains("[curation]"));
    assert!(toml_str.contains("[youtube]"));
    assert!(toml_str.contains("[llm]"));
    assert!(toml_str.contains("[storage]"));
}

#[test]
fn test_api_key_is_never_written() {
    let mut config = valid_config();
    config.llm.api_key = Some("secret-key".to_string());

    let toml_str = toml::to_string_pretty(&config).unwrap();
    assert!(!toml_str.contains("secret-key"));
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
[curation]
source_playlist_ids = ["PLone", "PLtwo"]
playlist_count = 8

[youtube]
client_secrets_file = "secrets/client.json"
privacy_status = "unlisted"

[llm]
provider = "ollama"
model = "llama3"

[storage]
data_dir = "curator-data"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.curation.source_playlist_ids, vec!["PLone", "PLtwo"]);
    assert_eq!(config.curation.playlist_count, 8);
    assert_eq!(
        config.youtube.client_secrets_file,
        PathBuf::from("secrets/client.json")
    );
    assert_eq!(config.youtube.privacy_status, "unlisted");
    assert_eq!(config.youtube.batch_size, DEFAULT_BATCH_SIZE);
    assert_eq!(config.llm.provider, "ollama");
    assert_eq!(config.llm.model, Some("llama3".to_string()));
    assert_eq!(config.storage.data_dir, "curator-data");
    assert_eq!(
        config.storage.state_path(),
        PathBuf::from("curator-data").join(DEFAULT_STATE_FILE)
    );
}

#[test]
fn test_from_file_missing() {
    let temp = TempDir::new().unwrap();
    let result = Config::from_file(temp.path().join("nope.toml"));
    assert!(matches!(result, Err(ConfigError::ReadError { .. })));
}

#[test]
fn test_from_file_invalid_toml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("curator.toml");
    std::fs::write(&path, "[curation\nsource_playlist_ids = ").unwrap();

    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_template_is_valid() {
    let template = Config::default_config_string();
    let config: Config = toml::from_str(&template).unwrap();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate() {
    assert!(valid_config().validate().is_ok());

    let mut config = valid_config();
    config.curation.source_playlist_ids.clear();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = valid_config();
    config.curation.playlist_count = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = valid_config();
    config.youtube.batch_size = 51;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = valid_config();
    config.youtube.client_secrets_file = PathBuf::new();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_model_or_default() {
    let mut config = LLMConfig::default();
    assert_eq!(config.model_or_default(), DEFAULT_GEMINI_MODEL);

    config.provider = "anthropic".to_string();
    assert_eq!(config.model_or_default(), DEFAULT_ANTHROPIC_MODEL);

    config.provider = "ollama".to_string();
    assert_eq!(config.model_or_default(), DEFAULT_OLLAMA_MODEL);

    config.provider = "openai".to_string();
    assert_eq!(config.model_or_default(), DEFAULT_OPENAI_MODEL);

    config.model = Some("custom-model".to_string());
    assert_eq!(config.model_or_default(), "custom-model");
}
