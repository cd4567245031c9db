use super::*;

#[test]
fn default_config_is_valid() {
    let config = Config::default();
    config.validate().expect("defaults must validate");
}

#[test]
fn default_window_matches_documented_values() {
    let window = WindowSettings::default();
    assert_eq!(window.chunk_size, 350);
    assert_eq!(window.overlap, 50);
    window.to_window_config().expect("defaults must validate");
}

#[test]
fn load_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");

    let config = Config::load(dir.path()).expect("load should succeed");

    assert_eq!(config, Config::default());
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");

    let mut config = Config::default();
    config.ollama.model = "nomic-embed-text:latest".to_string();
    config.window.chunk_size = 500;
    config.markers.chapter_prefix = "제".to_string();
    config.markers.chapter_suffix = "장".to_string();

    config.save(dir.path()).expect("save should succeed");
    let loaded = Config::load(dir.path()).expect("load should succeed");

    assert_eq!(loaded, config);
}

#[test]
fn save_rejects_invalid_window() {
    let dir = tempfile::tempdir().expect("temp dir");

    let mut config = Config::default();
    config.window.overlap = config.window.chunk_size;

    assert!(config.save(dir.path()).is_err());
    assert!(!dir.path().join("config.toml").exists());
}

#[test]
fn load_rejects_malformed_toml() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("config.toml"), "not [valid toml").expect("write file");

    assert!(Config::load(dir.path()).is_err());
}

#[test]
fn load_rejects_invalid_values() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(
        dir.path().join("config.toml"),
        "[window]\nchunk_size = 100\noverlap = 100\n",
    )
    .expect("write file");

    assert!(Config::load(dir.path()).is_err());
}

#[test]
fn partial_file_uses_defaults_for_the_rest() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("config.toml"), "[ollama]\nport = 12345\n")
        .expect("write file");

    let config = Config::load(dir.path()).expect("load should succeed");

    assert_eq!(config.ollama.port, 12345);
    assert_eq!(config.ollama.host, OllamaConfig::default().host);
    assert_eq!(config.window, WindowSettings::default());
}

#[test]
fn ollama_validation_bounds() {
    let mut config = OllamaConfig::default();

    config.protocol = "ftp".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidProtocol(_))
    ));

    config = OllamaConfig::default();
    config.batch_size = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidBatchSize(0))
    ));

    config = OllamaConfig::default();
    config.model = "  ".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidModel(_))
    ));
}

#[test]
fn marker_settings_build_usable_patterns() {
    let markers = MarkerSettings::default()
        .to_markers()
        .expect("default markers must compile");

    assert!(markers.is_chapter("Chapter 2 Definitions"));
    assert!(markers.is_article("Article 10 Penalties"));
    assert!(!markers.is_chapter("An ordinary sentence"));
}
