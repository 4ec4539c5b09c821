// Configuration loading unit tests

use edge_resizer::config::*;
use edge_resizer::error::ConfigError;
use std::io::Write;

#[test]
fn test_from_file_loads_full_document() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
resize:
  resize_prefix: "/thumbs"
  original_prefix: "/masters"
  supported_extensions: ["jpg", "png"]
  default_quality: 70
  max_width: 1024
  max_height: 768
  forward_hint_headers: false
limits:
  max_source_bytes: 1048576
  max_source_width: 4000
  max_source_height: 3000
  max_source_pixels: 12000000
logging:
  level: debug
  format: pretty
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.resize.resize_prefix, "/thumbs");
    assert_eq!(config.resize.original_prefix, "/masters");
    assert_eq!(config.resize.supported_extensions, vec!["jpg", "png"]);
    assert_eq!(config.resize.default_quality, 70);
    assert_eq!(config.resize.max_width, 1024);
    assert_eq!(config.resize.max_height, 768);
    assert!(!config.resize.forward_hint_headers);
    assert_eq!(config.limits.max_source_bytes, 1_048_576);
    assert_eq!(config.limits.max_source_pixels, 12_000_000);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_malformed_yaml_is_yaml_error() {
    let err = Config::from_yaml_with_env("resize: [unterminated").unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn test_unknown_log_format_is_rejected() {
    let err = Config::from_yaml_with_env("logging:\n  format: xml\n").unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn test_env_var_substitutes_numbers() {
    std::env::set_var("EDGE_RESIZER_UNIT_MAX_WIDTH", "640");
    let config =
        Config::from_yaml_with_env("resize:\n  max_width: ${EDGE_RESIZER_UNIT_MAX_WIDTH}\n")
            .unwrap();
    assert_eq!(config.resize.max_width, 640);
}

#[test]
fn test_default_config_validates() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_validation_error_names_field() {
    let mut config = Config::default();
    config.resize.original_prefix = "original".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("original_prefix"));
}
