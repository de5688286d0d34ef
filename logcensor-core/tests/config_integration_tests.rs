// logcensor-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use logcensor_core::config::{CensorConfig, FragmentList};
use logcensor_core::{CensorError, MatcherRegistry};

fn write_config(yaml: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml.as_bytes())?;
    Ok(file)
}

#[test]
fn test_load_from_file_with_csv_fragments() -> Result<()> {
    let file = write_config(
        r#"
enabled: true
sensitive_configs: "db_pass, Vault_Token"
"#,
    )?;
    let config = CensorConfig::load_from_file(file.path())?;

    assert!(config.enabled);
    assert_eq!(
        config.sensitive_configs,
        Some(FragmentList::Csv("db_pass, Vault_Token".to_string()))
    );
    assert_eq!(config.fragments().iter().collect::<Vec<_>>(), vec!["db_pass", "vault_token"]);
    Ok(())
}

#[test]
fn test_load_from_file_with_list_fragments() -> Result<()> {
    let file = write_config(
        r#"
enabled: false
sensitive_configs:
  - password
  - apikey
"#,
    )?;
    let config = CensorConfig::load_from_file(file.path())?;

    assert!(!config.enabled);
    assert!(!config.formatter_options().enabled);
    assert_eq!(config.fragments().len(), 2);
    Ok(())
}

#[test]
fn test_missing_fields_use_defaults() -> Result<()> {
    let file = write_config("{}\n")?;
    let config = CensorConfig::load_from_file(file.path())?;

    assert_eq!(config, CensorConfig::default());
    assert!(!config.fragments().is_empty());
    Ok(())
}

#[test]
fn test_missing_file_is_a_read_error() {
    let err = CensorConfig::load_from_file("/nonexistent/logcensor.yaml").unwrap_err();
    assert!(matches!(err.downcast_ref::<CensorError>(), Some(CensorError::ConfigRead(..))));
}

#[test]
fn test_malformed_yaml_is_a_parse_error() -> Result<()> {
    let file = write_config("enabled: [not, a, bool\n")?;
    let err = CensorConfig::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err.downcast_ref::<CensorError>(), Some(CensorError::ConfigParse(..))));
    Ok(())
}

#[test]
fn test_config_drives_detection_and_formatter() -> Result<()> {
    let file = write_config(
        r#"
enabled: true
sensitive_configs: "vault_token"
"#,
    )?;
    let config = CensorConfig::load_from_file(file.path())?;

    let registry = std::sync::Arc::new(MatcherRegistry::new());
    let formatter = registry.formatter(config.formatter_options());
    let app_configs = vec![
        ("app.vault_token", "hvs.CAES"),
        // Not listed in this config's fragments, so it is left alone.
        ("app.password", "plain"),
    ];
    assert!(registry.refresh(app_configs, &config.fragments()).is_installed());

    assert_eq!(formatter.format(Some("token=hvs.CAES pw=plain")), "token=****** pw=plain");
    Ok(())
}
