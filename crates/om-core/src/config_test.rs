use super::*;
use tempfile::TempDir;

fn full_layer() -> ConfigFile {
    ConfigFile {
        migrations_path: Some("file://db/migrations".to_string()),
        objects_path: Some("db/objects".to_string()),
        db_source: Some(":memory:".to_string()),
        create_filename: Some("out/create.sql".to_string()),
        drop_filename: Some("out/drop.sql".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_into_config_applies_defaults() {
    let config = full_layer().into_config().unwrap();
    assert_eq!(config.migrations_path, PathBuf::from("db/migrations"));
    assert_eq!(config.objects_path, PathBuf::from("db/objects"));
    assert_eq!(config.priority_pad, DEFAULT_PRIORITY_PAD);
    assert_eq!(config.version_pad, DEFAULT_VERSION_PAD);
    assert_eq!(config.resolution_policy, ResolutionPolicy::LookAhead);
}

#[test]
fn test_missing_values_reported_together() {
    let layer = ConfigFile {
        objects_path: Some("objects".to_string()),
        ..Default::default()
    };
    let err = layer.into_config().unwrap_err().to_string();
    assert!(err.contains("E003"), "got: {err}");
    assert!(err.contains("migrations-path"));
    assert!(err.contains("db-source"));
    assert!(err.contains("create-filename"));
    assert!(err.contains("drop-filename"));
    assert!(!err.contains("objects-path"));
}

#[test]
fn test_blank_value_counts_as_missing() {
    let layer = ConfigFile {
        db_source: Some("   ".to_string()),
        ..full_layer()
    };
    let err = layer.into_config().unwrap_err().to_string();
    assert!(err.contains("db-source"), "got: {err}");
}

#[test]
fn test_merge_prefers_overrides() {
    let base = ConfigFile {
        priority_pad: Some(2),
        version_pad: Some(6),
        ..full_layer()
    };
    let overrides = ConfigFile {
        db_source: Some("prod.duckdb".to_string()),
        priority_pad: Some(5),
        ..Default::default()
    };
    let config = base.merge(overrides).into_config().unwrap();
    assert_eq!(config.db_source, "prod.duckdb");
    assert_eq!(config.priority_pad, 5);
    assert_eq!(config.version_pad, 6);
    assert_eq!(config.objects_path, PathBuf::from("db/objects"));
}

#[test]
fn test_parse_yaml_layer() {
    let yaml = r#"
migrations_path: migrations
objects_path: objects
db_source: app.duckdb
create_filename: create_objects.sql
drop_filename: drop_objects.sql
priority_pad: 2
resolution_policy: nearest
"#;
    let layer: ConfigFile = serde_yaml::from_str(yaml).unwrap();
    let config = layer.into_config().unwrap();
    assert_eq!(config.priority_pad, 2);
    assert_eq!(config.resolution_policy, ResolutionPolicy::Nearest);
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<ConfigFile, _> = serde_yaml::from_str("objects_dir: objects");
    assert!(result.is_err());
}

#[test]
fn test_load_missing_file() {
    let temp = TempDir::new().unwrap();
    let err = ConfigFile::load(&temp.path().join("nope.yml"))
        .unwrap_err()
        .to_string();
    assert!(err.contains("E001"), "got: {err}");
}

#[test]
fn test_load_from_dir_or_default() {
    let temp = TempDir::new().unwrap();
    assert_eq!(
        ConfigFile::load_from_dir_or_default(temp.path()).unwrap(),
        ConfigFile::default()
    );

    std::fs::write(temp.path().join(CONFIG_FILE_NAME), "db_source: x.duckdb\n").unwrap();
    let layer = ConfigFile::load_from_dir_or_default(temp.path()).unwrap();
    assert_eq!(layer.db_source.as_deref(), Some("x.duckdb"));
}

#[test]
fn test_load_invalid_yaml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "priority_pad: [not, a, number]\n").unwrap();
    let err = ConfigFile::load(&path).unwrap_err().to_string();
    assert!(err.contains("E002"), "got: {err}");
}

#[test]
fn test_strip_file_scheme() {
    assert_eq!(strip_file_scheme("file://a/b"), "a/b");
    assert_eq!(strip_file_scheme("a/b"), "a/b");
}
