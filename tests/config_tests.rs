//! Config loading, TOML parsing, and env var override tests.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use typelayer::config::LogFormat;
use typelayer::{Collation, Config, LobKind, LobStore};

fn write_config(temp: &TempDir, content: &str) -> String {
    let path = temp.path().join("config.toml");
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_config_default_lob_settings() {
    let config = Config::default();
    assert_eq!(config.lob.inline_threshold, 256);
    assert_eq!(config.lob.compare_chunk_size, 4096);
    assert_eq!(config.lob.spool_dir, PathBuf::from("./data/lobs"));
}

#[test]
fn test_config_default_context() {
    let ctx = Config::default().context().unwrap();
    assert_eq!(ctx.collation, Collation::Binary);
    assert_eq!(ctx.lob_chunk_size, 4096);
    assert!(ctx.deadline.is_none());
}

#[test]
fn test_load_config_from_toml() {
    let temp = TempDir::new().unwrap();
    let spool = temp.path().join("spool");
    let path = write_config(
        &temp,
        &format!(
            r#"
[lob]
inline_threshold = 8
compare_chunk_size = 128
spool_dir = "{}"

[temporal]
time_zone = "-05:00"

[collation]
mode = "case_insensitive"

[logging]
format = "json"
"#,
            spool.display()
        ),
    );

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.lob.inline_threshold, 8);
    assert_eq!(config.lob.compare_chunk_size, 128);
    assert_eq!(config.collation.mode, Collation::CaseInsensitive);
    assert_eq!(config.logging.format, LogFormat::Json);

    let ctx = config.context().unwrap();
    assert_eq!(ctx.time_zone.to_string(), "-05:00");
    assert_eq!(ctx.lob_chunk_size, 128);

    let store = config.lob_store().unwrap();
    assert!(spool.is_dir());
    assert_eq!(store.inline_threshold(), 8);
    let value = store
        .create_lob(LobKind::Clob, &mut std::io::Cursor::new(b"more than eight".to_vec()), -1)
        .unwrap();
    assert!(!value.as_lob().unwrap().is_inline());
    assert_eq!(value.render().unwrap(), "more than eight");
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.toml");
    let config = Config::from_file(&path.to_string_lossy()).unwrap();
    assert_eq!(config.lob.inline_threshold, 256);
    assert_eq!(config.temporal.time_zone, "UTC");
}

#[test]
fn test_invalid_collation_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "[collation]\nmode = \"phonebook\"\n");
    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_env_overrides_file() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "[logging]\nlevel = \"warn\"\n");
    std::env::set_var("TYPELAYER_LOGGING__LEVEL", "debug");
    let config = Config::from_file(&path);
    std::env::remove_var("TYPELAYER_LOGGING__LEVEL");
    assert_eq!(config.unwrap().logging.level, "debug");
}
