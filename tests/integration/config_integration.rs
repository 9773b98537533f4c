//! Integration tests for configuration loading into a session

use std::path::Path;
use tempfile::TempDir;
use warden::config::ConfigLoader;
use warden::Session;

fn write_config(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("warden.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_session_opens_from_config_file() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        temp.path(),
        r#"
[client]
user_id = "analyst-7"
service_url = "https://data.example.org/api/"

[http]
connect_timeout_secs = 3
"#,
    );

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(config.http.connect_timeout_secs, 3);

    let session = Session::open(config).unwrap();
    assert_eq!(session.config().user_id(), "analyst-7");
    assert_eq!(
        session.endpoint(),
        "https://data.example.org/api/registerDataRequest"
    );
}

#[test]
fn test_session_refuses_config_without_user() {
    let temp = TempDir::new().unwrap();
    let path = write_config(temp.path(), "[client]\nservice_url = \"https://x.org\"\n");

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert!(config.validate().is_err());
    assert!(Session::open(config).is_err());
}

#[test]
fn test_malformed_config_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write_config(temp.path(), "[client\nuser_id = ");
    assert!(ConfigLoader::load_from_file(&path).is_err());
}
