use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::MockServer;

use agronus::config::{ServicesConfig, SessionConfig};
use agronus::{ChatSession, HttpFarmServices};
use std::sync::Arc;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Services config pointing both services at one mock server
#[allow(dead_code)]
pub fn services_config(server: &MockServer) -> ServicesConfig {
    ServicesConfig {
        prediction_url: server.uri(),
        chat_url: server.uri(),
        timeout_seconds: Some(5),
    }
}

/// HTTP services talking to the mock server
#[allow(dead_code)]
pub fn http_services(server: &MockServer) -> HttpFarmServices {
    HttpFarmServices::new(&services_config(server)).expect("failed to build services")
}

/// A fresh session backed by the mock server
#[allow(dead_code)]
pub fn session_for(server: &MockServer) -> ChatSession {
    ChatSession::new(Arc::new(http_services(server)), &SessionConfig::default())
}
