//! Test plan for the `clubhouse-config` crate.
//!
//! These tests exercise the configuration loader across default handling,
//! file discovery, and environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use clubhouse_config::load;

const ENV_VARS_TO_RESET: &[&str] = &[
    "CLUBHOUSE_CONFIG",
    "CLUBHOUSE__HTTP__ADDRESS",
    "CLUBHOUSE__HTTP__PORT",
    "CLUBHOUSE__DATABASE__URL",
    "CLUBHOUSE__DATABASE__MAX_CONNECTIONS",
    "CLUBHOUSE__AUTH__JWT_SECRET",
    "CLUBHOUSE__AUTH__ISSUER",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            vars: Vec::new(),
            original_dir: None,
        }
    }

    fn reset_environment(&mut self) {
        for key in ENV_VARS_TO_RESET {
            self.remove_var(key);
        }
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if self.original_dir.is_none() {
            self.original_dir =
                Some(std::env::current_dir().expect("failed to capture current directory"));
        }
        std::env::set_current_dir(dir).expect("failed to set current directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(original) = self.original_dir.take() {
            let _ = std::env::set_current_dir(original);
        }

        while let Some((key, value)) = self.vars.pop() {
            match value {
                Some(previous) => std::env::set_var(&key, previous),
                None => std::env::remove_var(&key),
            }
        }
    }
}

#[test]
#[serial]
fn load_uses_defaults_without_file_or_env() {
    let mut ctx = TestContext::new();
    ctx.reset_environment();

    let temp_dir = TempDir::new().unwrap();
    ctx.set_current_dir(temp_dir.path());

    let config = load().expect("defaults should load");

    assert_eq!(config.http.address, "127.0.0.1");
    assert_eq!(config.http.port, 8001);
    assert_eq!(config.database.url, "sqlite://clubhouse.db");
    assert_eq!(config.database.max_connections, 10);
    assert_eq!(config.auth.issuer, "clubhouse");
}

#[test]
#[serial]
fn load_reads_explicit_config_file() {
    let mut ctx = TestContext::new();
    ctx.reset_environment();

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("clubhouse.toml");
    fs::write(
        &config_path,
        r#"
[http]
address = "0.0.0.0"
port = 9001

[database]
url = "sqlite://custom.db"
max_connections = 3

[auth]
jwt_secret = "file-secret"
issuer = "clubhouse-test"
"#,
    )
    .unwrap();

    ctx.set_var("CLUBHOUSE_CONFIG", config_path.display().to_string());

    let config = load().expect("file config should load");

    assert_eq!(config.http.address, "0.0.0.0");
    assert_eq!(config.http.port, 9001);
    assert_eq!(config.database.url, "sqlite://custom.db");
    assert_eq!(config.database.max_connections, 3);
    assert_eq!(config.auth.jwt_secret, "file-secret");
    assert_eq!(config.auth.issuer, "clubhouse-test");
}

#[test]
#[serial]
fn load_discovers_config_in_current_directory() {
    let mut ctx = TestContext::new();
    ctx.reset_environment();

    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("clubhouse.toml"),
        "[http]\naddress = \"10.0.0.1\"\nport = 4000\n",
    )
    .unwrap();
    ctx.set_current_dir(temp_dir.path());

    let config = load().expect("discovered file should load");

    assert_eq!(config.http.address, "10.0.0.1");
    assert_eq!(config.http.port, 4000);
    // Sections absent from the file keep their defaults.
    assert_eq!(config.database.max_connections, 10);
}

#[test]
#[serial]
fn environment_overrides_take_precedence() {
    let mut ctx = TestContext::new();
    ctx.reset_environment();

    let temp_dir = TempDir::new().unwrap();
    ctx.set_current_dir(temp_dir.path());

    ctx.set_var("CLUBHOUSE__DATABASE__URL", "sqlite://env.db");
    ctx.set_var("CLUBHOUSE__HTTP__PORT", "8080");
    ctx.set_var("CLUBHOUSE__AUTH__JWT_SECRET", "env-secret");

    let config = load().expect("env overrides should load");

    assert_eq!(config.database.url, "sqlite://env.db");
    assert_eq!(config.http.port, 8080);
    assert_eq!(config.auth.jwt_secret, "env-secret");
}
