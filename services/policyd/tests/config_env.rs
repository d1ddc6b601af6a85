use policyd::config::{PolicydConfig, StorageBackend};
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;

struct EnvGuard {
    key: &'static str,
    prev: Option<String>,
}

impl EnvGuard {
    fn set(key: &'static str, value: &str) -> Self {
        let prev = std::env::var(key).ok();
        unsafe {
            std::env::set_var(key, value);
        }
        Self { key, prev }
    }

    fn unset(key: &'static str) -> Self {
        let prev = std::env::var(key).ok();
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, prev }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.prev {
            Some(value) => unsafe {
                std::env::set_var(self.key, value);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

const KEYS: [&str; 9] = [
    "WARDEN_BIND",
    "WARDEN_METRICS_BIND",
    "WARDEN_STORAGE",
    "WARDEN_POLICY_PATH",
    "WARDEN_POSTGRES_URL",
    "WARDEN_POSTGRES_MAX_CONNECTIONS",
    "WARDEN_POSTGRES_ACQUIRE_TIMEOUT_MS",
    "WARDEN_ASSIGNABLE_ROLES",
    "WARDEN_CONFIG",
];

fn clear_env() -> Vec<EnvGuard> {
    KEYS.iter().map(|key| EnvGuard::unset(key)).collect()
}

#[test]
#[serial]
fn defaults_without_env() {
    let _guards = clear_env();
    let config = PolicydConfig::from_env().expect("config");
    assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8088");
    assert_eq!(config.metrics_bind.to_string(), "0.0.0.0:9088");
    assert_eq!(config.storage, StorageBackend::File);
    assert_eq!(config.policy_path, PathBuf::from("policy.csv"));
    assert!(config.postgres.is_none());
    assert_eq!(config.assignable_roles, vec!["owner", "moderator"]);
}

#[test]
#[serial]
fn env_overrides_are_applied() {
    let _guards = clear_env();
    let _g1 = EnvGuard::set("WARDEN_BIND", "127.0.0.1:7000");
    let _g2 = EnvGuard::set("WARDEN_STORAGE", "postgres");
    let _g3 = EnvGuard::set("WARDEN_POSTGRES_URL", "postgres://localhost/warden");
    let _g4 = EnvGuard::set("WARDEN_POSTGRES_MAX_CONNECTIONS", "12");
    let _g5 = EnvGuard::set("WARDEN_ASSIGNABLE_ROLES", "editor, viewer");

    let config = PolicydConfig::from_env().expect("config");
    assert_eq!(config.bind_addr.to_string(), "127.0.0.1:7000");
    assert_eq!(config.storage, StorageBackend::Postgres);
    let pg = config.postgres.expect("postgres");
    assert_eq!(pg.url, "postgres://localhost/warden");
    assert_eq!(pg.max_connections, 12);
    assert_eq!(pg.acquire_timeout_ms, 5_000);
    assert_eq!(config.assignable_roles, vec!["editor", "viewer"]);
}

#[test]
#[serial]
fn invalid_values_are_rejected() {
    let _guards = clear_env();
    let _g1 = EnvGuard::set("WARDEN_BIND", "not-an-addr");
    assert!(PolicydConfig::from_env().is_err());
    drop(_g1);

    let _g2 = EnvGuard::set("WARDEN_STORAGE", "sqlite");
    assert!(PolicydConfig::from_env().is_err());
    drop(_g2);

    let _g3 = EnvGuard::set("WARDEN_POSTGRES_URL", "postgres://localhost/warden");
    let _g4 = EnvGuard::set("WARDEN_POSTGRES_ACQUIRE_TIMEOUT_MS", "soon");
    assert!(PolicydConfig::from_env().is_err());
}

#[test]
#[serial]
fn yaml_file_overrides_env() {
    let _guards = clear_env();
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(
        file,
        "bind_addr: 127.0.0.1:18088\nstorage: memory\npolicy_path: /etc/warden/policy.csv\nassignable_roles: [owner]"
    )
    .expect("write yaml");
    let path = file.path().to_string_lossy().into_owned();
    let _g1 = EnvGuard::set("WARDEN_CONFIG", &path);
    let _g2 = EnvGuard::set("WARDEN_STORAGE", "file");

    let config = PolicydConfig::from_env_or_yaml().expect("config");
    assert_eq!(config.bind_addr.to_string(), "127.0.0.1:18088");
    assert_eq!(config.storage, StorageBackend::Memory);
    assert_eq!(config.policy_path, PathBuf::from("/etc/warden/policy.csv"));
    assert_eq!(config.assignable_roles, vec!["owner"]);
}

#[test]
#[serial]
fn missing_yaml_file_is_an_error() {
    let _guards = clear_env();
    let _g = EnvGuard::set("WARDEN_CONFIG", "/nonexistent/warden.yaml");
    let err = PolicydConfig::from_env_or_yaml().expect_err("missing file");
    assert!(err.to_string().contains("WARDEN_CONFIG"));
}
