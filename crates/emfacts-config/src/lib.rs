//! Shared configuration for emfacts.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and the profile-level pieces of a `GatherConfig`. The CLI layers flags
//! and module arguments on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use emfacts_api::{TlsMode, TransportConfig};
use emfacts_core::{ControllerRevision, FactShape, Projection};

/// Keyring service name for stored passwords.
pub const KEYRING_SERVICE: &str = "emfacts";

/// Prefix of every environment variable the config layer reads.
pub const ENV_PREFIX: &str = "EMFACTS_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub revision: ControllerRevision,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
            revision: ControllerRevision::default(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named controller profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Controller host or base URL (e.g., "10.255.40.125" or "https://ctl:8443").
    pub host: String,

    pub username: Option<String>,

    /// Plaintext password; the keyring or an env var is preferred.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip certificate verification.
    pub insecure: Option<bool>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    /// Controller generation; picks endpoint, scope, and filter defaults.
    pub revision: Option<ControllerRevision>,

    /// Override the inventory endpoint path.
    pub inventory_path: Option<String>,

    /// Override the `scope` header. An empty string sends none.
    pub scope: Option<String>,

    /// Override the fact key.
    pub fact_key: Option<String>,

    /// Override the inspected status field.
    pub status_field: Option<String>,

    /// Override the accepted status value.
    pub accepted_status: Option<String>,

    /// Publish only this field of each kept record.
    pub extract_field: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "emfacts", "emfacts").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("emfacts");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// Nested keys come from `EMFACTS_` variables split on `__`, e.g.
/// `EMFACTS_DEFAULTS__TIMEOUT=10` or `EMFACTS_PROFILES__LAB__HOST=10.0.0.5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/password"),
    )?)
}

/// Resolve the login username: profile, then `EMFACTS_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var("EMFACTS_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the login password from the credential chain.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(pw) = std::env::var("EMFACTS_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

// ── GatherConfig building blocks ─────────────────────────────────────

/// Build the transport settings. `insecure` wins over `ca_cert`.
pub fn transport_config(
    insecure: bool,
    ca_cert: Option<&Path>,
    timeout_secs: u64,
) -> TransportConfig {
    let tls = if insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(path) = ca_cert {
        TlsMode::CustomCa(path.to_path_buf())
    } else {
        TlsMode::System
    };

    TransportConfig {
        tls,
        timeout: Duration::from_secs(timeout_secs),
        ..TransportConfig::default()
    }
}

/// Apply a profile's per-field shape overrides on top of `shape`.
pub fn apply_shape_overrides(shape: &mut FactShape, profile: &Profile) {
    if let Some(ref field) = profile.status_field {
        shape.status_field.clone_from(field);
    }
    if let Some(ref status) = profile.accepted_status {
        shape.accepted_status.clone_from(status);
    }
    if let Some(ref key) = profile.fact_key {
        shape.fact_key.clone_from(key);
    }
    if let Some(ref field) = profile.extract_field {
        shape.projection = Projection::Field(field.clone());
    }
}

/// Interpret a configured scope value. Empty means "send no scope header".
pub fn normalize_scope(scope: &str) -> Option<String> {
    let scope = scope.trim();
    (!scope.is_empty()).then(|| scope.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
        default_profile = "lab"

        [defaults]
        timeout = 12

        [profiles.lab]
        host = "10.255.40.125"
        username = "kingjoe"
        password_env = "LAB_PASSWORD"
        revision = "legacy"
        fact_key = "lab_ips"

        [profiles.prod]
        host = "https://apic.example.com:8443"
        username = "ops"
        password_env = "PROD_PASSWORD"
        scope = ""
        insecure = true
    "#;

    #[test]
    fn loads_profiles_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;

            assert_eq!(cfg.default_profile.as_deref(), Some("lab"));
            assert_eq!(cfg.defaults.timeout, 12);
            assert_eq!(cfg.profiles.len(), 2);
            assert_eq!(
                cfg.profiles["lab"].revision,
                Some(ControllerRevision::Legacy)
            );
            Ok(())
        });
    }

    #[test]
    fn env_overrides_nested_keys() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            jail.set_env("EMFACTS_DEFAULTS__TIMEOUT", "5");
            jail.set_env("EMFACTS_PROFILES__LAB__HOST", "10.0.0.9");
            let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;

            assert_eq!(cfg.defaults.timeout, 5);
            assert_eq!(cfg.profiles["lab"].host, "10.0.0.9");
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let cfg = load_config_from(Path::new("absent.toml")).map_err(|e| e.to_string())?;
            assert!(cfg.profiles.is_empty());
            assert_eq!(cfg.defaults.revision, ControllerRevision::Current);
            assert!(!cfg.defaults.insecure);
            Ok(())
        });
    }

    #[test]
    fn credentials_resolve_from_profile_and_password_env() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            jail.set_env("LAB_PASSWORD", "foobar");
            let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            let lab = &cfg.profiles["lab"];

            let username = resolve_username(lab, "lab").map_err(|e| e.to_string())?;
            let password = resolve_password(lab, "lab").map_err(|e| e.to_string())?;

            assert_eq!(username, "kingjoe");
            assert_eq!(password.expose_secret(), "foobar");
            Ok(())
        });
    }

    #[test]
    fn profile_overrides_reshape_facts() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;

            let mut shape = ControllerRevision::Legacy.fact_shape();
            apply_shape_overrides(&mut shape, &cfg.profiles["lab"]);

            assert_eq!(shape.fact_key, "lab_ips");
            assert_eq!(shape.projection, Projection::Field("mgmtIp".into()));
            assert_eq!(
                cfg.profiles["prod"].scope.as_deref().and_then(normalize_scope),
                None
            );
            assert_eq!(cfg.profiles["prod"].insecure, Some(true));
            Ok(())
        });
    }

    #[test]
    fn ca_cert_is_used_unless_insecure() {
        let ca = Path::new("/etc/ssl/apic-ca.pem");
        assert_eq!(
            transport_config(false, Some(ca), 30).tls,
            TlsMode::CustomCa(ca.to_path_buf())
        );
        assert_eq!(
            transport_config(true, Some(ca), 30).tls,
            TlsMode::DangerAcceptInvalid
        );
        assert_eq!(transport_config(false, None, 30).tls, TlsMode::System);
    }

    #[test]
    fn scope_normalization() {
        assert_eq!(normalize_scope("ALL"), Some("ALL".into()));
        assert_eq!(normalize_scope("  "), None);
    }
}
