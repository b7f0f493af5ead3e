//! CLI configuration, a thin layer over `emfacts_config`.
//!
//! Adds flag-aware resolution on top of the shared profile types. The order
//! is module arguments, then command-line flags (and their env vars), then
//! the active profile, then `[defaults]`.

use secrecy::SecretString;

use emfacts_config::{ConfigError, apply_shape_overrides, normalize_scope, transport_config};
use emfacts_core::{ControllerRevision, GatherConfig, Projection, controller_url};

use crate::cli::{GlobalOpts, RevisionArg, ShapeArgs};
use crate::error::CliError;
use crate::module_args::ModuleArgs;

// ── Re-exports from shared crate ────────────────────────────────────

pub use emfacts_config::{Config, Profile, config_path, load_config_or_default};

impl From<RevisionArg> for ControllerRevision {
    fn from(arg: RevisionArg) -> Self {
        match arg {
            RevisionArg::Legacy => Self::Legacy,
            RevisionArg::Current => Self::Current,
        }
    }
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Merge module arguments, flags, and the named profile into a
/// `GatherConfig`. A missing profile is treated as an empty one.
pub fn build_gather_config(
    cfg: &Config,
    profile_name: &str,
    global: &GlobalOpts,
    shape: &ShapeArgs,
    module: Option<&ModuleArgs>,
) -> Result<GatherConfig, CliError> {
    let empty = Profile::default();
    let profile = cfg.profiles.get(profile_name).unwrap_or(&empty);

    // 1. Controller URL (module > flag > profile)
    let host = module
        .and_then(|m| m.host.clone())
        .or_else(|| global.host.clone())
        .or_else(|| (!profile.host.is_empty()).then(|| profile.host.clone()))
        .ok_or_else(|| CliError::NoHost {
            path: config_path().display().to_string(),
        })?;
    let base_url = controller_url(&host).map_err(|e| CliError::Validation {
        field: "host".into(),
        reason: format!("{e}: {host}"),
    })?;

    // 2. Credentials
    let username = match module
        .and_then(|m| m.username.clone())
        .or_else(|| global.username.clone())
    {
        Some(username) => username,
        None => emfacts_config::resolve_username(profile, profile_name).map_err(no_credentials)?,
    };
    let password = match module
        .and_then(|m| m.password.clone())
        .or_else(|| global.password.clone())
    {
        Some(password) => SecretString::from(password),
        None => emfacts_config::resolve_password(profile, profile_name).map_err(no_credentials)?,
    };

    // 3. Revision picks endpoint, scope, and filter defaults
    let revision = global
        .revision
        .map(ControllerRevision::from)
        .or(profile.revision)
        .unwrap_or(cfg.defaults.revision);

    let mut config = GatherConfig::for_revision(base_url, username, password, revision);

    // 4. Profile overrides, then flag overrides
    if let Some(ref path) = profile.inventory_path {
        config.inventory_path.clone_from(path);
    }
    if let Some(ref scope) = profile.scope {
        config.scope = normalize_scope(scope);
    }
    apply_shape_overrides(&mut config.shape, profile);
    apply_shape_args(&mut config, shape);

    // 5. Transport
    let ca_cert = global.ca_cert.as_ref().or(profile.ca_cert.as_ref());
    config.transport = transport_config(
        global.insecure || profile.insecure.unwrap_or(cfg.defaults.insecure),
        ca_cert.map(std::path::PathBuf::as_path),
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(cfg.defaults.timeout),
    );

    Ok(config)
}

fn apply_shape_args(config: &mut GatherConfig, args: &ShapeArgs) {
    if let Some(ref path) = args.path {
        config.inventory_path.clone_from(path);
    }
    if args.no_scope {
        config.scope = None;
    } else if let Some(ref scope) = args.scope {
        config.scope = normalize_scope(scope);
    }
    if let Some(ref key) = args.fact_key {
        config.shape.fact_key.clone_from(key);
    }
    if let Some(ref field) = args.status_field {
        config.shape.status_field.clone_from(field);
    }
    if let Some(ref status) = args.accept {
        config.shape.accepted_status.clone_from(status);
    }
    if args.whole {
        config.shape.projection = Projection::Record;
    } else if let Some(ref field) = args.extract {
        config.shape.projection = Projection::Field(field.clone());
    }
}

fn no_credentials(err: ConfigError) -> CliError {
    match err {
        ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
        other => CliError::Config(other),
    }
}
