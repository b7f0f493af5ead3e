//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use emfacts_config::ConfigError;
use emfacts_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}: {reason}")]
    #[diagnostic(
        code(emfacts::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             For self-signed certificates use --ca-cert, or --insecure (-k) as a last resort."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("TLS setup failed: {reason}")]
    #[diagnostic(
        code(emfacts::tls),
        help("Check that --ca-cert (or ca_cert in the profile) points at a readable PEM file.")
    )]
    Tls { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Unable to login to controller: {reason}")]
    #[diagnostic(
        code(emfacts::auth_failed),
        help(
            "Verify the username and password for profile '{profile}'.\n\
             Run: emfacts config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, reason: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(emfacts::no_credentials),
        help("Pass --username/--password, or set EMFACTS_USERNAME and EMFACTS_PASSWORD.")
    )]
    NoCredentials { profile: String },

    // ── Controller ───────────────────────────────────────────────────
    #[error("Controller request failed: status_code= {status}")]
    #[diagnostic(code(emfacts::request_failed))]
    RequestFailed { status: u16 },

    #[error("Malformed controller response: {message}")]
    #[diagnostic(
        code(emfacts::malformed_response),
        help("Check --revision and --path match the controller's API generation.")
    )]
    MalformedResponse { message: String },

    // ── Module mode ──────────────────────────────────────────────────
    /// Already delivered to the automation engine; nothing left to print.
    #[error("{message}")]
    Reported { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(emfacts::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No controller host configured")]
    #[diagnostic(
        code(emfacts::no_host),
        help(
            "Pass --host (-H), set EMFACTS_HOST, or add a profile to\n\
             {path}"
        )
    )]
    NoHost { path: String },

    #[error(transparent)]
    #[diagnostic(code(emfacts::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(emfacts::json), help("Check the JSON input and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    #[diagnostic(code(emfacts::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. }
            | Self::NoCredentials { .. }
            | Self::Config(ConfigError::NoCredentials { .. }) => exit_code::AUTH,
            Self::Validation { .. } | Self::NoHost { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Whether the error has already reached the user through the
    /// module protocol.
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Reported { .. })
    }

    /// Translate a core error, naming the active profile in auth help.
    pub fn from_core(err: CoreError, profile: &str) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Tls { message } => Self::Tls { reason: message },
            CoreError::LoginRejected { .. }
            | CoreError::LoginPayload { .. }
            | CoreError::NotAuthenticated => Self::AuthFailed {
                profile: profile.into(),
                reason: err.to_string(),
            },
            CoreError::Fetch { status } => Self::RequestFailed { status },
            CoreError::MalformedResponse { message } => Self::MalformedResponse { message },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}
