// ── Core error types ──
//
// Errors a gather run can end with. The `From<emfacts_api::Error>` impl
// folds transport-layer detail into these variants, and
// `failure_message()` renders the string handed to the automation engine.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("TLS setup failed: {message}")]
    Tls { message: String },

    // ── Authentication errors ────────────────────────────────────────
    #[error("Login rejected by controller (HTTP {status})")]
    LoginRejected { status: u16 },

    #[error("Login response missing expected fields: {message}")]
    LoginPayload { message: String },

    #[error("Not logged in to the controller")]
    NotAuthenticated,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Controller answered HTTP {status}")]
    Fetch { status: u16 },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The message reported to the automation engine when a run fails.
    pub fn failure_message(&self) -> String {
        match self {
            Self::ConnectionFailed { reason, .. } => reason.clone(),
            Self::LoginRejected { .. } => "Unable to login to controller".into(),
            Self::LoginPayload { .. } => "Login failure".into(),
            Self::Fetch { status } => format!("status_code= {status}"),
            other => other.to_string(),
        }
    }
}

/// Render an error with every `source()` level, joined by `": "`.
///
/// reqwest's own `Display` stops at "error sending request"; the useful
/// part ("Connection refused", a DNS or certificate failure) sits further
/// down the chain. Levels already contained in the text so far are skipped.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let level = cause.to_string();
        if !level.is_empty() && !text.contains(&level) {
            text.push_str(": ");
            text.push_str(&level);
        }
        source = cause.source();
    }
    text
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<emfacts_api::Error> for CoreError {
    fn from(err: emfacts_api::Error) -> Self {
        match err {
            emfacts_api::Error::Connection(e) => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: error_chain(&e),
            },
            emfacts_api::Error::Tls(message) => CoreError::Tls { message },
            emfacts_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            emfacts_api::Error::LoginRejected { status } => CoreError::LoginRejected { status },
            emfacts_api::Error::AuthPayload { message } => CoreError::LoginPayload { message },
            emfacts_api::Error::NotAuthenticated => CoreError::NotAuthenticated,
            emfacts_api::Error::Fetch { status } => CoreError::Fetch { status },
            emfacts_api::Error::MalformedResponse { message } => {
                CoreError::MalformedResponse { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_messages_match_module_protocol() {
        assert_eq!(
            CoreError::Fetch { status: 500 }.failure_message(),
            "status_code= 500"
        );
        assert_eq!(
            CoreError::LoginRejected { status: 401 }.failure_message(),
            "Unable to login to controller"
        );
        assert_eq!(
            CoreError::LoginPayload {
                message: "missing `version`".into()
            }
            .failure_message(),
            "Login failure"
        );
        assert_eq!(
            CoreError::ConnectionFailed {
                url: "https://10.0.0.5/".into(),
                reason: "connection refused".into(),
            }
            .failure_message(),
            "connection refused"
        );
        assert_eq!(
            CoreError::MalformedResponse {
                message: "missing `response` field".into()
            }
            .failure_message(),
            "Malformed response: missing `response` field"
        );
    }

    #[test]
    fn api_errors_keep_their_meaning() {
        let err: CoreError = emfacts_api::Error::Fetch { status: 404 }.into();
        assert!(matches!(err, CoreError::Fetch { status: 404 }));

        let err: CoreError = emfacts_api::Error::AuthPayload {
            message: "missing".into(),
        }
        .into();
        assert!(matches!(err, CoreError::LoginPayload { .. }));

        let err: CoreError = emfacts_api::Error::Tls("invalid CA cert: bad PEM".into()).into();
        assert_eq!(err.to_string(), "TLS setup failed: invalid CA cert: bad PEM");
    }

    #[derive(Debug, Error)]
    #[error("{message}")]
    struct Layer {
        message: &'static str,
        #[source]
        source: Option<Box<Layer>>,
    }

    #[test]
    fn error_chain_joins_every_level_once() {
        let err = Layer {
            message: "error sending request",
            source: Some(Box::new(Layer {
                message: "client error (Connect)",
                source: Some(Box::new(Layer {
                    message: "Connection refused (os error 111)",
                    source: None,
                })),
            })),
        };
        assert_eq!(
            error_chain(&err),
            "error sending request: client error (Connect): Connection refused (os error 111)"
        );

        let repeated = Layer {
            message: "tcp connect error: refused",
            source: Some(Box::new(Layer {
                message: "refused",
                source: None,
            })),
        };
        assert_eq!(error_chain(&repeated), "tcp connect error: refused");
    }
}
