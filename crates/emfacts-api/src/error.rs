use thiserror::Error;

/// Top-level error type for the `emfacts-api` crate.
///
/// Covers every failure mode of a controller session: transport,
/// ticket issuance, and inventory reads. `emfacts-core` maps these into
/// messages for the automation engine.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, TLS, etc.)
    #[error("{0}")]
    Connection(#[source] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup error (unreadable or invalid CA certificate).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Authentication ──────────────────────────────────────────────
    /// The ticket endpoint answered with a non-success status.
    #[error("Login rejected by controller (HTTP {status})")]
    LoginRejected { status: u16 },

    /// The ticket endpoint accepted the request but the body lacked
    /// `version` or `response.serviceTicket`.
    #[error("Unexpected login response: {message}")]
    AuthPayload { message: String },

    /// An authenticated call was attempted before a successful login.
    #[error("No service ticket -- login required before this call")]
    NotAuthenticated,

    // ── Inventory reads ─────────────────────────────────────────────
    /// A GET answered with something other than HTTP 200.
    #[error("status_code= {status}")]
    Fetch { status: u16 },

    /// The body decoded but the `response` field was absent, or it was
    /// not JSON at all.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Connection(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}
