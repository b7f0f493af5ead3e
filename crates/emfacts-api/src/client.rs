// Controller HTTP client
//
// Wraps `reqwest::Client` with the session it authenticates, URL
// construction, the connection retry policy, and `{ response }` envelope
// unwrapping. Login/logoff and the inventory reads are inherent methods in
// separate files to keep this module focused on transport mechanics.

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ResponseEnvelope;
use crate::session::Session;
use crate::transport::{RetryPolicy, TransportConfig};

/// HTTP client bound to one controller session.
///
/// Owns the [`Session`]; only [`login`](Self::login) and
/// [`logoff`](Self::logoff) mutate it.
pub struct ControllerClient {
    http: reqwest::Client,
    session: Session,
    retry: RetryPolicy,
}

impl ControllerClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(session: Session, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            session,
            retry: transport.retry,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` and no retries.
    pub fn with_client(http: reqwest::Client, session: Session) -> Self {
        Self {
            http,
            session,
            retry: RetryPolicy::none(),
        }
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        self.session.endpoint(path)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a request, re-sending once (per policy) on connection failure.
    pub(crate) async fn send(
        &self,
        what: &str,
        build: impl Fn() -> reqwest::RequestBuilder + Sync,
    ) -> Result<reqwest::Response, Error> {
        self.retry
            .run(what, || {
                let request = build();
                async move { request.send().await.map_err(Error::Connection) }
            })
            .await
    }

    /// Parse the `{ response }` envelope of a 200 answer.
    pub(crate) async fn unwrap_response(
        resp: reqwest::Response,
    ) -> Result<serde_json::Value, Error> {
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            debug!(%status, "controller refused request");
            return Err(Error::Fetch {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(Error::Connection)?;
        let envelope: ResponseEnvelope = serde_json::from_str(&body).map_err(|e| {
            let preview = body.chars().take(200).collect::<String>();
            Error::MalformedResponse {
                message: format!("{e} (body preview: {preview:?})"),
            }
        })?;

        envelope.response.ok_or_else(|| Error::MalformedResponse {
            message: "missing `response` field".into(),
        })
    }
}
