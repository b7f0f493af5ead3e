// Authenticated reads
//
// Generic GET plus the two inventory endpoints the controller generations
// expose. All of them return the unwrapped `response` value.

use tracing::debug;

use crate::client::ControllerClient;
use crate::error::Error;
use crate::models::{
    AUTH_TOKEN_HEADER, NETWORK_DEVICE_PATH, REACHABILITY_INFO_PATH, SCOPE_ALL, SCOPE_HEADER,
};

impl ControllerClient {
    /// Authenticated GET of `{base}{path}`.
    ///
    /// Sends the service ticket as `X-Auth-Token` and, when given, the
    /// access-control `scope` header. Returns the `response` field of the
    /// body. Fails with [`Error::NotAuthenticated`] before any request is
    /// made if [`login`](Self::login) has not succeeded.
    pub async fn fetch(&self, path: &str, scope: Option<&str>) -> Result<serde_json::Value, Error> {
        let ticket = self.session().ticket().ok_or(Error::NotAuthenticated)?;
        let url = self.url(path)?;
        debug!(scope, "GET {}", url);

        let resp = self
            .send("fetch", || {
                let builder = self
                    .http()
                    .get(url.clone())
                    .header(AUTH_TOKEN_HEADER, ticket.expose());
                match scope {
                    Some(scope) => builder.header(SCOPE_HEADER, scope),
                    None => builder,
                }
            })
            .await?;

        Self::unwrap_response(resp).await
    }

    /// Full device inventory, visible across all scopes.
    ///
    /// `GET /api/v1/network-device` with `scope: ALL`
    pub async fn network_devices(&self) -> Result<serde_json::Value, Error> {
        self.fetch(NETWORK_DEVICE_PATH, Some(SCOPE_ALL)).await
    }

    /// Reachability summary from older controllers.
    ///
    /// `GET /api/v1/reachability-info`
    pub async fn reachability_info(&self) -> Result<serde_json::Value, Error> {
        self.fetch(REACHABILITY_INFO_PATH, None).await
    }
}
