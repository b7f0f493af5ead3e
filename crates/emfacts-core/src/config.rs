// ── Runtime gather configuration ──
//
// Describes *what* one gather run talks to and how it shapes the answer.
// It carries credentials and tuning but never touches disk: the CLI or the
// config crate builds it and hands it in.

use secrecy::SecretString;
use url::Url;

use emfacts_api::TransportConfig;

use crate::facts::FactShape;
use crate::revision::ControllerRevision;

/// Configuration for one gather against one controller.
#[derive(Debug, Clone)]
pub struct GatherConfig {
    /// Controller base URL (e.g., `https://10.255.40.125`).
    pub base_url: Url,
    pub username: String,
    pub password: SecretString,
    /// TLS, timeout, and retry settings.
    pub transport: TransportConfig,
    /// Inventory endpoint path.
    pub inventory_path: String,
    /// `scope` header value, if any.
    pub scope: Option<String>,
    /// Filter and output shape.
    pub shape: FactShape,
}

impl GatherConfig {
    /// A config with every protocol detail taken from `revision`.
    pub fn for_revision(
        base_url: Url,
        username: impl Into<String>,
        password: SecretString,
        revision: ControllerRevision,
    ) -> Self {
        Self {
            base_url,
            username: username.into(),
            password,
            transport: TransportConfig::default(),
            inventory_path: revision.inventory_path().into(),
            scope: revision.scope().map(Into::into),
            shape: revision.fact_shape(),
        }
    }
}
