// Controller session state
//
// The base URL, the credentials, and whatever the ticket endpoint handed
// back. A session lives for exactly one run and is never written to disk.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::Error;

/// API version assumed until the controller reports its own.
pub const DEFAULT_API_VERSION: &str = "1.0";

/// Short-lived credential returned by the ticket endpoint.
///
/// Sent as `X-Auth-Token` on every authenticated request.
#[derive(Clone)]
pub struct ServiceTicket(SecretString);

impl ServiceTicket {
    pub fn new(ticket: impl Into<String>) -> Self {
        Self(SecretString::from(ticket.into()))
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for ServiceTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServiceTicket(***)")
    }
}

/// Everything one run knows about its controller.
#[derive(Debug, Clone)]
pub struct Session {
    base_url: Url,
    username: String,
    password: SecretString,
    ticket: Option<ServiceTicket>,
    api_version: String,
}

impl Session {
    pub fn new(base_url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            base_url,
            username: username.into(),
            password,
            ticket: None,
            api_version: DEFAULT_API_VERSION.into(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    /// The version string the controller reported at login, or
    /// [`DEFAULT_API_VERSION`] before that.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn ticket(&self) -> Option<&ServiceTicket> {
        self.ticket.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.ticket.is_some()
    }

    pub(crate) fn set_ticket(&mut self, ticket: ServiceTicket, api_version: String) {
        self.ticket = Some(ticket);
        self.api_version = api_version;
    }

    pub(crate) fn clear_ticket(&mut self) {
        self.ticket = None;
    }

    /// Join an absolute API path onto the base URL, keeping any path
    /// prefix the base URL already carries.
    pub fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }
}

/// Turn a `host` value into a controller base URL.
///
/// A bare host (`10.0.0.5`, `ctl.example.com:8443`) gets `https://`;
/// anything that already names a scheme is parsed as-is.
pub fn controller_url(host: &str) -> Result<Url, Error> {
    let host = host.trim();
    if host.contains("://") {
        Ok(Url::parse(host)?)
    } else {
        Ok(Url::parse(&format!("https://{host}"))?)
    }
}
