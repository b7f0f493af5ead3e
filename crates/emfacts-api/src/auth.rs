// Service-ticket authentication
//
// `POST /api/v1/ticket` with a JSON username/password body. The ticket and
// the reported API version land in the client's session; every later call
// sends the ticket as `X-Auth-Token`.

use secrecy::ExposeSecret;
use tracing::debug;

use crate::client::ControllerClient;
use crate::error::Error;
use crate::models::{LoginOutcome, TICKET_PATH, TicketEnvelope, TicketRequest};
use crate::session::ServiceTicket;

impl ControllerClient {
    /// Authenticate with the controller using the session's credentials.
    ///
    /// On success the service ticket and the controller's API version are
    /// stored in the session. Failure modes:
    /// - transport failure: [`Error::Connection`]
    /// - non-2xx answer: [`Error::LoginRejected`]
    /// - 2xx answer without `version` / `response.serviceTicket`:
    ///   [`Error::AuthPayload`]
    pub async fn login(&mut self) -> Result<LoginOutcome, Error> {
        let url = self.url(TICKET_PATH)?;
        debug!("requesting service ticket at {}", url);

        let session = self.session();
        let body = TicketRequest {
            username: session.username(),
            password: session.password().expose_secret(),
        };

        let resp = self
            .send("login", || self.http().post(url.clone()).json(&body))
            .await?;

        let status = resp.status();
        if !status.is_success() {
            debug!(%status, "ticket request rejected");
            return Err(Error::LoginRejected {
                status: status.as_u16(),
            });
        }

        let text = resp.text().await.map_err(Error::Connection)?;
        let (ticket, api_version) = parse_ticket(&text)?;

        self.session_mut().set_ticket(ticket, api_version.clone());
        debug!(api_version = %api_version, "login successful");
        Ok(LoginOutcome { api_version })
    }

    /// End the session.
    ///
    /// The controller documents no ticket revocation endpoint, so this only
    /// forgets the ticket locally. Calling it without a ticket is harmless.
    pub fn logoff(&mut self) {
        if self.session().is_authenticated() {
            debug!("discarding service ticket");
        }
        self.session_mut().clear_ticket();
    }
}

/// Pull the ticket and version out of a ticket endpoint body.
fn parse_ticket(body: &str) -> Result<(ServiceTicket, String), Error> {
    let envelope: TicketEnvelope =
        serde_json::from_str(body).map_err(|e| Error::AuthPayload {
            message: format!("body is not a ticket response: {e}"),
        })?;

    let ticket = envelope
        .response
        .and_then(|r| r.service_ticket)
        .ok_or_else(|| Error::AuthPayload {
            message: "missing `response.serviceTicket`".into(),
        })?;

    let version = envelope.version.ok_or_else(|| Error::AuthPayload {
        message: "missing `version`".into(),
    })?;

    Ok((ServiceTicket::new(ticket), version))
}
