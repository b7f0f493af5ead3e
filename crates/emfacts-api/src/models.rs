// Controller response types
//
// Every APIC-EM endpoint wraps its payload in `{ "response": ... }`, and the
// ticket endpoint adds a top-level `version`. Fields are `Option` so that a
// missing key is a value we can check, not a decode failure.

use serde::{Deserialize, Serialize};

// ── Paths ────────────────────────────────────────────────────────────

/// Ticket issuance (login).
pub const TICKET_PATH: &str = "/api/v1/ticket";

/// Full device inventory (current controllers).
pub const NETWORK_DEVICE_PATH: &str = "/api/v1/network-device";

/// Reachability summary (older controllers).
pub const REACHABILITY_INFO_PATH: &str = "/api/v1/reachability-info";

/// Header carrying the service ticket.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Header carrying the access-control scope.
pub const SCOPE_HEADER: &str = "scope";

/// Scope value granting visibility across all managed resources.
pub const SCOPE_ALL: &str = "ALL";

// ── Ticket ───────────────────────────────────────────────────────────

/// Body of `POST /api/v1/ticket`.
#[derive(Debug, Serialize)]
pub(crate) struct TicketRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Ticket endpoint response:
/// ```json
/// { "version": "1.0", "response": { "serviceTicket": "ST-..." } }
/// ```
#[derive(Debug, Deserialize)]
pub(crate) struct TicketEnvelope {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub response: Option<TicketBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TicketBody {
    #[serde(default, rename = "serviceTicket")]
    pub service_ticket: Option<String>,
}

/// What a successful login reports back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub api_version: String,
}

// ── Generic envelope ─────────────────────────────────────────────────

/// `{ "response": <anything> }`
#[derive(Debug, Deserialize)]
pub(crate) struct ResponseEnvelope {
    #[serde(default)]
    pub response: Option<serde_json::Value>,
}
