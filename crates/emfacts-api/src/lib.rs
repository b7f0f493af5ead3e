// emfacts-api: Async Rust client for the APIC-EM controller REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod inventory;
pub mod models;
pub mod session;
pub mod transport;

pub use client::ControllerClient;
pub use error::Error;
pub use models::{
    LoginOutcome, NETWORK_DEVICE_PATH, REACHABILITY_INFO_PATH, SCOPE_ALL, TICKET_PATH,
};
pub use session::{DEFAULT_API_VERSION, ServiceTicket, Session, controller_url};
pub use transport::{RetryPolicy, TlsMode, TransportConfig};
