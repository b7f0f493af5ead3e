//! Fact shaping and gather orchestration between `emfacts-api` and the CLI.
//!
//! - **[`gather`]** -- one complete run: login, a single inventory read,
//!   logoff, then [`shape_facts`]. [`run_module`] wraps it and hands the
//!   outcome to a [`Reporter`].
//!
//! - **[`shape_facts`]** -- filters a device list by reachability status and
//!   publishes the survivors under one configurable key, in input order.
//!
//! - **[`group_by_class`]** -- ungroups a class-query `imdata` payload into
//!   class name → attribute records.
//!
//! - **[`ControllerRevision`]** -- endpoint, scope, and filter presets for
//!   older and current controllers.

pub mod classes;
pub mod config;
pub mod error;
pub mod facts;
pub mod gather;
pub mod revision;

// ── Primary re-exports ──────────────────────────────────────────────
pub use classes::{ClassGroups, group_by_class};
pub use config::GatherConfig;
pub use error::CoreError;
pub use facts::{FactBundle, FactEnvelope, FactShape, Projection, shape_facts};
pub use gather::{Reporter, fetch_inventory, fetch_raw, gather, run_module};
pub use revision::ControllerRevision;

// Transport types callers need to build a `GatherConfig`.
pub use emfacts_api::{RetryPolicy, TlsMode, TransportConfig, controller_url};
