// ── Gather orchestration ──
//
// One run: fresh session, login, one inventory read, logoff, shape. The
// outcome leaves through a `Reporter`, the seam to whatever automation
// engine invoked us.

use serde_json::Value;
use tracing::{debug, info};

use emfacts_api::{ControllerClient, Session};

use crate::config::GatherConfig;
use crate::error::CoreError;
use crate::facts::{FactBundle, shape_facts};

/// Receiver of a run's outcome. Exactly one method is called per run.
pub trait Reporter: Send {
    fn report_success(&mut self, bundle: &FactBundle);
    fn report_failure(&mut self, message: &str);
}

/// Log in, read the inventory, and shape it.
///
/// A failed login ends the run before any inventory request is made. No
/// partial result is returned on any failure.
pub async fn gather(config: &GatherConfig) -> Result<FactBundle, CoreError> {
    let devices = fetch_inventory(config).await?;
    let bundle = shape_facts(&devices, &config.shape);
    info!(
        fact_key = %bundle.fact_key,
        kept = bundle.len(),
        total = devices.len(),
        "shaped device facts"
    );
    Ok(bundle)
}

/// Log in and return the raw device list, unfiltered.
pub async fn fetch_inventory(config: &GatherConfig) -> Result<Vec<Value>, CoreError> {
    let response = fetch_raw(config, &config.inventory_path, config.scope.as_deref()).await?;
    match response {
        Value::Array(devices) => Ok(devices),
        other => Err(CoreError::MalformedResponse {
            message: format!("expected a device list, got {}", json_kind(&other)),
        }),
    }
}

/// Log in and return the `response` of an arbitrary GET.
pub async fn fetch_raw(
    config: &GatherConfig,
    path: &str,
    scope: Option<&str>,
) -> Result<Value, CoreError> {
    let session = Session::new(
        config.base_url.clone(),
        config.username.clone(),
        config.password.clone(),
    );
    let mut client = ControllerClient::new(session, &config.transport)?;

    let login = client.login().await?;
    debug!(api_version = %login.api_version, "controller session open");

    let result = client.fetch(path, scope).await;
    client.logoff();
    Ok(result?)
}

/// Run a gather and hand the outcome to `reporter`.
///
/// The error is returned as well so callers can pick an exit status.
pub async fn run_module<R: Reporter>(
    config: &GatherConfig,
    reporter: &mut R,
) -> Result<(), CoreError> {
    match gather(config).await {
        Ok(bundle) => {
            reporter.report_success(&bundle);
            Ok(())
        }
        Err(err) => {
            reporter.report_failure(&err.failure_message());
            Err(err)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
