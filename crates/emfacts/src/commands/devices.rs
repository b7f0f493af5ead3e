//! Device inventory listing.

use owo_colors::OwoColorize;
use serde_json::Value;
use tabled::Tabled;

use emfacts_core::{FactShape, GatherConfig, fetch_inventory};

use crate::cli::{DevicesArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl DeviceRow {
    fn from_record(record: &Value, shape: &FactShape, color: bool) -> Self {
        let status = text(record, &shape.status_field);
        let status = match (color, shape.accepts(record)) {
            (false, _) => status,
            (true, true) => status.green().to_string(),
            (true, false) => status.red().to_string(),
        };

        Self {
            hostname: text(record, "hostname"),
            ip: management_ip(record),
            platform: text(record, "platformId"),
            version: text(record, "softwareVersion"),
            status,
        }
    }
}

fn text(record: &Value, field: &str) -> String {
    record
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or("-")
        .to_owned()
}

/// Newer inventories call it `managementIpAddress`, older reachability
/// summaries `mgmtIp`.
fn management_ip(record: &Value) -> String {
    ["managementIpAddress", "mgmtIp"]
        .iter()
        .find_map(|field| record.get(*field).and_then(Value::as_str))
        .unwrap_or("-")
        .to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: &GatherConfig,
    args: &DevicesArgs,
    global: &GlobalOpts,
    profile_name: &str,
) -> Result<(), CliError> {
    let devices = fetch_inventory(config)
        .await
        .map_err(|e| CliError::from_core(e, profile_name))?;

    let total = devices.len();
    let shown: Vec<Value> = if args.all {
        devices
    } else {
        devices
            .into_iter()
            .filter(|d| config.shape.accepts(d))
            .collect()
    };
    tracing::info!(total, shown = shown.len(), "listing devices");

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &shown,
        |d| DeviceRow::from_record(d, &config.shape, color),
        management_ip,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn row_reads_current_inventory_fields() {
        let record = json!({
            "hostname": "edge-1",
            "managementIpAddress": "10.0.0.1",
            "platformId": "C9300-48U",
            "softwareVersion": "16.9.3",
            "reachabilityStatus": "Reachable"
        });

        let row = DeviceRow::from_record(&record, &FactShape::default(), false);

        assert_eq!(row.hostname, "edge-1");
        assert_eq!(row.ip, "10.0.0.1");
        assert_eq!(row.platform, "C9300-48U");
        assert_eq!(row.status, "Reachable");
    }

    #[test]
    fn legacy_records_fall_back_to_mgmt_ip() {
        let record = json!({"mgmtIp": "10.9.0.1", "reachabilityStatus": "Discovered"});

        assert_eq!(management_ip(&record), "10.9.0.1");
        let row = DeviceRow::from_record(&record, &FactShape::default(), false);
        assert_eq!(row.hostname, "-");
    }
}
