// ── Controller generations ──
//
// Older controllers publish a reachability summary keyed by management IP
// and mark usable devices "Discovered"; current ones publish the full
// inventory, need `scope: ALL`, and mark them "Reachable".

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use emfacts_api::{NETWORK_DEVICE_PATH, REACHABILITY_INFO_PATH, SCOPE_ALL};

use crate::facts::{FactShape, NETWORK_DEVICE_KEY, Projection, STATUS_FIELD};

/// Which controller generation a gather talks to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ControllerRevision {
    /// `/api/v1/reachability-info`, "Discovered", management IPs only.
    Legacy,
    /// `/api/v1/network-device` with `scope: ALL`, "Reachable", whole records.
    #[default]
    Current,
}

impl ControllerRevision {
    /// Inventory endpoint for this generation.
    pub fn inventory_path(self) -> &'static str {
        match self {
            Self::Legacy => REACHABILITY_INFO_PATH,
            Self::Current => NETWORK_DEVICE_PATH,
        }
    }

    /// Scope header value, if this generation requires one.
    pub fn scope(self) -> Option<&'static str> {
        match self {
            Self::Legacy => None,
            Self::Current => Some(SCOPE_ALL),
        }
    }

    /// Status value marking a usable device.
    pub fn accepted_status(self) -> &'static str {
        match self {
            Self::Legacy => "Discovered",
            Self::Current => "Reachable",
        }
    }

    /// Default fact shape for this generation.
    pub fn fact_shape(self) -> FactShape {
        match self {
            Self::Legacy => FactShape {
                status_field: STATUS_FIELD.into(),
                accepted_status: self.accepted_status().into(),
                projection: Projection::Field("mgmtIp".into()),
                fact_key: "mgmtIp".into(),
            },
            Self::Current => FactShape {
                status_field: STATUS_FIELD.into(),
                accepted_status: self.accepted_status().into(),
                projection: Projection::Record,
                fact_key: NETWORK_DEVICE_KEY.into(),
            },
        }
    }
}
