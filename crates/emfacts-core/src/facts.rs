// ── Fact shaping ──
//
// Filter a controller's device list by reachability and wrap what is left
// under a single named key. Device records stay opaque JSON; only the
// status field (and, for field projection, the extracted field) is read.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

/// Default name of the per-device status field.
pub const STATUS_FIELD: &str = "reachabilityStatus";

/// Default fact key for whole device records.
pub const NETWORK_DEVICE_KEY: &str = "network_device";

/// What to put in the output for each kept record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// The whole device record.
    Record,
    /// The value of one field of the record.
    Field(String),
}

/// How a device list becomes a fact bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactShape {
    /// Field inspected on every record.
    pub status_field: String,
    /// Value of `status_field` a record needs to be kept.
    pub accepted_status: String,
    pub projection: Projection,
    /// Key the kept items are published under.
    pub fact_key: String,
}

impl Default for FactShape {
    fn default() -> Self {
        Self {
            status_field: STATUS_FIELD.into(),
            accepted_status: "Reachable".into(),
            projection: Projection::Record,
            fact_key: NETWORK_DEVICE_KEY.into(),
        }
    }
}

impl FactShape {
    /// Whether `record` passes the status filter.
    ///
    /// Non-objects, records without the status field, and non-string
    /// statuses all fail quietly.
    pub fn accepts(&self, record: &Value) -> bool {
        record
            .get(&self.status_field)
            .and_then(Value::as_str)
            .is_some_and(|status| status == self.accepted_status)
    }

    /// The output item for an accepted record, if it has one.
    fn project(&self, record: &Value) -> Option<Value> {
        match &self.projection {
            Projection::Record => Some(record.clone()),
            Projection::Field(field) => record.get(field).cloned(),
        }
    }
}

/// Kept devices under their fact key. Serializes as `{ "<key>": [...] }`.
#[derive(Debug, Clone, PartialEq)]
pub struct FactBundle {
    pub fact_key: String,
    pub items: Vec<Value>,
}

impl FactBundle {
    pub fn empty(fact_key: impl Into<String>) -> Self {
        Self {
            fact_key: fact_key.into(),
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The bundle as a JSON object.
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert(self.fact_key.clone(), Value::Array(self.items.clone()));
        Value::Object(map)
    }
}

impl Serialize for FactBundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.fact_key, &self.items)?;
        map.end()
    }
}

/// Success payload for the automation engine.
///
/// ```json
/// { "ansible_facts": { "network_device": [ ... ] }, "changed": false }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct FactEnvelope<T> {
    pub ansible_facts: T,
    pub changed: bool,
}

impl<T> FactEnvelope<T> {
    /// A read-only gather never changes anything.
    pub fn new(ansible_facts: T) -> Self {
        Self {
            ansible_facts,
            changed: false,
        }
    }
}

/// Filter and reshape a raw device list.
///
/// Input order is preserved. Records failing [`FactShape::accepts`] are
/// dropped, as are accepted records lacking a projected field.
pub fn shape_facts(devices: &[Value], shape: &FactShape) -> FactBundle {
    let items = devices
        .iter()
        .filter(|record| {
            let keep = shape.accepts(record);
            if !keep {
                trace!(field = %shape.status_field, "skipping record");
            }
            keep
        })
        .filter_map(|record| shape.project(record))
        .collect();

    FactBundle {
        fact_key: shape.fact_key.clone(),
        items,
    }
}
