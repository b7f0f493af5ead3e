// ── Class grouping ──
//
// Class queries answer with a list of single-key objects:
//
//   { "imdata": [ { "<class>": { "attributes": { ... } } }, ... ] }
//
// Grouping turns that into `<class> -> [attributes, ...]`, the shape the
// automation engine expects under `ansible_facts`.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::trace;

use crate::error::CoreError;

/// Class name to attribute records, in first-seen class order.
pub type ClassGroups = IndexMap<String, Vec<Value>>;

/// Group an `imdata` payload by the class tag of each item.
///
/// Records keep their input order within a class. Items that are not a
/// single-key object carrying an `attributes` object are skipped.
pub fn group_by_class(payload: &Value) -> Result<ClassGroups, CoreError> {
    let items = payload
        .get("imdata")
        .and_then(Value::as_array)
        .ok_or_else(|| CoreError::MalformedResponse {
            message: "missing `imdata` list".into(),
        })?;

    let mut groups = ClassGroups::new();
    for item in items {
        let Some((class, attributes)) = class_attributes(item) else {
            trace!("skipping imdata item without class attributes");
            continue;
        };
        groups
            .entry(class.to_owned())
            .or_default()
            .push(attributes.clone());
    }
    Ok(groups)
}

fn class_attributes(item: &Value) -> Option<(&str, &Value)> {
    let object = item.as_object()?;
    if object.len() != 1 {
        return None;
    }
    let (class, body) = object.iter().next()?;
    let attributes = body.get("attributes").filter(|a| a.is_object())?;
    Some((class.as_str(), attributes))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn groups_by_class_in_first_seen_order() {
        let payload = json!({
            "totalCount": "3",
            "imdata": [
                { "fvTenant": { "attributes": { "name": "common" } } },
                { "aaaUser": { "attributes": { "name": "admin" } } },
                { "fvTenant": { "attributes": { "name": "mgmt" } } }
            ]
        });

        let groups = group_by_class(&payload).unwrap();

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["fvTenant", "aaaUser"]);
        assert_eq!(
            groups["fvTenant"],
            vec![json!({ "name": "common" }), json!({ "name": "mgmt" })]
        );
        assert_eq!(groups["aaaUser"], vec![json!({ "name": "admin" })]);
    }

    #[test]
    fn malformed_items_are_skipped() {
        let payload = json!({
            "imdata": [
                { "fvTenant": { "children": [] } },
                { "a": { "attributes": {} }, "b": { "attributes": {} } },
                "text",
                { "fvBD": { "attributes": { "name": "bd1" } } }
            ]
        });

        let groups = group_by_class(&payload).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups["fvBD"].len(), 1);
    }

    #[test]
    fn missing_imdata_is_malformed() {
        let err = group_by_class(&json!({ "response": [] })).unwrap_err();
        assert!(matches!(err, CoreError::MalformedResponse { .. }));
    }

    #[test]
    fn empty_imdata_is_empty_groups() {
        let groups = group_by_class(&json!({ "imdata": [] })).unwrap();
        assert!(groups.is_empty());
    }
}
