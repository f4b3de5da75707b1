//! Normalizer for backend component records
//!
//! The backend has shipped two encodings of a component. The legacy one
//! nests material and quantity into objects and carries no status; it is
//! recognized purely by shape: a `material` object with a `value` key.
//! Everything here is pure; malformed input is never an error.

use crate::types::{Component, LegacyComponent, Status, WireComponent};
use serde_json::Value;

/// True if the untyped record uses the legacy encoding
pub fn is_legacy(record: &Value) -> bool {
    record
        .get("material")
        .and_then(Value::as_object)
        .is_some_and(|material| material.contains_key("value"))
}

/// Bring a record into the current shape
///
/// Current-shape records are returned unchanged.
pub fn normalize(record: WireComponent) -> Component {
    match record {
        WireComponent::Current(component) => component,
        WireComponent::Legacy(legacy) => convert_legacy(legacy),
    }
}

/// Convert a legacy record
///
/// Empty text and zero quantities count as absent, as they did for the
/// frontend that first consumed this encoding.
pub fn convert_legacy(legacy: LegacyComponent) -> Component {
    let material = legacy.material;
    let status = legacy_status(material.new_item, material.is_equal);

    Component {
        pos: legacy.pos,
        description: legacy.description,
        material: material.value.unwrap_or_default(),
        bom_material: None,
        order_material: material.from_manager_data.filter(|m| !m.is_empty()),
        quantity: legacy
            .quantity
            .and_then(|q| q.value)
            .filter(|q| *q != 0.0 && !q.is_nan()),
        manager_quantity: None,
        status,
        note: legacy.note,
    }
}

fn legacy_status(new_item: Option<bool>, is_equal: Option<bool>) -> Status {
    if new_item.unwrap_or(false) {
        return Status::New;
    }
    match is_equal {
        Some(false) => Status::NotEqual,
        Some(true) => Status::Equal,
        // Neither true nor false: kept as new until the backend contract says otherwise.
        None => Status::New,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LegacyMaterial, LegacyQuantity};
    use serde_json::json;

    fn legacy(new_item: Option<bool>, is_equal: Option<bool>) -> LegacyComponent {
        LegacyComponent {
            pos: Some("4".to_string()),
            description: "Seat".to_string(),
            material: LegacyMaterial {
                value: Some("PTFE".to_string()),
                is_equal,
                from_manager_data: None,
                new_item,
            },
            quantity: None,
            note: None,
        }
    }

    #[test]
    fn test_is_legacy_shape_check() {
        assert!(is_legacy(&json!({"material": {"value": "F316"}})));
        assert!(is_legacy(&json!({"material": {"value": null, "isEqual": true}})));
        assert!(!is_legacy(&json!({"material": "F316"})));
        assert!(!is_legacy(&json!({"material": {"isEqual": true}})));
        assert!(!is_legacy(&json!({"material": null})));
        assert!(!is_legacy(&json!({"description": "Body"})));
        assert!(!is_legacy(&json!(["material"])));
    }

    #[test]
    fn test_new_item_wins_over_is_equal() {
        for is_equal in [Some(true), Some(false), None] {
            let c = convert_legacy(legacy(Some(true), is_equal));
            assert_eq!(c.status, Status::New);
        }
    }

    #[test]
    fn test_status_from_is_equal() {
        assert_eq!(
            convert_legacy(legacy(Some(false), Some(false))).status,
            Status::NotEqual
        );
        assert_eq!(
            convert_legacy(legacy(Some(false), Some(true))).status,
            Status::Equal
        );
        assert_eq!(convert_legacy(legacy(Some(false), None)).status, Status::New);
        assert_eq!(convert_legacy(legacy(None, Some(true))).status, Status::Equal);
    }

    #[test]
    fn test_legacy_non_boolean_is_equal_is_new() {
        let wire = WireComponent::from_value(json!({
            "pos": "2",
            "description": "Stud",
            "material": {"value": "B7", "isEqual": "yes", "new_item": "no"},
            "quantity": {"value": "8"}
        }));

        let c = normalize(wire);
        assert_eq!(c.status, Status::New);
        assert_eq!(c.material, "B7");
        assert_eq!(c.quantity, Some(8.0));
    }

    #[test]
    fn test_legacy_bolt_record() {
        let wire = WireComponent::from_value(json!({
            "pos": "1",
            "description": "Bolt",
            "material": {"value": "M8", "isEqual": true, "new_item": false},
            "quantity": {"value": 10, "from_bom": true}
        }));

        let c = normalize(wire);
        assert_eq!(c.pos.as_deref(), Some("1"));
        assert_eq!(c.description, "Bolt");
        assert_eq!(c.material, "M8");
        assert_eq!(c.status, Status::Equal);
        assert_eq!(c.quantity, Some(10.0));
        assert_eq!(c.manager_quantity, None);
        assert_eq!(c.bom_material, None);
        assert_eq!(c.order_material, None);
    }

    #[test]
    fn test_legacy_falsy_values_become_absent() {
        let mut record = legacy(Some(false), Some(false));
        record.material.value = None;
        record.material.from_manager_data = Some(String::new());
        record.quantity = Some(LegacyQuantity {
            value: Some(0.0),
            from_bom: Some(true),
        });

        let c = convert_legacy(record);
        assert_eq!(c.material, "");
        assert_eq!(c.order_material, None);
        assert_eq!(c.quantity, None);
    }

    #[test]
    fn test_legacy_manager_material_carried() {
        let mut record = legacy(Some(false), Some(false));
        record.material.from_manager_data = Some("F51".to_string());
        record.note = Some("check".to_string());

        let c = convert_legacy(record);
        assert_eq!(c.order_material.as_deref(), Some("F51"));
        assert_eq!(c.note.as_deref(), Some("check"));
        assert_eq!(c.pos.as_deref(), Some("4"));
    }

    #[test]
    fn test_current_record_passes_through() {
        let current = Component {
            pos: Some("7".to_string()),
            description: "Stem".to_string(),
            material: "17-4PH".to_string(),
            bom_material: Some("17-4PH".to_string()),
            order_material: Some("F6NM".to_string()),
            quantity: Some(1.0),
            manager_quantity: Some(2.0),
            status: Status::NotEqual,
            note: None,
        };
        assert_eq!(normalize(WireComponent::Current(current.clone())), current);
    }
}
