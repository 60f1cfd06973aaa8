//! Unit tests for values, the type hierarchy and small helpers.
mod common;
use udongraph::prelude::*;
use udongraph::registry::{TypeHierarchy, variable_type_name, variable_value_type};

#[test]
fn test_value_display() {
    assert_eq!(format!("{}", Value::Float(42.0)), "42.0");
    assert_eq!(format!("{}", Value::Int(-3)), "-3");
    assert_eq!(format!("{}", Value::Bool(true)), "true");
    assert_eq!(format!("{}", Value::Null), "null");
    assert_eq!(format!("{}", Value::String("hi".to_string())), "\"hi\"");
    assert_eq!(format!("{}", Value::Vector3([1.0, 2.0, 3.5])), "(1, 2, 3.5)");
}

#[test]
fn test_value_kind_from_type_name() {
    assert_eq!(ValueKind::from_type_name("int"), ValueKind::Int);
    assert_eq!(ValueKind::from_type_name("Vector3"), ValueKind::Vector3);
    assert_eq!(ValueKind::from_type_name("Transform"), ValueKind::Object);
    assert_eq!(ValueKind::Object.default_value(), Value::Null);
    assert_eq!(
        ValueKind::Quaternion.default_value(),
        Value::Quaternion([0.0, 0.0, 0.0, 1.0])
    );
}

#[test]
fn test_value_kind_parse() {
    assert_eq!(ValueKind::Int.parse(" 12 "), Some(Value::Int(12)));
    assert_eq!(ValueKind::Bool.parse("true"), Some(Value::Bool(true)));
    assert_eq!(ValueKind::Float.parse("x"), None);
    assert_eq!(
        ValueKind::Vector3.parse("(1, 2.5, -3)"),
        Some(Value::Vector3([1.0, 2.5, -3.0]))
    );
    assert_eq!(ValueKind::Vector2.parse("1, 2, 3"), None);
    assert_eq!(ValueKind::Color.parse("1, 0"), None);
    assert_eq!(ValueKind::Object.parse(""), Some(Value::Null));
}

#[test]
fn test_value_kind_accepts() {
    assert!(ValueKind::Float.accepts(&Value::Int(1)));
    assert!(!ValueKind::Int.accepts(&Value::Float(1.0)));
    assert!(ValueKind::String.accepts(&Value::Null));
    assert!(!ValueKind::Object.accepts(&Value::Bool(true)));
}

#[test]
fn test_type_hierarchy_assignability() {
    let mut types = TypeHierarchy::new();
    types.declare("Component", &[]);
    types.declare("Behaviour", &["Component"]);
    types.declare("Animator", &["Behaviour"]);
    types.declare("IUdonEventReceiver", &[]);

    assert!(types.is_subtype("Animator", "Component"));
    assert!(!types.is_subtype("Component", "Animator"));
    assert!(types.is_subtype("Animator", "object"));
    // Either direction is connectable
    assert!(types.is_assignable("Animator", "Component"));
    assert!(types.is_assignable("Component", "Animator"));
    assert!(!types.is_assignable("int", "string"));
    // The event receiver pair is the only unrelated pair allowed
    assert!(types.is_assignable("IUdonEventReceiver", "Component"));
    assert!(types.is_assignable("Component", "IUdonEventReceiver"));
    assert!(!types.is_assignable("IUdonEventReceiver", "Behaviour"));
}

#[test]
fn test_type_hierarchy_survives_cycles() {
    let mut types = TypeHierarchy::new();
    types.declare("A", &["B"]);
    types.declare("B", &["A"]);
    assert!(types.is_subtype("A", "B"));
    assert!(!types.is_subtype("A", "C"));
}

#[test]
fn test_variable_type_names() {
    assert_eq!(variable_type_name("int"), "Variable_int");
    assert_eq!(variable_value_type("Variable_Vector3"), Some("Vector3"));
    assert_eq!(variable_value_type("Get_Variable"), None);
}

#[test]
fn test_sync_mode_parsing() {
    assert_eq!("linear".parse::<SyncMode>(), Ok(SyncMode::Linear));
    assert!("fast".parse::<SyncMode>().is_err());
    assert_eq!(SyncMode::from_value(&Value::String("smooth".to_string())), Some(SyncMode::Smooth));
    assert_eq!(SyncMode::from_value(&Value::Null), None);
    assert!(SyncMode::None.supported_by("string"));
    assert!(!SyncMode::Linear.supported_by("string"));
    assert!(SyncMode::Smooth.supported_by("Quaternion"));
}

#[test]
fn test_node_id_generation_is_unique() {
    let a = NodeId::generate();
    let b = NodeId::generate();
    assert_ne!(a, b);
    assert_eq!(NodeId::from(a.as_str()), a);
}
