use crate::graph::AssemblyGraph;
use crate::instruction::{FieldRef, MethodRef};
use crate::reader::ReadError;
use crate::test_fixtures::assembly_with;
use serde_json::json;

#[test]
fn test_find_type_by_full_name() {
    let graph = assembly_with(vec![]).unwrap();
    let string = graph.find_type("System.String").unwrap();
    assert_eq!(string.name, "String");
    assert!(graph.find_type("System.Missing").is_none());
    assert_eq!(graph.type_index("<Module>"), Some(0));
}

#[test]
fn test_resolve_method_by_arity() {
    let graph = assembly_with(vec![]).unwrap();
    let concat3 = MethodRef {
        declaring_type: "System.String".to_string(),
        name: "Concat".to_string(),
        parameters: Some(3),
    };
    let (owner, method) = graph.resolve_method(&concat3).unwrap();
    assert_eq!(owner.full_name(), "System.String");
    assert_eq!(method.parameters.len(), 3);

    let any_arity = MethodRef {
        parameters: None,
        ..concat3
    };
    let (_, first) = graph.resolve_method(&any_arity).unwrap();
    assert_eq!(first.parameters.len(), 2);
}

#[test]
fn test_resolve_field() {
    let graph = assembly_with(vec![]).unwrap();
    let field = FieldRef {
        declaring_type: "System.String".to_string(),
        name: "length".to_string(),
    };
    let (_, def) = graph.resolve_field(&field).unwrap();
    assert_eq!(def.field_type.to_string(), "System.Int32");
}

#[test]
fn test_value_type_detection_walks_base_chain() {
    let graph = assembly_with(vec![json!({
        "namespace": "App",
        "name": "Color",
        "base": "System.Enum"
    })])
    .unwrap();
    let color = graph.find_type("App.Color").unwrap();
    assert!(graph.is_value_type(color));
    assert!(graph.is_value_type(graph.find_type("System.Int32").unwrap()));
    assert!(!graph.is_value_type(graph.find_type("System.String").unwrap()));
    assert!(!graph.is_value_type(graph.find_type("System.ValueType").unwrap()));
}

#[test]
fn test_base_cycle_terminates() {
    let graph = AssemblyGraph::from_json_value(json!({
        "types": [
            { "name": "A", "base": "B" },
            { "name": "B", "base": "A" }
        ]
    }))
    .unwrap();
    let a = graph.find_type("A").unwrap();
    assert!(!graph.derives_from(a, "System.ValueType"));
}

#[test]
fn test_duplicate_type_is_rejected() {
    let err = AssemblyGraph::from_json_value(json!({
        "types": [
            { "namespace": "App", "name": "A" },
            { "namespace": "App", "name": "A" }
        ]
    }))
    .unwrap_err();
    assert!(matches!(err, ReadError::DuplicateType { ref name } if name == "App.A"));
}
