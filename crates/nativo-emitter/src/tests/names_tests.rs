use crate::names::*;
use nativo_metadata::{MethodDef, TypeDef, TypeSig};
use serde_json::json;

fn sig(text: &str) -> TypeSig {
    text.parse().unwrap()
}

#[test]
fn test_target_type_name_flattens_separators() {
    assert_eq!(target_type_name("System.Object"), "System_Object");
    assert_eq!(
        target_type_name("System.Collections.List`1"),
        "System_Collections_List_1"
    );
    assert_eq!(target_type_name("App.Outer/Inner"), "App_Outer_Inner");
    assert_eq!(target_type_name("Plain"), "Plain");
}

#[test]
fn test_type_name_uses_namespace() {
    let ty: TypeDef = serde_json::from_value(json!({ "namespace": "App", "name": "Program" })).unwrap();
    assert_eq!(type_name(&ty), "App_Program");
    let global: TypeDef = serde_json::from_value(json!({ "name": "Global" })).unwrap();
    assert_eq!(type_name(&global), "Global");
}

#[test]
fn test_resolve_primitives() {
    assert_eq!(resolve_type(&sig("System.Int32")), "int32_t");
    assert_eq!(resolve_type(&sig("System.UInt64")), "uint64_t");
    assert_eq!(resolve_type(&sig("System.Boolean")), "bool");
    assert_eq!(resolve_type(&sig("System.Double")), "double");
    assert_eq!(resolve_type(&sig("System.IntPtr")), "intptr_t");
    assert_eq!(resolve_type(&sig("System.Void")), "void");
}

#[test]
fn test_resolve_reference_types_as_pointers() {
    assert_eq!(resolve_type(&sig("System.String")), "System_String*");
    assert_eq!(resolve_type(&sig("App.Point")), "App_Point*");
    assert_eq!(resolve_type(&sig("System.Int32[]")), ARRAY_TYPE);
    assert_eq!(resolve_type(&sig("App.Point[]")), ARRAY_TYPE);
}

#[test]
fn test_resolve_pointer_types() {
    assert_eq!(resolve_type(&sig("System.Void*")), "uint8_t*");
    assert_eq!(resolve_type(&sig("System.Char*")), "char*");
    assert_eq!(resolve_type(&sig("System.Int32**")), "int32_t**");
    assert_eq!(resolve_type(&sig("System.ObjectTable*")), "System_ObjectTable*");
}

#[test]
fn test_target_sig_name_keeps_pointer_markers() {
    assert_eq!(target_sig_name(&sig("App.Node*")), "App_Node*");
    assert_eq!(target_sig_name(&sig("App.Node")), "App_Node");
}

#[test]
fn test_size_of_target() {
    assert_eq!(size_of_target(&sig("System.Int64")), "int64_t");
    assert_eq!(size_of_target(&sig("App.Point")), "App_Point");
    assert_eq!(size_of_target(&sig("System.Void*")), "uint8_t*");
}

#[test]
fn test_static_reference() {
    assert_eq!(static_reference("App.Program", "Main"), "App_Program::Main");
}

#[test]
fn test_field_name_strips_backing_field_decoration() {
    assert_eq!(field_name("<Count>k__BackingField"), "Count");
    assert_eq!(field_name("count"), "count");
}

#[test]
fn test_method_and_parameter_names() {
    let cctor: MethodDef = serde_json::from_value(json!({ "name": ".cctor", "static": true })).unwrap();
    assert_eq!(method_name(&cctor), STATIC_INITIALIZER_NAME);

    let method: MethodDef = serde_json::from_value(json!({
        "name": "Add",
        "parameters": [
            { "name": "a", "type": "System.Int32" },
            { "type": "System.String" }
        ]
    }))
    .unwrap();
    assert_eq!(method_name(&method), "Add");
    assert_eq!(parameter_list(&method), "int32_t a, System_String* arg1");
}

#[test]
fn test_local_and_label_names() {
    assert_eq!(local_name(3), "var_3");
    assert_eq!(label_name(0x1a), "IL_001a");
    assert_eq!(label_name(0x12345), "IL_12345");
}
