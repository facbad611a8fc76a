use crate::assembler::{declaration_order, select_types};
use crate::declarations::{DeclarationEmitter, Declarations, Entrypoint, referenced_types};
use nativo_common::{TranslateError, TranslateErrorKind};
use nativo_metadata::test_fixtures::{assembly_with, hello_program, ins, ins_with};
use serde_json::{Value, json};

fn declare(extra: Vec<Value>) -> Result<Declarations, TranslateError> {
    let graph = assembly_with(extra).unwrap();
    let ordered = declaration_order(&graph, &select_types(&graph));
    DeclarationEmitter::new(&graph, &ordered).emit(&ordered)
}

fn with_cctor(name: &str) -> Value {
    json!({
        "namespace": "App",
        "name": name,
        "base": "System.Object",
        "fields": [{ "name": "ready", "type": "System.Boolean", "static": true }],
        "methods": [{ "name": ".cctor", "static": true, "body": [ins(0, "ret")] }]
    })
}

fn entry(type_name: &str, is_static: bool, parameters: Value) -> Value {
    json!({
        "namespace": "App",
        "name": type_name,
        "base": "System.Object",
        "methods": [{
            "name": "Main",
            "static": is_static,
            "parameters": parameters,
            "attributes": [{ "type": "System.EntrypointAttribute" }],
            "body": [ins(0, "ret")]
        }]
    })
}

#[test]
fn test_header_preamble_and_forward_declarations() {
    let decls = declare(vec![hello_program(0)]).unwrap();
    assert!(decls.header.starts_with("#pragma once\n\n#include <stdint.h>\n"));
    assert!(decls.header.contains("\nclass System_Object;\n"));
    assert!(decls.header.contains("\nstruct System_Int32;\n"));
    assert!(decls.header.contains("\nclass App_Program;\n"));
    // Excluded types.
    assert!(!decls.header.contains("System_Void"));
    assert!(!decls.header.contains("EntrypointAttribute"));
    assert!(!decls.header.contains("_Module_"));
}

#[test]
fn test_class_and_struct_declarations() {
    let decls = declare(vec![hello_program(0)]).unwrap();
    let header = &decls.header;
    assert!(header.contains("class System_Object {\npublic:\n    System_ObjectTable* m_ObjectTable;\n    System_Object();\n"));
    assert!(header.contains("class System_String : public System_Object {\npublic:\n    int32_t length;\n    char* data;\n    System_String(char* str, int32_t len);\n"));
    assert!(header.contains("struct System_Int32 {\n    int32_t val;\n};\n"));
    assert!(header.contains(
        "class App_Program : public System_Object {\npublic:\n    static int32_t Main();\n};\n"
    ));
}

#[test]
fn test_runtime_imports_use_fixed_signatures() {
    let header = declare(vec![hello_program(0)]).unwrap().header;
    assert!(header.contains("    static void WriteLine(System_String* str);\n"));
    assert!(header.contains("    static void* Malloc(int32_t size);\n"));
    assert!(header.contains("    static void SetupObjectTable(System_Object* obj);\n"));
    assert!(header.contains(
        "    static System_String* Concat(System_String* a, System_String* b, System_String* c);\n"
    ));
}

#[test]
fn test_registry_records_entrypoint() {
    let decls = declare(vec![hello_program(0)]).unwrap();
    assert_eq!(
        decls.registry.entrypoint,
        Some(Entrypoint {
            type_name: "App_Program".to_string(),
            method: "Main".to_string(),
            returns_void: false,
        })
    );
    assert!(decls.registry.static_initializers.is_empty());
}

#[test]
fn test_static_initializers_registered_in_declaration_order() {
    let decls = declare(vec![
        with_cctor("Alpha"),
        with_cctor("Beta"),
        with_cctor("Gamma"),
        hello_program(0),
    ])
    .unwrap();
    assert_eq!(
        decls.registry.static_initializers,
        vec!["App_Alpha", "App_Beta", "App_Gamma"]
    );
    let calls: Vec<String> = decls.registry.static_initializer_calls().collect();
    assert_eq!(calls[0], "App_Alpha::__static_construct");
    assert!(decls.header.contains(
        "class App_Beta : public System_Object {\npublic:\n    static bool ready;\n    static void __static_construct();\n};\n"
    ));
}

#[test]
fn test_backing_field_names_are_recovered() {
    let header = declare(vec![json!({
        "namespace": "App",
        "name": "Box",
        "base": "System.Object",
        "fields": [{ "name": "<Count>k__BackingField", "type": "System.Int32" }]
    })])
    .unwrap()
    .header;
    assert!(header.contains("    int32_t Count;\n"));
    assert!(!header.contains("k__BackingField"));
}

#[test]
fn test_base_outside_assembly_is_omitted() {
    let header = declare(vec![json!({
        "namespace": "App",
        "name": "Widget",
        "base": "Lib.Control"
    })])
    .unwrap()
    .header;
    assert!(header.contains("class App_Widget {\npublic:\n};\n"));
}

#[test]
fn test_value_types_have_no_base_clause() {
    let header = declare(vec![json!({
        "namespace": "App",
        "name": "Color",
        "base": "System.Enum",
        "fields": [{ "name": "value__", "type": "System.Int32" }]
    })])
    .unwrap()
    .header;
    assert!(header.contains("\nstruct App_Color;\n"));
    assert!(header.contains("struct App_Color {\n    int32_t value__;\n};\n"));
}

#[test]
fn test_duplicate_entrypoint() {
    let err = declare(vec![entry("First", true, json!([])), entry("Second", true, json!([]))])
        .unwrap_err();
    assert_eq!(
        err.kind,
        TranslateErrorKind::DuplicateEntrypoint {
            first: "App_First::Main".to_string()
        }
    );
    assert_eq!(err.location.to_string(), "App_Second::Main");
}

#[test]
fn test_invalid_entrypoints() {
    let err = declare(vec![entry("Program", false, json!([]))]).unwrap_err();
    assert!(matches!(err.kind, TranslateErrorKind::InvalidEntrypoint { .. }));

    let err = declare(vec![entry(
        "Program",
        true,
        json!([{ "name": "args", "type": "System.String[]" }]),
    )])
    .unwrap_err();
    assert!(matches!(err.kind, TranslateErrorKind::InvalidEntrypoint { .. }));
}

#[test]
fn test_unknown_runtime_import_aborts_declaration() {
    let err = declare(vec![json!({
        "namespace": "App",
        "name": "Native",
        "base": "System.Object",
        "methods": [{
            "name": "Beep",
            "static": true,
            "attributes": [{ "type": "System.RuntimeImportAttribute", "arguments": [1, 42] }]
        }]
    })])
    .unwrap_err();
    assert_eq!(err.kind, TranslateErrorKind::UnknownRuntimeImport { ordinal: 42 });
    assert_eq!(err.location.to_string(), "App_Native::Beep");
}

#[test]
fn test_untranslated_referenced_types_are_forward_declared() {
    let decls = declare(vec![
        hello_program(0),
        json!({ "namespace": "App", "name": "TagAttribute", "base": "System.Attribute" }),
        json!({
            "namespace": "App",
            "name": "Holder",
            "base": "System.Object",
            "fields": [
                { "name": "tag", "type": "App.TagAttribute" },
                { "name": "peer", "type": "Ext.Widget*" }
            ],
            "methods": [{
                "name": "Tags",
                "static": true,
                "return_type": "App.TagAttribute[]",
                "body": [ins(0, "ldnull"), ins(1, "ret")]
            }]
        }),
    ])
    .unwrap();
    let header = &decls.header;

    let declared = header.find("\nclass App_TagAttribute;\n").expect("attribute type declared");
    let used = header.find("App_TagAttribute* tag;").expect("field emitted");
    assert!(declared < used);
    assert!(header.find("\nclass Ext_Widget;\n").unwrap() < header.find("Ext_Widget* peer;").unwrap());
    // Only forward-declared; the attribute type itself is not translated.
    assert!(!header.contains("class App_TagAttribute {"));
    assert_eq!(header.matches("class System_Array;").count(), 1);
}

#[test]
fn test_referenced_types_skip_primitives_and_declared_types() {
    let graph = assembly_with(vec![json!({
        "namespace": "App",
        "name": "Uses",
        "base": "System.Object",
        "fields": [{ "name": "n", "type": "System.Int32" }],
        "methods": [{
            "name": "Run",
            "static": true,
            "locals": ["System.Void*", "App.Uses", "Lib.Node"],
            "body": [
                ins_with(0, "ldsfld", json!({ "field": { "type": "Lib.Config", "name": "limit" } })),
                ins(5, "pop"),
                ins(6, "ret")
            ]
        }]
    })])
    .unwrap();
    let selected = select_types(&graph);
    let declared = selected.iter().map(|ty| ty.full_name()).collect();
    assert_eq!(referenced_types(&selected, &declared), vec!["Lib.Node", "Lib.Config"]);
}
