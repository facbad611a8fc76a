//! Shared fixtures for tests and benches.
//!
//! `CORE_LIBRARY` is a miniature runtime class library in metadata form:
//! the root types, the primitive structs, `System.String`, the runtime-import
//! surface (`Console`, `Unsafe`, string concatenation, object header setup)
//! and the two marker attributes. Tests append their own types to it with
//! [`assembly_with`].

use once_cell::sync::Lazy;
use serde_json::{Value, json};

use crate::graph::AssemblyGraph;
use crate::reader::ReadError;

/// One instruction without operand.
pub fn ins(offset: u32, opcode: &str) -> Value {
    json!({ "offset": offset, "opcode": opcode })
}

/// One instruction with a tagged operand, e.g. `json!({ "int": 5 })`.
pub fn ins_with(offset: u32, opcode: &str, operand: Value) -> Value {
    json!({ "offset": offset, "opcode": opcode, "operand": operand })
}

fn runtime_import(ordinal: i64) -> Value {
    json!([{ "type": "System.RuntimeImportAttribute", "arguments": [1, ordinal] }])
}

fn primitive(name: &str, field_type: &str) -> Value {
    json!({
        "namespace": "System",
        "name": name,
        "base": "System.ValueType",
        "fields": [{ "name": "val", "type": field_type }]
    })
}

pub static CORE_LIBRARY: Lazy<Vec<Value>> = Lazy::new(|| {
    vec![
        json!({ "name": "<Module>" }),
        json!({
            "namespace": "System",
            "name": "Object",
            "fields": [{ "name": "m_ObjectTable", "type": "System.ObjectTable*" }],
            "methods": [
                {
                    "name": ".ctor",
                    "body": [
                        ins(0, "ldarg.0"),
                        ins_with(1, "call", json!({ "method": { "type": "System.Object", "name": "SetupObjectTable" } })),
                        ins(6, "ret")
                    ]
                },
                {
                    "name": "SetupObjectTable",
                    "static": true,
                    "parameters": [{ "name": "obj", "type": "System.Object" }],
                    "attributes": runtime_import(100)
                },
                {
                    "name": "GetObjectAddress",
                    "static": true,
                    "return_type": "System.Void*",
                    "parameters": [{ "name": "obj", "type": "System.Object" }],
                    "attributes": runtime_import(5)
                },
                {
                    "name": "Box",
                    "static": true,
                    "return_type": "System.Object",
                    "parameters": [
                        { "name": "mt", "type": "System.MethodTable*" },
                        { "name": "data", "type": "System.Void*" },
                        { "name": "len", "type": "System.Int32" }
                    ]
                },
                {
                    "name": "Unbox",
                    "static": true,
                    "parameters": [
                        { "name": "obj", "type": "System.Object" },
                        { "name": "data", "type": "System.Void*" },
                        { "name": "len", "type": "System.Int32" }
                    ]
                }
            ]
        }),
        json!({
            "namespace": "System",
            "name": "ValueType",
            "base": "System.Object",
            "methods": [{
                "name": ".ctor",
                "body": [
                    ins(0, "ldarg.0"),
                    ins_with(1, "call", json!({ "method": { "type": "System.Object", "name": ".ctor" } })),
                    ins(6, "ret")
                ]
            }]
        }),
        json!({
            "namespace": "System",
            "name": "Enum",
            "base": "System.ValueType",
            "methods": [{
                "name": ".ctor",
                "body": [
                    ins(0, "ldarg.0"),
                    ins_with(1, "call", json!({ "method": { "type": "System.ValueType", "name": ".ctor" } })),
                    ins(6, "ret")
                ]
            }]
        }),
        json!({ "namespace": "System", "name": "Void", "base": "System.ValueType" }),
        primitive("Boolean", "System.Boolean"),
        primitive("Char", "System.Char"),
        primitive("Int32", "System.Int32"),
        primitive("Int64", "System.Int64"),
        json!({
            "namespace": "System",
            "name": "ObjectTable",
            "base": "System.ValueType",
            "fields": [
                { "name": "MethodTable", "type": "System.MethodTable*" },
                { "name": "AssociatedObject", "type": "System.Object" },
                { "name": "GCReferences", "type": "System.Int32" }
            ]
        }),
        json!({
            "namespace": "System",
            "name": "MethodTable",
            "base": "System.ValueType",
            "fields": [
                { "name": "TypeName", "type": "System.String" },
                { "name": "TypeNamespace", "type": "System.String" },
                { "name": "MethodList", "type": "System.IntPtr*" },
                { "name": "MethodCount", "type": "System.Int32" }
            ]
        }),
        json!({
            "namespace": "System",
            "name": "String",
            "base": "System.Object",
            "fields": [
                { "name": "length", "type": "System.Int32" },
                { "name": "data", "type": "System.Char*" }
            ],
            "methods": [
                {
                    "name": ".ctor",
                    "parameters": [
                        { "name": "str", "type": "System.Char*" },
                        { "name": "len", "type": "System.Int32" }
                    ],
                    "body": [
                        ins(0, "ldarg.0"),
                        ins_with(1, "call", json!({ "method": { "type": "System.Object", "name": ".ctor" } })),
                        ins(6, "ldarg.0"),
                        ins(7, "ldarg.1"),
                        ins_with(8, "stfld", json!({ "field": { "type": "System.String", "name": "data" } })),
                        ins(13, "ldarg.0"),
                        ins(14, "ldarg.2"),
                        ins_with(15, "stfld", json!({ "field": { "type": "System.String", "name": "length" } })),
                        ins(20, "ret")
                    ]
                },
                {
                    "name": "Concat",
                    "static": true,
                    "return_type": "System.String",
                    "parameters": [
                        { "name": "a", "type": "System.String" },
                        { "name": "b", "type": "System.String" }
                    ],
                    "attributes": runtime_import(200)
                },
                {
                    "name": "Concat",
                    "static": true,
                    "return_type": "System.String",
                    "parameters": [
                        { "name": "a", "type": "System.String" },
                        { "name": "b", "type": "System.String" },
                        { "name": "c", "type": "System.String" }
                    ],
                    "attributes": runtime_import(201)
                }
            ]
        }),
        json!({
            "namespace": "System",
            "name": "Array",
            "base": "System.Object",
            "fields": [
                { "name": "length", "type": "System.Int32" },
                { "name": "data", "type": "System.Void*" },
                { "name": "elsize", "type": "System.Int32" }
            ],
            "methods": [{
                "name": "NewArray",
                "static": true,
                "return_type": "System.Array",
                "parameters": [
                    { "name": "length", "type": "System.Int32" },
                    { "name": "elsize", "type": "System.Int32" }
                ]
            }]
        }),
        json!({
            "namespace": "System",
            "name": "Console",
            "base": "System.Object",
            "methods": [
                {
                    "name": "WriteLine",
                    "static": true,
                    "parameters": [{ "name": "text", "type": "System.String" }],
                    "attributes": runtime_import(0)
                },
                {
                    "name": "Write",
                    "static": true,
                    "parameters": [{ "name": "text", "type": "System.String" }],
                    "attributes": runtime_import(1)
                }
            ]
        }),
        json!({
            "namespace": "System",
            "name": "Unsafe",
            "base": "System.Object",
            "methods": [
                {
                    "name": "Malloc",
                    "static": true,
                    "return_type": "System.Void*",
                    "parameters": [{ "name": "size", "type": "System.Int32" }],
                    "attributes": runtime_import(2)
                },
                {
                    "name": "Realloc",
                    "static": true,
                    "return_type": "System.Void*",
                    "parameters": [
                        { "name": "addr", "type": "System.Void*" },
                        { "name": "size", "type": "System.Int32" }
                    ],
                    "attributes": runtime_import(3)
                },
                {
                    "name": "Free",
                    "static": true,
                    "parameters": [{ "name": "addr", "type": "System.Void*" }],
                    "attributes": runtime_import(4)
                }
            ]
        }),
        json!({ "namespace": "System", "name": "Attribute", "base": "System.Object" }),
        json!({ "namespace": "System", "name": "EntrypointAttribute", "base": "System.Attribute" }),
        json!({ "namespace": "System", "name": "RuntimeImportAttribute", "base": "System.Attribute" }),
    ]
});

/// The core library followed by `extra` types, in that metadata order.
pub fn assembly_with(extra: Vec<Value>) -> Result<AssemblyGraph, ReadError> {
    let mut types = CORE_LIBRARY.clone();
    types.extend(extra);
    AssemblyGraph::from_json_value(json!({ "name": "Test", "types": types }))
}

/// A minimal program: `App.Program::Main` returning `exit_code`.
pub fn hello_program(exit_code: i64) -> Value {
    json!({
        "namespace": "App",
        "name": "Program",
        "base": "System.Object",
        "methods": [{
            "name": "Main",
            "static": true,
            "return_type": "System.Int32",
            "attributes": [{ "type": "System.EntrypointAttribute" }],
            "body": [
                ins_with(0, "ldstr", json!({ "string": "Hello, World!" })),
                ins_with(5, "call", json!({ "method": { "type": "System.Console", "name": "WriteLine" } })),
                ins(10, "nop"),
                ins_with(11, "ldc.i4.s", json!({ "int": exit_code })),
                ins(13, "ret")
            ]
        }]
    })
}
