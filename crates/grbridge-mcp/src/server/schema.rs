//! JSON Schema generation for tool listings.
//!
//! Each catalog entry's parameter contract becomes a standard
//! `{type: "object", properties, required}` schema, built by hand the way
//! the tool definitions describe themselves — no derive machinery, since
//! the catalog is data, not types.

use grbridge_core::{OpSpec, ParamKind, ParamSpec};
use serde_json::{json, Map, Value};

/// Build the MCP input schema object for one operation.
pub fn input_schema(spec: &OpSpec) -> Map<String, Value> {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in &spec.params {
        properties.insert(param.name.to_string(), param_schema(param));
        if param.required {
            required.push(Value::String(param.name.to_string()));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }
    schema
}

fn param_schema(param: &ParamSpec) -> Value {
    let mut schema = match &param.kind {
        ParamKind::String => json!({"type": "string"}),
        ParamKind::Number => json!({"type": "number"}),
        ParamKind::Bool => json!({"type": "boolean"}),
        ParamKind::StringArray => json!({"type": "array", "items": {"type": "string"}}),
        ParamKind::NumberArray => json!({"type": "array", "items": {"type": "number"}}),
        ParamKind::NumberOrArray => json!({
            "oneOf": [
                {"type": "number"},
                {"type": "array", "items": {"type": "number"}}
            ]
        }),
        ParamKind::StringOrArray => json!({
            "oneOf": [
                {"type": "string"},
                {"type": "array", "items": {"type": "string"}}
            ]
        }),
        ParamKind::Ranges => json!({"type": "array", "items": range_item_schema()}),
        ParamKind::RangesList => json!({"type": "array", "items": group_item_schema()}),
        ParamKind::RangesArray => json!({
            "type": "array",
            "items": {"type": "array", "items": range_item_schema()}
        }),
        ParamKind::RangesListArray => json!({
            "type": "array",
            "items": {"type": "array", "items": group_item_schema()}
        }),
        ParamKind::Object => json!({"type": "object"}),
        ParamKind::ObjectArray => json!({"type": "array", "items": {"type": "object"}}),
        ParamKind::Enum(values) => json!({"type": "string", "enum": values}),
    };

    let obj = schema.as_object_mut().expect("schemas are objects");
    obj.insert("description".into(), json!(param.description));
    if let Some(default) = &param.default {
        obj.insert("default".into(), default.clone());
    }
    schema
}

/// Wire schema of one genomic range.
fn range_item_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "seqnames": {"type": "string"},
            "start": {"type": "number"},
            "end": {"type": "number"},
            "strand": {"type": "string", "enum": ["+", "-", "*"]},
            "metadata": {"type": "object"}
        },
        "required": ["seqnames", "start", "end"]
    })
}

/// Wire schema of one labeled range collection.
fn group_item_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": {"type": "string"},
            "ranges": {"type": "array", "items": range_item_schema()}
        },
        "required": ["id", "ranges"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use grbridge_core::Catalog;

    fn schema_for(name: &str) -> Map<String, Value> {
        let catalog = Catalog::new();
        input_schema(catalog.get(name).expect("operation exists"))
    }

    #[test]
    fn reduce_schema_requires_ranges_only() {
        let schema = schema_for("gutils_gr_reduce");
        assert_eq!(schema["type"], json!("object"));
        assert_eq!(schema["required"], json!(["ranges"]));
        let props = schema["properties"].as_object().unwrap();
        assert!(props.contains_key("ranges"));
        assert!(props.contains_key("ignore_strand"));
        assert!(props.contains_key("pad"));
    }

    #[test]
    fn range_items_carry_the_wire_fields() {
        let schema = schema_for("gutils_gr_reduce");
        let items = &schema["properties"]["ranges"]["items"];
        assert_eq!(items["required"], json!(["seqnames", "start", "end"]));
        assert_eq!(items["properties"]["strand"]["enum"], json!(["+", "-", "*"]));
    }

    #[test]
    fn enums_and_defaults_are_emitted() {
        let schema = schema_for("gutils_gr_findoverlaps");
        let overlap_type = &schema["properties"]["type"];
        assert_eq!(
            overlap_type["enum"],
            json!(["any", "start", "end", "within", "equal"])
        );
        assert_eq!(overlap_type["default"], json!("any"));
    }

    #[test]
    fn width_accepts_number_or_array_for_rand() {
        let schema = schema_for("gutils_gr_rand");
        let width = &schema["properties"]["width"];
        assert!(width["oneOf"].is_array());
        assert_eq!(schema["required"], json!(["n", "width", "genome"]));
    }

    #[test]
    fn optional_only_operations_have_no_required_list() {
        let schema = schema_for("gutils_hg_seqlengths");
        assert!(!schema.contains_key("required"));
    }

    #[test]
    fn every_operation_produces_an_object_schema() {
        let catalog = Catalog::new();
        for op in catalog.iter() {
            let schema = input_schema(op);
            assert_eq!(schema["type"], json!("object"), "{}", op.name);
            assert!(schema["properties"].is_object(), "{}", op.name);
        }
    }
}
