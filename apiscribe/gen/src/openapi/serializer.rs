//! Structural type to JSON Schema conversion.
//!
//! [`serialize`] is total: every [`TypeNode`] (and the absence of one) maps to
//! a schema. Rules are applied in a fixed priority order:
//!
//! 1. no node → `{"type": "any"}`
//! 2. named → `{"$ref": ..}` for `#` references, else `{"type": name}`
//! 3. literal → `{"enum": [value], "type": <primitive>}`
//! 4. record → object with `additionalProperties`
//! 5. array → `items` from the first child, `{}` when there is none
//! 6. union → `anyOf`
//! 7. intersection → `allOf`
//! 8. unrecognized kind with children → the first child only
//! 9. composite → closed object with `properties`

use apiscribe_define::{REFERENCE_SIGIL, TypeNode};
use serde_json::{Map, Value, json};

/// Converts a structural type node into a JSON Schema document.
///
/// ## Examples
///
/// ```
/// use apiscribe_define::TypeNode;
/// use apiscribe_gen::openapi::serializer::serialize;
/// use serde_json::json;
///
/// let node = TypeNode::composite([("items", TypeNode::array(TypeNode::reference("/Item")))]);
///
/// assert_eq!(
///     serialize(Some(&node)),
///     json!({
///         "type": "object",
///         "properties": { "items": { "type": "array", "items": { "$ref": "#/Item" } } },
///         "additionalProperties": false
///     })
/// );
/// assert_eq!(serialize(None), json!({ "type": "any" }));
/// ```
pub fn serialize(node: Option<&TypeNode>) -> Value {
    let Some(node) = node else {
        return json!({ "type": "any" });
    };

    match node {
        TypeNode::Named(name) if name.starts_with(REFERENCE_SIGIL) => json!({ "$ref": name }),
        TypeNode::Named(name) => json!({ "type": name }),
        TypeNode::Literal { value, children } => json!({
            "enum": [value],
            "type": literal_type(value, children.first()),
        }),
        TypeNode::Record(children) => json!({
            "type": "object",
            "additionalProperties": serialize(children.first()),
        }),
        TypeNode::Array(children) => json!({
            "type": "array",
            "items": children.first().map_or_else(|| json!({}), |child| serialize(Some(child))),
        }),
        TypeNode::Union(children) => json!({ "anyOf": serialize_all(children) }),
        TypeNode::Intersection(children) => json!({ "allOf": serialize_all(children) }),
        TypeNode::Wrapped { children, .. } if !children.is_empty() => serialize(children.first()),
        TypeNode::Wrapped { .. } => closed_object(Map::new()),
        TypeNode::Composite(fields) => closed_object(
            fields
                .iter()
                .map(|(name, child)| (name.clone(), serialize(Some(child))))
                .collect(),
        ),
    }
}

fn serialize_all(children: &[TypeNode]) -> Vec<Value> {
    children.iter().map(|child| serialize(Some(child))).collect()
}

fn closed_object(properties: Map<String, Value>) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "additionalProperties": false,
    })
}

/// Primitive type of a literal: the first child's name, else the JSON kind
/// of the value itself.
fn literal_type(value: &Value, first: Option<&TypeNode>) -> Value {
    match first {
        Some(TypeNode::Named(name)) => Value::String(name.clone()),
        // A non-named first child carries its type in its own schema
        Some(other) => serialize(Some(other))
            .get("type")
            .cloned()
            .unwrap_or_else(|| json_kind(value)),
        None => json_kind(value),
    }
}

fn json_kind(value: &Value) -> Value {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    Value::String(kind.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_node_is_any() {
        assert_eq!(serialize(None), json!({ "type": "any" }));
    }

    #[test]
    fn named_nodes_split_on_reference_sigil() {
        assert_eq!(
            serialize(Some(&TypeNode::named("#/components/schemas/Item"))),
            json!({ "$ref": "#/components/schemas/Item" })
        );
        assert_eq!(
            serialize(Some(&TypeNode::named("string"))),
            json!({ "type": "string" })
        );
    }

    #[test]
    fn literal_uses_first_child_as_type() {
        assert_eq!(
            serialize(Some(&TypeNode::literal("active", "string"))),
            json!({ "enum": ["active"], "type": "string" })
        );
    }

    #[test]
    fn literal_without_children_falls_back_to_value_kind() {
        let node = TypeNode::Literal {
            value: json!(3),
            children: vec![],
        };
        assert_eq!(
            serialize(Some(&node)),
            json!({ "enum": [3], "type": "integer" })
        );
    }

    #[test]
    fn record_serializes_value_type() {
        assert_eq!(
            serialize(Some(&TypeNode::record(TypeNode::named("number")))),
            json!({ "type": "object", "additionalProperties": { "type": "number" } })
        );
    }

    #[test]
    fn record_without_child_allows_any_value() {
        assert_eq!(
            serialize(Some(&TypeNode::Record(vec![]))),
            json!({ "type": "object", "additionalProperties": { "type": "any" } })
        );
    }

    #[test]
    fn empty_array_has_unconstrained_items() {
        assert_eq!(
            serialize(Some(&TypeNode::Array(vec![]))),
            json!({ "type": "array", "items": {} })
        );
    }

    #[test]
    fn single_member_union_and_intersection_stay_lists() {
        assert_eq!(
            serialize(Some(&TypeNode::Union(vec![TypeNode::named("string")]))),
            json!({ "anyOf": [{ "type": "string" }] })
        );
        assert_eq!(
            serialize(Some(&TypeNode::Intersection(vec![TypeNode::named("#/A")]))),
            json!({ "allOf": [{ "$ref": "#/A" }] })
        );
        assert_eq!(
            serialize(Some(&TypeNode::Union(vec![]))),
            json!({ "anyOf": [] })
        );
    }

    #[test]
    fn wrapped_node_takes_only_first_child() {
        let node = TypeNode::Wrapped {
            kind: "optional".to_string(),
            children: vec![TypeNode::named("string"), TypeNode::named("number")],
        };
        assert_eq!(serialize(Some(&node)), json!({ "type": "string" }));
    }

    #[test]
    fn wrapped_node_without_children_is_empty_object() {
        let node = TypeNode::Wrapped {
            kind: "list".to_string(),
            children: vec![],
        };
        assert_eq!(
            serialize(Some(&node)),
            json!({ "type": "object", "properties": {}, "additionalProperties": false })
        );
    }

    #[test]
    fn composite_is_closed_and_ordered() {
        let node = TypeNode::composite([
            ("name", TypeNode::named("string")),
            ("tags", TypeNode::array(TypeNode::named("string"))),
            ("meta", TypeNode::record(TypeNode::named("any"))),
        ]);

        let schema = serialize(Some(&node));
        assert_eq!(schema["additionalProperties"], json!(false));
        let keys: Vec<_> = schema["properties"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["name", "tags", "meta"]);
    }

    #[test]
    fn output_never_contains_internal_tags() {
        let node = TypeNode::Union(vec![
            TypeNode::Wrapped {
                kind: "branded".to_string(),
                children: vec![TypeNode::array(TypeNode::Array(vec![]))],
            },
            TypeNode::Intersection(vec![TypeNode::composite([(
                "id",
                TypeNode::literal(1, "integer"),
            )])]),
        ]);

        let text = serialize(Some(&node)).to_string();
        assert!(!text.contains("\"kind\""));
        assert!(!text.contains("\"children\""));
        assert!(!text.contains("branded"));
    }
}
