//! Structural type model.
//!
//! A [`TypeNode`] describes the shape of a piece of data independently of any
//! schema language. Response types are declared with it and the OpenAPI side
//! of `apiscribe-gen` turns it into JSON Schema.
//!
//! ## Wire format
//!
//! Nodes are read from JSON/YAML with a fixed priority order:
//!
//! | Input | Node |
//! |-------|------|
//! | `"#/Item"`, `"string"` | [`TypeNode::Named`] |
//! | `{"kind": "literal", "value": .., "children": [..]}` | [`TypeNode::Literal`] |
//! | `{"kind": "record" \| "array" \| "union" \| "intersection", "children": [..]}` | matching variant |
//! | `{"kind": <other>, "children": [<non-empty>]}` | [`TypeNode::Wrapped`] |
//! | any other object | [`TypeNode::Composite`] over its fields |
//!
//! ## Examples
//!
//! ```
//! use apiscribe_define::TypeNode;
//! use serde_json::json;
//!
//! let node: TypeNode = serde_json::from_value(json!({
//!     "items": { "kind": "array", "children": ["#/Item"] }
//! }))
//! .unwrap();
//!
//! let TypeNode::Composite(fields) = &node else { panic!("expected composite") };
//! assert_eq!(fields["items"], TypeNode::array(TypeNode::named("#/Item")));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix marking a [`TypeNode::Named`] value as a schema reference.
pub const REFERENCE_SIGIL: char = '#';

/// A recursive description of a data shape.
///
/// Every non-composite kind keeps its children in an ordered list, even the
/// kinds that only ever read the first one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum TypeNode {
    /// Either a schema reference (`#...`) or a primitive type name.
    Named(String),
    /// A single fixed value; the first child names its primitive type.
    Literal {
        value: Value,
        children: Vec<TypeNode>,
    },
    /// String-keyed map; the first child is the value type.
    Record(Vec<TypeNode>),
    /// List; the first child, when present, is the element type.
    Array(Vec<TypeNode>),
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    /// A node of an unrecognized kind that still exposes children.
    Wrapped {
        kind: String,
        children: Vec<TypeNode>,
    },
    /// Plain object keyed by field name, in declaration order.
    Composite(IndexMap<String, TypeNode>),
}

impl TypeNode {
    /// Creates a [`TypeNode::Named`] node.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Creates a reference node, adding the `#` sigil when missing.
    ///
    /// ```
    /// use apiscribe_define::TypeNode;
    ///
    /// assert_eq!(TypeNode::reference("/Item"), TypeNode::named("#/Item"));
    /// assert_eq!(TypeNode::reference("#/Item"), TypeNode::named("#/Item"));
    /// ```
    pub fn reference(target: impl Into<String>) -> Self {
        let target = target.into();
        if target.starts_with(REFERENCE_SIGIL) {
            Self::Named(target)
        } else {
            Self::Named(format!("{REFERENCE_SIGIL}{target}"))
        }
    }

    /// Creates a literal of the given primitive type.
    pub fn literal(value: impl Into<Value>, primitive: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            children: vec![Self::named(primitive)],
        }
    }

    /// Creates a record whose values have type `value`.
    pub fn record(value: TypeNode) -> Self {
        Self::Record(vec![value])
    }

    /// Creates an array whose elements have type `element`.
    pub fn array(element: TypeNode) -> Self {
        Self::Array(vec![element])
    }

    /// Creates a composite from `(field, type)` pairs.
    pub fn composite<K: Into<String>>(fields: impl IntoIterator<Item = (K, TypeNode)>) -> Self {
        Self::Composite(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns true when this is a `#` reference.
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Named(name) if name.starts_with(REFERENCE_SIGIL))
    }
}

impl From<Value> for TypeNode {
    fn from(value: Value) -> Self {
        match value {
            Value::String(name) => Self::Named(name),
            Value::Null => Self::named("any"),
            Value::Array(items) => Self::Wrapped {
                kind: "list".to_string(),
                children: items.into_iter().map(Self::from).collect(),
            },
            Value::Object(fields) => from_object(fields),
            scalar => Self::Literal {
                value: scalar,
                children: vec![],
            },
        }
    }
}

fn from_object(mut fields: Map<String, Value>) -> TypeNode {
    let kind = fields
        .get("kind")
        .and_then(Value::as_str)
        .map(str::to_owned);
    let has_children = matches!(fields.get("children"), Some(Value::Array(items)) if !items.is_empty());

    let Some(kind) = kind else {
        return composite_from(fields);
    };

    match kind.as_str() {
        "literal" => TypeNode::Literal {
            value: fields.remove("value").unwrap_or(Value::Null),
            children: take_children(&mut fields),
        },
        "record" => TypeNode::Record(take_children(&mut fields)),
        "array" => TypeNode::Array(take_children(&mut fields)),
        "union" => TypeNode::Union(take_children(&mut fields)),
        "intersection" => TypeNode::Intersection(take_children(&mut fields)),
        _ if has_children => TypeNode::Wrapped {
            kind: kind.clone(),
            children: take_children(&mut fields),
        },
        _ => composite_from(fields),
    }
}

fn take_children(fields: &mut Map<String, Value>) -> Vec<TypeNode> {
    match fields.remove("children") {
        Some(Value::Array(items)) => items.into_iter().map(TypeNode::from).collect(),
        _ => vec![],
    }
}

fn composite_from(fields: Map<String, Value>) -> TypeNode {
    TypeNode::Composite(
        fields
            .into_iter()
            .map(|(name, value)| (name, TypeNode::from(value)))
            .collect(),
    )
}

impl From<TypeNode> for Value {
    fn from(node: TypeNode) -> Self {
        fn tagged(kind: &str, children: Vec<TypeNode>) -> Value {
            let children: Vec<Value> = children.into_iter().map(Value::from).collect();
            serde_json::json!({ "kind": kind, "children": children })
        }

        match node {
            TypeNode::Named(name) => Value::String(name),
            TypeNode::Literal { value, children } => {
                let mut out = tagged("literal", children);
                out["value"] = value;
                out
            }
            TypeNode::Record(children) => tagged("record", children),
            TypeNode::Array(children) => tagged("array", children),
            TypeNode::Union(children) => tagged("union", children),
            TypeNode::Intersection(children) => tagged("intersection", children),
            TypeNode::Wrapped { kind, children } => tagged(&kind, children),
            TypeNode::Composite(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(name, node)| (name, Value::from(node)))
                    .collect(),
            ),
        }
    }
}
