//! Interop with `serde` / `serde_json`.
//!
//! [`Node`] implements `Serialize`, so any serde format can consume a tree
//! (`serde_json::to_value(&node)`), and [`Node::from_json`] builds a tree from
//! a `serde_json::Value`. Object labels have no JSON counterpart and are not
//! serialized.

use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{Result, SjrError};
use crate::node::{Kind, Node, Scalar};

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if let Some(scalar) = self.scalar() {
            return match scalar {
                Scalar::Bool(b) => serializer.serialize_bool(*b),
                Scalar::Int(i) => serializer.serialize_i64(*i),
                Scalar::Float(f) => serializer.serialize_f64(*f),
                Scalar::Str(s) => serializer.serialize_str(s),
            };
        }
        match self.kind() {
            Kind::Array => serializer.collect_seq(self.elements()),
            _ => serializer.collect_map(self.children()),
        }
    }
}

impl Node {
    /// Build a tree from a JSON value.
    ///
    /// JSON `null` has no SJR counterpart and is rejected, as are unsigned
    /// integers above `i64::MAX`.
    pub fn from_json(value: &Value) -> Result<Node> {
        match value {
            Value::Null => Err(SjrError::Serialize("null has no SJR representation".into())),
            Value::Bool(b) => Ok(Node::from(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Node::from(i))
                } else if n.is_u64() {
                    Err(SjrError::Serialize(format!("integer {n} does not fit in 64 bits")))
                } else {
                    n.as_f64()
                        .map(Node::from)
                        .ok_or_else(|| SjrError::Serialize(format!("unrepresentable number {n}")))
                }
            }
            Value::String(s) => Ok(Node::from(s.as_str())),
            Value::Array(items) => {
                let mut node = Node::array();
                for item in items {
                    node.push(Node::from_json(item)?);
                }
                Ok(node)
            }
            Value::Object(map) => {
                let mut node = Node::object();
                for (key, item) in map {
                    node.insert(key.as_str(), Node::from_json(item)?);
                }
                Ok(node)
            }
        }
    }

    /// Convert the tree to a JSON value.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
