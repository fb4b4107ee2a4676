//! Parse results with shared children.
//!
//! The memo table keeps the result of every rule at every position. If each
//! entry owned a plain [`Value`], every level of nesting would hold its own
//! copy of the subtree beneath it. A [`Node`] holds its children behind
//! [`Shared`] handles instead, so a container reuses the nodes its inner
//! rules already stored and a memo hit costs a reference count.
use std::sync::Arc;

use indexmap::IndexMap;

use crate::value::{Map, Value};

pub type Shared = Arc<Node>;

/// Object members as shared nodes, in insertion order.
pub type Members = IndexMap<String, Shared>;

/// A parsed JSON value whose containers share their children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A string, number, boolean or `null`. Never holds a container.
    Scalar(Value),
    Array(Vec<Shared>),
    Object(Members),
}

impl Node {
    #[must_use]
    pub fn shared(self) -> Shared {
        Arc::new(self)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Builds an owned [`Value`], copying each leaf once.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Node::Scalar(value) => value.clone(),
            Node::Array(items) => Value::Array(items.iter().map(|item| item.to_value()).collect()),
            Node::Object(members) => Value::Object(
                members
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_value()))
                    .collect::<Map>(),
            ),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Node::Array(items.into_iter().map(|item| Node::from(item).shared()).collect()),
            Value::Object(map) => Node::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Node::from(value).shared()))
                    .collect(),
            ),
            scalar => Node::Scalar(scalar),
        }
    }
}
