//! Shared object graphs.
//!
//! [`serde_json::Value`] trees can't alias, so they can't express a value
//! reused at two paths or an object reachable from itself. [`Node`] can:
//! objects are reference-counted and interior-mutable, so the same
//! [`ObjectRef`] may be attached in several places, including beneath itself.

use crate::node::{Inspect, NodeId, View};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// A value in a shared object graph.
#[derive(Debug, Clone)]
pub enum Node {
    /// Leaf value.
    Scalar(Value),
    /// Ordered elements.
    List(Vec<Node>),
    /// Shared object with named fields.
    Object(ObjectRef),
}

impl Node {
    /// Creates a fresh empty object node.
    #[must_use]
    pub fn object() -> Self {
        Self::Object(ObjectRef::new())
    }

    /// Creates a scalar node.
    #[must_use]
    pub fn scalar(value: impl Into<Value>) -> Self {
        Self::Scalar(value.into())
    }

    /// Returns the object handle, if this is an object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Converts a JSON tree into a graph with no sharing.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                let obj = ObjectRef::new();
                for (k, v) in map {
                    obj.set(k.clone(), Self::from_json(v));
                }
                Self::Object(obj)
            }
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            scalar => Self::Scalar(scalar.clone()),
        }
    }
}

impl From<ObjectRef> for Node {
    fn from(obj: ObjectRef) -> Self {
        Self::Object(obj)
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Self::from_json(&value)
    }
}

/// Handle to a shared, mutable object. Cloning shares the object.
#[derive(Clone, Default)]
pub struct ObjectRef {
    fields: Arc<RwLock<Vec<(String, Node)>>>,
}

impl ObjectRef {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing an existing one with the same name in place.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Node>) {
        let name = name.into();
        let value = value.into();
        let mut fields = self.fields.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = fields.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            fields.push((name, value));
        }
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(self, name: impl Into<String>, value: impl Into<Node>) -> Self {
        self.set(name, value);
        self
    }

    /// Returns a handle to a field's value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Node> {
        self.snapshot()
            .into_iter()
            .find_map(|(k, v)| (k == name).then_some(v))
    }

    /// Returns the field names in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Returns true if both handles point at the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }

    /// Identity of the shared allocation.
    #[must_use]
    pub fn id(&self) -> NodeId {
        NodeId::of(Arc::as_ptr(&self.fields))
    }

    fn snapshot(&self) -> Vec<(String, Node)> {
        self.fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// Field values may point back at this object, so only names are printed.
impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("id", &self.id())
            .field("keys", &self.keys())
            .finish()
    }
}

impl Inspect for Node {
    fn identity(&self) -> Option<NodeId> {
        match self {
            Self::Object(obj) => Some(obj.id()),
            Self::Scalar(_) | Self::List(_) => None,
        }
    }

    fn view(&self) -> View<Self> {
        match self {
            Self::Scalar(value) => View::Scalar(value.clone()),
            Self::List(items) => View::Sequence(items.clone()),
            Self::Object(obj) => View::Object(obj.snapshot()),
        }
    }

    fn is_composite(&self) -> bool {
        !matches!(self, Self::Scalar(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_replaces_in_place() {
        let obj = ObjectRef::new().with("a", json!(1)).with("b", json!(2));
        obj.set("a", json!(3));
        assert_eq!(obj.keys(), ["a", "b"]);
        assert!(matches!(obj.get("a"), Some(Node::Scalar(v)) if v == json!(3)));
    }

    #[test]
    fn test_self_reference_shares_identity() {
        let node = ObjectRef::new().with("value", json!(1));
        node.set("next", node.clone());

        let Some(Node::Object(next)) = node.get("next") else {
            panic!("expected object");
        };
        assert!(next.ptr_eq(&node));
        assert_eq!(Node::from(next).identity(), Some(node.id()));
    }

    #[test]
    fn test_debug_does_not_recurse() {
        let node = ObjectRef::new();
        node.set("me", node.clone());
        let rendered = format!("{node:?}");
        assert!(rendered.contains("me"));
    }

    #[test]
    fn test_from_json_has_distinct_objects() {
        let node = Node::from_json(&json!({"x": {"k": 1}, "y": {"k": 1}}));
        let obj = node.as_object().unwrap();
        let x = obj.get("x").unwrap().identity();
        let y = obj.get("y").unwrap().identity();
        assert!(x.is_some());
        assert_ne!(x, y);
    }
}
