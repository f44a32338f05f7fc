//! Field enumeration capability.
//!
//! The walker never inspects concrete types. Anything that can describe
//! itself as a scalar, a named-field object or an ordered sequence can be
//! filtered by implementing [`Inspect`].

use serde_json::Value;

/// Stable identity of a composite value, used for cycle detection.
///
/// Typically the address of the shared allocation. Two occurrences of the
/// same type at different paths have different identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Identity derived from a pointer.
    #[must_use]
    pub fn of<T: ?Sized>(ptr: *const T) -> Self {
        Self(ptr.cast::<()>() as usize)
    }
}

/// One level of a value, as seen by the walker.
#[derive(Debug, Clone)]
pub enum View<N> {
    /// Leaf value, copied as-is when kept.
    Scalar(Value),
    /// Named fields in declaration order.
    Object(Vec<(String, N)>),
    /// Ordered elements (lists, sets, arrays).
    Sequence(Vec<N>),
}

impl<N> View<N> {
    /// Returns true for objects and sequences.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        !matches!(self, Self::Scalar(_))
    }
}

/// Exposes a value's structure to the walker.
///
/// Implementors are cheap handles (references, `Arc` clones) because views
/// hand out owned children.
pub trait Inspect: Sized {
    /// Identity of this value if it is a shared composite that could take
    /// part in a cycle. Plain values return `None`.
    fn identity(&self) -> Option<NodeId>;

    /// Describes this value one level deep.
    fn view(&self) -> View<Self>;

    /// Returns true if [`view`](Self::view) would yield an object or sequence.
    fn is_composite(&self) -> bool {
        self.view().is_composite()
    }
}

impl<'a> Inspect for &'a Value {
    fn identity(&self) -> Option<NodeId> {
        let value: &Value = *self;
        match value {
            Value::Object(_) | Value::Array(_) => Some(NodeId::of(std::ptr::from_ref(value))),
            _ => None,
        }
    }

    fn view(&self) -> View<Self> {
        let value: &'a Value = *self;
        match value {
            Value::Object(map) => View::Object(map.iter().map(|(k, v)| (k.clone(), v)).collect()),
            Value::Array(items) => View::Sequence(items.iter().collect()),
            scalar => View::Scalar(scalar.clone()),
        }
    }

    fn is_composite(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_))
    }
}
