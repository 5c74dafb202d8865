//! Core types shared by the binding and the host runtime.
//!
//! - [`Node`] - render output
//! - [`OutputHandle`] / [`InstanceId`] - identities handed out by the host
//! - [`PropValue`] / [`Props`] - dynamically typed props with reference semantics
//! - [`StateRef`] - state container compared by reference

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use spark_signals::Signal;

// =============================================================================
// Identities
// =============================================================================

/// Identity of a mounted component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub usize);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle of the output a mounted instance renders into.
///
/// Stable for the lifetime of the instance; the devtools registry maps it back
/// to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputHandle(pub usize);

// =============================================================================
// Node - render output
// =============================================================================

/// Output of a render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Node {
    /// Renders nothing.
    #[default]
    Empty,
    /// A run of text.
    Text(String),
    /// A tagged element with children.
    Element { tag: String, children: Vec<Node> },
}

impl Node {
    /// Text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Element node.
    pub fn element(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Self::Element {
            tag: tag.into(),
            children,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Empty => Ok(()),
            Node::Text(text) => f.write_str(text),
            Node::Element { tag, children } => {
                write!(f, "<{tag}>")?;
                for child in children {
                    write!(f, "{child}")?;
                }
                write!(f, "</{tag}>")
            }
        }
    }
}

// =============================================================================
// PropValue
// =============================================================================

/// A single prop value.
///
/// Primitives compare by value. `Object` and `Observable` compare by reference:
/// two values are the same only if they share one allocation.
#[derive(Clone, Default)]
pub enum PropValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    /// Plain (non-reactive) object. May be mutated in place behind the tracker's back.
    Object(Rc<dyn Any>),
    /// Reactive value, e.g. a `Signal<T>`. Reads through it are tracked.
    Observable(Rc<dyn Any>),
}

impl PropValue {
    /// Wrap an arbitrary value as a plain object prop.
    pub fn object<T: 'static>(value: T) -> Self {
        PropValue::Object(Rc::new(value))
    }

    /// Wrap a reactive value as an observable prop.
    pub fn observable<T: 'static>(value: T) -> Self {
        PropValue::Observable(Rc::new(value))
    }

    /// True for `Null`, `Bool`, `Int`, `Float` and `Str`.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, PropValue::Object(_) | PropValue::Observable(_))
    }

    /// True for `Observable`.
    pub fn is_observable(&self) -> bool {
        matches!(self, PropValue::Observable(_))
    }

    /// Identity comparison: primitives by value, objects by allocation.
    pub fn same(&self, other: &PropValue) -> bool {
        match (self, other) {
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => a == b,
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::Object(a), PropValue::Object(b)) => Rc::ptr_eq(a, b),
            (PropValue::Observable(a), PropValue::Observable(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow an object or observable payload as `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            PropValue::Object(v) | PropValue::Observable(v) => v.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Clone the signal held by an observable prop.
    pub fn signal<T: Clone + PartialEq + 'static>(&self) -> Option<Signal<T>> {
        match self {
            PropValue::Observable(v) => v.downcast_ref::<Signal<T>>().cloned(),
            _ => None,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Null => f.write_str("Null"),
            PropValue::Bool(v) => write!(f, "Bool({v})"),
            PropValue::Int(v) => write!(f, "Int({v})"),
            PropValue::Float(v) => write!(f, "Float({v})"),
            PropValue::Str(v) => write!(f, "Str({v:?})"),
            PropValue::Object(v) => write!(f, "Object({:p})", Rc::as_ptr(v)),
            PropValue::Observable(v) => write!(f, "Observable({:p})", Rc::as_ptr(v)),
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Int(value as i64)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(Rc::from(value))
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(Rc::from(value))
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue {
    fn from(signal: Signal<T>) -> Self {
        PropValue::observable(signal)
    }
}

// =============================================================================
// Props
// =============================================================================

/// Props container: unique keys mapped to values.
#[derive(Debug, Clone, Default)]
pub struct Props {
    values: HashMap<String, PropValue>,
}

/// Context entries are stored the same way as props.
pub type Context = Props;

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Option<PropValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fill in every key of `defaults` that is missing here.
    pub fn apply_defaults(&mut self, defaults: &Props) {
        for (key, value) in &defaults.values {
            self.values
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
}

// =============================================================================
// StateRef
// =============================================================================

/// Optional component state, compared by reference.
#[derive(Clone, Default)]
pub struct StateRef(Option<Rc<dyn Any>>);

impl StateRef {
    /// No state.
    pub fn none() -> Self {
        Self(None)
    }

    /// Fresh state allocation.
    pub fn new<T: 'static>(value: T) -> Self {
        Self(Some(Rc::new(value)))
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// True if both refer to the same allocation (or both are empty).
    pub fn same(&self, other: &StateRef) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_ref().and_then(|v| v.downcast_ref::<T>())
    }
}

impl fmt::Debug for StateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => f.write_str("StateRef(None)"),
            Some(v) => write!(f, "StateRef({:p})", Rc::as_ptr(v)),
        }
    }
}
