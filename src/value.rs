//! Host values - The dynamic object model the reference graph reads through.
//!
//! Templates bind against ordinary host values. A `Value` is either a
//! primitive, an immutable [`Dict`] (named-argument snapshots), or an
//! [`ObjectRef`] whose properties are declared by a static schema.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::tracked::ObjectRef;

/// Property key type. Cheap to clone, shared between metas and references.
pub type PropertyKey = Rc<str>;

// =============================================================================
// Value
// =============================================================================

/// A host value as seen by templates.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value ("no value").
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    /// Immutable keyed mapping, e.g. a named-arguments snapshot.
    Dict(Dict),
    /// Tracked host object.
    Object(ObjectRef),
}

impl Value {
    /// Identity comparison used by `UpdatableReference::update`.
    ///
    /// Objects and dicts compare by identity, primitives by value.
    /// NaN is never the same as anything, itself included.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Host truthiness, used when a value drives a condition.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Dict(_) | Value::Object(_) => true,
        }
    }

    /// Read a property off this value.
    ///
    /// Strings answer `length`, dicts answer their entries, objects read
    /// through their accessors. Anything else has no properties.
    pub fn get_property(&self, key: &str) -> Value {
        match self {
            Value::String(s) if key == "length" => Value::Number(utf16_len(s) as f64),
            Value::Dict(dict) => dict.get(key).cloned().unwrap_or_default(),
            Value::Object(object) => object.get(key),
            _ => Value::Undefined,
        }
    }

    /// The object behind this value, if it is one.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }
}

fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Structural equality, used by tests and snapshot comparison.
///
/// Unlike [`Value::same`], dicts compare by content.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Dict(a), Value::Dict(b)) => a == b,
            _ => self.same(other),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Dict(d) => fmt::Debug::fmt(d, f),
            Value::Object(o) => fmt::Display::fmt(o, f),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value.into())
    }
}

impl From<Dict> for Value {
    fn from(value: Dict) -> Self {
        Value::Dict(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Value::Object(value)
    }
}

// =============================================================================
// Dict
// =============================================================================

/// Immutable keyed mapping. Cloning shares the underlying map.
#[derive(Clone, Default, PartialEq)]
pub struct Dict(Rc<BTreeMap<PropertyKey, Value>>);

impl Dict {
    pub fn new(entries: BTreeMap<PropertyKey, Value>) -> Self {
        Self(Rc::new(entries))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey, &Value)> {
        self.0.iter()
    }

    pub fn ptr_eq(&self, other: &Dict) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<K: Into<PropertyKey>, V: Into<Value>> FromIterator<(K, V)> for Dict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Debug for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Undefined, false)]
    #[case(Value::Null, false)]
    #[case(Value::Bool(false), false)]
    #[case(Value::Number(0.0), false)]
    #[case(Value::Number(f64::NAN), false)]
    #[case(Value::from(""), false)]
    #[case(Value::Bool(true), true)]
    #[case(Value::Number(-1.5), true)]
    #[case(Value::from("0"), true)]
    #[case(Value::Dict(Dict::default()), true)]
    fn test_truthiness(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(value.is_truthy(), expected);
    }

    #[test]
    fn test_string_length_property() {
        assert_eq!(Value::from("hello").get_property("length"), Value::Number(5.0));
        assert!(Value::from("hello").get_property("size").is_undefined());
        assert!(Value::Number(3.0).get_property("length").is_undefined());
    }

    #[test]
    fn test_dict_identity_vs_equality() {
        let a: Dict = [("x", 1)].into_iter().collect();
        let b: Dict = [("x", 1)].into_iter().collect();

        assert_eq!(Value::Dict(a.clone()), Value::Dict(b.clone()));
        assert!(!Value::Dict(a.clone()).same(&Value::Dict(b)));
        assert!(Value::Dict(a.clone()).same(&Value::Dict(a)));
    }

    #[test]
    fn test_nan_is_never_same() {
        let nan = Value::Number(f64::NAN);
        assert!(!nan.same(&nan.clone()));
    }
}
