//! Constant references - Root and primitive references that never change.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::tag::Tag;
use crate::value::{PropertyKey, Value};

use super::property::{RootProperty, RootPropertyReference};
use super::{PathRef, PathReference};

/// Constant reference over a concrete value, e.g. a component instance.
///
/// Child property references are created once per key and shared.
pub struct RootReference {
    inner: Value,
    children: RefCell<HashMap<PropertyKey, PathRef>>,
}

impl RootReference {
    pub fn new(inner: Value) -> Self {
        Self {
            inner,
            children: RefCell::new(HashMap::new()),
        }
    }
}

impl PathReference for RootReference {
    fn tag(&self) -> Tag {
        Tag::constant()
    }

    fn value(&self) -> Value {
        self.inner.clone()
    }

    fn get(self: Rc<Self>, key: &str) -> PathRef {
        if let Some(child) = self.children.borrow().get(key) {
            return child.clone();
        }
        let child: PathRef = Rc::new(RootPropertyReference::new(RootProperty::new(
            self.inner.clone(),
            key,
        )));
        self.children
            .borrow_mut()
            .insert(key.into(), child.clone());
        child
    }
}

/// Constant reference to a primitive value.
pub struct PrimitiveReference {
    value: Value,
}

impl PrimitiveReference {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl PathReference for PrimitiveReference {
    fn tag(&self) -> Tag {
        Tag::constant()
    }

    fn value(&self) -> Value {
        self.value.clone()
    }

    fn get(self: Rc<Self>, key: &str) -> PathRef {
        let child = match &self.value {
            Value::String(_) if key == "length" => self.value.get_property(key),
            _ => Value::Undefined,
        };
        Rc::new(PrimitiveReference::new(child))
    }
}
