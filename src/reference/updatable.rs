//! Updatable references - Root values pushed in from outside the graph.

use std::cell::RefCell;
use std::rc::Rc;

use crate::tag::{DirtyableTag, Tag};
use crate::value::Value;

use super::property::PropertyReference;
use super::{PathRef, PathReference};

/// Externally settable root value with its own dirtyable tag.
pub struct UpdatableReference {
    tag: DirtyableTag,
    value: RefCell<Value>,
}

impl UpdatableReference {
    pub fn new(value: Value) -> Self {
        Self {
            tag: DirtyableTag::new(),
            value: RefCell::new(value),
        }
    }

    /// Replace the stored value.
    ///
    /// No-op when the new value is the same value (identity for objects).
    pub fn update(&self, value: Value) {
        if self.value.borrow().same(&value) {
            return;
        }
        self.tag.dirty();
        *self.value.borrow_mut() = value;
    }
}

impl PathReference for UpdatableReference {
    fn tag(&self) -> Tag {
        self.tag.tag()
    }

    fn value(&self) -> Value {
        self.value.borrow().clone()
    }

    fn get(self: Rc<Self>, key: &str) -> PathRef {
        PropertyReference::create(self, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_skips_same_value() {
        let reference = UpdatableReference::new(Value::Number(1.0));
        let tag = reference.tag();
        let snapshot = tag.value();

        reference.update(Value::Number(1.0));
        assert!(tag.validate(snapshot));

        reference.update(Value::Number(2.0));
        assert!(!tag.validate(snapshot));
        assert_eq!(reference.value(), Value::Number(2.0));
    }

    #[test]
    fn test_update_with_equal_but_distinct_dict_dirties() {
        use crate::value::Dict;

        let first: Dict = [("a", 1)].into_iter().collect();
        let second: Dict = [("a", 1)].into_iter().collect();
        let reference = UpdatableReference::new(first.clone().into());
        let snapshot = reference.tag().value();

        reference.update(first.into());
        assert!(reference.tag().validate(snapshot));

        reference.update(second.into());
        assert!(!reference.tag().validate(snapshot));
    }
}
