//! Conditional references - Any reference collapsed to a boolean.

use std::rc::Rc;

use crate::tag::Tag;
use crate::value::Value;

use super::cached::{CachedReference, Compute};
use super::constant::PrimitiveReference;
use super::PathRef;

/// Truthiness of another reference's value.
pub struct Conditional {
    inner: PathRef,
}

impl Compute for Conditional {
    fn tag(&self) -> Tag {
        self.inner.tag()
    }

    fn compute(&self) -> Value {
        Value::Bool(self.inner.value().is_truthy())
    }
}

pub type ConditionalReference = CachedReference<Conditional>;

impl CachedReference<Conditional> {
    /// Reference usable as a condition.
    ///
    /// A constant source is folded once into a primitive boolean; otherwise
    /// truthiness is re-derived whenever the source's tag moves.
    pub fn create(reference: PathRef) -> PathRef {
        if reference.tag().is_const() {
            let value = reference.value().is_truthy();
            return Rc::new(PrimitiveReference::new(Value::Bool(value)));
        }
        Rc::new(CachedReference::new(Conditional { inner: reference }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{RootReference, UpdatableReference};
    use crate::tag::TagKind;

    #[test]
    fn test_constant_source_folds() {
        let source: PathRef = Rc::new(RootReference::new(Value::from("yes")));
        let condition = ConditionalReference::create(source);
        assert_eq!(condition.tag().kind(), TagKind::Constant);
        assert_eq!(condition.value(), Value::Bool(true));

        let empty: PathRef = Rc::new(PrimitiveReference::new(Value::from("")));
        assert_eq!(ConditionalReference::create(empty).value(), Value::Bool(false));
    }

    #[test]
    fn test_changing_source_rederives() {
        let source = Rc::new(UpdatableReference::new(Value::Number(0.0)));
        let condition = ConditionalReference::create(source.clone());
        assert_eq!(condition.value(), Value::Bool(false));

        source.update(Value::Number(3.0));
        assert_eq!(condition.value(), Value::Bool(true));

        source.update(Value::Null);
        assert_eq!(condition.value(), Value::Bool(false));
    }
}
