//! Cached references - Memoised computation guarded by a tag.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::tag::{Revision, Tag};
use crate::value::Value;

use super::property::{NestedProperty, PropertyReference};
use super::{PathRef, PathReference};

/// The computation a [`CachedReference`] memoises.
pub trait Compute {
    /// Tag guarding the computed value.
    fn tag(&self) -> Tag;

    /// Produce the current value. Must not write to host objects.
    fn compute(&self) -> Value;

    /// Children read through this reference on every recompute, even while
    /// its tag is constant.
    fn always_nests(&self) -> bool {
        false
    }
}

/// Memoising reference.
///
/// `value()` recomputes only when nothing was computed yet or the tag fails
/// validation against the revision captured after the last computation.
pub struct CachedReference<C> {
    inner: C,
    last_revision: Cell<Option<Revision>>,
    last_value: RefCell<Value>,
}

impl<C: Compute> CachedReference<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            last_revision: Cell::new(None),
            last_value: RefCell::new(Value::Undefined),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn value(&self) -> Value {
        let tag = self.inner.tag();
        if let Some(last) = self.last_revision.get() {
            if tag.validate(last) {
                return self.last_value.borrow().clone();
            }
        }

        let value = self.inner.compute();
        let revision = tag.value();
        tracing::trace!(?revision, "recomputed reference");
        self.last_revision.set(Some(revision));
        *self.last_value.borrow_mut() = value.clone();
        value
    }
}

impl<C: Compute + 'static> PathReference for CachedReference<C> {
    fn tag(&self) -> Tag {
        self.inner.tag()
    }

    fn value(&self) -> Value {
        CachedReference::value(self)
    }

    fn get(self: Rc<Self>, key: &str) -> PathRef {
        if self.inner.always_nests() {
            return Rc::new(CachedReference::new(NestedProperty::new(self, key)));
        }
        PropertyReference::create(self, key)
    }
}

// =============================================================================
// Closure-backed computation
// =============================================================================

/// A tag plus a closure, for references built outside the property graph.
pub struct FnCompute {
    tag: Tag,
    compute: Box<dyn Fn() -> Value>,
}

impl Compute for FnCompute {
    fn tag(&self) -> Tag {
        self.tag.clone()
    }

    fn compute(&self) -> Value {
        (self.compute)()
    }
}

/// Cached reference over a closure.
pub type FnReference = CachedReference<FnCompute>;

impl CachedReference<FnCompute> {
    pub fn from_fn(tag: Tag, compute: impl Fn() -> Value + 'static) -> Self {
        Self::new(FnCompute {
            tag,
            compute: Box::new(compute),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::{DirtyableTag, TagKind};

    fn counting(tag: Tag) -> (FnReference, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let reference = FnReference::from_fn(tag, move || {
            c.set(c.get() + 1);
            Value::Number(f64::from(c.get()))
        });
        (reference, calls)
    }

    #[test]
    fn test_memoizes_while_tag_valid() {
        let dirtyable = DirtyableTag::new();
        let (reference, calls) = counting(dirtyable.tag());

        let first = reference.value();
        let second = reference.value();
        assert_eq!(calls.get(), 1);
        assert!(first.same(&second));
    }

    #[test]
    fn test_recomputes_after_dirty() {
        let dirtyable = DirtyableTag::new();
        let (reference, calls) = counting(dirtyable.tag());

        reference.value();
        dirtyable.dirty();
        assert_eq!(reference.value(), Value::Number(2.0));
        assert_eq!(calls.get(), 2);
        reference.value();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_unrelated_dirty_does_not_recompute() {
        let dirtyable = DirtyableTag::new();
        let (reference, calls) = counting(dirtyable.tag());

        reference.value();
        DirtyableTag::new().dirty();
        reference.value();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_constant_parent_binds_child_directly() {
        let text = Rc::new(FnReference::from_fn(Tag::constant(), || Value::from("abc")));
        let length = text.get("length");
        assert!(length.tag().is_const());
        assert_eq!(length.value(), Value::Number(3.0));
    }

    #[test]
    fn test_changing_parent_nests_child() {
        let dirtyable = DirtyableTag::new();
        let text = Rc::new(FnReference::from_fn(dirtyable.tag(), || Value::from("abc")));
        let length = text.get("length");
        assert_eq!(length.tag().kind(), TagKind::Combinator);
        assert_eq!(length.value(), Value::Number(3.0));
    }

    #[test]
    fn test_constant_tag_computes_once() {
        let (reference, calls) = counting(Tag::constant());
        reference.value();
        DirtyableTag::new().dirty();
        reference.value();
        assert_eq!(calls.get(), 1);
    }
}
