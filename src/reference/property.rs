//! Property references - Reading a named property through the graph.

use std::rc::Rc;

use crate::error::UntrackedPropertyError;
use crate::tag::{combine, Tag, UpdatableTag};
use crate::tracked::{tag_for_property, tag_for_property_with, ObjectRef};
use crate::value::{PropertyKey, Value};

use super::cached::{CachedReference, Compute};
use super::PathRef;

/// Picks the right property reference for a parent.
pub struct PropertyReference;

impl PropertyReference {
    /// Child reference for `key` under `parent`.
    ///
    /// A constant parent is resolved once and bound directly, skipping one
    /// level of indirection. Anything else is read through on every
    /// recompute.
    pub fn create(parent: PathRef, key: &str) -> PathRef {
        if parent.tag().is_const() {
            Rc::new(RootPropertyReference::new(RootProperty::new(parent.value(), key)))
        } else {
            Rc::new(NestedPropertyReference::new(NestedProperty::new(parent, key)))
        }
    }
}

fn rendered_property_error(object: &ObjectRef, key: &str) -> UntrackedPropertyError {
    let message = format!(
        "The '{key}' property on the {object} was changed after it had been rendered. \
         Properties that change after being rendered must be tracked. Declare '{key}' as a \
         tracked field in the object's schema."
    );
    UntrackedPropertyError::new(object.clone(), key, message)
}

// =============================================================================
// Root Property
// =============================================================================

/// Property of a concrete, already-resolved value.
pub struct RootProperty {
    parent_value: Value,
    key: PropertyKey,
    tag: Tag,
}

pub type RootPropertyReference = CachedReference<RootProperty>;

impl RootProperty {
    pub fn new(parent_value: Value, key: &str) -> Self {
        let tag = tag_for_property_with(&parent_value, key, rendered_property_error);
        Self {
            parent_value,
            key: key.into(),
            tag,
        }
    }
}

impl Compute for RootProperty {
    fn tag(&self) -> Tag {
        self.tag.clone()
    }

    fn compute(&self) -> Value {
        self.parent_value.get_property(&self.key)
    }

    fn always_nests(&self) -> bool {
        true
    }
}

// =============================================================================
// Nested Property
// =============================================================================

/// Property of whatever another reference currently resolves to.
///
/// Tracks the parent reference's tag plus, through an updatable tag, the
/// property tag of the object the parent resolved to last time.
pub struct NestedProperty {
    parent: PathRef,
    parent_object_tag: UpdatableTag,
    key: PropertyKey,
    tag: Tag,
}

pub type NestedPropertyReference = CachedReference<NestedProperty>;

impl NestedProperty {
    pub fn new(parent: PathRef, key: &str) -> Self {
        let parent_object_tag = UpdatableTag::new(Tag::constant());
        let tag = combine([parent.tag(), parent_object_tag.tag()]);
        Self {
            parent,
            parent_object_tag,
            key: key.into(),
            tag,
        }
    }
}

impl Compute for NestedProperty {
    fn tag(&self) -> Tag {
        self.tag.clone()
    }

    fn compute(&self) -> Value {
        let parent_value = self.parent.value();
        self.parent_object_tag
            .update(tag_for_property(&parent_value, &self.key));
        // Strings answer `length`; non-objects have no properties.
        parent_value.get_property(&self.key)
    }

    fn always_nests(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Runtime;
    use crate::error::PropertyError;
    use crate::reference::{PathReference, RootReference, UpdatableReference};
    use crate::tag::TagKind;
    use crate::tracked::Schema;
    use crate::value::Dict;

    #[test]
    fn test_create_binds_constant_parent_directly() {
        let schema = Schema::builder("User").tracked("name").build();
        let user = ObjectRef::builder(&schema, &Runtime::development()).with("name", "Ann").build();
        let root: PathRef = Rc::new(RootReference::new(user.into()));

        let name = PropertyReference::create(root, "name");
        assert_eq!(name.tag().kind(), TagKind::Dirtyable);
        assert_eq!(name.value(), Value::from("Ann"));
    }

    #[test]
    fn test_create_nests_under_changing_parent() {
        let parent: PathRef = Rc::new(UpdatableReference::new(Value::from("abc")));
        let length = PropertyReference::create(parent, "length");
        assert_eq!(length.tag().kind(), TagKind::Combinator);
        assert_eq!(length.value(), Value::Number(3.0));
    }

    #[test]
    fn test_property_children_always_nest() {
        let inner: Dict = [("b", 1)].into_iter().collect();
        let outer: Dict = [("a", inner)].into_iter().collect();
        let root: PathRef = Rc::new(RootReference::new(outer.into()));

        let a = root.get("a");
        assert!(a.tag().is_const());
        let b = a.get("b");
        assert_eq!(b.tag().kind(), TagKind::Updatable);
        assert_eq!(b.value(), Value::Number(1.0));
    }

    #[test]
    fn test_nested_guards_non_objects() {
        let parent = Rc::new(UpdatableReference::new(Value::Number(4.0)));
        let child = parent.clone().get("anything");
        assert!(child.value().is_undefined());

        parent.update(Value::Null);
        assert!(child.value().is_undefined());
    }

    #[test]
    fn test_nested_follows_swapped_object() {
        let schema = Schema::builder("User").tracked("name").build();
        let runtime = Runtime::development();
        let ann = ObjectRef::builder(&schema, &runtime).with("name", "Ann").build();
        let bo = ObjectRef::builder(&schema, &runtime).with("name", "Bo").build();

        let parent = Rc::new(UpdatableReference::new(ann.clone().into()));
        let name = parent.clone().get("name");
        assert_eq!(name.value(), Value::from("Ann"));

        parent.update(bo.clone().into());
        assert_eq!(name.value(), Value::from("Bo"));

        // The old object no longer drives this reference; the new one does.
        bo.set("name", "Bea").unwrap();
        assert_eq!(name.value(), Value::from("Bea"));
    }

    #[test]
    fn test_root_property_guard_uses_rendered_message() {
        let schema = Schema::builder("Panel").field("title").build();
        let panel = ObjectRef::builder(&schema, &Runtime::development()).with("title", "x").build();
        let root: PathRef = Rc::new(RootReference::new(panel.clone().into()));

        let title = root.get("title");
        assert_eq!(title.value(), Value::from("x"));

        let Err(PropertyError::Untracked(err)) = panel.set("title", "y") else {
            panic!("expected the write to be rejected");
        };
        assert!(err.message.contains("after it had been rendered"));
    }
}
