//! Tag lookup for arbitrary values, with the development write guard.

use crate::error::{UntrackedErrorBuilder, UntrackedPropertyError};
use crate::tag::{DirtyableTag, Tag};
use crate::value::Value;

use super::object::ObjectRef;

/// Whether `key` on `object` was declared tracked (plain or computed).
pub fn has_tag(object: &ObjectRef, key: &str) -> bool {
    object.schema().meta().is_tracked(key)
}

/// Public tag for `key` on `object`.
pub fn tag_for(object: &ObjectRef, key: &str) -> Tag {
    tag_for_property(&Value::Object(object.clone()), key)
}

/// Tag that writes to `key` on `object` dirty.
pub fn dirtyable_tag_for(object: &ObjectRef, key: &str) -> DirtyableTag {
    object.meta().dirtyable_tag_for(key)
}

/// Tag for reading `key` off any value, using the default guard error.
pub fn tag_for_property(value: &Value, key: &str) -> Tag {
    tag_for_property_with(value, key, UntrackedPropertyError::for_property)
}

/// Tag for reading `key` off any value.
///
/// Only objects have tags; everything else is constant. In development mode,
/// asking for the tag of an undeclared key guards that key so a later write
/// fails loudly instead of leaving a stale render behind.
pub fn tag_for_property_with(value: &Value, key: &str, build_error: UntrackedErrorBuilder) -> Tag {
    let Value::Object(object) = value else {
        return Tag::constant();
    };
    if object.runtime().mode().is_development() && !has_tag(object, key) {
        object.install_guard(key, build_error);
    }
    object.meta().tag_for(key)
}
