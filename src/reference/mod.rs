//! Reference graph - Lazily evaluated, memoising paths into host values.
//!
//! Templates never hold values directly; they hold references. Reading a
//! reference is cheap when nothing it depends on moved:
//!
//! ```text
//! RootReference(component)            constant
//!   └─ get("user")   RootProperty     tag = tag_for(component, "user")
//!        └─ get("name") NestedProperty tag = parent tag ∪ tag_for(user, "name")
//! ```
//!
//! Reads never write to host objects. The only side effect of a read is
//! refreshing a reference's own memo and the updatable tag that follows
//! whichever object a nested property last resolved through.

mod cached;
mod conditional;
mod constant;
mod property;
mod updatable;

use std::rc::Rc;

use crate::tag::Tag;
use crate::value::Value;

pub use cached::{CachedReference, Compute, FnCompute, FnReference};
pub use conditional::{Conditional, ConditionalReference};
pub use constant::{PrimitiveReference, RootReference};
pub use property::{
    NestedProperty, NestedPropertyReference, PropertyReference, RootProperty,
    RootPropertyReference,
};
pub use updatable::UpdatableReference;

/// Shared handle to any reference.
pub type PathRef = Rc<dyn PathReference>;

/// A node in the reference graph.
pub trait PathReference {
    /// Tag guarding this reference's value.
    fn tag(&self) -> Tag;

    /// Current value, memoised where the variant allows.
    fn value(&self) -> Value;

    /// Child reference reading `key` off this reference's value.
    fn get(self: Rc<Self>, key: &str) -> PathRef;
}
