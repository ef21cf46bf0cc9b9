//! Tracked properties - Schemas, objects and their per-object tag registry.
//!
//! # Flow
//!
//! ```text
//! Schema::builder(..).tracked("count").build()   declarations on class Meta
//! ObjectRef::builder(..).with(..).build()        instance Meta created lazily
//! tag_for(&obj, "count")                         dirtyable tag (or combinator)
//! obj.set("count", 1)                            dirty tag, store, notify
//! ```
//!
//! Keys the render graph reads without declaring them tracked get a write
//! guard in development mode (see [`tag_for_property_with`]).

mod meta;
mod object;
mod property;
mod schema;

pub use meta::{Meta, PropertyFlags};
pub use object::{ObjectBuilder, ObjectRef};
pub use property::{dirtyable_tag_for, has_tag, tag_for, tag_for_property, tag_for_property_with};
pub use schema::{ComputedProperty, FieldDescriptor, Getter, Schema, SchemaBuilder, Setter};
