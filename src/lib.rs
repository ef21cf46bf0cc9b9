//! # spark-tracked
//!
//! Revision-tagged tracked properties, a memoising reference graph and the
//! component lifecycle manager a template VM drives.
//!
//! ## Architecture
//!
//! Nothing here pushes notifications. Writes to tracked properties bump a
//! global revision and mark a tag; the VM pulls on each render pass by
//! validating the tags its references captured:
//!
//! ```text
//! obj.set("count", 1) → DirtyableTag::dirty → revision += 1
//! render pass        → ref.tag().validate(last)? cached : ref.value()
//! update pass        → ComponentManager::update → instance.args = snapshot
//! ```
//!
//! ## Modules
//!
//! - [`tag`] - Revisions, dirtyable/updatable/combinator tags
//! - [`tracked`] - Schemas, tracked objects, per-object Meta
//! - [`reference`] - Root/property/updatable/conditional references
//! - [`component`] - Component manager, buckets, definitions
//! - [`config`] - Build mode and the property-change hook
//! - [`value`] - Host values

pub mod component;
pub mod config;
pub mod error;
pub mod reference;
pub mod tag;
pub mod tracked;
pub mod value;

// Re-export commonly used items
pub use value::{Dict, PropertyKey, Value};

pub use error::{PropertyError, UntrackedErrorBuilder, UntrackedPropertyError};

pub use config::{BuildMode, PropertyDidChange, Runtime, RuntimeConfig};

pub use tag::{
    combine, current_revision, DirtyableTag, Revision, Tag, TagKind, UpdatableTag,
    CONSTANT_REVISION, INITIAL_REVISION,
};

pub use tracked::{
    dirtyable_tag_for, has_tag, tag_for, tag_for_property, tag_for_property_with, Meta,
    ObjectBuilder, ObjectRef, PropertyFlags, Schema, SchemaBuilder,
};

pub use reference::{
    CachedReference, Compute, ConditionalReference, FnReference, PathRef, PathReference,
    PrimitiveReference, PropertyReference, RootReference, UpdatableReference,
};

pub use component::{
    component_schema, Arguments, CapturedArguments, CapturedNamedArguments, Component,
    ComponentBase, ComponentDefinition, ComponentDestructor, ComponentFactory, ComponentManager,
    ComponentStateBucket, DefinitionRegistry, Destroyable, Element, Environment, Injections,
    LifecycleState, Owner, OwnerRef, Template,
};
