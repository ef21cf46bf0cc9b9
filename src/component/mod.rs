//! Component layer - Binds component instances into the rendering VM.
//!
//! The VM owns the render loop. For each component occurrence it asks the
//! [`ComponentManager`] for a [`ComponentStateBucket`], binds the template's
//! `this` through [`ComponentManager::get_self`], and on every update pass
//! has the manager re-snapshot the captured arguments into the instance.
//!
//! ```text
//! DefinitionRegistry ─► ComponentDefinition ─► ComponentManager::create
//!                                                   │
//!                               ComponentStateBucket { component, args }
//! ```

mod arguments;
mod base;
mod bucket;
mod definition;
mod host;
mod manager;
mod registry;

pub use arguments::{Arguments, CapturedArguments, CapturedNamedArguments};
pub use base::{component_schema, Component, ComponentBase, ComponentFactory, Injections};
pub use bucket::{ComponentDestructor, ComponentStateBucket, LifecycleState};
pub use definition::ComponentDefinition;
pub use host::{
    CompilableLayout, Destroyable, Element, Environment, LayoutBuilder, LayoutCompiler, Owner,
    OwnerRef, Template,
};
pub use manager::ComponentManager;
pub use registry::DefinitionRegistry;
