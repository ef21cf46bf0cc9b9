//! Component instances - The trait components implement and shared state.
//!
//! Every component wraps a tracked [`ObjectRef`] that templates bind `this`
//! to. The base schema declares `args` as tracked, so replacing the argument
//! snapshot invalidates anything the template read through `this.args`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::config::Runtime;
use crate::error::PropertyError;
use crate::tracked::{ObjectRef, Schema};
use crate::value::{Dict, Value};

use super::host::{Element, OwnerRef};

thread_local! {
    static COMPONENT_SCHEMA: Rc<Schema> = Schema::builder("Component")
        .tracked("args")
        .field("debugName")
        .build();
}

/// Schema every component schema should extend.
pub fn component_schema() -> Rc<Schema> {
    COMPONENT_SCHEMA.with(|schema| schema.clone())
}

// =============================================================================
// Injections / Factory
// =============================================================================

/// What a factory receives when the manager instantiates a component.
#[derive(Clone)]
pub struct Injections {
    pub debug_name: Rc<str>,
    pub args: Dict,
    pub owner: Option<OwnerRef>,
}

impl fmt::Debug for Injections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injections")
            .field("debug_name", &self.debug_name)
            .field("args", &self.args)
            .field("has_owner", &self.owner.is_some())
            .finish()
    }
}

/// Builds component instances for a definition.
pub trait ComponentFactory {
    fn create(&self, injections: Injections) -> Rc<dyn Component>;
}

impl<F> ComponentFactory for F
where
    F: Fn(Injections) -> Rc<dyn Component>,
{
    fn create(&self, injections: Injections) -> Rc<dyn Component> {
        self(injections)
    }
}

// =============================================================================
// Component
// =============================================================================

/// A live component instance.
///
/// Only `base` is required; hooks default to no-ops. The argument snapshot
/// is replaced by the manager's update pass, never by the component:
///
/// ```compile_fail
/// use spark_tracked::{Component, Dict};
///
/// fn reset(component: &dyn Component) {
///     component.base().set_args(Dict::default());
/// }
/// ```
pub trait Component {
    fn base(&self) -> &ComponentBase;

    /// Object templates bind `this` to.
    fn instance(&self) -> ObjectRef {
        self.base().instance().clone()
    }

    fn args(&self) -> Dict {
        self.base().args()
    }

    fn set_element(&self, element: Element) {
        self.base().set_element(element);
    }

    /// Called once the root element is in the document.
    fn did_insert_element(&self) {}

    /// Called after every update pass.
    fn did_update(&self) {}

    /// Teardown.
    fn destroy(&self) {}
}

/// State shared by all components.
pub struct ComponentBase {
    debug_name: Rc<str>,
    owner: Option<OwnerRef>,
    instance: ObjectRef,
    element: RefCell<Option<Element>>,
}

impl ComponentBase {
    /// Instance of `schema` seeded from the manager's injections.
    ///
    /// `schema` should extend [`component_schema`].
    pub fn new(schema: &Rc<Schema>, runtime: &Rc<Runtime>, injections: Injections) -> Self {
        let instance = ObjectRef::builder(schema, runtime)
            .with("args", injections.args)
            .with("debugName", Value::String(injections.debug_name.clone()))
            .build();
        Self {
            debug_name: injections.debug_name,
            owner: injections.owner,
            instance,
            element: RefCell::new(None),
        }
    }

    pub fn debug_name(&self) -> &str {
        &self.debug_name
    }

    pub fn owner(&self) -> Option<&OwnerRef> {
        self.owner.as_ref()
    }

    pub fn instance(&self) -> &ObjectRef {
        &self.instance
    }

    pub fn args(&self) -> Dict {
        match self.instance.get("args") {
            Value::Dict(args) => args,
            _ => Dict::default(),
        }
    }

    /// Replace the argument snapshot. Only the manager's update pass does this.
    pub(crate) fn set_args(&self, args: Dict) -> Result<(), PropertyError> {
        self.instance.set("args", args)
    }

    pub fn element(&self) -> Option<Element> {
        self.element.borrow().clone()
    }

    pub fn set_element(&self, element: Element) {
        *self.element.borrow_mut() = Some(element);
    }
}

impl fmt::Debug for ComponentBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentBase")
            .field("debug_name", &self.debug_name)
            .field("instance", &self.instance)
            .field("has_element", &self.element.borrow().is_some())
            .finish()
    }
}
