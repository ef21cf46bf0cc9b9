//! State buckets - One per rendered component occurrence.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::value::Dict;

use super::arguments::CapturedArguments;
use super::base::{Component, Injections};
use super::definition::ComponentDefinition;
use super::host::{Destroyable, OwnerRef};

/// Where an occurrence is in its lifecycle.
///
/// An occurrence without a bucket is uninstantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Updated,
    Destroyed,
}

/// Owns the live component and the arguments it was invoked with.
///
/// Only the manager's update path replaces the component's snapshot.
pub struct ComponentStateBucket {
    args: CapturedArguments,
    component: Rc<dyn Component>,
    state: Rc<Cell<LifecycleState>>,
}

impl ComponentStateBucket {
    /// Instantiate the definition's component. `None` without a factory.
    pub fn new(
        definition: &ComponentDefinition,
        args: CapturedArguments,
        owner: Option<OwnerRef>,
    ) -> Option<Self> {
        let factory = definition.component_factory()?;
        let injections = Injections {
            debug_name: definition.name().into(),
            args: args.named.value(),
            owner,
        };
        let component = factory.create(injections);
        Some(Self {
            args,
            component,
            state: Rc::new(Cell::new(LifecycleState::Created)),
        })
    }

    pub fn component(&self) -> &Rc<dyn Component> {
        &self.component
    }

    pub fn args(&self) -> &CapturedArguments {
        &self.args
    }

    /// Fresh immutable snapshot of the named arguments.
    pub fn named_args_snapshot(&self) -> Dict {
        self.args.named.value()
    }

    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    pub(crate) fn mark_updated(&self) {
        if self.state.get() != LifecycleState::Destroyed {
            self.state.set(LifecycleState::Updated);
        }
    }

    pub(crate) fn destructor(&self) -> ComponentDestructor {
        ComponentDestructor {
            component: self.component.clone(),
            state: self.state.clone(),
        }
    }
}

impl fmt::Debug for ComponentStateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentStateBucket")
            .field("instance", &self.component.instance())
            .field("args", &self.args.named.names())
            .field("state", &self.state.get())
            .finish()
    }
}

/// Destructible handle for the bucket's component.
///
/// Destroying runs the component's teardown once and marks the occurrence
/// destroyed.
#[derive(Clone)]
pub struct ComponentDestructor {
    component: Rc<dyn Component>,
    state: Rc<Cell<LifecycleState>>,
}

impl ComponentDestructor {
    pub fn component(&self) -> &Rc<dyn Component> {
        &self.component
    }
}

impl Destroyable for ComponentDestructor {
    fn destroy(&self) {
        if self.state.replace(LifecycleState::Destroyed) == LifecycleState::Destroyed {
            return;
        }
        tracing::debug!(instance = %self.component.instance(), "destroying component");
        self.component.destroy();
    }
}

impl fmt::Debug for ComponentDestructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDestructor")
            .field("instance", &self.component.instance())
            .field("state", &self.state.get())
            .finish()
    }
}
