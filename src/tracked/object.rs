//! Tracked objects - Host objects whose writes feed the tag system.

use std::cell::{Cell, OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::meta::Meta;
use super::schema::{FieldDescriptor, Schema};
use crate::config::Runtime;
use crate::error::{PropertyError, UntrackedErrorBuilder};
use crate::value::{PropertyKey, Value};

thread_local! {
    /// Counter for object ids (diagnostics only).
    static OBJECT_COUNTER: Cell<u64> = const { Cell::new(0) };
}

fn next_object_id() -> u64 {
    OBJECT_COUNTER.with(|counter| {
        let id = counter.get();
        counter.set(id + 1);
        id
    })
}

struct ObjectState {
    id: u64,
    schema: Rc<Schema>,
    runtime: Rc<Runtime>,
    meta: OnceCell<Rc<Meta>>,
    slots: RefCell<HashMap<PropertyKey, Value>>,
    /// Development-mode write guards on untracked keys.
    guards: RefCell<HashMap<PropertyKey, UntrackedErrorBuilder>>,
}

/// Shared handle to a tracked object. Equality is identity.
///
/// Fields are seeded through [`ObjectBuilder`]; a handle only writes through
/// [`ObjectRef::set`]:
///
/// ```compile_fail
/// use spark_tracked::{ObjectRef, Runtime, Schema};
///
/// let schema = Schema::builder("Counter").tracked("count").build();
/// let counter = ObjectRef::new(&schema, &Runtime::development());
/// let _ = counter.clone().with("count", 5);
/// ```
#[derive(Clone)]
pub struct ObjectRef(Rc<ObjectState>);

impl ObjectRef {
    /// An object with every field unset.
    pub fn new(schema: &Rc<Schema>, runtime: &Rc<Runtime>) -> Self {
        Self::builder(schema, runtime).build()
    }

    /// Seed fields before the object exists; see [`ObjectBuilder`].
    pub fn builder(schema: &Rc<Schema>, runtime: &Rc<Runtime>) -> ObjectBuilder {
        ObjectBuilder {
            schema: schema.clone(),
            runtime: runtime.clone(),
            slots: HashMap::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn schema(&self) -> &Rc<Schema> {
        &self.0.schema
    }

    pub fn runtime(&self) -> &Rc<Runtime> {
        &self.0.runtime
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// This object's meta, created on first use.
    pub fn meta(&self) -> &Rc<Meta> {
        self.0
            .meta
            .get_or_init(|| Rc::new(Meta::new(Some(self.0.schema.meta().clone()))))
    }

    pub fn has_meta(&self) -> bool {
        self.0.meta.get().is_some()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Read a property. Computed properties run their getter.
    pub fn get(&self, key: &str) -> Value {
        if let Some(FieldDescriptor::Computed(computed)) = self.0.schema.descriptor(key) {
            return (computed.get)(self);
        }
        self.read_slot(key)
    }

    fn read_slot(&self, key: &str) -> Value {
        self.0.slots.borrow().get(key).cloned().unwrap_or_default()
    }

    /// Write a property.
    ///
    /// Tracked and computed writes always dirty their tag, even when the new
    /// value equals the old one, then fire the runtime's change hook.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<(), PropertyError> {
        let value = value.into();
        match self.0.schema.descriptor(key) {
            Some(FieldDescriptor::Tracked) => {
                self.meta().dirtyable_tag_for(key).dirty();
                self.0.slots.borrow_mut().insert(key.into(), value);
                self.0.runtime.notify_property_did_change();
                Ok(())
            }
            Some(FieldDescriptor::Computed(computed)) => {
                let Some(setter) = computed.set.clone() else {
                    return Err(PropertyError::ReadOnly { key: key.into() });
                };
                self.meta().dirtyable_tag_for(key).dirty();
                setter(self, value)?;
                self.0.runtime.notify_property_did_change();
                Ok(())
            }
            Some(FieldDescriptor::Plain) | None => {
                let guard = self.0.guards.borrow().get(key).copied();
                if let Some(build_error) = guard {
                    return Err(build_error(self, key).into());
                }
                self.0.slots.borrow_mut().insert(key.into(), value);
                Ok(())
            }
        }
    }

    // =========================================================================
    // Development guards
    // =========================================================================

    /// Reject future writes to `key`. Reads are unaffected.
    ///
    /// The first builder installed for a key wins.
    pub(crate) fn install_guard(&self, key: &str, build_error: UntrackedErrorBuilder) {
        let mut guards = self.0.guards.borrow_mut();
        if guards.contains_key(key) {
            return;
        }
        tracing::debug!(object = %self, key, "guarding untracked property");
        guards.insert(key.into(), build_error);
    }

    pub fn is_guarded(&self, key: &str) -> bool {
        self.0.guards.borrow().contains_key(key)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Initial field values for an object that has not been shared yet.
///
/// Seeding stores directly: no tag is dirtied, no hook fires, no guard
/// applies. Once built, the only write path is [`ObjectRef::set`].
pub struct ObjectBuilder {
    schema: Rc<Schema>,
    runtime: Rc<Runtime>,
    slots: HashMap<PropertyKey, Value>,
}

impl ObjectBuilder {
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.slots.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> ObjectRef {
        ObjectRef(Rc::new(ObjectState {
            id: next_object_id(),
            schema: self.schema,
            runtime: self.runtime,
            meta: OnceCell::new(),
            slots: RefCell::new(self.slots),
            guards: RefCell::new(HashMap::new()),
        }))
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}:{}>", self.0.schema.name(), self.0.id)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
