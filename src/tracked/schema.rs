//! Schema - Static declaration of an object type's fields.
//!
//! Tracking is decided when the schema is built, not by patching objects at
//! runtime. Every object constructed from a schema gets the same accessors:
//!
//! ```ignore
//! let person = Schema::builder("Person")
//!     .tracked("first")
//!     .tracked("last")
//!     .computed("full", ["first", "last"], |obj| {
//!         format!("{} {}", obj.get("first").as_str().unwrap_or(""),
//!                          obj.get("last").as_str().unwrap_or("")).into()
//!     })
//!     .field("nickname")
//!     .build();
//! ```

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::meta::Meta;
use super::object::ObjectRef;
use crate::error::PropertyError;
use crate::value::{PropertyKey, Value};

/// Getter of a computed property.
pub type Getter = Rc<dyn Fn(&ObjectRef) -> Value>;

/// Setter of a computed property.
pub type Setter = Rc<dyn Fn(&ObjectRef, Value) -> Result<(), PropertyError>>;

// =============================================================================
// Field Descriptors
// =============================================================================

/// Accessor pair plus dependency list.
#[derive(Clone)]
pub struct ComputedProperty {
    pub dependencies: Rc<[PropertyKey]>,
    pub get: Getter,
    pub set: Option<Setter>,
}

/// How a declared field behaves on read and write.
#[derive(Clone)]
pub enum FieldDescriptor {
    /// Ordinary data. Guarded in development once the render graph reads it.
    Plain,
    /// Data stored in a shadow slot; writes dirty the key's tag.
    Tracked,
    Computed(ComputedProperty),
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDescriptor::Plain => f.write_str("Plain"),
            FieldDescriptor::Tracked => f.write_str("Tracked"),
            FieldDescriptor::Computed(computed) => f
                .debug_struct("Computed")
                .field("dependencies", &computed.dependencies)
                .field("settable", &computed.set.is_some())
                .finish(),
        }
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Field layout shared by every object of one type.
pub struct Schema {
    name: Rc<str>,
    parent: Option<Rc<Schema>>,
    fields: HashMap<PropertyKey, FieldDescriptor>,
    meta: Rc<Meta>,
}

impl Schema {
    pub fn builder(name: &str) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            parent: None,
            fields: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Rc<Schema>> {
        self.parent.as_ref()
    }

    /// Descriptor for `key`, searching parent schemas. `None` means an
    /// undeclared key, which behaves like a plain field.
    pub fn descriptor(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields
            .get(key)
            .or_else(|| self.parent.as_ref().and_then(|p| p.descriptor(key)))
    }

    /// Class-level meta holding this schema's declarations.
    pub fn meta(&self) -> &Rc<Meta> {
        &self.meta
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .finish()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Collects field declarations for a [`Schema`].
pub struct SchemaBuilder {
    name: Rc<str>,
    parent: Option<Rc<Schema>>,
    fields: HashMap<PropertyKey, FieldDescriptor>,
}

impl SchemaBuilder {
    /// Inherit the parent's fields. Later declarations shadow inherited ones.
    pub fn extends(mut self, parent: &Rc<Schema>) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Declare an untracked data field.
    pub fn field(mut self, key: &str) -> Self {
        self.fields.insert(key.into(), FieldDescriptor::Plain);
        self
    }

    /// Declare a tracked data field.
    pub fn tracked(mut self, key: &str) -> Self {
        self.fields.insert(key.into(), FieldDescriptor::Tracked);
        self
    }

    /// Declare a read-only computed property.
    pub fn computed<const N: usize>(
        self,
        key: &str,
        dependencies: [&str; N],
        get: impl Fn(&ObjectRef) -> Value + 'static,
    ) -> Self {
        self.insert_computed(key, &dependencies, Rc::new(get), None)
    }

    /// Declare a computed property with a setter.
    pub fn computed_with_setter<const N: usize>(
        self,
        key: &str,
        dependencies: [&str; N],
        get: impl Fn(&ObjectRef) -> Value + 'static,
        set: impl Fn(&ObjectRef, Value) -> Result<(), PropertyError> + 'static,
    ) -> Self {
        self.insert_computed(key, &dependencies, Rc::new(get), Some(Rc::new(set)))
    }

    fn insert_computed(
        mut self,
        key: &str,
        dependencies: &[&str],
        get: Getter,
        set: Option<Setter>,
    ) -> Self {
        let dependencies: Rc<[PropertyKey]> =
            dependencies.iter().map(|d| PropertyKey::from(*d)).collect();
        self.fields.insert(
            key.into(),
            FieldDescriptor::Computed(ComputedProperty {
                dependencies,
                get,
                set,
            }),
        );
        self
    }

    pub fn build(self) -> Rc<Schema> {
        let meta = Meta::new(self.parent.as_ref().map(|p| p.meta().clone()));
        for (key, descriptor) in &self.fields {
            match descriptor {
                FieldDescriptor::Plain => meta.declare_plain(key.clone()),
                FieldDescriptor::Tracked => meta.declare_tracked(key.clone()),
                FieldDescriptor::Computed(computed) => {
                    meta.declare_computed(key.clone(), computed.dependencies.clone())
                }
            }
        }
        Rc::new(Schema {
            name: self.name,
            parent: self.parent,
            fields: self.fields,
            meta: Rc::new(meta),
        })
    }
}
