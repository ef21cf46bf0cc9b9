//! Meta - Per-object tag bookkeeping.
//!
//! A computed property is invalidated when it is set or when one of its
//! dependencies is invalidated, so it owns two tags:
//!
//! 1. The dirtyable tag its setter marks dirty.
//! 2. A combinator of that dirtyable tag and every dependency's public tag.
//!    This is what the render graph validates against.
//!
//! Plain tracked properties have a single dirtyable tag serving both roles.
//!
//! Declarations (which keys are tracked, which are computed and what they
//! depend on) live on the schema's class meta. Instance metas hold the tags
//! and fall back to their parent for declarations.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use crate::tag::{combine, DirtyableTag, Tag};
use crate::value::PropertyKey;

bitflags! {
    /// How a property key was declared.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PropertyFlags: u8 {
        /// Writes dirty a tag.
        const TRACKED  = 1 << 0;
        /// Accessor with a dependency list.
        const COMPUTED = 1 << 1;
    }
}

/// Tag registry for one object (or one schema, when used as a class meta).
pub struct Meta {
    parent: Option<Rc<Meta>>,

    // Declarations (local overlay over parent)
    properties: RefCell<HashMap<PropertyKey, PropertyFlags>>,
    dependencies: RefCell<HashMap<PropertyKey, Rc<[PropertyKey]>>>,

    // Tags (never inherited)
    computed_tags: RefCell<HashMap<PropertyKey, Tag>>,
    dirtyable_tags: RefCell<HashMap<PropertyKey, DirtyableTag>>,

    // Computed keys whose combinator is being built, outermost first
    resolving: RefCell<Vec<PropertyKey>>,
}

impl Meta {
    pub fn new(parent: Option<Rc<Meta>>) -> Self {
        Self {
            parent,
            properties: RefCell::new(HashMap::new()),
            dependencies: RefCell::new(HashMap::new()),
            computed_tags: RefCell::new(HashMap::new()),
            dirtyable_tags: RefCell::new(HashMap::new()),
            resolving: RefCell::new(Vec::new()),
        }
    }

    pub fn parent(&self) -> Option<&Rc<Meta>> {
        self.parent.as_ref()
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Record `key` as untracked, shadowing any parent declaration.
    pub(crate) fn declare_plain(&self, key: PropertyKey) {
        self.properties
            .borrow_mut()
            .insert(key, PropertyFlags::empty());
    }

    pub(crate) fn declare_tracked(&self, key: PropertyKey) {
        self.properties
            .borrow_mut()
            .insert(key, PropertyFlags::TRACKED);
    }

    pub(crate) fn declare_computed(&self, key: PropertyKey, dependencies: Rc<[PropertyKey]>) {
        self.properties
            .borrow_mut()
            .insert(key.clone(), PropertyFlags::TRACKED | PropertyFlags::COMPUTED);
        self.dependencies.borrow_mut().insert(key, dependencies);
    }

    /// Declaration flags for `key`, local first, then the parent chain.
    pub fn flags(&self, key: &str) -> PropertyFlags {
        if let Some(flags) = self.properties.borrow().get(key) {
            return *flags;
        }
        self.parent
            .as_ref()
            .map(|parent| parent.flags(key))
            .unwrap_or_default()
    }

    pub fn is_tracked(&self, key: &str) -> bool {
        self.flags(key).contains(PropertyFlags::TRACKED)
    }

    /// Dependency keys of a computed property, `None` for anything else.
    ///
    /// A local non-computed declaration masks the parent's dependencies.
    pub fn dependencies(&self, key: &str) -> Option<Rc<[PropertyKey]>> {
        if let Some(deps) = self.dependencies.borrow().get(key) {
            return Some(deps.clone());
        }
        if self.properties.borrow().contains_key(key) {
            return None;
        }
        self.parent.as_ref().and_then(|parent| parent.dependencies(key))
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// Public tag: "should `key` be recomputed?".
    ///
    /// A dirtyable tag for plain keys. For computed keys, a combinator of the
    /// key's own dirtyable tag and the public tags of its dependencies,
    /// resolved recursively and cached.
    pub fn tag_for(&self, key: &str) -> Tag {
        self.resolve(key).0
    }

    /// Builds the public tag for `key`.
    ///
    /// A dependency cycle is cut at the re-entered key, which contributes only
    /// its own dirtyable tag. The second value is the shallowest `resolving`
    /// depth a cut referred to. A combinator is cached only when no cut refers
    /// above its own frame; otherwise it lacks tags that only an outer frame
    /// adds.
    fn resolve(&self, key: &str) -> (Tag, Option<usize>) {
        if let Some(tag) = self.computed_tags.borrow().get(key) {
            return (tag.clone(), None);
        }

        let Some(dependencies) = self.dependencies(key) else {
            return (self.dirtyable_tag_for(key).tag(), None);
        };

        let reentered = self.resolving.borrow().iter().position(|k| &**k == key);
        if let Some(depth) = reentered {
            tracing::warn!(key, "computed property depends on itself; cycle broken");
            return (self.dirtyable_tag_for(key).tag(), Some(depth));
        }

        let depth = {
            let mut resolving = self.resolving.borrow_mut();
            resolving.push(PropertyKey::from(key));
            resolving.len() - 1
        };

        let mut tags = vec![self.dirtyable_tag_for(key).tag()];
        let mut cut: Option<usize> = None;
        for dep in dependencies.iter() {
            let (tag, dep_cut) = self.resolve(dep);
            tags.push(tag);
            cut = match (cut, dep_cut) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
        }
        self.resolving.borrow_mut().pop();

        let tag = combine(tags);
        let cut = cut.filter(|&c| c < depth);
        if cut.is_none() {
            self.computed_tags
                .borrow_mut()
                .insert(PropertyKey::from(key), tag.clone());
        }
        (tag, cut)
    }

    /// Tag that writes to `key` must dirty.
    ///
    /// For plain keys this is the tag `tag_for` returns; for computed keys it
    /// is the separate tag folded into the combinator.
    pub fn dirtyable_tag_for(&self, key: &str) -> DirtyableTag {
        if let Some(tag) = self.dirtyable_tags.borrow().get(key) {
            return tag.clone();
        }
        let tag = DirtyableTag::new();
        self.dirtyable_tags
            .borrow_mut()
            .insert(PropertyKey::from(key), tag.clone());
        tag
    }

    /// Number of keys that have a tag on this meta (not its parents).
    pub fn tag_count(&self) -> usize {
        self.dirtyable_tags.borrow().len()
    }
}

impl fmt::Debug for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Meta")
            .field("properties", &self.properties.borrow())
            .field("tags", &self.tag_count())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
