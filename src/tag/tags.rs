//! Tag variants - Constant, dirtyable, updatable and combinator tags.
//!
//! A tag answers one question: "has anything I depend on changed since
//! revision N?". Callers capture `tag.value()` after computing something and
//! later call `tag.validate(captured)`; a mismatch means recompute.
//!
//! - Constant tags never change.
//! - Dirtyable tags jump to a fresh revision when `dirty()` is called.
//! - Updatable tags wrap another tag that can be swapped out later.
//! - Combinators report the max revision of their children.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::revision::{bump, current_revision, Revision, CONSTANT_REVISION, INITIAL_REVISION};

// =============================================================================
// Tag Handle
// =============================================================================

/// Which variant a [`Tag`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Constant,
    Dirtyable,
    Updatable,
    Combinator,
}

/// Shared handle to a revision source. Cloning shares the underlying tag.
#[derive(Clone)]
pub struct Tag(Inner);

#[derive(Clone)]
enum Inner {
    Constant,
    Dirtyable(Rc<DirtyableState>),
    Updatable(Rc<UpdatableState>),
    Combinator(Rc<CombinatorState>),
}

impl Tag {
    /// The tag that never invalidates.
    pub fn constant() -> Self {
        Tag(Inner::Constant)
    }

    /// Current revision of this tag.
    pub fn value(&self) -> Revision {
        match &self.0 {
            Inner::Constant => CONSTANT_REVISION,
            Inner::Dirtyable(state) => state.revision.get(),
            Inner::Updatable(state) => state.value(),
            Inner::Combinator(state) => state.value(),
        }
    }

    /// True iff nothing changed since `snapshot` was captured from `value()`.
    pub fn validate(&self, snapshot: Revision) -> bool {
        match &self.0 {
            Inner::Constant => true,
            _ => self.value() == snapshot,
        }
    }

    pub fn is_const(&self) -> bool {
        matches!(self.0, Inner::Constant)
    }

    pub fn kind(&self) -> TagKind {
        match &self.0 {
            Inner::Constant => TagKind::Constant,
            Inner::Dirtyable(_) => TagKind::Dirtyable,
            Inner::Updatable(_) => TagKind::Updatable,
            Inner::Combinator(_) => TagKind::Combinator,
        }
    }

    /// Identity comparison. All constant tags are the same tag.
    pub fn ptr_eq(&self, other: &Tag) -> bool {
        match (&self.0, &other.0) {
            (Inner::Constant, Inner::Constant) => true,
            (Inner::Dirtyable(a), Inner::Dirtyable(b)) => Rc::ptr_eq(a, b),
            (Inner::Updatable(a), Inner::Updatable(b)) => Rc::ptr_eq(a, b),
            (Inner::Combinator(a), Inner::Combinator(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Default for Tag {
    fn default() -> Self {
        Tag::constant()
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Inner::Constant => f.write_str("ConstantTag"),
            Inner::Combinator(state) => f
                .debug_struct("CombinatorTag")
                .field("children", &state.tags.len())
                .field("revision", &self.value())
                .finish(),
            _ => write!(f, "{:?}Tag({:?})", self.kind(), self.value()),
        }
    }
}

// =============================================================================
// Per-revision value cache
// =============================================================================

/// Remembers a computed revision for as long as the global clock stands still.
struct RevisionCache {
    last_checked: Cell<Option<Revision>>,
    last_value: Cell<Revision>,
}

impl RevisionCache {
    fn new() -> Self {
        Self {
            last_checked: Cell::new(None),
            last_value: Cell::new(CONSTANT_REVISION),
        }
    }

    fn get_or_compute(&self, compute: impl FnOnce() -> Revision) -> Revision {
        let now = current_revision();
        if self.last_checked.get() != Some(now) {
            self.last_checked.set(Some(now));
            self.last_value.set(compute());
        }
        self.last_value.get()
    }

    fn invalidate(&self) {
        self.last_checked.set(None);
    }
}

// =============================================================================
// Dirtyable
// =============================================================================

struct DirtyableState {
    revision: Cell<Revision>,
}

/// A tag that writes mark dirty directly.
#[derive(Clone)]
pub struct DirtyableTag(Rc<DirtyableState>);

impl DirtyableTag {
    pub fn new() -> Self {
        Self(Rc::new(DirtyableState {
            revision: Cell::new(INITIAL_REVISION),
        }))
    }

    /// Move this tag to a fresh revision.
    ///
    /// Always advances, even if the written value did not change.
    pub fn dirty(&self) {
        let revision = bump();
        self.0.revision.set(revision);
        tracing::trace!(?revision, "dirtied tag");
    }

    /// The public tag handle sharing this state.
    pub fn tag(&self) -> Tag {
        Tag(Inner::Dirtyable(self.0.clone()))
    }
}

impl Default for DirtyableTag {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DirtyableTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tag(), f)
    }
}

// =============================================================================
// Updatable
// =============================================================================

struct UpdatableState {
    inner: RefCell<Tag>,
    last_updated: Cell<Revision>,
    cache: RevisionCache,
}

impl UpdatableState {
    fn value(&self) -> Revision {
        self.cache.get_or_compute(|| {
            let inner = self.inner.borrow().value();
            inner.max(self.last_updated.get())
        })
    }
}

/// A tag whose underlying tag can be replaced.
#[derive(Clone)]
pub struct UpdatableTag(Rc<UpdatableState>);

impl UpdatableTag {
    pub fn new(inner: Tag) -> Self {
        Self(Rc::new(UpdatableState {
            inner: RefCell::new(inner),
            last_updated: Cell::new(INITIAL_REVISION),
            cache: RevisionCache::new(),
        }))
    }

    /// Swap in a different inner tag.
    ///
    /// Swapping to a different tag counts as a change at the current revision.
    pub fn update(&self, tag: Tag) {
        if self.0.inner.borrow().ptr_eq(&tag) {
            return;
        }
        *self.0.inner.borrow_mut() = tag;
        self.0.last_updated.set(current_revision());
        self.0.cache.invalidate();
    }

    pub fn inner(&self) -> Tag {
        self.0.inner.borrow().clone()
    }

    pub fn tag(&self) -> Tag {
        Tag(Inner::Updatable(self.0.clone()))
    }
}

impl fmt::Debug for UpdatableTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tag(), f)
    }
}

// =============================================================================
// Combinator
// =============================================================================

struct CombinatorState {
    tags: Box<[Tag]>,
    cache: RevisionCache,
}

impl CombinatorState {
    fn value(&self) -> Revision {
        self.cache.get_or_compute(|| {
            self.tags
                .iter()
                .map(Tag::value)
                .max()
                .unwrap_or(CONSTANT_REVISION)
        })
    }
}

/// Union of several tags: valid iff every child is valid.
///
/// Constant children are dropped. No children left gives the constant tag,
/// one child is returned as-is, otherwise a combinator is allocated.
pub fn combine(tags: impl IntoIterator<Item = Tag>) -> Tag {
    let mut tags: Vec<Tag> = tags.into_iter().filter(|t| !t.is_const()).collect();
    match tags.len() {
        0 => Tag::constant(),
        1 => tags.pop().unwrap_or_default(),
        _ => Tag(Inner::Combinator(Rc::new(CombinatorState {
            tags: tags.into_boxed_slice(),
            cache: RevisionCache::new(),
        }))),
    }
}
