//! Tags - Revision-based invalidation.
//!
//! Every piece of cached render state is guarded by a [`Tag`]. Tags never
//! push notifications; consumers pull by comparing a captured [`Revision`]
//! against `tag.value()`.
//!
//! ```text
//! write obj.count  ->  DirtyableTag::dirty()  ->  global revision += 1
//! read  ref.value() -> tag.validate(last)? cached : recompute
//! ```
//!
//! All state is thread-local; the render loop that drives this is
//! single-threaded.

mod revision;
mod tags;

pub use revision::{current_revision, Revision, CONSTANT_REVISION, INITIAL_REVISION};
pub(crate) use revision::bump;
pub use tags::{combine, DirtyableTag, Tag, TagKind, UpdatableTag};
