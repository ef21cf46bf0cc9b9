//! Errors raised by tracked-object writes.

use crate::tracked::ObjectRef;
use crate::value::PropertyKey;

/// A property the render graph already read was written without being tracked.
///
/// Raised synchronously at the write. Never retried.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct UntrackedPropertyError {
    pub target: ObjectRef,
    pub key: PropertyKey,
    pub message: String,
}

impl UntrackedPropertyError {
    pub fn new(target: ObjectRef, key: impl Into<PropertyKey>, message: impl Into<String>) -> Self {
        Self {
            target,
            key: key.into(),
            message: message.into(),
        }
    }

    /// The default error for an untracked write.
    pub fn for_property(target: &ObjectRef, key: &str) -> Self {
        let message = format!(
            "The property '{key}' on {target} was changed after being rendered. If you want to \
             change a property used in a template after the component has rendered, mark the \
             property as a tracked property in its schema."
        );
        Self::new(target.clone(), key, message)
    }
}

/// Builds the error a guarded property raises on write.
pub type UntrackedErrorBuilder = fn(&ObjectRef, &str) -> UntrackedPropertyError;

/// Why a property write was rejected.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PropertyError {
    #[error(transparent)]
    Untracked(#[from] UntrackedPropertyError),

    /// Computed accessor declared without a setter.
    #[error("cannot set read-only computed property '{key}'")]
    ReadOnly { key: PropertyKey },
}
