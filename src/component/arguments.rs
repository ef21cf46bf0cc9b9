//! Component arguments - References captured at the invocation site.

use std::rc::Rc;

use crate::reference::PathRef;
use crate::tag::{combine, Tag};
use crate::value::{Dict, PropertyKey};

/// Volatile arguments as the VM passes them to `create`.
pub trait Arguments {
    /// Freeze the current argument references for later reads.
    fn capture(&self) -> CapturedArguments;
}

/// Named argument references, in invocation order.
#[derive(Clone)]
pub struct CapturedNamedArguments {
    names: Rc<[PropertyKey]>,
    references: Rc<[PathRef]>,
}

impl Default for CapturedNamedArguments {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CapturedNamedArguments {
    pub fn new(entries: Vec<(PropertyKey, PathRef)>) -> Self {
        let (names, references): (Vec<_>, Vec<_>) = entries.into_iter().unzip();
        Self {
            names: names.into(),
            references: references.into(),
        }
    }

    pub fn names(&self) -> &[PropertyKey] {
        &self.names
    }

    pub fn get(&self, name: &str) -> Option<&PathRef> {
        self.names
            .iter()
            .position(|n| &**n == name)
            .map(|i| &self.references[i])
    }

    /// Union of every argument's tag.
    pub fn tag(&self) -> Tag {
        combine(self.references.iter().map(|r| r.tag()))
    }

    /// Fresh immutable snapshot of every argument's current value.
    pub fn value(&self) -> Dict {
        self.names
            .iter()
            .cloned()
            .zip(self.references.iter().map(|r| r.value()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K: Into<PropertyKey>> FromIterator<(K, PathRef)> for CapturedNamedArguments {
    fn from_iter<I: IntoIterator<Item = (K, PathRef)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, r)| (k.into(), r)).collect())
    }
}

/// Captured arguments held by a component's state bucket.
#[derive(Clone, Default)]
pub struct CapturedArguments {
    pub named: CapturedNamedArguments,
}

impl CapturedArguments {
    pub fn new(named: CapturedNamedArguments) -> Self {
        Self { named }
    }
}

impl Arguments for CapturedArguments {
    fn capture(&self) -> CapturedArguments {
        self.clone()
    }
}
