//! Runtime configuration - Build mode and the property-change hook.
//!
//! Objects are created under a [`Runtime`]. The runtime decides whether
//! untracked reads install write guards and owns the single-slot
//! "property did change" callback that tracked writes fire.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

// =============================================================================
// Build Mode
// =============================================================================

/// Whether development-only safety checks are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Untracked properties read by the render graph reject writes.
    Development,
    /// No write guards.
    Production,
}

impl BuildMode {
    pub fn is_development(self) -> bool {
        self == BuildMode::Development
    }
}

impl Default for BuildMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }
}

/// Settings a [`Runtime`] is built from.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub mode: BuildMode,
}

// =============================================================================
// Runtime
// =============================================================================

/// Callback fired after every tracked write.
pub type PropertyDidChange = Rc<dyn Fn()>;

/// Shared tracking context handed to every object at construction.
pub struct Runtime {
    mode: BuildMode,
    property_did_change: RefCell<Option<PropertyDidChange>>,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Rc<Self> {
        Rc::new(Self {
            mode: config.mode,
            property_did_change: RefCell::new(None),
        })
    }

    /// Runtime with write guards enabled regardless of build profile.
    pub fn development() -> Rc<Self> {
        Self::new(RuntimeConfig {
            mode: BuildMode::Development,
        })
    }

    pub fn production() -> Rc<Self> {
        Self::new(RuntimeConfig {
            mode: BuildMode::Production,
        })
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Replace the property-change hook. The previous one is dropped.
    pub fn set_property_did_change(&self, callback: impl Fn() + 'static) {
        *self.property_did_change.borrow_mut() = Some(Rc::new(callback));
    }

    /// Remove the hook, restoring the no-op default.
    pub fn clear_property_did_change(&self) {
        self.property_did_change.borrow_mut().take();
    }

    /// Fire the hook.
    pub fn notify_property_did_change(&self) {
        // Clone out so the callback may replace the hook.
        let callback = self.property_did_change.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self {
            mode: BuildMode::default(),
            property_did_change: RefCell::new(None),
        }
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("mode", &self.mode)
            .field("has_property_did_change", &self.property_did_change.borrow().is_some())
            .finish()
    }
}
