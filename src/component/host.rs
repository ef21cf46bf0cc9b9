//! Host contracts - What the rendering VM provides and expects.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

// =============================================================================
// Owner / Environment
// =============================================================================

/// Injection context a component is created under.
pub trait Owner {
    /// Resolve a registered value, e.g. `"service:store"`.
    fn lookup(&self, specifier: &str) -> Option<Value>;
}

/// Shared owner handle.
pub type OwnerRef = Rc<dyn Owner>;

/// The host rendering environment.
pub trait Environment {
    /// Whatever the host's layout compiler produces.
    type Layout;

    /// Owner to bind new components to.
    fn owner(&self) -> Option<OwnerRef>;

    /// Compile a layout with the host compiler.
    fn compile_layout(&self, layout: &dyn CompilableLayout) -> Self::Layout;
}

// =============================================================================
// Layout compilation
// =============================================================================

/// Precompiled template handle as the host hands it over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(Rc<str>);

impl Template {
    pub fn new(source: &str) -> Self {
        Self(source.into())
    }

    pub fn source(&self) -> &str {
        &self.0
    }
}

/// Host-side sink a layout compiles into.
pub trait LayoutBuilder {
    fn add_layout(&mut self, name: &str, template: &Template);
}

/// Something the host compiler can turn into a layout.
pub trait CompilableLayout {
    fn compile(&self, builder: &mut dyn LayoutBuilder);
}

/// Pass-through adapter: hands the template to the host keyed by name.
#[derive(Debug, Clone)]
pub struct LayoutCompiler {
    name: Rc<str>,
    template: Template,
}

impl LayoutCompiler {
    pub fn new(name: &str, template: Template) -> Self {
        Self {
            name: name.into(),
            template,
        }
    }
}

impl CompilableLayout for LayoutCompiler {
    fn compile(&self, builder: &mut dyn LayoutBuilder) {
        builder.add_layout(&self.name, &self.template);
    }
}

// =============================================================================
// Element
// =============================================================================

/// Opaque handle to the rendered root element.
#[derive(Clone)]
pub struct Element(Rc<dyn Any>);

impl Element {
    pub fn new<T: Any>(node: T) -> Self {
        Self(Rc::new(node))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Element(..)")
    }
}

/// Host teardown contract.
pub trait Destroyable {
    fn destroy(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(String, String)>);

    impl LayoutBuilder for Recorder {
        fn add_layout(&mut self, name: &str, template: &Template) {
            self.0.push((name.to_string(), template.source().to_string()));
        }
    }

    #[test]
    fn test_layout_compiler_passes_through() {
        let compiler = LayoutCompiler::new("x-counter", Template::new("<p>{{count}}</p>"));
        let mut recorder = Recorder::default();
        compiler.compile(&mut recorder);
        assert_eq!(
            recorder.0,
            vec![("x-counter".to_string(), "<p>{{count}}</p>".to_string())]
        );
    }

    #[test]
    fn test_element_downcast() {
        let element = Element::new(42u32);
        assert_eq!(element.downcast_ref::<u32>(), Some(&42));
        assert!(element.downcast_ref::<String>().is_none());
        assert!(element.ptr_eq(&element.clone()));
    }
}
