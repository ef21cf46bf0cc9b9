//! Component definitions - Immutable lookup key and factory source.

use std::fmt;
use std::rc::Rc;

use super::base::ComponentFactory;
use super::host::Template;
use super::manager::ComponentManager;

/// Name, manager, template and (optionally) factory of one component.
///
/// Definitions without a factory stand for template-only components; the
/// manager creates no bucket for them.
#[derive(Clone)]
pub struct ComponentDefinition {
    name: Rc<str>,
    manager: Rc<ComponentManager>,
    template: Template,
    component_factory: Option<Rc<dyn ComponentFactory>>,
}

impl ComponentDefinition {
    pub fn new(
        name: &str,
        manager: Rc<ComponentManager>,
        template: Template,
        component_factory: Option<Rc<dyn ComponentFactory>>,
    ) -> Self {
        Self {
            name: name.into(),
            manager,
            template,
            component_factory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manager(&self) -> &Rc<ComponentManager> {
        &self.manager
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn component_factory(&self) -> Option<&Rc<dyn ComponentFactory>> {
        self.component_factory.as_ref()
    }
}

impl fmt::Display for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<component-definition name=\"{}\">", self.name)
    }
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
