//! Definition registry - Name to definition lookup for the environment.

use std::collections::HashMap;

use super::definition::ComponentDefinition;

/// Component definitions the environment resolves invocations against.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    definitions: HashMap<String, ComponentDefinition>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `definition` under its name, returning any definition it replaces.
    pub fn register(&mut self, definition: ComponentDefinition) -> Option<ComponentDefinition> {
        let name = definition.name().to_string();
        tracing::debug!(name = %name, "registered component definition");
        self.definitions.insert(name, definition)
    }

    pub fn get(&self, name: &str) -> Option<&ComponentDefinition> {
        self.definitions.get(name)
    }

    /// Whether `name` can be invoked as a component.
    pub fn has_component_definition(&self, name: &str) -> bool {
        self.definitions
            .get(name)
            .is_some_and(|definition| definition.manager().permits_angle_invocation())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::component::{ComponentManager, Template};

    #[test]
    fn test_register_and_lookup() {
        let manager = Rc::new(ComponentManager::new());
        let mut registry = DefinitionRegistry::new();
        assert!(registry.is_empty());

        let replaced = registry.register(manager.create_component_definition(
            "x-card",
            Template::new("<div></div>"),
            None,
        ));
        assert!(replaced.is_none());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("x-card").map(|d| d.name()), Some("x-card"));
        assert!(registry.has_component_definition("x-card"));
        assert!(!registry.has_component_definition("x-missing"));
    }

    #[test]
    fn test_register_replaces_by_name() {
        let manager = Rc::new(ComponentManager::new());
        let mut registry = DefinitionRegistry::new();
        registry.register(manager.create_component_definition("x-a", Template::new("1"), None));

        let replaced =
            registry.register(manager.create_component_definition("x-a", Template::new("2"), None));

        assert_eq!(replaced.map(|d| d.template().source().to_string()), Some("1".to_string()));
        assert_eq!(registry.get("x-a").map(|d| d.template().source()), Some("2"));
        assert_eq!(registry.len(), 1);
    }
}
