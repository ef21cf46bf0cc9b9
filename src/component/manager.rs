//! Component manager - Lifecycle hooks the rendering VM calls.
//!
//! Per occurrence:
//!
//! ```text
//! create ─► did_create_element ─► did_create ─► (update ─► did_update)* ─► destroy
//! ```
//!
//! Every hook is driven by the VM; the manager schedules nothing itself.
//! Hooks taking `Option<&ComponentStateBucket>` do nothing for `None`, which
//! is what template-only definitions produce.

use std::any::Any;
use std::rc::Rc;

use crate::error::PropertyError;
use crate::reference::{PathRef, RootReference};
use crate::tag::Tag;
use crate::value::Value;

use super::arguments::{Arguments, CapturedArguments};
use super::base::ComponentFactory;
use super::bucket::{ComponentDestructor, ComponentStateBucket};
use super::definition::ComponentDefinition;
use super::host::{Element, Environment, LayoutCompiler, Template};

/// Binds component instances into the VM.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComponentManager;

impl ComponentManager {
    pub fn new() -> Self {
        Self
    }

    /// Arguments are used as captured; nothing to prepare.
    pub fn prepare_args(
        &self,
        _definition: &ComponentDefinition,
        _args: &dyn Arguments,
    ) -> Option<CapturedArguments> {
        None
    }

    /// Instantiate the component for one occurrence.
    ///
    /// Returns `None` when the definition has no factory.
    pub fn create<E: Environment>(
        &self,
        environment: &E,
        definition: &ComponentDefinition,
        args: &dyn Arguments,
    ) -> Option<ComponentStateBucket> {
        let owner = environment.owner();
        let bucket = ComponentStateBucket::new(definition, args.capture(), owner)?;
        tracing::debug!(
            name = definition.name(),
            instance = %bucket.component().instance(),
            "created component"
        );
        Some(bucket)
    }

    pub fn create_component_definition(
        self: &Rc<Self>,
        name: &str,
        template: Template,
        component_factory: Option<Rc<dyn ComponentFactory>>,
    ) -> ComponentDefinition {
        ComponentDefinition::new(name, self.clone(), template, component_factory)
    }

    /// Compile the definition's template through the host compiler.
    pub fn layout_for<E: Environment>(
        &self,
        definition: &ComponentDefinition,
        _bucket: Option<&ComponentStateBucket>,
        environment: &E,
    ) -> E::Layout {
        let compiler = LayoutCompiler::new(definition.name(), definition.template().clone());
        environment.compile_layout(&compiler)
    }

    /// Root reference over the live instance, for template binding.
    pub fn get_self(&self, bucket: Option<&ComponentStateBucket>) -> Option<PathRef> {
        let bucket = bucket?;
        let instance = Value::Object(bucket.component().instance());
        Some(Rc::new(RootReference::new(instance)))
    }

    pub fn did_create_element(&self, bucket: Option<&ComponentStateBucket>, element: Element) {
        if let Some(bucket) = bucket {
            bucket.component().set_element(element);
        }
    }

    pub fn did_render_layout(&self, _bucket: Option<&ComponentStateBucket>, _bounds: &dyn Any) {}

    pub fn did_create(&self, bucket: Option<&ComponentStateBucket>) {
        if let Some(bucket) = bucket {
            bucket.component().did_insert_element();
        }
    }

    /// The manager adds no invalidation source of its own.
    pub fn get_tag(&self, _bucket: Option<&ComponentStateBucket>) -> Option<Tag> {
        None
    }

    /// Re-snapshot the arguments into the component and run its update hook.
    ///
    /// Runs on every update pass, whether or not any argument moved.
    pub fn update(
        &self,
        bucket: Option<&ComponentStateBucket>,
        _scope: &dyn Any,
    ) -> Result<(), PropertyError> {
        let Some(bucket) = bucket else {
            return Ok(());
        };
        let component = bucket.component();
        component.base().set_args(bucket.named_args_snapshot())?;
        component.did_update();
        bucket.mark_updated();
        tracing::trace!(instance = %component.instance(), "updated component");
        Ok(())
    }

    pub fn did_update_layout(&self, _bucket: Option<&ComponentStateBucket>, _bounds: &dyn Any) {}

    pub fn did_update(&self, _bucket: Option<&ComponentStateBucket>) {}

    /// The component itself is the destructible.
    pub fn get_destructor(&self, bucket: Option<&ComponentStateBucket>) -> Option<ComponentDestructor> {
        bucket.map(ComponentStateBucket::destructor)
    }

    pub fn permits_angle_invocation(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::component::{
        component_schema, CapturedNamedArguments, Component, ComponentBase, CompilableLayout,
        Destroyable, Injections, LayoutBuilder, LifecycleState, OwnerRef, Owner,
    };
    use crate::config::Runtime;
    use crate::reference::{PathReference, UpdatableReference};
    use crate::value::Dict;

    // =========================================================================
    // Fixtures
    // =========================================================================

    #[derive(Default)]
    struct Calls {
        events: RefCell<Vec<&'static str>>,
    }

    impl Calls {
        fn push(&self, event: &'static str) {
            self.events.borrow_mut().push(event);
        }

        fn count(&self, event: &str) -> usize {
            self.events.borrow().iter().filter(|e| **e == event).count()
        }
    }

    struct Probe {
        base: ComponentBase,
        calls: Rc<Calls>,
    }

    impl Component for Probe {
        fn base(&self) -> &ComponentBase {
            &self.base
        }

        fn did_insert_element(&self) {
            self.calls.push("did_insert_element");
        }

        fn did_update(&self) {
            self.calls.push("did_update");
        }

        fn destroy(&self) {
            self.calls.push("destroy");
        }
    }

    struct Services;

    impl Owner for Services {
        fn lookup(&self, specifier: &str) -> Option<Value> {
            (specifier == "service:greeting").then(|| Value::from("hello"))
        }
    }

    struct Env;

    #[derive(Default)]
    struct Compiled(Vec<String>);

    impl LayoutBuilder for Compiled {
        fn add_layout(&mut self, name: &str, template: &Template) {
            self.0.push(format!("{name}:{}", template.source()));
        }
    }

    impl Environment for Env {
        type Layout = Vec<String>;

        fn owner(&self) -> Option<OwnerRef> {
            Some(Rc::new(Services))
        }

        fn compile_layout(&self, layout: &dyn CompilableLayout) -> Vec<String> {
            let mut compiled = Compiled::default();
            layout.compile(&mut compiled);
            compiled.0
        }
    }

    fn probe_definition(calls: Rc<Calls>) -> ComponentDefinition {
        let runtime = Runtime::development();
        let factory = move |injections: Injections| -> Rc<dyn Component> {
            calls.push("create");
            Rc::new(Probe {
                base: ComponentBase::new(&component_schema(), &runtime, injections),
                calls: calls.clone(),
            })
        };
        Rc::new(ComponentManager::new()).create_component_definition(
            "x-probe",
            Template::new("<div>{{@x}}</div>"),
            Some(Rc::new(factory)),
        )
    }

    fn args_with_x(x: &Rc<UpdatableReference>) -> CapturedArguments {
        let named: CapturedNamedArguments = [("x", x.clone() as PathRef)].into_iter().collect();
        CapturedArguments::new(named)
    }

    // =========================================================================
    // Tests
    // =========================================================================

    #[test]
    fn test_create_instantiates_with_snapshot_and_owner() {
        let calls = Rc::new(Calls::default());
        let definition = probe_definition(calls.clone());
        let x = Rc::new(UpdatableReference::new(Value::Number(1.0)));

        let manager = definition.manager().clone();
        let bucket = manager.create(&Env, &definition, &args_with_x(&x)).unwrap();

        assert_eq!(calls.count("create"), 1);
        assert_eq!(bucket.state(), LifecycleState::Created);
        let component = bucket.component();
        assert_eq!(component.args().get("x"), Some(&Value::Number(1.0)));
        assert_eq!(component.base().debug_name(), "x-probe");
        let owner = component.base().owner().unwrap();
        assert_eq!(owner.lookup("service:greeting"), Some(Value::from("hello")));
    }

    #[test]
    fn test_create_without_factory_is_none() {
        let manager = Rc::new(ComponentManager::new());
        let definition = manager.create_component_definition("x-static", Template::new("hi"), None);

        let bucket = manager.create(&Env, &definition, &CapturedArguments::default());
        assert!(bucket.is_none());
        assert!(manager.get_self(bucket.as_ref()).is_none());
        assert!(manager.get_destructor(bucket.as_ref()).is_none());
        manager.did_create(bucket.as_ref());
        assert!(manager.update(bucket.as_ref(), &()).is_ok());
    }

    #[test]
    fn test_update_resnapshots_and_calls_hook_once() {
        let calls = Rc::new(Calls::default());
        let definition = probe_definition(calls.clone());
        let x = Rc::new(UpdatableReference::new(Value::Number(1.0)));
        let manager = ComponentManager::new();
        let bucket = manager.create(&Env, &definition, &args_with_x(&x)).unwrap();

        x.update(Value::Number(2.0));
        manager.update(Some(&bucket), &()).unwrap();

        let expected: Dict = [("x", 2)].into_iter().collect();
        assert_eq!(bucket.component().args(), expected);
        assert_eq!(calls.count("did_update"), 1);
        assert_eq!(bucket.state(), LifecycleState::Updated);
    }

    #[test]
    fn test_update_runs_even_when_nothing_changed() {
        let calls = Rc::new(Calls::default());
        let definition = probe_definition(calls.clone());
        let x = Rc::new(UpdatableReference::new(Value::Number(1.0)));
        let manager = ComponentManager::new();
        let bucket = manager.create(&Env, &definition, &args_with_x(&x)).unwrap();

        let before = bucket.component().args();
        manager.update(Some(&bucket), &()).unwrap();
        manager.update(Some(&bucket), &()).unwrap();

        assert_eq!(calls.count("did_update"), 2);
        assert!(!before.ptr_eq(&bucket.component().args()));
    }

    #[test]
    fn test_element_then_insert_hook() {
        let calls = Rc::new(Calls::default());
        let definition = probe_definition(calls.clone());
        let manager = ComponentManager::new();
        let bucket = manager
            .create(&Env, &definition, &CapturedArguments::default())
            .unwrap();

        let element = Element::new("div#root");
        manager.did_create_element(Some(&bucket), element.clone());
        manager.did_create(Some(&bucket));

        assert!(bucket.component().base().element().unwrap().ptr_eq(&element));
        assert_eq!(calls.count("did_insert_element"), 1);
    }

    #[test]
    fn test_get_self_reads_instance() {
        let calls = Rc::new(Calls::default());
        let definition = probe_definition(calls);
        let x = Rc::new(UpdatableReference::new(Value::from("a")));
        let manager = ComponentManager::new();
        let bucket = manager.create(&Env, &definition, &args_with_x(&x)).unwrap();

        let this = manager.get_self(Some(&bucket)).unwrap();
        assert!(this.tag().is_const());
        let arg_x = this.clone().get("args").get("x");
        assert_eq!(arg_x.value(), Value::from("a"));

        x.update(Value::from("b"));
        assert_eq!(arg_x.value(), Value::from("a"));
        manager.update(Some(&bucket), &()).unwrap();
        assert_eq!(arg_x.value(), Value::from("b"));
    }

    #[test]
    fn test_destructor_runs_teardown_once() {
        let calls = Rc::new(Calls::default());
        let definition = probe_definition(calls.clone());
        let manager = ComponentManager::new();
        let bucket = manager
            .create(&Env, &definition, &CapturedArguments::default())
            .unwrap();

        let destructor = manager.get_destructor(Some(&bucket)).unwrap();
        assert!(Rc::ptr_eq(destructor.component(), bucket.component()));
        destructor.destroy();
        destructor.destroy();

        assert_eq!(calls.count("destroy"), 1);
        assert_eq!(bucket.state(), LifecycleState::Destroyed);
    }

    #[test]
    fn test_layout_for_passes_template_by_name() {
        let calls = Rc::new(Calls::default());
        let definition = probe_definition(calls);
        let manager = ComponentManager::new();

        let layout = manager.layout_for(&definition, None, &Env);
        assert_eq!(layout, vec!["x-probe:<div>{{@x}}</div>".to_string()]);
    }

    #[test]
    fn test_constant_answers() {
        let manager = ComponentManager::new();
        assert!(manager.get_tag(None).is_none());
        assert!(manager.permits_angle_invocation());
        assert!(manager.prepare_args(
            &Rc::new(manager).create_component_definition("x", Template::new(""), None),
            &CapturedArguments::default(),
        )
        .is_none());
    }
}
