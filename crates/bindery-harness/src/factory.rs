use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Result, anyhow};
use bindery_core::annotation::{ComponentKind, UiSection};
use bindery_core::component::{ComponentDefinition, ComponentFactory, WrapperRef};

use crate::component::{TestComponent, TestKind};

/// Creates [`TestComponent`]s and remembers all of them, so tests can look
/// components up by id after a factory built the UI.
#[derive(Default)]
pub struct TestComponentFactory {
    created: RefCell<Vec<Rc<RefCell<TestComponent>>>>,
    layouts_as: Option<ComponentKind>,
}

impl TestComponentFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A misconfigured toolkit: sections are created as plain components.
    pub fn with_layouts_as(kind: ComponentKind) -> Self {
        Self {
            layouts_as: Some(kind),
            ..Self::default()
        }
    }

    fn register(&self, component: TestComponent) -> WrapperRef {
        let component = Rc::new(RefCell::new(component));
        self.created.borrow_mut().push(Rc::clone(&component));
        component
    }

    /// The component created most recently with `id`.
    pub fn find(&self, id: &str) -> Result<Rc<RefCell<TestComponent>>> {
        self.find_all(id)
            .pop()
            .ok_or_else(|| anyhow!("no component with id {id:?}"))
    }

    /// Every component created with `id`, in creation order.
    pub fn find_all(&self, id: &str) -> Vec<Rc<RefCell<TestComponent>>> {
        self.created
            .borrow()
            .iter()
            .filter(|c| c.borrow().state().id == id)
            .cloned()
            .collect()
    }

    pub fn created_count(&self) -> usize {
        self.created.borrow().len()
    }
}

impl ComponentFactory for TestComponentFactory {
    fn create_component(&self, definition: &ComponentDefinition) -> WrapperRef {
        log::trace!("create {} for {}", definition.kind.name(), definition.id);
        self.register(TestComponent::new(TestKind::Component(definition.kind)))
    }

    fn create_layout(&self, id: &str, section: &UiSection) -> WrapperRef {
        log::trace!("create layout for {id}");
        let kind = match self.layouts_as {
            Some(kind) => TestKind::Component(kind),
            None => TestKind::Layout(section.layout),
        };
        let mut layout = TestComponent::new(kind);
        layout.show_caption(&section.caption);
        self.register(layout)
    }

    fn create_table(&self, id: &str) -> WrapperRef {
        log::trace!("create table for {id}");
        self.register(TestComponent::new(TestKind::Table))
    }
}
