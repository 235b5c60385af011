use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::annotation::Bind;
use crate::aspect::AspectDefinition;
use crate::component::{ComponentId, WrapperRef};
use crate::descriptor::{BoundProperty, ElementDescriptor};
use crate::dispatcher::{PropertyBehaviorProvider, PropertyDispatcher, PropertyDispatcherFactory};
use crate::error::{BindingError, Result};
use crate::introspect::{ObjectRef, same_object};
use crate::message::MessageList;
use crate::validation::{NoValidation, ValidationService};

use super::{Binding, ContainerBinding, ElementBinding, Handler};

// ── Builder ───────────────────────────────────────────────────────────────

/// Configures a [`BindingContext`].
///
/// ```rust,ignore
/// let context = BindingContextBuilder::new("order-page")
///     .validation_service(move || validate(&order))
///     .after_update(Rc::new(|| relayout()))
///     .build();
/// ```
pub struct BindingContextBuilder {
    name: String,
    validation: Box<dyn ValidationService>,
    after_update: Option<Handler>,
    behaviors: PropertyBehaviorProvider,
}

impl BindingContextBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            validation: Box::new(NoValidation),
            after_update: None,
            behaviors: PropertyBehaviorProvider::default(),
        }
    }

    pub fn validation_service(mut self, service: impl ValidationService + 'static) -> Self {
        self.validation = Box::new(service);
        self
    }

    /// Runs after every [`BindingContext::model_changed`].
    pub fn after_update(mut self, handler: Handler) -> Self {
        self.after_update = Some(handler);
        self
    }

    pub fn behavior_provider(mut self, behaviors: PropertyBehaviorProvider) -> Self {
        self.behaviors = behaviors;
        self
    }

    pub fn build(self) -> Rc<BindingContext> {
        Rc::new_cyclic(|self_ref| BindingContext {
            name: self.name,
            validation: self.validation,
            after_update: self.after_update,
            behaviors: self.behaviors,
            elements: RefCell::new(BTreeMap::new()),
            tables: RefCell::new(BTreeMap::new()),
            dispatchers: RefCell::new(Vec::new()),
            self_ref: self_ref.clone(),
        })
    }
}

// ── BindingContext ────────────────────────────────────────────────────────

/// Owner of all bindings of one page or dialog.
///
/// Passes over the registry iterate snapshots, so a table update may add and
/// remove bindings while the context is refreshing.
pub struct BindingContext {
    name: String,
    validation: Box<dyn ValidationService>,
    after_update: Option<Handler>,
    behaviors: PropertyBehaviorProvider,
    elements: RefCell<BTreeMap<ComponentId, Rc<ElementBinding>>>,
    tables: RefCell<BTreeMap<ComponentId, Rc<dyn ContainerBinding>>>,
    dispatchers: RefCell<Vec<Rc<dyn PropertyDispatcher>>>,
    self_ref: Weak<BindingContext>,
}

impl BindingContext {
    /// A context without validation or after-update handler.
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        BindingContextBuilder::new(name).build()
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn behavior_provider(&self) -> &PropertyBehaviorProvider {
        &self.behaviors
    }

    /// Binds `component` to the property described by `descriptor` on `pmo`,
    /// registers the binding and pushes the current model state into the
    /// component.
    pub fn bind(
        &self,
        pmo: &ObjectRef,
        descriptor: &ElementDescriptor,
        component: WrapperRef,
    ) -> Result<Rc<ElementBinding>> {
        self.bind_aspects(pmo, &descriptor.bound_property, &descriptor.aspect_definitions, component)
    }

    /// Binds a component the application created itself. Buttons invoke the
    /// property named by `bind`, other components edit its value.
    pub fn bind_component(&self, pmo: &ObjectRef, bind: &Bind, component: WrapperRef) -> Result<Rc<ElementBinding>> {
        let is_button = component.borrow_mut().as_button().is_some();
        let bound = BoundProperty::new(bind.pmo_property.clone())
            .with_model_object(bind.model_object.clone())
            .with_model_attribute(bind.model_attribute.clone());
        let definitions = AspectDefinition::from_bind(bind, is_button);
        self.bind_aspects(pmo, &bound, &definitions, component)
    }

    fn bind_aspects(
        &self,
        pmo: &ObjectRef,
        bound: &BoundProperty,
        definitions: &[AspectDefinition],
        component: WrapperRef,
    ) -> Result<Rc<ElementBinding>> {
        let dispatcher = PropertyDispatcherFactory::create_dispatcher_chain(pmo, bound, &self.behaviors)?;
        let binding = Rc::new(ElementBinding::new(
            component,
            dispatcher,
            self.model_changed_handler(),
            definitions,
        )?);
        self.add_element_binding(Rc::clone(&binding));
        if let Err(e) = binding.update_from_pmo() {
            self.remove_bindings_for_component(binding.bound_component());
            return Err(e.in_context(&self.name));
        }
        Ok(binding)
    }

    /// Registers `binding`, replacing any binding of the same component.
    pub fn add_element_binding(&self, binding: Rc<ElementBinding>) {
        let id = binding.component_id();
        log::trace!("{}: add binding of {} to {id:?}", self.name, binding.dispatcher().property());

        let dispatcher = Rc::clone(binding.dispatcher());
        let previous = self.elements.borrow_mut().insert(id, binding);
        if let Some(previous) = previous {
            self.forget_dispatcher(&previous);
        }

        let mut dispatchers = self.dispatchers.borrow_mut();
        let key = dispatcher_key(&dispatcher);
        if !dispatchers.iter().any(|d| dispatcher_key(d) == key) {
            dispatchers.push(dispatcher);
        }
    }

    pub fn add_table_binding(&self, binding: Rc<dyn ContainerBinding>) {
        let id = binding.bound_component().borrow().component_id();
        log::trace!("{}: add table binding to {id:?}", self.name);
        self.tables.borrow_mut().insert(id, binding);
    }

    /// Snapshot of the element bindings in component creation order.
    pub fn element_bindings(&self) -> Vec<Rc<ElementBinding>> {
        self.elements.borrow().values().cloned().collect()
    }

    pub fn table_bindings(&self) -> Vec<Rc<dyn ContainerBinding>> {
        self.tables.borrow().values().cloned().collect()
    }

    /// Element and table bindings together.
    pub fn binding_count(&self) -> usize {
        self.elements.borrow().len() + self.tables.borrow().len()
    }

    /// Number of distinct dispatcher chains in use.
    pub fn dispatcher_count(&self) -> usize {
        self.dispatchers.borrow().len()
    }

    /// Removes every binding reading from `pmo`. Table bindings of `pmo`
    /// take their cell bindings with them.
    pub fn remove_bindings_for_pmo(&self, pmo: &ObjectRef) {
        let is_bound_to = |bound: Option<ObjectRef>| bound.is_some_and(|p| same_object(&p, pmo));

        let tables: Vec<(ComponentId, Rc<dyn ContainerBinding>)> = self
            .tables
            .borrow()
            .iter()
            .filter(|(_, t)| is_bound_to(t.pmo()))
            .map(|(id, t)| (*id, Rc::clone(t)))
            .collect();
        for (id, table) in tables {
            self.tables.borrow_mut().remove(&id);
            table.clear(self);
        }
        for table in self.table_bindings() {
            table.release_row(pmo, self);
        }

        let elements: Vec<(ComponentId, Rc<ElementBinding>)> = self
            .elements
            .borrow()
            .iter()
            .filter(|(_, e)| is_bound_to(e.pmo()))
            .map(|(id, e)| (*id, Rc::clone(e)))
            .collect();
        log::trace!("{}: remove {} bindings of pmo", self.name, elements.len());
        for (id, binding) in elements {
            self.elements.borrow_mut().remove(&id);
            self.forget_dispatcher(&binding);
        }
    }

    /// Removes the binding of `component` and, for containers, of every
    /// descendant.
    pub fn remove_bindings_for_component(&self, component: &WrapperRef) {
        let (id, children) = {
            let c = component.borrow();
            (c.component_id(), c.children())
        };

        let removed = self.elements.borrow_mut().remove(&id);
        if let Some(binding) = removed {
            log::trace!("{}: remove binding of {id:?}", self.name);
            self.forget_dispatcher(&binding);
        }
        let table = self.tables.borrow_mut().remove(&id);
        if let Some(table) = table {
            log::trace!("{}: remove table binding of {id:?}", self.name);
            table.clear(self);
        }

        for child in &children {
            self.remove_bindings_for_component(child);
        }
    }

    fn forget_dispatcher(&self, binding: &ElementBinding) {
        self.dispatchers
            .borrow_mut()
            .retain(|d| dispatcher_key(d) != dispatcher_key(binding.dispatcher()));
    }

    /// Pushes the model state into every component. Messages are left alone.
    ///
    /// Tables go first: their update creates and removes the cell bindings
    /// the element pass must see. Bindings created by a table in this pass
    /// were updated when they were bound and are skipped. The pass stops at
    /// the first failing binding; the registry stays intact for the next
    /// refresh.
    pub fn ui_updated(&self) -> Result<()> {
        let existing: BTreeSet<ComponentId> = self.elements.borrow().keys().copied().collect();
        let tables = self.table_bindings();
        let in_context = |e: BindingError| e.in_context(&self.name);
        for table in &tables {
            table.update_from_pmo().map_err(in_context)?;
        }

        let elements: Vec<Rc<ElementBinding>> = self
            .element_bindings()
            .into_iter()
            .filter(|b| existing.contains(&b.component_id()))
            .collect();
        log::debug!(
            "{}: updating {} tables and {} elements",
            self.name,
            tables.len(),
            elements.len()
        );
        for binding in &elements {
            binding.update_from_pmo().map_err(in_context)?;
        }
        Ok(())
    }

    /// Full refresh after a model change: fetch messages, update the UI,
    /// show the messages, then run the after-update handler.
    pub fn model_changed(&self) -> Result<()> {
        let messages = self.validation.validation_messages();
        self.ui_updated()?;
        self.display_messages(&messages);
        if let Some(after_update) = &self.after_update {
            after_update();
        }
        Ok(())
    }

    /// Filters `messages` once per distinct dispatcher, then shows each
    /// binding the messages of its dispatcher.
    fn display_messages(&self, messages: &MessageList) {
        let prepared: HashMap<*const (), MessageList> = self
            .dispatchers
            .borrow()
            .iter()
            .map(|d| (dispatcher_key(d), d.messages(messages)))
            .collect();
        for binding in self.element_bindings() {
            match prepared.get(&dispatcher_key(binding.dispatcher())) {
                Some(own) => binding.show_messages(own),
                None => {
                    binding.display_messages(messages);
                }
            }
        }
        for table in self.table_bindings() {
            table.display_messages(messages);
        }
    }

    /// Handler calling [`model_changed`](Self::model_changed), for UI
    /// listeners. Holds the context weakly; errors are logged since a
    /// listener has nobody to return them to.
    pub fn model_changed_handler(&self) -> Handler {
        let context = Weak::clone(&self.self_ref);
        Rc::new(move || {
            if let Some(context) = context.upgrade() {
                if let Err(e) = context.model_changed() {
                    log::error!("{}: model update failed: {e}", context.name);
                }
            }
        })
    }
}

fn dispatcher_key(dispatcher: &Rc<dyn PropertyDispatcher>) -> *const () {
    Rc::as_ptr(dispatcher).cast::<()>()
}

impl fmt::Debug for BindingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingContext")
            .field("name", &self.name)
            .field("elements", &self.elements.borrow().len())
            .field("tables", &self.tables.borrow().len())
            .finish()
    }
}
