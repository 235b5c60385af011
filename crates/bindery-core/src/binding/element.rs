use std::fmt;
use std::rc::Rc;

use crate::aspect::{AspectDefinition, UiUpdater};
use crate::component::{ComponentId, WrapperRef};
use crate::dispatcher::PropertyDispatcher;
use crate::error::Result;
use crate::introspect::ObjectRef;
use crate::message::MessageList;

use super::{Binding, Handler};

/// Binding of one component to one property.
pub struct ElementBinding {
    wrapper: WrapperRef,
    component_id: ComponentId,
    dispatcher: Rc<dyn PropertyDispatcher>,
    updaters: Vec<UiUpdater>,
}

impl ElementBinding {
    /// Wires the UI→model listeners and builds one updater per aspect.
    ///
    /// Fails if an aspect cannot be expressed by the component.
    /// `model_changed` runs after every user edit or click.
    pub fn new(
        wrapper: WrapperRef,
        dispatcher: Rc<dyn PropertyDispatcher>,
        model_changed: Handler,
        aspect_definitions: &[AspectDefinition],
    ) -> Result<Self> {
        let mut updaters = Vec::with_capacity(aspect_definitions.len());
        for definition in aspect_definitions {
            definition.initialize_model_update(&dispatcher, &wrapper, &model_changed)?;
            if let Some(updater) = definition.create_ui_updater(&dispatcher, &wrapper)? {
                updaters.push(updater);
            }
        }
        let component_id = wrapper.borrow().component_id();
        Ok(Self {
            wrapper,
            component_id,
            dispatcher,
            updaters,
        })
    }

    #[inline]
    pub fn component_id(&self) -> ComponentId {
        self.component_id
    }

    pub fn dispatcher(&self) -> &Rc<dyn PropertyDispatcher> {
        &self.dispatcher
    }

    /// Shows messages already filtered for this binding's property.
    pub fn show_messages(&self, own: &MessageList) {
        self.wrapper.borrow_mut().set_validation_messages(own);
    }
}

impl Binding for ElementBinding {
    fn bound_component(&self) -> &WrapperRef {
        &self.wrapper
    }

    fn pmo(&self) -> Option<ObjectRef> {
        self.dispatcher.bound_object()
    }

    fn update_from_pmo(&self) -> Result<()> {
        self.updaters.iter().try_for_each(|update| update())
    }

    fn display_messages(&self, messages: &MessageList) -> MessageList {
        let own = self.dispatcher.messages(messages);
        self.show_messages(&own);
        own
    }
}

impl fmt::Debug for ElementBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementBinding")
            .field("component", &self.component_id)
            .field("property", &self.dispatcher.property())
            .field("updaters", &self.updaters.len())
            .finish()
    }
}
