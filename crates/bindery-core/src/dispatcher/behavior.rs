use std::rc::Rc;

use crate::aspect::{self, Aspect};
use crate::error::Result;
use crate::introspect::ObjectRef;
use crate::message::MessageList;
use crate::value::Value;

use super::PropertyDispatcher;

/// Cross-cutting rule restricting what the user may see or change, e.g. a
/// read-only mode for a whole page. All methods default to "allowed".
pub trait PropertyBehavior {
    fn is_visible(&self, _object: &ObjectRef, _property: &str) -> bool {
        true
    }

    fn is_writable(&self, _object: &ObjectRef, _property: &str) -> bool {
        true
    }

    fn is_show_validation_messages(&self, _object: &ObjectRef, _property: &str) -> bool {
        true
    }
}

/// Makes every property read-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlyBehavior;

impl PropertyBehavior for ReadOnlyBehavior {
    fn is_writable(&self, _object: &ObjectRef, _property: &str) -> bool {
        false
    }
}

/// The behaviors active in a binding context.
#[derive(Clone, Default)]
pub struct PropertyBehaviorProvider {
    behaviors: Vec<Rc<dyn PropertyBehavior>>,
}

impl PropertyBehaviorProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, behavior: impl PropertyBehavior + 'static) -> Self {
        self.behaviors.push(Rc::new(behavior));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    fn consensus(&self, object: Option<ObjectRef>, test: impl Fn(&dyn PropertyBehavior, &ObjectRef) -> bool) -> bool {
        match object {
            Some(object) => self.behaviors.iter().all(|b| test(b.as_ref(), &object)),
            None => true,
        }
    }
}

/// First link of a chain: applies the behaviors of the context on top of
/// what the rest of the chain resolves.
pub struct BehaviorDependentDispatcher {
    provider: PropertyBehaviorProvider,
    fallback: Box<dyn PropertyDispatcher>,
}

impl BehaviorDependentDispatcher {
    pub fn new(provider: PropertyBehaviorProvider, fallback: Box<dyn PropertyDispatcher>) -> Self {
        Self { provider, fallback }
    }

    fn is_consensus(&self, test: impl Fn(&dyn PropertyBehavior, &ObjectRef, &str) -> bool) -> bool {
        let property = self.fallback.property();
        self.provider
            .consensus(self.fallback.bound_object(), |b, o| test(b, o, property))
    }
}

impl PropertyDispatcher for BehaviorDependentDispatcher {
    fn property(&self) -> &str {
        self.fallback.property()
    }

    fn bound_object(&self) -> Option<ObjectRef> {
        self.fallback.bound_object()
    }

    fn set_value(&self, value: Value) -> Result<()> {
        if self.is_read_only() {
            return Ok(());
        }
        self.fallback.set_value(value)
    }

    fn is_read_only(&self) -> bool {
        !self.is_consensus(|b, o, p| b.is_writable(o, p)) || self.fallback.is_read_only()
    }

    fn aspect_value(&self, aspect: &Aspect) -> Result<Value> {
        if aspect.name == aspect::VISIBLE && !self.is_consensus(|b, o, p| b.is_visible(o, p)) {
            return Ok(Value::Bool(false));
        }
        self.fallback.aspect_value(aspect)
    }

    fn messages(&self, messages: &MessageList) -> MessageList {
        if self.is_consensus(|b, o, p| b.is_show_validation_messages(o, p)) {
            self.fallback.messages(messages)
        } else {
            MessageList::new()
        }
    }

    fn invoke(&self) -> Result<()> {
        self.fallback.invoke()
    }
}
