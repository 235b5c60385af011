use std::sync::Arc;

use crate::accessor::{PropertyAccessor, aspect_property};
use crate::aspect::Aspect;
use crate::descriptor::ObjectSupplier;
use crate::error::{BindingError, Result};
use crate::introspect::ObjectRef;
use crate::message::MessageList;
use crate::value::Value;

use super::PropertyDispatcher;

/// Resolves aspects on the supplied object through the accessor cache and
/// falls back when the object has no matching method.
///
/// Only dynamic aspects may reach this link; static ones belong to
/// [`super::StaticValueDispatcher`] earlier in the chain.
pub struct ReflectionPropertyDispatcher {
    bound_object: ObjectSupplier,
    property: String,
    fallback: Box<dyn PropertyDispatcher>,
}

impl ReflectionPropertyDispatcher {
    pub fn new(
        bound_object: ObjectSupplier,
        property: impl Into<String>,
        fallback: Box<dyn PropertyDispatcher>,
    ) -> Self {
        Self {
            bound_object,
            property: property.into(),
            fallback,
        }
    }

    /// Accessor of `property` on the current bound object, if there is one.
    fn accessor(&self, property: &str) -> Result<Option<(ObjectRef, Arc<PropertyAccessor>)>> {
        let Some(object) = (self.bound_object)() else {
            return Ok(None);
        };
        let class = object
            .try_borrow()
            .map(|o| o.class_info())
            .map_err(|_| BindingError::Access {
                object: "<borrowed object>".to_string(),
                property: property.to_string(),
                cause: "object is mutably borrowed".to_string(),
            })?;
        let accessor = PropertyAccessor::get(&class, property);
        Ok(Some((object, accessor)))
    }

    fn can_write(&self) -> bool {
        matches!(self.accessor(&self.property), Ok(Some((_, a))) if a.can_write())
    }
}

impl PropertyDispatcher for ReflectionPropertyDispatcher {
    fn property(&self) -> &str {
        &self.property
    }

    fn bound_object(&self) -> Option<ObjectRef> {
        (self.bound_object)()
    }

    fn set_value(&self, value: Value) -> Result<()> {
        if self.is_read_only() {
            return Ok(());
        }
        match self.accessor(&self.property)? {
            Some((object, accessor)) if accessor.can_write() => accessor.write(&object, value),
            _ => self.fallback.set_value(value),
        }
    }

    fn is_read_only(&self) -> bool {
        !self.can_write() && self.fallback.is_read_only()
    }

    fn aspect_value(&self, aspect: &Aspect) -> Result<Value> {
        if aspect.is_static() {
            return Err(BindingError::StaticAspect {
                aspect: aspect.to_string(),
                dispatcher: "ReflectionPropertyDispatcher",
                context: None,
            });
        }
        let property = aspect_property(&aspect.name, &self.property);
        match self.accessor(&property)? {
            Some((object, accessor)) if accessor.can_read() => accessor.read(&object),
            _ => self.fallback.aspect_value(aspect),
        }
    }

    fn messages(&self, messages: &MessageList) -> MessageList {
        let Some(object) = self.bound_object() else {
            return MessageList::new();
        };
        let mut own = messages.messages_for(&object, &self.property);
        own.add_all(self.fallback.messages(messages));
        own
    }

    fn invoke(&self) -> Result<()> {
        match self.accessor(&self.property)? {
            Some((object, accessor)) if accessor.can_invoke() => accessor.invoke(&object),
            _ => self.fallback.invoke(),
        }
    }
}
