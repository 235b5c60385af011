use crate::accessor::aspect_property;
use crate::aspect::Aspect;
use crate::descriptor::ObjectSupplier;
use crate::error::{BindingError, Result};
use crate::introspect::{ObjectRef, class_name_of};
use crate::message::MessageList;
use crate::value::Value;

use super::PropertyDispatcher;

/// Last link of every chain. Reaching it means no object in the chain
/// provides the requested method.
pub struct ExceptionPropertyDispatcher {
    property: String,
    objects: Vec<ObjectSupplier>,
}

impl ExceptionPropertyDispatcher {
    /// `objects` are the objects searched by the links before this one, in
    /// chain order. They only appear in error messages.
    pub fn new(property: impl Into<String>, objects: Vec<ObjectSupplier>) -> Self {
        Self {
            property: property.into(),
            objects,
        }
    }

    fn no_accessor(&self, operation: &'static str, property: String) -> BindingError {
        let objects = self
            .objects
            .iter()
            .map(|supplier| supplier().map_or_else(|| "null".to_string(), |o| class_name_of(&o)))
            .collect();
        BindingError::NoAccessor {
            operation,
            property,
            objects,
        }
    }
}

impl PropertyDispatcher for ExceptionPropertyDispatcher {
    fn property(&self) -> &str {
        &self.property
    }

    fn bound_object(&self) -> Option<ObjectRef> {
        self.objects.first().and_then(|supplier| supplier())
    }

    fn set_value(&self, _value: Value) -> Result<()> {
        Err(self.no_accessor("write", self.property.clone()))
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn aspect_value(&self, aspect: &Aspect) -> Result<Value> {
        Err(self.no_accessor("read", aspect_property(&aspect.name, &self.property)))
    }

    fn messages(&self, _messages: &MessageList) -> MessageList {
        MessageList::new()
    }

    fn invoke(&self) -> Result<()> {
        Err(self.no_accessor("invoke", self.property.clone()))
    }
}
