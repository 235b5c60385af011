use crate::accessor::capitalize;
use crate::aspect::{self, Aspect, AspectResolution};
use crate::error::Result;
use crate::introspect::ObjectRef;
use crate::message::MessageList;
use crate::value::Value;

use super::PropertyDispatcher;

/// Answers aspects that were resolved when the descriptors were built.
///
/// `Fixed` aspects return their value, `Delegate` aspects are resolved
/// through this same link, and everything else goes to the fallback. An
/// empty fixed label turns into the capitalized property name.
pub struct StaticValueDispatcher {
    fallback: Box<dyn PropertyDispatcher>,
}

impl StaticValueDispatcher {
    pub fn new(fallback: Box<dyn PropertyDispatcher>) -> Self {
        Self { fallback }
    }
}

impl PropertyDispatcher for StaticValueDispatcher {
    fn property(&self) -> &str {
        self.fallback.property()
    }

    fn bound_object(&self) -> Option<ObjectRef> {
        self.fallback.bound_object()
    }

    fn set_value(&self, value: Value) -> Result<()> {
        self.fallback.set_value(value)
    }

    fn is_read_only(&self) -> bool {
        self.fallback.is_read_only()
    }

    fn aspect_value(&self, aspect: &Aspect) -> Result<Value> {
        match &aspect.resolution {
            AspectResolution::Fixed(value) => {
                if aspect.name == aspect::LABEL && value.to_display_text().is_empty() {
                    Ok(Value::Str(capitalize(self.property())))
                } else {
                    Ok(value.clone())
                }
            }
            AspectResolution::Delegate(target) => self.aspect_value(target),
            AspectResolution::Dynamic => self.fallback.aspect_value(aspect),
        }
    }

    fn messages(&self, messages: &MessageList) -> MessageList {
        self.fallback.messages(messages)
    }

    fn invoke(&self) -> Result<()> {
        self.fallback.invoke()
    }
}
