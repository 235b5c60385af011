//! Property dispatchers.
//!
//! A binding never talks to its PMO directly. It asks a chain of
//! dispatchers, each of which either answers or passes the request on to its
//! fallback:
//!
//! ```text
//! BehaviorDependent → StaticValue → Reflection(pmo) → [Reflection(model object)] → Exception
//! ```
//!
//! The chain always ends in [`ExceptionPropertyDispatcher`], so an aspect
//! nobody can resolve fails loudly instead of resolving to nothing.

mod behavior;
mod exception;
mod factory;
mod reflection;
mod static_value;

pub use behavior::{BehaviorDependentDispatcher, PropertyBehavior, PropertyBehaviorProvider, ReadOnlyBehavior};
pub use exception::ExceptionPropertyDispatcher;
pub use factory::PropertyDispatcherFactory;
pub use reflection::ReflectionPropertyDispatcher;
pub use static_value::StaticValueDispatcher;

use crate::aspect::{self, Aspect};
use crate::error::{BindingError, Result};
use crate::introspect::ObjectRef;
use crate::message::MessageList;
use crate::value::Value;

/// One link of a dispatcher chain.
pub trait PropertyDispatcher {
    /// Name of the property this link resolves.
    fn property(&self) -> &str;

    /// The object this link reads from, if any.
    fn bound_object(&self) -> Option<ObjectRef>;

    /// Writes the value of the property. A no-op when [`is_read_only`](Self::is_read_only).
    fn set_value(&self, value: Value) -> Result<()>;

    /// `true` if neither this link nor any of its fallbacks can write.
    fn is_read_only(&self) -> bool;

    fn aspect_value(&self, aspect: &Aspect) -> Result<Value>;

    /// Messages of `messages` that concern this property.
    fn messages(&self, messages: &MessageList) -> MessageList;

    /// Invokes the action method named like the property.
    fn invoke(&self) -> Result<()>;

    fn value(&self) -> Result<Value> {
        self.aspect_value(&Aspect::dynamic(aspect::VALUE))
    }

    fn is_enabled(&self) -> Result<bool> {
        bool_aspect(self, aspect::ENABLED)
    }

    fn is_visible(&self) -> Result<bool> {
        bool_aspect(self, aspect::VISIBLE)
    }

    fn is_required(&self) -> Result<bool> {
        bool_aspect(self, aspect::REQUIRED)
    }
}

fn bool_aspect<D: PropertyDispatcher + ?Sized>(dispatcher: &D, name: &str) -> Result<bool> {
    dispatcher
        .aspect_value(&Aspect::dynamic(name))?
        .as_bool()
        .map_err(|source| BindingError::InvalidAspectValue {
            aspect: name.to_string(),
            property: dispatcher.property().to_string(),
            source,
        })
}
