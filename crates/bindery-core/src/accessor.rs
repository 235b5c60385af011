//! Cached property accessors.
//!
//! A [`PropertyAccessor`] resolves the read, write and action methods of one
//! property by naming convention:
//!
//! | operation | method                              |
//! |-----------|-------------------------------------|
//! | read      | `get<Property>` or `is<Property>`   |
//! | write     | `set<Property>`                     |
//! | invoke    | `<property>`                        |
//!
//! Accessors are cached process-wide per `(type, property)` and never evicted.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::{BindingError, Result};
use crate::introspect::{ActionFn, ClassInfo, MethodKind, ObjectRef, ReadFn, WriteFn};
use crate::value::Value;

static ACCESSORS: Lazy<RwLock<HashMap<(TypeId, String), Arc<PropertyAccessor>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Read/write/invoke access to one property of one bindable type.
pub struct PropertyAccessor {
    class_name: String,
    property: String,
    read: Option<ReadFn>,
    write: Option<WriteFn>,
    action: Option<ActionFn>,
}

impl PropertyAccessor {
    /// Returns the cached accessor for `property` of `class`.
    pub fn get(class: &ClassInfo, property: &str) -> Arc<PropertyAccessor> {
        let key = (class.type_id(), property.to_string());
        if let Some(accessor) = ACCESSORS.read().get(&key) {
            return Arc::clone(accessor);
        }

        let accessor = Arc::new(Self::resolve(class, property));
        log::debug!(
            "accessor {}.{}: read={} write={} invoke={}",
            accessor.class_name,
            property,
            accessor.can_read(),
            accessor.can_write(),
            accessor.can_invoke()
        );
        Arc::clone(ACCESSORS.write().entry(key).or_insert(accessor))
    }

    fn resolve(class: &ClassInfo, property: &str) -> Self {
        let cap = capitalize(property);
        let (getter, predicate, setter) = (format!("get{cap}"), format!("is{cap}"), format!("set{cap}"));

        let mut read = None;
        let mut write = None;
        let mut action = None;
        for method in class.methods() {
            match &method.kind {
                MethodKind::Getter(f)
                    if read.is_none() && (method.name == getter || method.name == predicate) =>
                {
                    read = Some(Arc::clone(f));
                }
                MethodKind::Setter(f) if write.is_none() && method.name == setter => {
                    write = Some(Arc::clone(f));
                }
                MethodKind::Action(f) if action.is_none() && method.name == property => {
                    action = Some(Arc::clone(f));
                }
                _ => {}
            }
        }

        Self {
            class_name: class.name().to_string(),
            property: property.to_string(),
            read,
            write,
            action,
        }
    }

    #[inline]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[inline]
    pub fn can_read(&self) -> bool {
        self.read.is_some()
    }

    #[inline]
    pub fn can_write(&self) -> bool {
        self.write.is_some()
    }

    #[inline]
    pub fn can_invoke(&self) -> bool {
        self.action.is_some()
    }

    fn access_error(&self, cause: impl Into<String>) -> BindingError {
        BindingError::Access {
            object: self.class_name.clone(),
            property: self.property.clone(),
            cause: cause.into(),
        }
    }

    pub fn read(&self, object: &ObjectRef) -> Result<Value> {
        let read = self.read.as_ref().ok_or_else(|| self.access_error("no read method"))?;
        let obj = object
            .try_borrow()
            .map_err(|_| self.access_error("object is mutably borrowed"))?;
        read(obj.as_any()).map_err(|cause| self.access_error(cause))
    }

    pub fn write(&self, object: &ObjectRef, value: Value) -> Result<()> {
        let write = self.write.as_ref().ok_or_else(|| self.access_error("no write method"))?;
        let mut obj = object
            .try_borrow_mut()
            .map_err(|_| self.access_error("object is already borrowed"))?;
        write(obj.as_any_mut(), value).map_err(|cause| self.access_error(cause))
    }

    pub fn invoke(&self, object: &ObjectRef) -> Result<()> {
        let action = self.action.as_ref().ok_or_else(|| self.access_error("no action method"))?;
        let mut obj = object
            .try_borrow_mut()
            .map_err(|_| self.access_error("object is already borrowed"))?;
        action(obj.as_any_mut()).map_err(|cause| self.access_error(cause))
    }
}

// ── Naming convention ─────────────────────────────────────────────────────

/// `"name"` → `"Name"`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Name of the property that resolves `aspect` for `property`.
///
/// The value aspect has the empty name and resolves the property itself;
/// `("enabled", "name")` resolves `nameEnabled` (read as `isNameEnabled`).
pub fn aspect_property(aspect: &str, property: &str) -> String {
    if aspect.is_empty() {
        property.to_string()
    } else {
        format!("{property}{}", capitalize(aspect))
    }
}

/// Derives the bound property from a method name: `getFoo`/`isFoo` → `foo`,
/// anything else is the property itself.
pub fn property_from_method(method: &str) -> String {
    for prefix in ["get", "is"] {
        match method.strip_prefix(prefix) {
            Some(rest) if rest.starts_with(|c: char| c.is_uppercase()) => return decapitalize(rest),
            _ => {}
        }
    }
    method.to_string()
}
