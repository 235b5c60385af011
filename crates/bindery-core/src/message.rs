//! Validation messages.

use std::fmt;

use crate::introspect::{ObjectRef, class_name_of, same_object};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// An object, optionally narrowed to one of its properties, that a message
/// refers to. `property == None` marks the whole object.
#[derive(Clone)]
pub struct ObjectProperty {
    pub object: ObjectRef,
    pub property: Option<String>,
}

impl ObjectProperty {
    pub fn new(object: ObjectRef, property: impl Into<String>) -> Self {
        Self {
            object,
            property: Some(property.into()),
        }
    }

    pub fn whole(object: ObjectRef) -> Self {
        Self { object, property: None }
    }

    pub fn matches(&self, object: &ObjectRef, property: &str) -> bool {
        same_object(&self.object, object)
            && self.property.as_deref().is_none_or(|p| p == property)
    }
}

impl PartialEq for ObjectProperty {
    fn eq(&self, other: &Self) -> bool {
        same_object(&self.object, &other.object) && self.property == other.property
    }
}

impl fmt::Debug for ObjectProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectProperty")
            .field("object", &class_name_of(&self.object))
            .field("property", &self.property)
            .finish()
    }
}

// ── Message ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub code: String,
    pub text: String,
    pub severity: Severity,
    pub invalid_object_properties: Vec<ObjectProperty>,
}

impl Message {
    pub fn new(code: impl Into<String>, text: impl Into<String>, severity: Severity) -> Self {
        Self {
            code: code.into(),
            text: text.into(),
            severity,
            invalid_object_properties: Vec::new(),
        }
    }

    pub fn error(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(code, text, Severity::Error)
    }

    pub fn warning(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(code, text, Severity::Warning)
    }

    pub fn info(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(code, text, Severity::Info)
    }

    /// Marks `property` of `object` as invalid.
    pub fn with_invalid(mut self, object: &ObjectRef, property: impl Into<String>) -> Self {
        self.invalid_object_properties
            .push(ObjectProperty::new(object.clone(), property));
        self
    }

    pub fn with_invalid_object(mut self, object: &ObjectRef) -> Self {
        self.invalid_object_properties
            .push(ObjectProperty::whole(object.clone()));
        self
    }

    pub fn refers_to(&self, object: &ObjectRef, property: &str) -> bool {
        self.invalid_object_properties
            .iter()
            .any(|op| op.matches(object, property))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}: {}", self.severity, self.code, self.text)
    }
}

// ── MessageList ───────────────────────────────────────────────────────────

/// Ordered list of messages. Iteration order is insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageList {
    messages: Vec<Message>,
}

impl MessageList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn add_all(&mut self, other: MessageList) {
        self.messages.extend(other.messages);
    }

    /// Messages that refer to `property` of `object`.
    pub fn messages_for(&self, object: &ObjectRef, property: &str) -> MessageList {
        self.messages
            .iter()
            .filter(|m| m.refers_to(object, property))
            .cloned()
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Highest severity in the list.
    pub fn severity(&self) -> Option<Severity> {
        self.messages.iter().map(|m| m.severity).max()
    }

    pub fn first_message(&self, severity: Severity) -> Option<&Message> {
        self.messages.iter().find(|m| m.severity == severity)
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.messages.iter().any(|m| m.code == code)
    }
}

impl FromIterator<Message> for MessageList {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MessageList {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a MessageList {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
