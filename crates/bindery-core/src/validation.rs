//! Source of validation messages for a binding context.

use crate::message::MessageList;

/// Supplies the complete, current list of validation messages.
///
/// The binding context asks for the list once per model change and
/// distributes it to its bindings; it never modifies it.
pub trait ValidationService {
    fn validation_messages(&self) -> MessageList;
}

impl<F> ValidationService for F
where
    F: Fn() -> MessageList,
{
    fn validation_messages(&self) -> MessageList {
        self()
    }
}

/// A service that never reports anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidation;

impl ValidationService for NoValidation {
    fn validation_messages(&self) -> MessageList {
        MessageList::new()
    }
}
