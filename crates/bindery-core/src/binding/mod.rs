//! Live bindings between components and presentation models.
//!
//! An [`ElementBinding`] ties one component to one dispatcher chain. A
//! [`TableBinding`] manages the cell bindings of a table whose rows come
//! from a [`ContainerPmo`]. Both are owned by a [`BindingContext`], which
//! refreshes all of them after every model change.

mod context;
mod element;
mod table;

use std::rc::Rc;

pub use context::{BindingContext, BindingContextBuilder};
pub use element::ElementBinding;
pub use table::{ContainerPmo, TableBinding};

use crate::component::WrapperRef;
use crate::error::Result;
use crate::introspect::ObjectRef;
use crate::message::MessageList;

/// Callback run after the UI changed the model.
pub type Handler = Rc<dyn Fn()>;

pub trait Binding {
    fn bound_component(&self) -> &WrapperRef;

    /// The presentation model object this binding reads from.
    fn pmo(&self) -> Option<ObjectRef>;

    /// Pulls every aspect from the model and pushes it into the component.
    fn update_from_pmo(&self) -> Result<()>;

    /// Shows the messages concerning this binding and returns them.
    fn display_messages(&self, messages: &MessageList) -> MessageList;
}

/// A binding that creates and removes further bindings as its content
/// changes.
pub trait ContainerBinding: Binding {
    /// Number of rows currently bound, nested rows included.
    fn row_count(&self) -> usize;

    /// The cell bindings created for the current rows.
    fn bindings(&self) -> Vec<Rc<ElementBinding>>;

    /// Removes every binding this container created from `context`.
    fn clear(&self, context: &BindingContext);

    /// Drops the rows (nested rows included) whose row object is `row` and
    /// removes their cell bindings from `context`. A dropped row the
    /// container still supplies is bound afresh on the next update.
    /// Returns the number of rows dropped.
    fn release_row(&self, row: &ObjectRef, context: &BindingContext) -> usize;
}
