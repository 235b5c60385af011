//! Toolkit-neutral view of UI components.
//!
//! A GUI toolkit plugs into the binding core by implementing
//! [`ComponentWrapper`] for its components and [`ComponentFactory`] for
//! creating them. The core only ever calls into the toolkit; toolkits call
//! back exclusively through the listeners the core installs.
//!
//! Capability views (`as_field`, `as_button`, …) tell the core what a
//! component can express. A view returning `None` means the component lacks
//! the capability, and binding an aspect that needs it fails.
//!
//! Toolkits must release their own borrow of a wrapper before invoking a
//! change or click listener: listeners update the whole binding context,
//! which borrows every bound wrapper again.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::annotation::{ComponentKind, UiSection};
use crate::message::MessageList;
use crate::value::Value;

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

// ── ComponentId ───────────────────────────────────────────────────────────

/// Process-unique identity of a wrapped component.
///
/// Allocated once per wrapper via [`ComponentId::new()`]; the binding context
/// keys its registry by it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ComponentId(u64);

impl ComponentId {
    pub fn new() -> Self {
        ComponentId(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

// ── Listeners ─────────────────────────────────────────────────────────────

/// Called by a field with its new value after the user edited it.
pub type ChangeListener = Rc<dyn Fn(Value)>;

/// Called by a button when it was clicked.
pub type ClickListener = Rc<dyn Fn()>;

pub type WrapperRef = Rc<RefCell<dyn ComponentWrapper>>;

// ── Capabilities ──────────────────────────────────────────────────────────

/// A component that displays and edits a single value.
pub trait FieldComponent {
    fn value(&self) -> Value;
    fn set_value(&mut self, value: Value);
    fn set_required(&mut self, required: bool);
    fn set_read_only(&mut self, read_only: bool);
    fn set_change_listener(&mut self, listener: ChangeListener);
}

/// A field offering a list of values to choose from.
pub trait SelectionComponent {
    fn set_available_values(&mut self, values: Vec<Value>);
}

pub trait ButtonComponent {
    fn set_caption(&mut self, caption: &str);
    fn set_click_listener(&mut self, listener: ClickListener);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub property: String,
    pub header: String,
}

/// One rendered row: its cell components and its depth in a hierarchy.
#[derive(Clone)]
pub struct TableRow {
    pub depth: usize,
    pub cells: Vec<WrapperRef>,
}

pub trait TableComponent {
    fn set_columns(&mut self, columns: Vec<TableColumn>);
    /// Replaces the displayed rows, depth-first for hierarchical tables.
    fn set_rows(&mut self, rows: Vec<TableRow>);
    fn set_page_length(&mut self, page_length: usize);
}

pub trait LayoutComponent {
    fn add_component(&mut self, component: WrapperRef);
}

// ── ComponentWrapper ──────────────────────────────────────────────────────

pub trait ComponentWrapper: 'static {
    fn component_id(&self) -> ComponentId;

    fn set_id(&mut self, id: &str);
    fn set_label(&mut self, label: &str);
    fn set_enabled(&mut self, enabled: bool);
    fn set_visible(&mut self, visible: bool);
    fn set_tooltip(&mut self, tooltip: &str);
    fn set_validation_messages(&mut self, messages: &MessageList);
    fn add_style_names(&mut self, names: &[String]);
    fn remove_style_names(&mut self, names: &[String]);

    /// Toolkit name of the component type, used in diagnostics.
    fn kind_name(&self) -> &str;

    /// Direct child components of a container.
    fn children(&self) -> Vec<WrapperRef> {
        Vec::new()
    }

    fn as_field(&mut self) -> Option<&mut dyn FieldComponent> {
        None
    }

    fn as_selection(&mut self) -> Option<&mut dyn SelectionComponent> {
        None
    }

    fn as_button(&mut self) -> Option<&mut dyn ButtonComponent> {
        None
    }

    fn as_table(&mut self) -> Option<&mut dyn TableComponent> {
        None
    }

    fn as_layout(&mut self) -> Option<&mut dyn LayoutComponent> {
        None
    }
}

// ── ComponentFactory ──────────────────────────────────────────────────────

/// What to create for one element descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDefinition {
    pub kind: ComponentKind,
    pub id: String,
    pub label: String,
    pub position: i32,
}

pub trait ComponentFactory {
    fn create_component(&self, definition: &ComponentDefinition) -> WrapperRef;
    fn create_layout(&self, id: &str, section: &UiSection) -> WrapperRef;
    fn create_table(&self, id: &str) -> WrapperRef;
}
