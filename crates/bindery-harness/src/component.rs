use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Result, anyhow};
use bindery_core::annotation::{ComponentKind, SectionLayout};
use bindery_core::component::{
    ButtonComponent, ChangeListener, ClickListener, ComponentId, ComponentWrapper, FieldComponent,
    LayoutComponent, SelectionComponent, TableColumn, TableComponent, TableRow, WrapperRef,
};
use bindery_core::message::MessageList;
use bindery_core::value::Value;

/// What a [`TestComponent`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    Component(ComponentKind),
    Layout(SectionLayout),
    Table,
}

impl TestKind {
    fn is_field(self) -> bool {
        matches!(self, TestKind::Component(kind) if kind != ComponentKind::Button)
    }

    fn is_selection(self) -> bool {
        matches!(self, TestKind::Component(kind) if kind.is_selection())
    }
}

/// Everything a [`TestComponent`] currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub id: String,
    pub label: String,
    pub enabled: bool,
    pub visible: bool,
    pub required: bool,
    pub read_only: bool,
    pub tooltip: String,
    pub caption: String,
    pub value: Value,
    pub available_values: Vec<Value>,
    pub style_names: Vec<String>,
    pub messages: MessageList,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            enabled: true,
            visible: true,
            required: false,
            read_only: false,
            tooltip: String::new(),
            caption: String::new(),
            value: Value::Null,
            available_values: Vec::new(),
            style_names: Vec::new(),
            messages: MessageList::new(),
        }
    }
}

/// In-memory component recording everything the binding core pushes into it.
pub struct TestComponent {
    component_id: ComponentId,
    kind: TestKind,
    state: DisplayState,
    value_history: Vec<Value>,
    change_listener: Option<ChangeListener>,
    click_listener: Option<ClickListener>,
    children: Vec<WrapperRef>,
    columns: Vec<TableColumn>,
    rows: Vec<TableRow>,
    page_length: usize,
}

impl TestComponent {
    pub fn new(kind: TestKind) -> Self {
        Self {
            component_id: ComponentId::new(),
            kind,
            state: DisplayState::default(),
            value_history: Vec::new(),
            change_listener: None,
            click_listener: None,
            children: Vec::new(),
            columns: Vec::new(),
            rows: Vec::new(),
            page_length: 0,
        }
    }

    pub fn kind(&self) -> TestKind {
        self.kind
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Every value pushed by the binding, oldest first.
    pub fn value_history(&self) -> &[Value] {
        &self.value_history
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    /// Row count and depth per row, as last pushed.
    pub fn row_depths(&self) -> Vec<usize> {
        self.rows.iter().map(|row| row.depth).collect()
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn page_length(&self) -> usize {
        self.page_length
    }

    pub fn has_change_listener(&self) -> bool {
        self.change_listener.is_some()
    }

    /// Caption of a section, set by the toolkit when it creates the layout.
    pub fn show_caption(&mut self, caption: &str) {
        self.state.caption = caption.to_string();
    }
}

impl ComponentWrapper for TestComponent {
    fn component_id(&self) -> ComponentId {
        self.component_id
    }

    fn set_id(&mut self, id: &str) {
        self.state.id = id.to_string();
    }

    fn set_label(&mut self, label: &str) {
        self.state.label = label.to_string();
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled = enabled;
    }

    fn set_visible(&mut self, visible: bool) {
        self.state.visible = visible;
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        self.state.tooltip = tooltip.to_string();
    }

    fn set_validation_messages(&mut self, messages: &MessageList) {
        self.state.messages = messages.clone();
    }

    fn add_style_names(&mut self, names: &[String]) {
        for name in names {
            if !self.state.style_names.contains(name) {
                self.state.style_names.push(name.clone());
            }
        }
    }

    fn remove_style_names(&mut self, names: &[String]) {
        self.state.style_names.retain(|name| !names.contains(name));
    }

    fn kind_name(&self) -> &str {
        match self.kind {
            TestKind::Component(kind) => kind.name(),
            TestKind::Layout(_) => "Layout",
            TestKind::Table => "Table",
        }
    }

    fn children(&self) -> Vec<WrapperRef> {
        match self.kind {
            TestKind::Layout(_) => self.children.clone(),
            TestKind::Table => self
                .rows
                .iter()
                .flat_map(|row| row.cells.iter().cloned())
                .collect(),
            TestKind::Component(_) => Vec::new(),
        }
    }

    fn as_field(&mut self) -> Option<&mut dyn FieldComponent> {
        if self.kind.is_field() { Some(self) } else { None }
    }

    fn as_selection(&mut self) -> Option<&mut dyn SelectionComponent> {
        if self.kind.is_selection() { Some(self) } else { None }
    }

    fn as_button(&mut self) -> Option<&mut dyn ButtonComponent> {
        if self.kind == TestKind::Component(ComponentKind::Button) {
            Some(self)
        } else {
            None
        }
    }

    fn as_table(&mut self) -> Option<&mut dyn TableComponent> {
        if self.kind == TestKind::Table { Some(self) } else { None }
    }

    fn as_layout(&mut self) -> Option<&mut dyn LayoutComponent> {
        if matches!(self.kind, TestKind::Layout(_)) {
            Some(self)
        } else {
            None
        }
    }
}

impl FieldComponent for TestComponent {
    fn value(&self) -> Value {
        self.state.value.clone()
    }

    fn set_value(&mut self, value: Value) {
        self.value_history.push(value.clone());
        self.state.value = value;
    }

    fn set_required(&mut self, required: bool) {
        self.state.required = required;
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.state.read_only = read_only;
    }

    fn set_change_listener(&mut self, listener: ChangeListener) {
        self.change_listener = Some(listener);
    }
}

impl SelectionComponent for TestComponent {
    fn set_available_values(&mut self, values: Vec<Value>) {
        self.state.available_values = values;
    }
}

impl ButtonComponent for TestComponent {
    fn set_caption(&mut self, caption: &str) {
        self.state.caption = caption.to_string();
    }

    fn set_click_listener(&mut self, listener: ClickListener) {
        self.click_listener = Some(listener);
    }
}

impl TableComponent for TestComponent {
    fn set_columns(&mut self, columns: Vec<TableColumn>) {
        self.columns = columns;
    }

    fn set_rows(&mut self, rows: Vec<TableRow>) {
        self.rows = rows;
    }

    fn set_page_length(&mut self, page_length: usize) {
        self.page_length = page_length;
    }
}

impl LayoutComponent for TestComponent {
    fn add_component(&mut self, component: WrapperRef) {
        self.children.push(component);
    }
}

// ── User interaction ──────────────────────────────────────────────────────

/// Simulates the user typing `value` into a field.
///
/// The component's own borrow is released before the listener runs, the way
/// a real toolkit dispatches events.
pub fn enter(component: &Rc<RefCell<TestComponent>>, value: impl Into<Value>) -> Result<()> {
    let value = value.into();
    let listener = {
        let mut c = component.borrow_mut();
        let listener = c
            .change_listener
            .clone()
            .ok_or_else(|| anyhow!("component {:?} has no change listener", c.state.id))?;
        c.state.value = value.clone();
        listener
    };
    log::trace!("enter {value} into {:?}", component.borrow().state.id);
    listener(value);
    Ok(())
}

/// Simulates a click on a button.
pub fn click(component: &Rc<RefCell<TestComponent>>) -> Result<()> {
    let listener = {
        let c = component.borrow();
        c.click_listener
            .clone()
            .ok_or_else(|| anyhow!("component {:?} has no click listener", c.state.id))?
    };
    listener();
    Ok(())
}
