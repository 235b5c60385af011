use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::component::{ComponentFactory, ComponentId, TableRow, WrapperRef};
use crate::descriptor::PropertyElementDescriptors;
use crate::error::{BindingError, Result};
use crate::introspect::{Introspect, ObjectRef, class_name_of, same_object};
use crate::message::MessageList;

use super::{Binding, BindingContext, ContainerBinding, ElementBinding};

/// A PMO supplying the rows of a table.
///
/// `items` is evaluated on every update; rows are matched to existing
/// bindings by identity.
pub trait ContainerPmo: Introspect {
    type Row: Introspect;

    fn items(&self) -> Vec<Rc<RefCell<Self::Row>>>;

    fn page_length(&self) -> usize {
        15
    }

    /// Children of `row` in a hierarchical table.
    fn child_rows(&self, _row: &Rc<RefCell<Self::Row>>) -> Vec<Rc<RefCell<Self::Row>>> {
        Vec::new()
    }

    /// PMO of the button adding an item, shown above the table by
    /// [`crate::uicreation::PmoBasedTableSectionFactory`]. Its class declares
    /// the button with a [`crate::annotation::UiButton`] on an action.
    fn add_item_button(&self) -> Option<ObjectRef> {
        None
    }
}

struct RowEntry<R> {
    row: Rc<RefCell<R>>,
    cells: Vec<Rc<ElementBinding>>,
    children: Vec<RowEntry<R>>,
}

impl<R> RowEntry<R> {
    fn count(&self) -> usize {
        1 + self.children.iter().map(RowEntry::count).sum::<usize>()
    }

    fn collect_cells(&self, into: &mut Vec<Rc<ElementBinding>>) {
        into.extend(self.cells.iter().cloned());
        for child in &self.children {
            child.collect_cells(into);
        }
    }

    fn collect_rows(&self, depth: usize, into: &mut Vec<TableRow>) {
        into.push(TableRow {
            depth,
            cells: self.cells.iter().map(|c| Rc::clone(c.bound_component())).collect(),
        });
        for child in &self.children {
            child.collect_rows(depth + 1, into);
        }
    }
}

/// Binding of a table component to a [`ContainerPmo`].
///
/// Each row gets one cell component per column, bound through the owning
/// context like any other element. On update, rows that disappeared lose
/// their bindings, new rows get fresh ones, and a row whose children changed
/// is recreated together with its subtree.
pub struct TableBinding<C: ContainerPmo> {
    context: Weak<BindingContext>,
    wrapper: WrapperRef,
    component_id: ComponentId,
    container: Rc<RefCell<C>>,
    factory: Rc<dyn ComponentFactory>,
    columns: Arc<[PropertyElementDescriptors]>,
    rows: RefCell<Vec<RowEntry<C::Row>>>,
    /// Set while the displayed rows differ from `rows`.
    stale: Cell<bool>,
}

impl<C: ContainerPmo> TableBinding<C> {
    pub fn new(
        context: &Rc<BindingContext>,
        wrapper: WrapperRef,
        container: Rc<RefCell<C>>,
        factory: Rc<dyn ComponentFactory>,
        columns: Arc<[PropertyElementDescriptors]>,
    ) -> Self {
        let component_id = wrapper.borrow().component_id();
        Self {
            context: Rc::downgrade(context),
            wrapper,
            component_id,
            container,
            factory,
            columns,
            rows: RefCell::new(Vec::new()),
            stale: Cell::new(true),
        }
    }

    #[inline]
    pub fn component_id(&self) -> ComponentId {
        self.component_id
    }

    pub fn container(&self) -> &Rc<RefCell<C>> {
        &self.container
    }

    fn borrow_error(&self, what: &str) -> BindingError {
        let object: ObjectRef = self.container.clone();
        BindingError::Access {
            object: class_name_of(&object),
            property: what.to_string(),
            cause: "container pmo is mutably borrowed".to_string(),
        }
    }

    fn items(&self) -> Result<Vec<Rc<RefCell<C::Row>>>> {
        self.container
            .try_borrow()
            .map(|c| c.items())
            .map_err(|_| self.borrow_error("items"))
    }

    fn child_rows(&self, row: &Rc<RefCell<C::Row>>) -> Result<Vec<Rc<RefCell<C::Row>>>> {
        self.container
            .try_borrow()
            .map(|c| c.child_rows(row))
            .map_err(|_| self.borrow_error("childRows"))
    }

    /// Brings `entries` in line with `items`. Returns whether anything
    /// changed. On error `entries` still holds every row that has bindings.
    fn reconcile(
        &self,
        context: &BindingContext,
        entries: &mut Vec<RowEntry<C::Row>>,
        items: Vec<Rc<RefCell<C::Row>>>,
    ) -> Result<bool> {
        let mut old = std::mem::take(entries);
        let mut changed = false;

        old.retain(|entry| {
            let present = items.iter().any(|item| Rc::ptr_eq(item, &entry.row));
            if !present {
                self.remove_entry(context, entry);
                changed = true;
            }
            present
        });

        for item in items {
            let existing = old
                .iter()
                .position(|entry| Rc::ptr_eq(&entry.row, &item))
                .map(|i| {
                    changed |= i != 0;
                    old.remove(i)
                });

            let entry = match existing {
                Some(entry) => match self.subtree_unchanged(&entry, &item) {
                    Ok(true) => entry,
                    Ok(false) => {
                        self.remove_entry(context, &entry);
                        changed = true;
                        match self.create_entry(context, item) {
                            Ok(entry) => entry,
                            Err(e) => {
                                entries.append(&mut old);
                                return Err(e);
                            }
                        }
                    }
                    Err(e) => {
                        entries.push(entry);
                        entries.append(&mut old);
                        return Err(e);
                    }
                },
                None => {
                    changed = true;
                    match self.create_entry(context, item) {
                        Ok(entry) => entry,
                        Err(e) => {
                            entries.append(&mut old);
                            return Err(e);
                        }
                    }
                }
            };
            entries.push(entry);
        }
        Ok(changed)
    }

    fn subtree_unchanged(&self, entry: &RowEntry<C::Row>, row: &Rc<RefCell<C::Row>>) -> Result<bool> {
        let children = self.child_rows(row)?;
        if children.len() != entry.children.len() {
            return Ok(false);
        }
        for (child, child_entry) in children.iter().zip(&entry.children) {
            if !Rc::ptr_eq(child, &child_entry.row) || !self.subtree_unchanged(child_entry, child)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn create_entry(&self, context: &BindingContext, row: Rc<RefCell<C::Row>>) -> Result<RowEntry<C::Row>> {
        let mut entry = RowEntry {
            row,
            cells: Vec::new(),
            children: Vec::new(),
        };
        if let Err(e) = self.fill_entry(context, &mut entry) {
            self.remove_entry(context, &entry);
            return Err(e);
        }
        Ok(entry)
    }

    fn fill_entry(&self, context: &BindingContext, entry: &mut RowEntry<C::Row>) -> Result<()> {
        let row: ObjectRef = entry.row.clone();
        for column in self.columns.iter() {
            let descriptor = column.descriptor(&row)?;
            let definition = descriptor.component_definition();
            let cell = self.factory.create_component(&definition);
            cell.borrow_mut().set_id(&definition.id);
            entry.cells.push(context.bind(&row, &descriptor, cell)?);
        }
        for child in self.child_rows(&entry.row)? {
            let child = self.create_entry(context, child)?;
            entry.children.push(child);
        }
        Ok(())
    }

    fn detach(entries: &mut Vec<RowEntry<C::Row>>, row: &ObjectRef, detached: &mut Vec<RowEntry<C::Row>>) {
        let mut i = 0;
        while i < entries.len() {
            let candidate: ObjectRef = entries[i].row.clone();
            if same_object(&candidate, row) {
                detached.push(entries.remove(i));
            } else {
                Self::detach(&mut entries[i].children, row, detached);
                i += 1;
            }
        }
    }

    fn remove_entry(&self, context: &BindingContext, entry: &RowEntry<C::Row>) {
        for cell in &entry.cells {
            context.remove_bindings_for_component(cell.bound_component());
        }
        for child in &entry.children {
            self.remove_entry(context, child);
        }
    }

    fn push_rows(&self, entries: &[RowEntry<C::Row>]) -> Result<()> {
        let mut rows = Vec::new();
        for entry in entries {
            entry.collect_rows(0, &mut rows);
        }
        let page_length = self
            .container
            .try_borrow()
            .map(|c| c.page_length())
            .map_err(|_| self.borrow_error("pageLength"))?;

        let mut wrapper = self.wrapper.borrow_mut();
        if let Some(table) = wrapper.as_table() {
            table.set_page_length(page_length);
            table.set_rows(rows);
        }
        Ok(())
    }
}

impl<C: ContainerPmo> Binding for TableBinding<C> {
    fn bound_component(&self) -> &WrapperRef {
        &self.wrapper
    }

    fn pmo(&self) -> Option<ObjectRef> {
        let container: ObjectRef = self.container.clone();
        Some(container)
    }

    fn update_from_pmo(&self) -> Result<()> {
        let Some(context) = self.context.upgrade() else {
            return Ok(());
        };
        let items = self.items()?;

        let mut entries = std::mem::take(&mut *self.rows.borrow_mut());
        let result = self.reconcile(&context, &mut entries, items);
        let stale = self.stale.replace(false);
        let outcome = match result {
            Ok(changed) if changed || stale => {
                log::debug!("{}: table {:?} now has {} rows", context.name(), self.component_id, entries.len());
                self.push_rows(&entries)
            }
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        };
        if outcome.is_err() {
            self.stale.set(true);
        }
        *self.rows.borrow_mut() = entries;
        outcome
    }

    fn display_messages(&self, _messages: &MessageList) -> MessageList {
        // cell bindings show their own messages
        MessageList::new()
    }
}

impl<C: ContainerPmo> ContainerBinding for TableBinding<C> {
    fn row_count(&self) -> usize {
        self.rows.borrow().iter().map(RowEntry::count).sum()
    }

    fn bindings(&self) -> Vec<Rc<ElementBinding>> {
        let mut cells = Vec::new();
        for entry in self.rows.borrow().iter() {
            entry.collect_cells(&mut cells);
        }
        cells
    }

    fn clear(&self, context: &BindingContext) {
        let entries = std::mem::take(&mut *self.rows.borrow_mut());
        for entry in &entries {
            self.remove_entry(context, entry);
        }
    }

    fn release_row(&self, row: &ObjectRef, context: &BindingContext) -> usize {
        let mut detached = Vec::new();
        Self::detach(&mut self.rows.borrow_mut(), row, &mut detached);
        if detached.is_empty() {
            return 0;
        }
        let released: usize = detached.iter().map(RowEntry::count).sum();
        for entry in &detached {
            self.remove_entry(context, entry);
        }
        self.stale.set(true);
        log::trace!("{}: table {:?} released {released} rows", context.name(), self.component_id);
        released
    }
}
