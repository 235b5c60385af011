use std::cell::RefCell;
use std::rc::{Rc, Weak};

use anyhow::Result;
use bindery_core::binding::TableBinding;
use bindery_core::component::{ComponentId, TableColumn};
use bindery_core::introspect::same_object;
use bindery_core::prelude::*;
use bindery_harness::{TestComponent, TestComponentFactory, TestKind, click, init_test_logging};

type ItemRef = Rc<RefCell<Item>>;

struct Item {
    name: String,
    amount: i64,
    children: Vec<ItemRef>,
}

impl Item {
    fn new(name: &str, amount: i64) -> ItemRef {
        Rc::new(RefCell::new(Item {
            name: name.to_string(),
            amount,
            children: Vec::new(),
        }))
    }
}

impl Introspect for Item {
    fn introspect(class: &mut ClassBuilder<Self>) {
        class
            .getter("getName", |i: &Self| i.name.clone())
            .annotate(UiField::text_field(1))
            .setter("setName", |i: &mut Self, v: String| i.name = v)
            .getter("getAmount", |i: &Self| i.amount)
            .annotate(UiField::integer_field(2).label("Amount"));
    }
}

struct ItemTablePmo {
    items: Vec<ItemRef>,
    add_button: Option<ObjectRef>,
}

impl Introspect for ItemTablePmo {
    fn introspect(class: &mut ClassBuilder<Self>) {
        class.annotate_class(UiSection::new("Items"));
    }
}

impl ContainerPmo for ItemTablePmo {
    type Row = Item;

    fn items(&self) -> Vec<ItemRef> {
        self.items.clone()
    }

    fn page_length(&self) -> usize {
        5
    }

    fn child_rows(&self, row: &ItemRef) -> Vec<ItemRef> {
        row.borrow().children.clone()
    }

    fn add_item_button(&self) -> Option<ObjectRef> {
        self.add_button.clone()
    }
}

struct AddItemPmo {
    table: Weak<RefCell<ItemTablePmo>>,
}

impl Introspect for AddItemPmo {
    fn introspect(class: &mut ClassBuilder<Self>) {
        class
            .action("add", |p: &mut Self| {
                if let Some(table) = p.table.upgrade() {
                    table.borrow_mut().items.push(Item::new("new", 0));
                }
            })
            .annotate(UiButton::new(1).caption("Add"));
    }
}

struct Table {
    container: Rc<RefCell<ItemTablePmo>>,
    context: Rc<BindingContext>,
    factory: Rc<TestComponentFactory>,
    wrapper: WrapperRef,
    binding: Rc<TableBinding<ItemTablePmo>>,
}

impl Table {
    fn create(items: Vec<ItemRef>) -> Result<Self> {
        init_test_logging();
        let container = Rc::new(RefCell::new(ItemTablePmo {
            items,
            add_button: None,
        }));
        let context = BindingContext::new("items-page");
        let factory = Rc::new(TestComponentFactory::new());
        let (wrapper, binding) =
            PmoBasedTableFactory::create_table(Rc::clone(&container), &context, factory.clone())?;
        Ok(Self {
            container,
            context,
            factory,
            wrapper,
            binding,
        })
    }

    fn component(&self) -> Result<Rc<RefCell<TestComponent>>> {
        self.factory.find("ItemTablePmo")
    }

    fn cells_bound_to(&self, row: &ItemRef) -> usize {
        let row: ObjectRef = row.clone();
        self.context
            .element_bindings()
            .iter()
            .filter(|b| b.pmo().is_some_and(|p| same_object(&p, &row)))
            .count()
    }
}

#[test]
fn table_has_one_column_per_row_element() -> Result<()> {
    let table = Table::create(vec![Item::new("bolts", 10)])?;
    let component = table.component()?;
    let component = component.borrow();
    assert_eq!(
        component.columns(),
        [
            TableColumn {
                property: "name".to_string(),
                header: "Name".to_string(),
            },
            TableColumn {
                property: "amount".to_string(),
                header: "Amount".to_string(),
            },
        ]
    );
    assert_eq!(component.page_length(), 5);
    Ok(())
}

#[test]
fn removed_rows_lose_their_bindings() -> Result<()> {
    let items = vec![Item::new("bolts", 10), Item::new("nuts", 20), Item::new("screws", 30)];
    let table = Table::create(items.clone())?;
    assert_eq!(table.binding.row_count(), 3);
    assert_eq!(table.binding.bindings().len(), 6);
    assert_eq!(table.context.binding_count(), 7);
    assert_eq!(table.component()?.borrow().rows().len(), 3);

    table.container.borrow_mut().items.remove(1);
    table.context.ui_updated()?;

    assert_eq!(table.binding.row_count(), 2);
    assert_eq!(table.context.binding_count(), 5);
    assert_eq!(table.cells_bound_to(&items[1]), 0);
    assert_eq!(table.cells_bound_to(&items[0]), 2);
    assert_eq!(table.component()?.borrow().rows().len(), 2);
    Ok(())
}

#[test]
fn unchanged_rows_keep_their_cells() -> Result<()> {
    let items = vec![Item::new("bolts", 10), Item::new("nuts", 20)];
    let table = Table::create(items.clone())?;
    let created = table.factory.created_count();

    table.context.ui_updated()?;
    table.context.model_changed()?;
    assert_eq!(table.factory.created_count(), created);

    table.container.borrow_mut().items.push(Item::new("washers", 5));
    table.context.ui_updated()?;
    assert_eq!(table.factory.created_count(), created + 2);
    assert_eq!(table.binding.row_count(), 3);
    Ok(())
}

#[test]
fn cells_follow_row_values() -> Result<()> {
    let items = vec![Item::new("bolts", 10)];
    let table = Table::create(items.clone())?;
    items[0].borrow_mut().amount = 42;
    table.context.ui_updated()?;

    let amount = table.factory.find("amount")?;
    assert_eq!(amount.borrow().state().value, Value::Int(42));
    assert_eq!(amount.borrow().value_history().len(), 2);
    Ok(())
}

#[test]
fn changed_children_recreate_the_subtree() -> Result<()> {
    let parent = Item::new("kit", 1);
    let first = Item::new("bolt", 4);
    parent.borrow_mut().children = vec![first.clone(), Item::new("nut", 4)];
    let table = Table::create(vec![parent.clone()])?;

    assert_eq!(table.binding.row_count(), 3);
    assert_eq!(table.component()?.borrow().row_depths(), vec![0, 1, 1]);
    let created = table.factory.created_count();

    parent.borrow_mut().children.push(Item::new("washer", 8));
    table.context.ui_updated()?;

    assert_eq!(table.binding.row_count(), 4);
    assert_eq!(table.component()?.borrow().row_depths(), vec![0, 1, 1, 1]);
    // parent and all children get fresh cells
    assert_eq!(table.factory.created_count(), created + 8);
    assert_eq!(table.context.binding_count(), 1 + 8);
    assert_eq!(table.cells_bound_to(&first), 2);
    Ok(())
}

#[test]
fn removing_the_table_removes_every_cell_binding() -> Result<()> {
    let table = Table::create(vec![Item::new("bolts", 10), Item::new("nuts", 20)])?;
    table.context.remove_bindings_for_component(&table.wrapper);
    assert_eq!(table.context.binding_count(), 0);
    assert_eq!(table.context.dispatcher_count(), 0);
    assert_eq!(table.binding.row_count(), 0);
    Ok(())
}

#[test]
fn removing_the_container_pmo_removes_the_table() -> Result<()> {
    let table = Table::create(vec![Item::new("bolts", 10)])?;
    let container: ObjectRef = table.container.clone();
    table.context.remove_bindings_for_pmo(&container);
    assert_eq!(table.context.binding_count(), 0);
    assert!(table.context.table_bindings().is_empty());
    Ok(())
}

#[test]
fn released_row_is_bound_again_on_the_next_refresh() -> Result<()> {
    let items = vec![Item::new("bolts", 10), Item::new("nuts", 20)];
    let table = Table::create(items.clone())?;
    let first: ObjectRef = items[0].clone();

    table.context.remove_bindings_for_pmo(&first);
    assert_eq!(table.cells_bound_to(&items[0]), 0);
    assert_eq!(table.binding.row_count(), 1);
    assert_eq!(table.binding.bindings().len(), table.context.element_bindings().len());

    items[0].borrow_mut().amount = 11;
    table.context.ui_updated()?;
    assert_eq!(table.binding.row_count(), 2);
    assert_eq!(table.cells_bound_to(&items[0]), 2);
    assert_eq!(table.binding.bindings().len(), table.context.element_bindings().len());
    assert_eq!(table.component()?.borrow().rows().len(), 2);
    assert_eq!(table.factory.find("amount")?.borrow().state().value, Value::Int(11));
    Ok(())
}

#[test]
fn cells_added_during_a_refresh_are_pushed_once() -> Result<()> {
    let table = Table::create(vec![Item::new("bolts", 10)])?;
    let bolts = table.factory.find("amount")?;

    table.container.borrow_mut().items.push(Item::new("washers", 5));
    table.context.ui_updated()?;

    let washers = table.factory.find("amount")?;
    assert_eq!(washers.borrow().value_history().to_vec(), vec![Value::Int(5)]);
    assert_eq!(bolts.borrow().value_history().len(), 2);
    Ok(())
}

struct Part {
    name: String,
    shown: Value,
}

impl Part {
    fn new(name: &str, shown: impl Into<Value>) -> Rc<RefCell<Part>> {
        Rc::new(RefCell::new(Part {
            name: name.to_string(),
            shown: shown.into(),
        }))
    }
}

impl Introspect for Part {
    fn introspect(class: &mut ClassBuilder<Self>) {
        class
            .getter("getName", |p: &Self| p.name.clone())
            .annotate(UiField::text_field(1).visible(VisibleType::Dynamic))
            .getter("isNameVisible", |p: &Self| p.shown.clone());
    }
}

struct PartTablePmo {
    parts: Vec<Rc<RefCell<Part>>>,
}

impl Introspect for PartTablePmo {
    fn introspect(_class: &mut ClassBuilder<Self>) {}
}

impl ContainerPmo for PartTablePmo {
    type Row = Part;

    fn items(&self) -> Vec<Rc<RefCell<Part>>> {
        self.parts.clone()
    }
}

#[test]
fn failing_row_keeps_bound_rows_for_the_next_refresh() -> Result<()> {
    init_test_logging();
    let container = Rc::new(RefCell::new(PartTablePmo {
        parts: vec![Part::new("gear", true)],
    }));
    let context = BindingContext::new("parts-page");
    let factory = Rc::new(TestComponentFactory::new());
    let (_, binding) = PmoBasedTableFactory::create_table(Rc::clone(&container), &context, factory.clone())?;
    assert_eq!(context.binding_count(), 2);

    let axle = Part::new("axle", "sometimes");
    container.borrow_mut().parts.push(axle.clone());
    let err = context.ui_updated().unwrap_err();
    assert!(matches!(err, BindingError::InvalidAspectValue { ref property, .. } if property == "name"));
    assert_eq!(binding.row_count(), 1);
    assert_eq!(context.binding_count(), 2);
    assert_eq!(binding.bindings().len(), context.element_bindings().len());

    axle.borrow_mut().shown = Value::Bool(false);
    context.ui_updated()?;
    assert_eq!(binding.row_count(), 2);
    assert_eq!(context.binding_count(), 3);
    assert_eq!(factory.find("PartTablePmo")?.borrow().rows().len(), 2);
    assert!(!factory.find("name")?.borrow().state().visible);
    Ok(())
}

struct ItemsSection {
    container: Rc<RefCell<ItemTablePmo>>,
    context: Rc<BindingContext>,
    factory: Rc<TestComponentFactory>,
    section: TableSection<ItemTablePmo>,
}

impl ItemsSection {
    fn create() -> Result<Self> {
        init_test_logging();
        let container = Rc::new(RefCell::new(ItemTablePmo {
            items: vec![Item::new("bolts", 10)],
            add_button: None,
        }));
        let add: ObjectRef = Rc::new(RefCell::new(AddItemPmo {
            table: Rc::downgrade(&container),
        }));
        container.borrow_mut().add_button = Some(add);

        let context = BindingContext::new("items-section");
        let factory = Rc::new(TestComponentFactory::new());
        let section = PmoBasedTableSectionFactory::create_section(Rc::clone(&container), &context, factory.clone())?;
        Ok(Self {
            container,
            context,
            factory,
            section,
        })
    }
}

#[test]
fn table_section_shows_caption_button_and_table() -> Result<()> {
    let items = ItemsSection::create()?;
    let factory = &items.factory;

    let layout = factory.find("ItemTablePmoSection")?;
    assert_eq!(layout.borrow().kind(), TestKind::Layout(SectionLayout::Form));
    assert_eq!(layout.borrow().state().caption, "Items");
    let children: Vec<ComponentId> = layout
        .borrow()
        .children()
        .iter()
        .map(|c| c.borrow().component_id())
        .collect();
    let expected = vec![
        factory.find("add")?.borrow().component_id(),
        factory.find("ItemTablePmo")?.borrow().component_id(),
    ];
    assert_eq!(children, expected);
    assert!(items.section.add_item_button.is_some());
    assert_eq!(factory.find("add")?.borrow().state().caption, "Add");
    // table, button and two cells
    assert_eq!(items.context.binding_count(), 4);
    Ok(())
}

#[test]
fn add_item_button_adds_a_row() -> Result<()> {
    let items = ItemsSection::create()?;
    click(&items.factory.find("add")?)?;

    assert_eq!(items.container.borrow().items.len(), 2);
    assert_eq!(items.section.binding.row_count(), 2);
    assert_eq!(items.context.binding_count(), 6);

    items.context.remove_bindings_for_component(&items.section.section);
    assert_eq!(items.context.binding_count(), 0);
    Ok(())
}
