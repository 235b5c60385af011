use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use bindery_core::component::ComponentId;
use bindery_core::prelude::*;
use bindery_harness::{TestComponentFactory, TestKind, init_test_logging};

struct OrderedPmo;

impl Introspect for OrderedPmo {
    fn introspect(class: &mut ClassBuilder<Self>) {
        class
            .annotate_class(UiSection::new("Ordered").layout(SectionLayout::Horizontal))
            .getter("getC", |_: &Self| "c")
            .annotate(UiField::text_field(30))
            .getter("getA", |_: &Self| "a")
            .annotate(UiField::text_field(10))
            .annotate(UiToolTip::dynamic())
            .annotate(BindStyleNames::new(["wide"]))
            .getter("getAToolTip", |_: &Self| "first")
            .getter("getB", |_: &Self| "b")
            .annotate(UiField::display_label(20));
    }
}

struct NoSectionPmo;

impl Introspect for NoSectionPmo {
    fn introspect(class: &mut ClassBuilder<Self>) {
        class
            .getter("getA", |_: &Self| "a")
            .annotate(UiField::text_field(1));
    }
}

struct FlexiblePmo {
    component_type: String,
    value: String,
}

impl Introspect for FlexiblePmo {
    fn introspect(class: &mut ClassBuilder<Self>) {
        class
            .annotate_class(UiSection::new("Flexible"))
            .getter("getValue", |p: &Self| p.value.clone())
            .annotate(UiField::text_field(1))
            .annotate(UiField::combo_box(1))
            .setter("setValue", |p: &mut Self, v: String| p.value = v)
            .getter("getValueComponentType", |p: &Self| p.component_type.clone())
            .getter("getValueAvailableValues", |_: &Self| vec!["x", "y"]);
    }
}

struct ClashingPmo;

impl Introspect for ClashingPmo {
    fn introspect(class: &mut ClassBuilder<Self>) {
        class
            .annotate_class(UiSection::new("Clashing"))
            .getter("getFirst", |_: &Self| 1)
            .annotate(UiField::integer_field(7))
            .getter("getSecond", |_: &Self| 2)
            .annotate(UiField::integer_field(7));
    }
}

struct ValuesOnTextPmo;

impl Introspect for ValuesOnTextPmo {
    fn introspect(class: &mut ClassBuilder<Self>) {
        class
            .annotate_class(UiSection::new("Broken"))
            .getter("getCode", |_: &Self| "A")
            .annotate(UiField::text_field(1).available_values(AvailableValuesType::Dynamic));
    }
}

struct StyledPmo {
    style: String,
}

impl Introspect for StyledPmo {
    fn introspect(class: &mut ClassBuilder<Self>) {
        class
            .annotate_class(UiSection::new("Styled"))
            .getter("getStatus", |_: &Self| "open")
            .annotate(UiField::text_field(1))
            .annotate(BindStyleNames::dynamic())
            .getter("getStatusStyleNames", |p: &Self| vec![p.style.clone()]);
    }
}

fn flexible(component_type: &str) -> ObjectRef {
    Rc::new(RefCell::new(FlexiblePmo {
        component_type: component_type.to_string(),
        value: "x".to_string(),
    }))
}

#[test]
fn components_are_added_in_position_order() -> Result<()> {
    init_test_logging();
    let context = BindingContext::new("ordered");
    let factory = TestComponentFactory::new();
    let layout = PmoBasedSectionFactory::create_section(&object_ref(OrderedPmo), &context, &factory)?;

    let children: Vec<ComponentId> = layout
        .borrow()
        .children()
        .iter()
        .map(|c| c.borrow().component_id())
        .collect();
    let mut expected = Vec::new();
    for id in ["a", "b", "c"] {
        expected.push(factory.find(id)?.borrow().component_id());
    }
    assert_eq!(children, expected);
    assert_eq!(
        factory.find("OrderedPmo")?.borrow().kind(),
        TestKind::Layout(SectionLayout::Horizontal)
    );
    Ok(())
}

#[test]
fn aspect_annotations_reach_the_component() -> Result<()> {
    init_test_logging();
    let context = BindingContext::new("ordered");
    let factory = TestComponentFactory::new();
    PmoBasedSectionFactory::create_section(&object_ref(OrderedPmo), &context, &factory)?;

    let a = factory.find("a")?;
    let a = a.borrow();
    assert_eq!(a.state().tooltip, "first");
    assert_eq!(a.state().style_names, vec!["wide".to_string()]);
    assert_eq!(a.state().label, "A");

    let b = factory.find("b")?;
    assert!(b.borrow().state().read_only);
    assert_eq!(b.borrow().state().value, Value::from("b"));
    Ok(())
}

#[test]
fn section_annotation_is_required() {
    init_test_logging();
    let context = BindingContext::new("plain");
    let err = PmoBasedSectionFactory::create_section(&object_ref(NoSectionPmo), &context, &TestComponentFactory::new())
        .err();
    assert_eq!(
        err,
        Some(BindingError::MissingAnnotation {
            class: "NoSectionPmo".to_string(),
            annotation: "UiSection",
        })
    );
}

#[test]
fn toolkit_must_create_a_layout() {
    init_test_logging();
    let context = BindingContext::new("misconfigured");
    let factory = TestComponentFactory::with_layouts_as(ComponentKind::Label);
    let err = PmoBasedSectionFactory::create_section(&object_ref(OrderedPmo), &context, &factory).err();
    assert_eq!(
        err,
        Some(BindingError::UnsupportedComponent {
            aspect: "section".to_string(),
            component: "Label".to_string(),
        })
    );
    assert_eq!(context.binding_count(), 0);
}

#[test]
fn dynamic_component_type_selects_the_descriptor() -> Result<()> {
    init_test_logging();
    let context = BindingContext::new("flexible");
    let factory = TestComponentFactory::new();

    PmoBasedSectionFactory::create_section(&flexible("ComboBox"), &context, &factory)?;
    let combo = factory.find("value")?;
    assert_eq!(combo.borrow().kind(), TestKind::Component(ComponentKind::ComboBox));
    assert_eq!(
        combo.borrow().state().available_values,
        vec![Value::from("x"), Value::from("y")]
    );

    PmoBasedSectionFactory::create_section(&flexible("TextField"), &context, &factory)?;
    let text = factory.find("value")?;
    assert_eq!(text.borrow().kind(), TestKind::Component(ComponentKind::TextField));
    assert!(text.borrow().state().available_values.is_empty());
    Ok(())
}

#[test]
fn unknown_component_type_is_rejected() {
    init_test_logging();
    let context = BindingContext::new("flexible");
    let err = PmoBasedSectionFactory::create_section(&flexible("CheckBox"), &context, &TestComponentFactory::new())
        .err();
    assert_eq!(
        err,
        Some(BindingError::UnknownComponentType {
            class: "FlexiblePmo".to_string(),
            property: "value".to_string(),
            requested: Some("CheckBox".to_string()),
            declared: vec!["TextField".to_string(), "ComboBox".to_string()],
        })
    );
}

#[test]
fn duplicate_positions_fail_section_creation() {
    init_test_logging();
    let context = BindingContext::new("clashing");
    let err = PmoBasedSectionFactory::create_section(&object_ref(ClashingPmo), &context, &TestComponentFactory::new())
        .err();
    assert!(matches!(
        err,
        Some(BindingError::DuplicatePosition { position: 7, ref properties, .. })
            if properties == &["first".to_string(), "second".to_string()]
    ));
}

#[test]
fn aspect_the_component_cannot_express_fails_fast() {
    init_test_logging();
    let context = BindingContext::new("broken");
    let err =
        PmoBasedSectionFactory::create_section(&object_ref(ValuesOnTextPmo), &context, &TestComponentFactory::new())
            .err();
    assert_eq!(
        err,
        Some(BindingError::UnsupportedComponent {
            aspect: "availableValues".to_string(),
            component: "TextField".to_string(),
        })
    );
    assert_eq!(context.binding_count(), 0);
}

#[test]
fn dynamic_style_names_replace_the_previous_ones() -> Result<()> {
    init_test_logging();
    let context = BindingContext::new("styled");
    let factory = TestComponentFactory::new();
    let pmo = Rc::new(RefCell::new(StyledPmo {
        style: "warn".to_string(),
    }));
    let pmo_ref: ObjectRef = pmo.clone();
    PmoBasedSectionFactory::create_section(&pmo_ref, &context, &factory)?;
    let status = factory.find("status")?;
    assert_eq!(status.borrow().state().style_names, vec!["warn".to_string()]);

    pmo.borrow_mut().style = "ok".to_string();
    context.ui_updated()?;
    assert_eq!(status.borrow().state().style_names, vec!["ok".to_string()]);

    context.ui_updated()?;
    assert_eq!(status.borrow().state().style_names, vec!["ok".to_string()]);
    Ok(())
}
