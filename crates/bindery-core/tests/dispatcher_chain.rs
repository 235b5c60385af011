use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::Result;
use bindery_core::annotation::{EnabledType, RequiredType};
use bindery_core::aspect::{self, Aspect, AspectDefinition};
use bindery_core::descriptor::{BoundProperty, ObjectSupplier};
use bindery_core::dispatcher::{
    ExceptionPropertyDispatcher, PropertyBehavior, PropertyBehaviorProvider, PropertyDispatcher,
    PropertyDispatcherFactory, ReadOnlyBehavior, ReflectionPropertyDispatcher,
};
use bindery_core::error::BindingError;
use bindery_core::introspect::{ClassBuilder, Introspect, ObjectRef};
use bindery_core::message::{Message, MessageList};
use bindery_core::value::Value;
use bindery_harness::init_test_logging;

struct Person {
    name: String,
    age: i64,
}

impl Introspect for Person {
    fn introspect(class: &mut ClassBuilder<Self>) {
        class
            .getter("getName", |p: &Self| p.name.clone())
            .setter("setName", |p: &mut Self, v: String| p.name = v)
            .getter("getAge", |p: &Self| p.age);
    }
}

struct PersonPmo {
    person: ObjectRef,
    locked: bool,
    saves: u32,
}

impl Introspect for PersonPmo {
    fn introspect(class: &mut ClassBuilder<Self>) {
        class
            .model_object("getPerson", "modelObject", |p: &Self| Some(p.person.clone()))
            .getter("isNameEnabled", |p: &Self| !p.locked)
            .action("save", |p: &mut Self| p.saves += 1);
    }
}

struct Fixture {
    person: Rc<RefCell<Person>>,
    pmo: Rc<RefCell<PersonPmo>>,
}

impl Fixture {
    fn new() -> Self {
        init_test_logging();
        let person = Rc::new(RefCell::new(Person {
            name: "Ada".to_string(),
            age: 36,
        }));
        let person_ref: ObjectRef = person.clone();
        let pmo = Rc::new(RefCell::new(PersonPmo {
            person: person_ref,
            locked: false,
            saves: 0,
        }));
        Self { person, pmo }
    }

    fn pmo_ref(&self) -> ObjectRef {
        self.pmo.clone()
    }

    fn chain(&self, property: &str) -> Result<Rc<dyn PropertyDispatcher>> {
        self.chain_with(property, &PropertyBehaviorProvider::new())
    }

    fn chain_with(&self, property: &str, behaviors: &PropertyBehaviorProvider) -> Result<Rc<dyn PropertyDispatcher>> {
        Ok(PropertyDispatcherFactory::create_dispatcher_chain(
            &self.pmo_ref(),
            &BoundProperty::new(property),
            behaviors,
        )?)
    }
}

#[test]
fn value_falls_through_to_model_object() -> Result<()> {
    let f = Fixture::new();
    let name = f.chain("name")?;
    assert_eq!(name.value()?, Value::from("Ada"));
    assert!(!name.is_read_only());

    name.set_value(Value::from("Grace"))?;
    assert_eq!(f.person.borrow().name, "Grace");
    Ok(())
}

#[test]
fn set_value_on_read_only_chain_is_noop() -> Result<()> {
    let f = Fixture::new();
    let age = f.chain("age")?;
    assert!(age.is_read_only());

    age.set_value(Value::Int(99))?;
    assert_eq!(f.person.borrow().age, 36);
    assert_eq!(age.value()?, Value::Int(36));
    Ok(())
}

#[test]
fn read_only_behavior_blocks_writes() -> Result<()> {
    let f = Fixture::new();
    let name = f.chain_with("name", &PropertyBehaviorProvider::new().with(ReadOnlyBehavior))?;
    assert!(name.is_read_only());

    name.set_value(Value::from("Grace"))?;
    assert_eq!(f.person.borrow().name, "Ada");
    Ok(())
}

struct HideName;

impl PropertyBehavior for HideName {
    fn is_visible(&self, _object: &ObjectRef, property: &str) -> bool {
        property != "name"
    }
}

#[test]
fn behavior_hides_property_regardless_of_static_visibility() -> Result<()> {
    let f = Fixture::new();
    let behaviors = PropertyBehaviorProvider::new().with(HideName);
    let visible = Aspect::fixed(aspect::VISIBLE, true);

    assert_eq!(f.chain_with("name", &behaviors)?.aspect_value(&visible)?, Value::Bool(false));
    assert_eq!(f.chain_with("age", &behaviors)?.aspect_value(&visible)?, Value::Bool(true));
    Ok(())
}

#[test]
fn static_aspect_reaching_reflection_is_a_configuration_error() {
    init_test_logging();
    let pmo: ObjectRef = Fixture::new().pmo_ref();
    let supplier: ObjectSupplier = Rc::new(move || Some(pmo.clone()));
    let dispatcher = ReflectionPropertyDispatcher::new(
        supplier.clone(),
        "name",
        Box::new(ExceptionPropertyDispatcher::new("name", vec![supplier])),
    );

    let err = dispatcher
        .aspect_value(&Aspect::fixed(aspect::REQUIRED, true))
        .unwrap_err();
    assert_eq!(
        err,
        BindingError::StaticAspect {
            aspect: "required=true".to_string(),
            dispatcher: "ReflectionPropertyDispatcher",
            context: None,
        }
    );
    assert!(err.is_configuration_error());
    assert!(err.in_context("person-page").to_string().contains("person-page"));
}

#[test]
fn required_if_enabled_follows_dynamic_enabled_state() -> Result<()> {
    let f = Fixture::new();
    let required = AspectDefinition::Required {
        required: RequiredType::RequiredIfEnabled,
        enabled: EnabledType::Dynamic,
    }
    .create_aspect()
    .ok_or_else(|| anyhow::anyhow!("required aspect missing"))?;
    let name = f.chain("name")?;

    assert_eq!(name.aspect_value(&required)?, Value::Bool(true));
    f.pmo.borrow_mut().locked = true;
    assert_eq!(name.aspect_value(&required)?, Value::Bool(false));
    assert!(!name.is_enabled()?);
    Ok(())
}

#[test]
fn empty_static_label_becomes_property_name() -> Result<()> {
    let f = Fixture::new();
    let label = f.chain("name")?.aspect_value(&Aspect::fixed(aspect::LABEL, ""))?;
    assert_eq!(label, Value::from("Name"));
    Ok(())
}

#[test]
fn exhausted_chain_names_searched_objects() -> Result<()> {
    let f = Fixture::new();
    let err = f.chain("birthday")?.value().unwrap_err();
    assert_eq!(
        err,
        BindingError::NoAccessor {
            operation: "read",
            property: "birthday".to_string(),
            objects: vec!["PersonPmo".to_string(), "Person".to_string()],
        }
    );
    assert!(!err.is_configuration_error());

    let err = f.chain("birthday")?.is_visible().unwrap_err();
    assert!(matches!(err, BindingError::NoAccessor { ref property, .. } if property == "birthdayVisible"));
    Ok(())
}

#[test]
fn invoke_runs_pmo_action() -> Result<()> {
    let f = Fixture::new();
    let save = f.chain("save")?;
    save.invoke()?;
    save.invoke()?;
    assert_eq!(f.pmo.borrow().saves, 2);

    assert!(matches!(
        f.chain("name")?.invoke(),
        Err(BindingError::NoAccessor { operation: "invoke", .. })
    ));
    Ok(())
}

#[test]
fn messages_are_filtered_by_object_and_property() -> Result<()> {
    let f = Fixture::new();
    let pmo = f.pmo_ref();
    let person: ObjectRef = f.person.clone();
    let messages: MessageList = [
        Message::error("E1", "name missing").with_invalid(&pmo, "name"),
        Message::warning("W1", "check model").with_invalid(&person, "name"),
        Message::error("E2", "age wrong").with_invalid(&person, "age"),
    ]
    .into_iter()
    .collect();

    let own = f.chain("name")?.messages(&messages);
    assert_eq!(own.len(), 2);
    assert!(own.contains_code("E1"));
    assert!(own.contains_code("W1"));
    Ok(())
}

#[test]
fn absent_bound_object_has_no_messages() {
    init_test_logging();
    let pmo = Fixture::new().pmo_ref();
    let gone: ObjectSupplier = Rc::new(|| None);
    let dispatcher = ReflectionPropertyDispatcher::new(
        gone.clone(),
        "name",
        Box::new(ExceptionPropertyDispatcher::new("name", vec![gone])),
    );
    let messages: MessageList = std::iter::once(Message::error("E1", "name missing").with_invalid(&pmo, "name")).collect();

    assert!(dispatcher.messages(&messages).is_empty());
    assert_eq!(dispatcher.bound_object().map(|_| ()), None);
}

struct CountingBehavior {
    asked: Rc<Cell<usize>>,
}

impl PropertyBehavior for CountingBehavior {
    fn is_show_validation_messages(&self, _object: &ObjectRef, _property: &str) -> bool {
        self.asked.set(self.asked.get() + 1);
        false
    }
}

#[test]
fn behavior_can_suppress_messages() -> Result<()> {
    let f = Fixture::new();
    let asked = Rc::new(Cell::new(0));
    let behaviors = PropertyBehaviorProvider::new().with(CountingBehavior { asked: asked.clone() });
    let pmo = f.pmo_ref();
    let messages: MessageList = std::iter::once(Message::error("E1", "name missing").with_invalid(&pmo, "name")).collect();

    assert!(f.chain_with("name", &behaviors)?.messages(&messages).is_empty());
    assert_eq!(asked.get(), 1);
    Ok(())
}
