use std::rc::Rc;
use std::sync::Arc;

use crate::error::{BindingError, ModelObjectError, Result};
use crate::introspect::{MethodKind, ModelObjectFn, ObjectRef, class_name_of};

use super::ObjectSupplier;

/// Lookup of the model objects a PMO exposes through
/// [`crate::introspect::ClassBuilder::model_object`].
pub struct ModelObjects;

impl ModelObjects {
    /// Supplier of the model object called `name`. The supplier asks the PMO
    /// again on every call, so a replaced model object is picked up.
    pub fn supplier_for(pmo: &ObjectRef, name: &str) -> Result<ObjectSupplier> {
        let get = Self::single_member(pmo, name)?.ok_or_else(|| {
            ModelObjectError::NoAnnotatedMember {
                class: class_name_of(pmo),
                name: name.to_string(),
            }
        })?;

        let pmo = Rc::clone(pmo);
        Ok(Rc::new(move || {
            let obj = pmo.try_borrow().ok()?;
            get(obj.as_any())
        }))
    }

    /// Whether the PMO exposes the model object called `name`.
    pub fn is_accessible(pmo: &ObjectRef, name: &str) -> Result<bool> {
        Ok(Self::single_member(pmo, name)?.is_some())
    }

    fn single_member(pmo: &ObjectRef, name: &str) -> Result<Option<ModelObjectFn>> {
        let class = pmo
            .try_borrow()
            .map(|o| o.class_info())
            .map_err(|_| BindingError::Access {
                object: "<borrowed object>".to_string(),
                property: name.to_string(),
                cause: "pmo is mutably borrowed".to_string(),
            })?;
        let mut members: Vec<(String, ModelObjectFn)> = class
            .model_object_methods(name)
            .filter_map(|m| match &m.kind {
                MethodKind::ModelObject { get, .. } => Some((m.name.clone(), Arc::clone(get))),
                _ => None,
            })
            .collect();
        match members.len() {
            0 => Ok(None),
            1 => Ok(members.pop().map(|(_, get)| get)),
            _ => Err(ModelObjectError::MultipleMembersAnnotated {
                class: class.name().to_string(),
                name: name.to_string(),
                members: members.into_iter().map(|(method, _)| method).collect(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::introspect::{ClassBuilder, Introspect, object_ref, same_object};

    struct Order;

    impl Introspect for Order {
        fn introspect(_class: &mut ClassBuilder<Self>) {}
    }

    struct OrderPmo {
        order: ObjectRef,
    }

    impl Introspect for OrderPmo {
        fn introspect(class: &mut ClassBuilder<Self>) {
            class.model_object("getOrder", "modelObject", |p: &Self| Some(p.order.clone()));
        }
    }

    struct AmbiguousPmo;

    impl Introspect for AmbiguousPmo {
        fn introspect(class: &mut ClassBuilder<Self>) {
            class
                .model_object("getA", "modelObject", |_: &Self| None)
                .model_object("getB", "modelObject", |_: &Self| None);
        }
    }

    #[test]
    fn supplier_follows_replaced_model_object() {
        let first = object_ref(Order);
        let pmo = Rc::new(RefCell::new(OrderPmo { order: first.clone() }));
        let pmo_ref: ObjectRef = pmo.clone();

        let supplier = ModelObjects::supplier_for(&pmo_ref, "modelObject").unwrap();
        assert!(same_object(&supplier().unwrap(), &first));

        let second = object_ref(Order);
        pmo.borrow_mut().order = second.clone();
        assert!(same_object(&supplier().unwrap(), &second));
    }

    #[test]
    fn missing_and_ambiguous_members() {
        let pmo = object_ref(OrderPmo { order: object_ref(Order) });
        assert!(matches!(
            ModelObjects::supplier_for(&pmo, "customer"),
            Err(BindingError::ModelObject(ModelObjectError::NoAnnotatedMember { .. }))
        ));
        assert_eq!(ModelObjects::is_accessible(&pmo, "customer"), Ok(false));

        let ambiguous = object_ref(AmbiguousPmo);
        let err = ModelObjects::is_accessible(&ambiguous, "modelObject").unwrap_err();
        assert!(err.to_string().contains("getA, getB"));
    }
}
