use std::rc::Rc;

use crate::descriptor::{BoundProperty, ModelObjects, ObjectSupplier};
use crate::error::Result;
use crate::introspect::ObjectRef;

use super::{
    BehaviorDependentDispatcher, ExceptionPropertyDispatcher, PropertyBehaviorProvider, PropertyDispatcher,
    ReflectionPropertyDispatcher, StaticValueDispatcher,
};

/// Assembles dispatcher chains.
pub struct PropertyDispatcherFactory;

impl PropertyDispatcherFactory {
    /// Builds the chain for `bound` on `pmo`:
    ///
    /// `Behavior → Static → Reflection(pmo) → [Reflection(model object)] → Exception`
    ///
    /// The model object link exists when the PMO exposes the model object
    /// named in `bound`. An explicit model attribute requires it.
    pub fn create_dispatcher_chain(
        pmo: &ObjectRef,
        bound: &BoundProperty,
        behaviors: &PropertyBehaviorProvider,
    ) -> Result<Rc<dyn PropertyDispatcher>> {
        let pmo_supplier: ObjectSupplier = {
            let pmo = Rc::clone(pmo);
            Rc::new(move || Some(Rc::clone(&pmo)))
        };

        let model_supplier = if bound.has_explicit_model_attribute()
            || ModelObjects::is_accessible(pmo, &bound.model_object)?
        {
            Some(ModelObjects::supplier_for(pmo, &bound.model_object)?)
        } else {
            None
        };

        let mut searched = vec![Rc::clone(&pmo_supplier)];
        searched.extend(model_supplier.iter().cloned());
        let mut chain: Box<dyn PropertyDispatcher> =
            Box::new(ExceptionPropertyDispatcher::new(bound.pmo_property.clone(), searched));

        if let Some(model) = model_supplier {
            chain = Box::new(ReflectionPropertyDispatcher::new(model, bound.model_attribute(), chain));
        }
        chain = Box::new(ReflectionPropertyDispatcher::new(
            pmo_supplier,
            bound.pmo_property.clone(),
            chain,
        ));
        chain = Box::new(StaticValueDispatcher::new(chain));

        Ok(Rc::new(BehaviorDependentDispatcher::new(behaviors.clone(), chain)))
    }
}
