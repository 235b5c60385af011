use std::rc::Rc;

use crate::binding::BindingContext;
use crate::component::{ComponentFactory, WrapperRef};
use crate::descriptor::elements_of;
use crate::error::{BindingError, Result};
use crate::introspect::ObjectRef;

/// Builds a section (a layout holding one component per UI element) for a
/// PMO annotated with [`crate::annotation::UiSection`].
pub struct PmoBasedSectionFactory;

impl PmoBasedSectionFactory {
    /// Creates the section layout, one bound component per element in
    /// position order.
    pub fn create_section(
        pmo: &ObjectRef,
        context: &Rc<BindingContext>,
        factory: &dyn ComponentFactory,
    ) -> Result<WrapperRef> {
        let class = pmo
            .try_borrow()
            .map(|p| p.class_info())
            .map_err(|_| BindingError::Access {
                object: "<borrowed object>".to_string(),
                property: "section".to_string(),
                cause: "pmo is mutably borrowed".to_string(),
            })?;
        let section = class
            .section()
            .cloned()
            .ok_or_else(|| BindingError::MissingAnnotation {
                class: class.name().to_string(),
                annotation: "UiSection",
            })?;
        let elements = elements_of(&class)?;

        let layout = factory.create_layout(class.name(), &section);
        {
            let mut l = layout.borrow_mut();
            l.set_id(class.name());
            if l.as_layout().is_none() {
                return Err(BindingError::UnsupportedComponent {
                    aspect: "section".to_string(),
                    component: l.kind_name().to_string(),
                });
            }
        }

        for element in elements.iter() {
            let descriptor = element.descriptor(pmo)?;
            let definition = descriptor.component_definition();
            let component = factory.create_component(&definition);
            component.borrow_mut().set_id(&definition.id);
            if let Some(l) = layout.borrow_mut().as_layout() {
                l.add_component(Rc::clone(&component));
            }
            context.bind(pmo, &descriptor, component)?;
        }

        log::debug!(
            "{}: created section {} with {} elements",
            context.name(),
            class.name(),
            elements.len()
        );
        Ok(layout)
    }
}
