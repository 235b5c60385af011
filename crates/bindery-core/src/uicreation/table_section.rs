use std::cell::RefCell;
use std::rc::Rc;

use crate::annotation::ComponentKind;
use crate::binding::{BindingContext, ContainerPmo, TableBinding};
use crate::component::{ComponentFactory, WrapperRef};
use crate::descriptor::elements_of;
use crate::error::{BindingError, Result};
use crate::introspect::{ClassInfo, ObjectRef, class_name_of};

/// A table placed in a section, with an optional button adding items.
pub struct TableSection<C: ContainerPmo> {
    pub section: WrapperRef,
    pub table: WrapperRef,
    pub add_item_button: Option<WrapperRef>,
    pub binding: Rc<TableBinding<C>>,
}

/// Builds a [`TableSection`] for a [`ContainerPmo`] annotated with
/// [`crate::annotation::UiSection`]. The section caption comes from the
/// annotation; the add-item button is bound like any other button.
pub struct PmoBasedTableSectionFactory;

impl PmoBasedTableSectionFactory {
    pub fn create_section<C: ContainerPmo>(
        container: Rc<RefCell<C>>,
        context: &Rc<BindingContext>,
        factory: Rc<dyn ComponentFactory>,
    ) -> Result<TableSection<C>> {
        let class = ClassInfo::of::<C>();
        let definition = class
            .section()
            .cloned()
            .ok_or_else(|| BindingError::MissingAnnotation {
                class: class.name().to_string(),
                annotation: "UiSection",
            })?;
        let button_pmo = container
            .try_borrow()
            .map(|c| c.add_item_button())
            .map_err(|_| BindingError::Access {
                object: class.name().to_string(),
                property: "addItemButton".to_string(),
                cause: "container pmo is mutably borrowed".to_string(),
            })?;

        let id = format!("{}Section", class.name());
        let section = factory.create_layout(&id, &definition);
        {
            let mut s = section.borrow_mut();
            s.set_id(&id);
            if s.as_layout().is_none() {
                return Err(BindingError::UnsupportedComponent {
                    aspect: "section".to_string(),
                    component: s.kind_name().to_string(),
                });
            }
        }

        let add_item_button = match button_pmo {
            Some(pmo) => Some(Self::create_add_item_button(&pmo, context, factory.as_ref())?),
            None => None,
        };
        let (table, binding) = super::PmoBasedTableFactory::create_table(container, context, Rc::clone(&factory))?;

        if let Some(layout) = section.borrow_mut().as_layout() {
            if let Some(button) = &add_item_button {
                layout.add_component(Rc::clone(button));
            }
            layout.add_component(Rc::clone(&table));
        }
        log::debug!("{}: created table section {id}", context.name());

        Ok(TableSection {
            section,
            table,
            add_item_button,
            binding,
        })
    }

    fn create_add_item_button(
        pmo: &ObjectRef,
        context: &BindingContext,
        factory: &dyn ComponentFactory,
    ) -> Result<WrapperRef> {
        let class = pmo
            .try_borrow()
            .map(|p| p.class_info())
            .map_err(|_| BindingError::Access {
                object: class_name_of(pmo),
                property: "addItemButton".to_string(),
                cause: "button pmo is mutably borrowed".to_string(),
            })?;
        let elements = elements_of(&class)?;
        let element = elements
            .iter()
            .find(|e| e.descriptors().iter().any(|d| d.kind == ComponentKind::Button))
            .ok_or_else(|| BindingError::MissingAnnotation {
                class: class.name().to_string(),
                annotation: "UiButton",
            })?;

        let descriptor = element.descriptor(pmo)?;
        let definition = descriptor.component_definition();
        let button = factory.create_component(&definition);
        button.borrow_mut().set_id(&definition.id);
        context.bind(pmo, &descriptor, Rc::clone(&button))?;
        Ok(button)
    }
}
