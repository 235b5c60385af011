use std::cell::RefCell;
use std::rc::Rc;

use crate::binding::{Binding, BindingContext, ContainerPmo, TableBinding};
use crate::component::{ComponentFactory, TableColumn, WrapperRef};
use crate::descriptor::elements_of;
use crate::error::{BindingError, Result};
use crate::introspect::ClassInfo;

/// Builds a table for a [`ContainerPmo`]: one column per UI element of the
/// row class, one row per item.
pub struct PmoBasedTableFactory;

impl PmoBasedTableFactory {
    /// Creates the table, registers its binding with `context` and fills it.
    pub fn create_table<C: ContainerPmo>(
        container: Rc<RefCell<C>>,
        context: &Rc<BindingContext>,
        factory: Rc<dyn ComponentFactory>,
    ) -> Result<(WrapperRef, Rc<TableBinding<C>>)> {
        let class = ClassInfo::of::<C>();
        let columns = elements_of(&ClassInfo::of::<C::Row>())?;

        let headers: Vec<TableColumn> = columns
            .iter()
            .filter_map(|element| element.descriptors().first())
            .map(|descriptor| TableColumn {
                property: descriptor.pmo_property().to_string(),
                header: descriptor.label_text(),
            })
            .collect();

        let table = factory.create_table(class.name());
        {
            let mut t = table.borrow_mut();
            t.set_id(class.name());
            if t.as_table().is_none() {
                return Err(BindingError::UnsupportedComponent {
                    aspect: "table".to_string(),
                    component: t.kind_name().to_string(),
                });
            }
            if let Some(component) = t.as_table() {
                component.set_columns(headers);
            }
        }

        let binding = Rc::new(TableBinding::new(
            context,
            Rc::clone(&table),
            container,
            factory,
            columns,
        ));
        context.add_table_binding(binding.clone());
        binding
            .update_from_pmo()
            .map_err(|e| e.in_context(context.name()))?;
        Ok((table, binding))
    }
}
