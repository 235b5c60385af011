use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::accessor::property_from_method;
use crate::annotation::{Annotation, ComponentKind, DEFAULT_MODEL_OBJECT};
use crate::aspect::AspectDefinition;
use crate::error::{BindingError, Result};
use crate::introspect::{ClassInfo, MethodInfo};

use super::{BoundProperty, ElementDescriptor, PropertyElementDescriptors};

type Elements = Result<Arc<[PropertyElementDescriptors]>>;

static ELEMENTS: Lazy<RwLock<HashMap<TypeId, Elements>>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Ordered UI elements of `class`, read once and memoized, failures included.
pub fn elements_of(class: &Arc<ClassInfo>) -> Elements {
    if let Some(elements) = ELEMENTS.read().get(&class.type_id()) {
        return elements.clone();
    }

    let elements: Elements = UiElementAnnotationReader::new(Arc::clone(class))
        .and_then(|reader| reader.ui_elements())
        .map(Arc::from);
    match &elements {
        Ok(e) => log::debug!("read {} ui elements of pmo class {}", e.len(), class.name()),
        Err(e) => log::warn!("pmo class {} cannot be bound: {e}", class.name()),
    }

    ELEMENTS
        .write()
        .entry(class.type_id())
        .or_insert(elements)
        .clone()
}

/// Groups the annotations of a PMO class by bound property.
pub struct UiElementAnnotationReader {
    class: Arc<ClassInfo>,
    by_property: BTreeMap<String, PropertyElementDescriptors>,
}

impl UiElementAnnotationReader {
    pub fn new(class: Arc<ClassInfo>) -> Result<Self> {
        if class.dangling_annotations() > 0 {
            return Err(BindingError::DanglingAnnotation {
                class: class.name().to_string(),
            });
        }

        let mut reader = Self {
            class,
            by_property: BTreeMap::new(),
        };
        let class = Arc::clone(&reader.class);
        for method in class.methods().iter().filter(|m| !m.annotations.is_empty()) {
            let property = bound_property_name(method);
            for annotation in &method.annotations {
                reader.add(method, &property, annotation)?;
            }
        }
        Ok(reader)
    }

    fn add(&mut self, method: &MethodInfo, property: &str, annotation: &Annotation) -> Result<()> {
        let aspects = AspectDefinition::from_annotation(annotation);
        let entry = self
            .by_property
            .entry(property.to_string())
            .or_insert_with(|| PropertyElementDescriptors::new(property));

        match annotation {
            Annotation::Field(field) => {
                let bound = BoundProperty::new(property)
                    .with_model_object(field.model_object.clone())
                    .with_model_attribute(field.model_attribute.clone());
                let descriptor = ElementDescriptor {
                    position: field.position,
                    kind: field.kind,
                    label: field.label.clone(),
                    bound_property: bound,
                    aspect_definitions: aspects,
                };
                entry.add_descriptor(descriptor, self.class.name())
            }
            Annotation::Button(button) => {
                let descriptor = ElementDescriptor {
                    position: button.position,
                    kind: ComponentKind::Button,
                    label: button.label.clone(),
                    bound_property: BoundProperty::new(property).with_model_object(DEFAULT_MODEL_OBJECT),
                    aspect_definitions: aspects,
                };
                entry.add_descriptor(descriptor, self.class.name())
            }
            Annotation::ToolTip(_) | Annotation::StyleNames(_) => {
                log::trace!(
                    "{}.{}: aspect annotation on property {property}",
                    self.class.name(),
                    method.name
                );
                entry.add_aspects(aspects);
                Ok(())
            }
        }
    }

    /// Properties that define a component, sorted by position.
    ///
    /// Fails if two properties share a position.
    pub fn ui_elements(&self) -> Result<Vec<PropertyElementDescriptors>> {
        self.validate_no_duplicate_position()?;
        let mut elements: Vec<PropertyElementDescriptors> = self
            .by_property
            .values()
            .filter(|e| e.is_not_empty())
            .cloned()
            .collect();
        elements.sort_by_key(|e| e.position());
        Ok(elements)
    }

    /// The element bound to `property`, if that property defines a component.
    pub fn find_descriptors(&self, property: &str) -> Result<Option<PropertyElementDescriptors>> {
        Ok(self
            .ui_elements()?
            .into_iter()
            .find(|e| e.pmo_property() == property))
    }

    fn validate_no_duplicate_position(&self) -> Result<()> {
        let mut by_position: BTreeMap<i32, Vec<String>> = BTreeMap::new();
        for element in self.by_property.values() {
            if let Some(position) = element.position() {
                by_position
                    .entry(position)
                    .or_default()
                    .push(element.pmo_property().to_string());
            }
        }
        match by_position.into_iter().find(|(_, properties)| properties.len() > 1) {
            Some((position, properties)) => Err(BindingError::DuplicatePosition {
                class: self.class.name().to_string(),
                position,
                properties,
            }),
            None => Ok(()),
        }
    }
}

fn bound_property_name(method: &MethodInfo) -> String {
    method
        .annotations
        .iter()
        .find_map(Annotation::explicit_pmo_property)
        .map_or_else(|| property_from_method(&method.name), str::to_string)
}
