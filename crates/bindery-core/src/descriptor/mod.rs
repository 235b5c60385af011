//! Element descriptors: what to create and how to bind it, per PMO property.

mod model_object;
mod reader;

use std::rc::Rc;

pub use model_object::ModelObjects;
pub use reader::{UiElementAnnotationReader, elements_of};

use crate::accessor::{PropertyAccessor, aspect_property, capitalize};
use crate::annotation::{ComponentKind, DEFAULT_MODEL_OBJECT};
use crate::aspect::{self, AspectDefinition};
use crate::component::ComponentDefinition;
use crate::error::{BindingError, Result};
use crate::introspect::{ObjectRef, class_name_of};

/// Supplies the object a dispatcher currently reflects on.
pub type ObjectSupplier = Rc<dyn Fn() -> Option<ObjectRef>>;

// ── BoundProperty ─────────────────────────────────────────────────────────

/// Where a UI element reads its value from: a PMO property and, behind it,
/// an attribute of a model object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundProperty {
    pub pmo_property: String,
    pub model_object: String,
    /// Empty when the model attribute has the PMO property's name.
    pub model_attribute: String,
}

impl BoundProperty {
    pub fn new(pmo_property: impl Into<String>) -> Self {
        Self {
            pmo_property: pmo_property.into(),
            model_object: DEFAULT_MODEL_OBJECT.to_string(),
            model_attribute: String::new(),
        }
    }

    pub fn with_model_object(mut self, model_object: impl Into<String>) -> Self {
        self.model_object = model_object.into();
        self
    }

    pub fn with_model_attribute(mut self, model_attribute: impl Into<String>) -> Self {
        self.model_attribute = model_attribute.into();
        self
    }

    pub fn model_attribute(&self) -> &str {
        if self.model_attribute.is_empty() {
            &self.pmo_property
        } else {
            &self.model_attribute
        }
    }

    pub fn has_explicit_model_attribute(&self) -> bool {
        !self.model_attribute.is_empty()
    }
}

// ── ElementDescriptor ─────────────────────────────────────────────────────

/// How to create and bind one component for one PMO property.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDescriptor {
    pub position: i32,
    pub kind: ComponentKind,
    pub label: String,
    pub bound_property: BoundProperty,
    pub aspect_definitions: Vec<AspectDefinition>,
}

impl ElementDescriptor {
    #[inline]
    pub fn pmo_property(&self) -> &str {
        &self.bound_property.pmo_property
    }

    /// Label to show; the capitalized property name when none is declared.
    pub fn label_text(&self) -> String {
        if self.label.is_empty() {
            capitalize(self.pmo_property())
        } else {
            self.label.clone()
        }
    }

    pub fn component_definition(&self) -> ComponentDefinition {
        ComponentDefinition {
            kind: self.kind,
            id: self.pmo_property().to_string(),
            label: self.label_text(),
            position: self.position,
        }
    }
}

// ── PropertyElementDescriptors ────────────────────────────────────────────

/// Everything the annotations of one PMO property declare: one descriptor
/// per component kind plus aspects contributed by aspect-only annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyElementDescriptors {
    pmo_property: String,
    descriptors: Vec<ElementDescriptor>,
    additional_aspects: Vec<AspectDefinition>,
}

impl PropertyElementDescriptors {
    pub fn new(pmo_property: impl Into<String>) -> Self {
        Self {
            pmo_property: pmo_property.into(),
            descriptors: Vec::new(),
            additional_aspects: Vec::new(),
        }
    }

    #[inline]
    pub fn pmo_property(&self) -> &str {
        &self.pmo_property
    }

    /// Adds the descriptor of one component annotation. All component
    /// annotations of a property must declare the same position; a second
    /// descriptor of the same kind replaces the first.
    pub fn add_descriptor(&mut self, descriptor: ElementDescriptor, class: &str) -> Result<()> {
        if self.position().is_some_and(|p| p != descriptor.position) {
            let mut positions: Vec<i32> = self.descriptors.iter().map(|d| d.position).collect();
            positions.push(descriptor.position);
            return Err(BindingError::InconsistentPosition {
                class: class.to_string(),
                property: self.pmo_property.clone(),
                positions,
            });
        }
        match self.descriptors.iter_mut().find(|d| d.kind == descriptor.kind) {
            Some(slot) => *slot = descriptor,
            None => self.descriptors.push(descriptor),
        }
        Ok(())
    }

    pub fn add_aspects(&mut self, aspects: impl IntoIterator<Item = AspectDefinition>) {
        self.additional_aspects.extend(aspects);
    }

    /// `false` for properties that only carry aspect annotations.
    #[inline]
    pub fn is_not_empty(&self) -> bool {
        !self.descriptors.is_empty()
    }

    /// Position of the element, `None` for aspect-only properties.
    pub fn position(&self) -> Option<i32> {
        self.descriptors.first().map(|d| d.position)
    }

    pub fn descriptors(&self) -> &[ElementDescriptor] {
        &self.descriptors
    }

    pub fn additional_aspects(&self) -> &[AspectDefinition] {
        &self.additional_aspects
    }

    /// The descriptor to use for `pmo`, including the additional aspects.
    ///
    /// With several component kinds, the `<property>ComponentType` value of
    /// the PMO names the kind to create.
    pub fn descriptor(&self, pmo: &ObjectRef) -> Result<ElementDescriptor> {
        let chosen = match self.descriptors.as_slice() {
            [] => None,
            [single] => Some(single),
            several => {
                let requested = self.requested_component_type(pmo)?;
                several
                    .iter()
                    .find(|d| requested.as_deref() == Some(d.kind.name()))
            }
        };

        match chosen {
            Some(descriptor) => {
                let mut descriptor = descriptor.clone();
                descriptor
                    .aspect_definitions
                    .extend(self.additional_aspects.iter().cloned());
                Ok(descriptor)
            }
            None => Err(BindingError::UnknownComponentType {
                class: class_name_of(pmo),
                property: self.pmo_property.clone(),
                requested: self.requested_component_type(pmo).ok().flatten(),
                declared: self.descriptors.iter().map(|d| d.kind.name().to_string()).collect(),
            }),
        }
    }

    fn requested_component_type(&self, pmo: &ObjectRef) -> Result<Option<String>> {
        let property = aspect_property(aspect::COMPONENT_TYPE, &self.pmo_property);
        let class = pmo
            .try_borrow()
            .map(|o| o.class_info())
            .map_err(|_| BindingError::Access {
                object: class_name_of(pmo),
                property: property.clone(),
                cause: "object is mutably borrowed".to_string(),
            })?;
        let accessor = PropertyAccessor::get(&class, &property);
        if !accessor.can_read() {
            return Ok(None);
        }
        Ok(accessor.read(pmo)?.as_str().map(str::to_string))
    }
}
