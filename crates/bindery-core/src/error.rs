//! Error types of the binding core.
//!
//! Configuration errors surface while descriptors are read or components are
//! bound; binding errors surface while a dispatcher touches a bound object.

use thiserror::Error;

use crate::value::ValueError;

pub type Result<T, E = BindingError> = std::result::Result<T, E>;

/// Errors raised by the binding core.
///
/// `Clone` so the per-class descriptor cache can hand out the same failure to
/// every caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindingError {
    /// Two UI elements of one PMO class share a position.
    #[error("Duplicate position {position} in properties [{}] of pmo class {class}", .properties.join(", "))]
    DuplicatePosition {
        class: String,
        position: i32,
        properties: Vec<String>,
    },

    /// Several component annotations on one property disagree on the position.
    #[error("Component annotations of property {property} in pmo class {class} declare different positions {positions:?}")]
    InconsistentPosition {
        class: String,
        property: String,
        positions: Vec<i32>,
    },

    /// A class-level annotation needed by a factory is absent.
    #[error("PMO class {class} must be annotated with {annotation}")]
    MissingAnnotation {
        class: String,
        annotation: &'static str,
    },

    /// An annotation was attached before any method was declared.
    #[error("PMO class {class} declares an annotation that is not attached to any method")]
    DanglingAnnotation { class: String },

    /// A non-dynamic aspect reached a dispatcher that can only resolve dynamic ones.
    #[error("Aspect {aspect} should not be handled by {dispatcher}. It seems like the dispatcher chain is broken, check binding context {}", .context.as_deref().unwrap_or("<unknown>"))]
    StaticAspect {
        aspect: String,
        dispatcher: &'static str,
        context: Option<String>,
    },

    /// The aspect cannot be expressed by the wrapped component.
    #[error("{aspect} binding is not supported for a component of type {component}")]
    UnsupportedComponent { aspect: String, component: String },

    /// An aspect resolved to a value of the wrong kind.
    #[error("Aspect {aspect} of property {property} has an invalid value: {source}")]
    InvalidAspectValue {
        aspect: String,
        property: String,
        source: ValueError,
    },

    #[error(transparent)]
    ModelObject(#[from] ModelObjectError),

    /// The dynamic component type of a property names no declared component.
    #[error("Property {property} of pmo class {class} selects component type {requested:?}, declared are {declared:?}")]
    UnknownComponentType {
        class: String,
        property: String,
        requested: Option<String>,
        declared: Vec<String>,
    },

    /// Reading, writing or invoking an accessor failed.
    #[error("Cannot access object: {object}, property: {property}: {cause}")]
    Access {
        object: String,
        property: String,
        cause: String,
    },

    /// The dispatcher chain was exhausted without finding an accessor.
    #[error("Cannot {operation} property \"{property}\" in any of {objects:?}")]
    NoAccessor {
        operation: &'static str,
        property: String,
        objects: Vec<String>,
    },
}

impl BindingError {
    /// Attaches the name of the binding context to errors that report it.
    pub fn in_context(self, name: &str) -> Self {
        match self {
            BindingError::StaticAspect {
                aspect,
                dispatcher,
                context: None,
            } => BindingError::StaticAspect {
                aspect,
                dispatcher,
                context: Some(name.to_string()),
            },
            other => other,
        }
    }

    /// `true` for errors caused by a broken PMO or binding configuration
    /// rather than by accessing a bound object.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(
            self,
            BindingError::Access { .. } | BindingError::NoAccessor { .. }
        )
    }
}

/// Problems locating the model object of a PMO.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelObjectError {
    #[error("Presentation model object class {class} has no model object accessor named \"{name}\"")]
    NoAnnotatedMember { class: String, name: String },

    #[error("Presentation model object class {class} has multiple members ({}) providing model object \"{name}\"", .members.join(", "))]
    MultipleMembersAnnotated {
        class: String,
        name: String,
        members: Vec<String>,
    },
}
