//! Bindery core: declarative binding of UI components to presentation
//! models.
//!
//! A presentation model object (PMO) describes its properties once through
//! [`introspect::Introspect`] and annotates the getters that become UI
//! elements. The core reads those annotations, builds a dispatcher chain per
//! bound property and keeps every component in sync with its model:
//!
//! ```rust,ignore
//! use bindery_core::prelude::*;
//!
//! struct ContactPmo { name: String, locked: bool }
//!
//! impl Introspect for ContactPmo {
//!     fn introspect(class: &mut ClassBuilder<Self>) {
//!         class
//!             .annotate_class(UiSection::new("Contact"))
//!             .getter("getName", |p: &Self| p.name.clone())
//!             .annotate(UiField::text_field(1).label("Name").enabled(EnabledType::Dynamic))
//!             .setter("setName", |p: &mut Self, v: String| p.name = v)
//!             .getter("isNameEnabled", |p: &Self| !p.locked);
//!     }
//! }
//!
//! let context = BindingContext::new("contact-page");
//! let pmo = object_ref(ContactPmo { name: String::new(), locked: false });
//! let section = PmoBasedSectionFactory::create_section(&pmo, &context, &my_toolkit)?;
//! ```
//!
//! The GUI toolkit plugs in through [`component::ComponentWrapper`] and
//! [`component::ComponentFactory`]; the core never depends on a concrete
//! toolkit.

pub mod accessor;
pub mod annotation;
pub mod aspect;
pub mod binding;
pub mod component;
pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod introspect;
pub mod logging;
pub mod message;
pub mod uicreation;
pub mod validation;
pub mod value;

pub use error::{BindingError, Result};

/// The types needed to write PMOs and bind them.
pub mod prelude {
    pub use crate::annotation::{
        AvailableValuesType, Bind, BindStyleNames, CaptionType, ComponentKind, EnabledType, RequiredType,
        SectionLayout, ToolTipType, UiButton, UiField, UiSection, UiToolTip, VisibleType,
    };
    pub use crate::binding::{Binding, BindingContext, BindingContextBuilder, ContainerBinding, ContainerPmo};
    pub use crate::component::{ComponentFactory, ComponentWrapper, WrapperRef};
    pub use crate::dispatcher::{PropertyBehavior, PropertyBehaviorProvider, ReadOnlyBehavior};
    pub use crate::error::{BindingError, Result};
    pub use crate::introspect::{ClassBuilder, Introspect, ObjectRef, object_ref};
    pub use crate::message::{Message, MessageList, Severity};
    pub use crate::uicreation::{
        PmoBasedSectionFactory, PmoBasedTableFactory, PmoBasedTableSectionFactory, TableSection,
    };
    pub use crate::value::Value;
}
