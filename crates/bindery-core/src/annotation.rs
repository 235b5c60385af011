//! Binding annotations.
//!
//! Annotations are plain data attached to PMO methods (and classes) while a
//! type describes itself in [`crate::introspect::Introspect::introspect`].
//! The annotation reader turns them into element descriptors and aspect
//! definitions.
//!
//! ```rust,ignore
//! class
//!     .getter("getName", |p: &ContactPmo| p.name.clone())
//!     .annotate(UiField::text_field(10).label("Name").required(RequiredType::RequiredIfEnabled))
//!     .annotate(UiToolTip::text("Full name"));
//! ```

use crate::value::Value;

/// Name of the model object used when an annotation does not name one.
pub const DEFAULT_MODEL_OBJECT: &str = "modelObject";

// ── Attribute types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnabledType {
    #[default]
    Enabled,
    Disabled,
    /// `is<Property>Enabled()` decides.
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibleType {
    #[default]
    Visible,
    Invisible,
    /// `is<Property>Visible()` decides.
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequiredType {
    #[default]
    NotRequired,
    Required,
    /// Required exactly when the component is enabled.
    RequiredIfEnabled,
    /// `is<Property>Required()` decides.
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AvailableValuesType {
    /// A fixed list of selectable values.
    Values(Vec<Value>),
    Boolean,
    /// `get<Property>AvailableValues()` decides.
    Dynamic,
    #[default]
    NoValues,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToolTipType {
    #[default]
    None,
    Static(String),
    /// `get<Property>ToolTip()` decides.
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaptionType {
    #[default]
    None,
    Static(String),
    /// `get<Property>Caption()` decides.
    Dynamic,
}

// ── ComponentKind ─────────────────────────────────────────────────────────

/// The kind of UI component an annotation asks the toolkit to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    TextField,
    TextArea,
    IntegerField,
    DecimalField,
    DateField,
    CheckBox,
    ComboBox,
    Label,
    Button,
}

impl ComponentKind {
    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::TextField => "TextField",
            ComponentKind::TextArea => "TextArea",
            ComponentKind::IntegerField => "IntegerField",
            ComponentKind::DecimalField => "DecimalField",
            ComponentKind::DateField => "DateField",
            ComponentKind::CheckBox => "CheckBox",
            ComponentKind::ComboBox => "ComboBox",
            ComponentKind::Label => "Label",
            ComponentKind::Button => "Button",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        const ALL: [ComponentKind; 9] = [
            ComponentKind::TextField,
            ComponentKind::TextArea,
            ComponentKind::IntegerField,
            ComponentKind::DecimalField,
            ComponentKind::DateField,
            ComponentKind::CheckBox,
            ComponentKind::ComboBox,
            ComponentKind::Label,
            ComponentKind::Button,
        ];
        ALL.into_iter().find(|k| k.name() == name)
    }

    /// Kinds that offer a list of values to choose from.
    pub fn is_selection(self) -> bool {
        matches!(self, ComponentKind::ComboBox)
    }
}

// ── UiField ───────────────────────────────────────────────────────────────

/// Declares a value component (text field, combo box, …) for a property.
#[derive(Debug, Clone, PartialEq)]
pub struct UiField {
    pub kind: ComponentKind,
    pub position: i32,
    pub label: String,
    pub enabled: EnabledType,
    pub visible: VisibleType,
    pub required: RequiredType,
    pub available_values: AvailableValuesType,
    pub model_object: String,
    /// Property of the model object to bind; empty means "same as the PMO property".
    pub model_attribute: String,
    /// Overrides the property name derived from the method name.
    pub pmo_property: Option<String>,
}

impl UiField {
    pub fn new(kind: ComponentKind, position: i32) -> Self {
        let available_values = if kind.is_selection() {
            AvailableValuesType::Dynamic
        } else {
            AvailableValuesType::NoValues
        };
        Self {
            kind,
            position,
            label: String::new(),
            enabled: EnabledType::default(),
            visible: VisibleType::default(),
            required: RequiredType::default(),
            available_values,
            model_object: DEFAULT_MODEL_OBJECT.to_string(),
            model_attribute: String::new(),
            pmo_property: None,
        }
    }

    pub fn text_field(position: i32) -> Self {
        Self::new(ComponentKind::TextField, position)
    }

    pub fn text_area(position: i32) -> Self {
        Self::new(ComponentKind::TextArea, position)
    }

    pub fn integer_field(position: i32) -> Self {
        Self::new(ComponentKind::IntegerField, position)
    }

    pub fn decimal_field(position: i32) -> Self {
        Self::new(ComponentKind::DecimalField, position)
    }

    pub fn date_field(position: i32) -> Self {
        Self::new(ComponentKind::DateField, position)
    }

    pub fn check_box(position: i32) -> Self {
        Self::new(ComponentKind::CheckBox, position)
    }

    pub fn combo_box(position: i32) -> Self {
        Self::new(ComponentKind::ComboBox, position)
    }

    pub fn display_label(position: i32) -> Self {
        Self::new(ComponentKind::Label, position)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn enabled(mut self, enabled: EnabledType) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn visible(mut self, visible: VisibleType) -> Self {
        self.visible = visible;
        self
    }

    pub fn required(mut self, required: RequiredType) -> Self {
        self.required = required;
        self
    }

    pub fn available_values(mut self, available_values: AvailableValuesType) -> Self {
        self.available_values = available_values;
        self
    }

    pub fn model_object(mut self, name: impl Into<String>) -> Self {
        self.model_object = name.into();
        self
    }

    pub fn model_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.model_attribute = attribute.into();
        self
    }

    pub fn pmo_property(mut self, property: impl Into<String>) -> Self {
        self.pmo_property = Some(property.into());
        self
    }
}

// ── UiButton ──────────────────────────────────────────────────────────────

/// Declares a button that invokes the annotated action method.
#[derive(Debug, Clone, PartialEq)]
pub struct UiButton {
    pub position: i32,
    pub caption: CaptionType,
    pub label: String,
    pub enabled: EnabledType,
    pub visible: VisibleType,
}

impl UiButton {
    pub fn new(position: i32) -> Self {
        Self {
            position,
            caption: CaptionType::None,
            label: String::new(),
            enabled: EnabledType::default(),
            visible: VisibleType::default(),
        }
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = CaptionType::Static(caption.into());
        self
    }

    pub fn caption_type(mut self, caption: CaptionType) -> Self {
        self.caption = caption;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn enabled(mut self, enabled: EnabledType) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn visible(mut self, visible: VisibleType) -> Self {
        self.visible = visible;
        self
    }
}

// ── Bind ──────────────────────────────────────────────────────────────────

/// Binds a component the application created itself to a PMO property.
///
/// Unlike [`UiField`], nothing is created: the component's capabilities
/// decide what is bound. Buttons invoke the property, every other component
/// edits its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Bind {
    pub pmo_property: String,
    pub model_object: String,
    pub model_attribute: String,
    pub enabled: EnabledType,
    pub visible: VisibleType,
    pub required: RequiredType,
    pub available_values: AvailableValuesType,
}

impl Bind {
    pub fn new(pmo_property: impl Into<String>) -> Self {
        Self {
            pmo_property: pmo_property.into(),
            model_object: DEFAULT_MODEL_OBJECT.to_string(),
            model_attribute: String::new(),
            enabled: EnabledType::default(),
            visible: VisibleType::default(),
            required: RequiredType::default(),
            available_values: AvailableValuesType::default(),
        }
    }

    pub fn model_object(mut self, name: impl Into<String>) -> Self {
        self.model_object = name.into();
        self
    }

    pub fn model_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.model_attribute = attribute.into();
        self
    }

    pub fn enabled(mut self, enabled: EnabledType) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn visible(mut self, visible: VisibleType) -> Self {
        self.visible = visible;
        self
    }

    pub fn required(mut self, required: RequiredType) -> Self {
        self.required = required;
        self
    }

    pub fn available_values(mut self, available_values: AvailableValuesType) -> Self {
        self.available_values = available_values;
        self
    }
}

// ── Aspect-only annotations ───────────────────────────────────────────────

/// Adds a tooltip to whatever component the property is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiToolTip {
    pub tool_tip: ToolTipType,
}

impl UiToolTip {
    pub fn text(text: impl Into<String>) -> Self {
        Self { tool_tip: ToolTipType::Static(text.into()) }
    }

    pub fn dynamic() -> Self {
        Self { tool_tip: ToolTipType::Dynamic }
    }

    pub fn none() -> Self {
        Self { tool_tip: ToolTipType::None }
    }
}

/// Adds style names to the bound component. No names means
/// `get<Property>StyleNames()` supplies them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BindStyleNames {
    pub names: Vec<String>,
}

impl BindStyleNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { names: names.into_iter().map(Into::into).collect() }
    }

    pub fn dynamic() -> Self {
        Self::default()
    }
}

// ── Annotation ────────────────────────────────────────────────────────────

/// Any annotation that can be attached to a PMO method.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Field(UiField),
    Button(UiButton),
    ToolTip(UiToolTip),
    StyleNames(BindStyleNames),
}

impl Annotation {
    /// Whether the annotation defines a component (as opposed to only
    /// contributing aspects to one defined elsewhere).
    pub fn is_component_definition(&self) -> bool {
        matches!(self, Annotation::Field(_) | Annotation::Button(_))
    }

    pub fn component_kind(&self) -> Option<ComponentKind> {
        match self {
            Annotation::Field(f) => Some(f.kind),
            Annotation::Button(_) => Some(ComponentKind::Button),
            _ => None,
        }
    }

    pub fn position(&self) -> Option<i32> {
        match self {
            Annotation::Field(f) => Some(f.position),
            Annotation::Button(b) => Some(b.position),
            _ => None,
        }
    }

    pub(crate) fn explicit_pmo_property(&self) -> Option<&str> {
        match self {
            Annotation::Field(f) => f.pmo_property.as_deref(),
            _ => None,
        }
    }
}

impl From<UiField> for Annotation {
    fn from(f: UiField) -> Self {
        Annotation::Field(f)
    }
}

impl From<UiButton> for Annotation {
    fn from(b: UiButton) -> Self {
        Annotation::Button(b)
    }
}

impl From<UiToolTip> for Annotation {
    fn from(t: UiToolTip) -> Self {
        Annotation::ToolTip(t)
    }
}

impl From<BindStyleNames> for Annotation {
    fn from(s: BindStyleNames) -> Self {
        Annotation::StyleNames(s)
    }
}

// ── Class annotations ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionLayout {
    /// Label/component pairs stacked vertically.
    #[default]
    Form,
    Horizontal,
    Column,
}

/// Marks a PMO class as the source of a section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiSection {
    pub caption: String,
    pub layout: SectionLayout,
    pub closeable: bool,
}

impl UiSection {
    pub fn new(caption: impl Into<String>) -> Self {
        Self { caption: caption.into(), ..Self::default() }
    }

    pub fn layout(mut self, layout: SectionLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn closeable(mut self, closeable: bool) -> Self {
        self.closeable = closeable;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassAnnotation {
    Section(UiSection),
}

impl From<UiSection> for ClassAnnotation {
    fn from(s: UiSection) -> Self {
        ClassAnnotation::Section(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combo_box_defaults_to_dynamic_values() {
        assert_eq!(UiField::combo_box(1).available_values, AvailableValuesType::Dynamic);
        assert_eq!(UiField::text_field(1).available_values, AvailableValuesType::NoValues);
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in [ComponentKind::TextField, ComponentKind::ComboBox, ComponentKind::Button] {
            assert_eq!(ComponentKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ComponentKind::from_name("Slider"), None);
    }

    #[test]
    fn bind_defaults_to_the_default_model_object() {
        let bind = Bind::new("name").required(RequiredType::Required);
        assert_eq!(bind.model_object, DEFAULT_MODEL_OBJECT);
        assert_eq!(bind.available_values, AvailableValuesType::NoValues);
        assert_eq!(bind.enabled, EnabledType::Enabled);
    }

    #[test]
    fn only_fields_and_buttons_define_components() {
        assert!(Annotation::from(UiButton::new(1)).is_component_definition());
        assert!(!Annotation::from(UiToolTip::text("x")).is_component_definition());
        assert_eq!(Annotation::from(UiToolTip::dynamic()).position(), None);
    }
}
