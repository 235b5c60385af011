use std::cell::RefCell;
use std::rc::Rc;

use crate::annotation::{
    Annotation, AvailableValuesType, Bind, CaptionType, EnabledType, RequiredType, ToolTipType, VisibleType,
};
use crate::binding::Handler;
use crate::component::{ComponentWrapper, WrapperRef};
use crate::dispatcher::PropertyDispatcher;
use crate::error::{BindingError, Result};
use crate::value::{Value, ValueError};

use super::{
    AVAILABLE_VALUES, Aspect, CAPTION, ENABLED, LABEL, REQUIRED, STYLE_NAMES, TOOL_TIP, VALUE, VISIBLE,
};

/// Pushes the current value of one aspect into the component.
pub type UiUpdater = Box<dyn Fn() -> Result<()>>;

/// Applies a resolved aspect value to a component.
pub type ValueSetter = Box<dyn Fn(Value) -> std::result::Result<(), ValueError>>;

/// One declarative rule derived from an annotation attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AspectDefinition {
    Label(String),
    Enabled(EnabledType),
    Visible(VisibleType),
    /// `enabled` is needed to resolve [`RequiredType::RequiredIfEnabled`].
    Required {
        required: RequiredType,
        enabled: EnabledType,
    },
    AvailableValues(AvailableValuesType),
    ToolTip(ToolTipType),
    Caption(CaptionType),
    /// Empty means the names are resolved dynamically.
    StyleNames(Vec<String>),
    /// Two-way binding of the component value.
    Value,
    /// Button click invokes the action method.
    Invoke,
}

impl AspectDefinition {
    /// All definitions declared by one annotation.
    pub fn from_annotation(annotation: &Annotation) -> Vec<AspectDefinition> {
        match annotation {
            Annotation::Field(field) => vec![
                AspectDefinition::Label(field.label.clone()),
                AspectDefinition::Enabled(field.enabled),
                AspectDefinition::Visible(field.visible),
                AspectDefinition::Required {
                    required: field.required,
                    enabled: field.enabled,
                },
                AspectDefinition::AvailableValues(field.available_values.clone()),
                AspectDefinition::Value,
            ],
            Annotation::Button(button) => vec![
                AspectDefinition::Label(button.label.clone()),
                AspectDefinition::Enabled(button.enabled),
                AspectDefinition::Visible(button.visible),
                AspectDefinition::Caption(button.caption.clone()),
                AspectDefinition::Invoke,
            ],
            Annotation::ToolTip(tool_tip) => vec![AspectDefinition::ToolTip(tool_tip.tool_tip.clone())],
            Annotation::StyleNames(style) => vec![AspectDefinition::StyleNames(style.names.clone())],
        }
    }

    /// Definitions for an existing component bound with [`Bind`].
    pub fn from_bind(bind: &Bind, is_button: bool) -> Vec<AspectDefinition> {
        let mut definitions = vec![
            AspectDefinition::Enabled(bind.enabled),
            AspectDefinition::Visible(bind.visible),
        ];
        if is_button {
            definitions.push(AspectDefinition::Invoke);
        } else {
            definitions.extend([
                AspectDefinition::Required {
                    required: bind.required,
                    enabled: bind.enabled,
                },
                AspectDefinition::AvailableValues(bind.available_values.clone()),
                AspectDefinition::Value,
            ]);
        }
        definitions
    }

    /// The aspect to resolve on every update, or `None` if this definition
    /// never updates the component.
    pub fn create_aspect(&self) -> Option<Aspect> {
        let aspect = match self {
            AspectDefinition::Label(label) => Aspect::fixed(LABEL, label.as_str()),
            AspectDefinition::Enabled(enabled) => enabled_aspect(*enabled),
            AspectDefinition::Visible(visible) => match visible {
                VisibleType::Visible => Aspect::fixed(VISIBLE, true),
                VisibleType::Invisible => Aspect::fixed(VISIBLE, false),
                VisibleType::Dynamic => Aspect::dynamic(VISIBLE),
            },
            AspectDefinition::Required { required, enabled } => match required {
                RequiredType::NotRequired => Aspect::fixed(REQUIRED, false),
                RequiredType::Required => Aspect::fixed(REQUIRED, true),
                RequiredType::RequiredIfEnabled => Aspect::delegate(REQUIRED, enabled_aspect(*enabled)),
                RequiredType::Dynamic => Aspect::dynamic(REQUIRED),
            },
            AspectDefinition::AvailableValues(values) => match values {
                AvailableValuesType::Values(list) => Aspect::fixed(AVAILABLE_VALUES, Value::List(list.clone())),
                AvailableValuesType::Boolean => Aspect::fixed(AVAILABLE_VALUES, vec![true, false]),
                AvailableValuesType::Dynamic => Aspect::dynamic(AVAILABLE_VALUES),
                AvailableValuesType::NoValues => Aspect::fixed(AVAILABLE_VALUES, Value::List(Vec::new())),
            },
            AspectDefinition::ToolTip(tool_tip) => match tool_tip {
                ToolTipType::None => return None,
                ToolTipType::Static(text) => Aspect::fixed(TOOL_TIP, text.as_str()),
                ToolTipType::Dynamic => Aspect::dynamic(TOOL_TIP),
            },
            AspectDefinition::Caption(caption) => match caption {
                CaptionType::None => return None,
                CaptionType::Static(text) => Aspect::fixed(CAPTION, text.as_str()),
                CaptionType::Dynamic => Aspect::dynamic(CAPTION),
            },
            AspectDefinition::StyleNames(names) if names.is_empty() => Aspect::dynamic(STYLE_NAMES),
            AspectDefinition::StyleNames(names) => Aspect::fixed(STYLE_NAMES, names.clone()),
            AspectDefinition::Value => Aspect::dynamic(VALUE),
            AspectDefinition::Invoke => return None,
        };
        Some(aspect)
    }

    fn aspect_name(&self) -> &'static str {
        match self {
            AspectDefinition::Label(_) => LABEL,
            AspectDefinition::Enabled(_) => ENABLED,
            AspectDefinition::Visible(_) => VISIBLE,
            AspectDefinition::Required { .. } => REQUIRED,
            AspectDefinition::AvailableValues(_) => AVAILABLE_VALUES,
            AspectDefinition::ToolTip(_) => TOOL_TIP,
            AspectDefinition::Caption(_) => CAPTION,
            AspectDefinition::StyleNames(_) => STYLE_NAMES,
            AspectDefinition::Value => "value",
            AspectDefinition::Invoke => "invoke",
        }
    }

    fn unsupported(&self, component: &dyn ComponentWrapper) -> BindingError {
        BindingError::UnsupportedComponent {
            aspect: self.aspect_name().to_string(),
            component: component.kind_name().to_string(),
        }
    }

    /// Function applying a resolved value to `wrapper`.
    ///
    /// Fails if the component cannot express the aspect. `Ok(None)` means the
    /// combination is a documented no-op (e.g. "not required" on a button).
    pub fn create_component_value_setter(&self, wrapper: &WrapperRef) -> Result<Option<ValueSetter>> {
        let mut component = wrapper.borrow_mut();
        let has_field = component.as_field().is_some();
        let has_selection = component.as_selection().is_some();
        let has_button = component.as_button().is_some();

        let w = Rc::clone(wrapper);
        let setter: ValueSetter = match self {
            AspectDefinition::Label(_) => Box::new(move |v: Value| {
                w.borrow_mut().set_label(&v.to_display_text());
                Ok(())
            }),
            AspectDefinition::Enabled(_) => Box::new(move |v: Value| {
                w.borrow_mut().set_enabled(v.as_bool()?);
                Ok(())
            }),
            AspectDefinition::Visible(_) => Box::new(move |v: Value| {
                w.borrow_mut().set_visible(v.as_bool()?);
                Ok(())
            }),
            AspectDefinition::Required {
                required: RequiredType::NotRequired,
                ..
            } if !has_field => return Ok(None),
            AspectDefinition::Required { .. } => {
                if !has_field {
                    return Err(self.unsupported(&*component));
                }
                Box::new(move |v: Value| {
                    let required = v.as_bool()?;
                    if let Some(field) = w.borrow_mut().as_field() {
                        field.set_required(required);
                    }
                    Ok(())
                })
            }
            AspectDefinition::AvailableValues(AvailableValuesType::NoValues) if !has_selection => {
                return Ok(None);
            }
            AspectDefinition::AvailableValues(_) => {
                if !has_selection {
                    return Err(self.unsupported(&*component));
                }
                Box::new(move |v: Value| {
                    let values = v.into_list()?;
                    if let Some(selection) = w.borrow_mut().as_selection() {
                        selection.set_available_values(values);
                    }
                    Ok(())
                })
            }
            AspectDefinition::ToolTip(_) => Box::new(move |v: Value| {
                w.borrow_mut().set_tooltip(&v.to_display_text());
                Ok(())
            }),
            AspectDefinition::Caption(CaptionType::None) => return Ok(None),
            AspectDefinition::Caption(_) => {
                if !has_button {
                    return Err(self.unsupported(&*component));
                }
                Box::new(move |v: Value| {
                    let caption = v.to_display_text();
                    if let Some(button) = w.borrow_mut().as_button() {
                        button.set_caption(&caption);
                    }
                    Ok(())
                })
            }
            AspectDefinition::StyleNames(_) => {
                // names applied by the previous update
                let applied = RefCell::new(Vec::<String>::new());
                Box::new(move |v: Value| {
                    let names: Vec<String> = match v {
                        Value::Str(name) => vec![name],
                        other => other.into_list()?.iter().map(Value::to_display_text).collect(),
                    };
                    let mut applied = applied.borrow_mut();
                    let mut component = w.borrow_mut();
                    component.remove_style_names(&applied);
                    component.add_style_names(&names);
                    *applied = names;
                    Ok(())
                })
            }
            AspectDefinition::Value => {
                if !has_field {
                    return Err(self.unsupported(&*component));
                }
                Box::new(move |v: Value| {
                    if let Some(field) = w.borrow_mut().as_field() {
                        field.set_value(v);
                    }
                    Ok(())
                })
            }
            AspectDefinition::Invoke => {
                if !has_button {
                    return Err(self.unsupported(&*component));
                }
                return Ok(None);
            }
        };
        Ok(Some(setter))
    }

    /// Updater resolving the aspect through `dispatcher` and applying it to
    /// `wrapper`. The value updater also propagates read-only state.
    pub fn create_ui_updater(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &WrapperRef,
    ) -> Result<Option<UiUpdater>> {
        let setter = self.create_component_value_setter(wrapper)?;
        let (Some(aspect), Some(setter)) = (self.create_aspect(), setter) else {
            return Ok(None);
        };

        let dispatcher = Rc::clone(dispatcher);
        let name = self.aspect_name();
        let invalid = move |property: &str, source: ValueError| BindingError::InvalidAspectValue {
            aspect: name.to_string(),
            property: property.to_string(),
            source,
        };

        if matches!(self, AspectDefinition::Value) {
            let w = Rc::clone(wrapper);
            return Ok(Some(Box::new(move || {
                let value = dispatcher.aspect_value(&aspect)?;
                let read_only = dispatcher.is_read_only();
                setter(value).map_err(|e| invalid(dispatcher.property(), e))?;
                if let Some(field) = w.borrow_mut().as_field() {
                    field.set_read_only(read_only);
                }
                Ok(())
            })));
        }

        Ok(Some(Box::new(move || {
            let value = dispatcher.aspect_value(&aspect)?;
            setter(value).map_err(|e| invalid(dispatcher.property(), e))
        })))
    }

    /// Wires the UI→model direction: field edits write through the
    /// dispatcher, button clicks invoke it. Both then call `handler`.
    pub fn initialize_model_update(
        &self,
        dispatcher: &Rc<dyn PropertyDispatcher>,
        wrapper: &WrapperRef,
        handler: &Handler,
    ) -> Result<()> {
        let mut component = wrapper.borrow_mut();
        match self {
            AspectDefinition::Value => {
                let dispatcher = Rc::clone(dispatcher);
                let handler = Rc::clone(handler);
                if let Some(field) = component.as_field() {
                    field.set_change_listener(Rc::new(move |value: Value| {
                        match dispatcher.set_value(value) {
                            Ok(()) => handler(),
                            Err(e) => log::error!("cannot write property {}: {e}", dispatcher.property()),
                        }
                    }));
                }
            }
            AspectDefinition::Invoke => {
                if component.as_button().is_none() {
                    return Err(self.unsupported(&*component));
                }
                let dispatcher = Rc::clone(dispatcher);
                let handler = Rc::clone(handler);
                if let Some(button) = component.as_button() {
                    button.set_click_listener(Rc::new(move || match dispatcher.invoke() {
                        Ok(()) => handler(),
                        Err(e) => log::error!("cannot invoke {}: {e}", dispatcher.property()),
                    }));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn enabled_aspect(enabled: EnabledType) -> Aspect {
    match enabled {
        EnabledType::Enabled => Aspect::fixed(ENABLED, true),
        EnabledType::Disabled => Aspect::fixed(ENABLED, false),
        EnabledType::Dynamic => Aspect::dynamic(ENABLED),
    }
}
