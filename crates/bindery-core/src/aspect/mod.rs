//! Aspects: named facets of a bound component (value, enabled, visible, …).
//!
//! An aspect is resolved either once, when descriptors are built
//! ([`AspectResolution::Fixed`]), by resolving another aspect
//! ([`AspectResolution::Delegate`]), or per update from the bound object by
//! naming convention ([`AspectResolution::Dynamic`]).

mod definition;

use std::fmt;

pub use definition::{AspectDefinition, UiUpdater};

use crate::value::Value;

pub const VALUE: &str = "";
pub const ENABLED: &str = "enabled";
pub const VISIBLE: &str = "visible";
pub const REQUIRED: &str = "required";
pub const AVAILABLE_VALUES: &str = "availableValues";
pub const TOOL_TIP: &str = "toolTip";
pub const CAPTION: &str = "caption";
pub const LABEL: &str = "label";
pub const STYLE_NAMES: &str = "styleNames";
pub const COMPONENT_TYPE: &str = "componentType";

#[derive(Debug, Clone, PartialEq)]
pub enum AspectResolution {
    Fixed(Value),
    Delegate(Box<Aspect>),
    Dynamic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aspect {
    pub name: String,
    pub resolution: AspectResolution,
}

impl Aspect {
    pub fn dynamic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolution: AspectResolution::Dynamic,
        }
    }

    pub fn fixed(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            resolution: AspectResolution::Fixed(value.into()),
        }
    }

    /// An aspect named `name` that takes whatever `target` resolves to.
    pub fn delegate(name: impl Into<String>, target: Aspect) -> Self {
        Self {
            name: name.into(),
            resolution: AspectResolution::Delegate(Box::new(target)),
        }
    }

    /// Static aspects are resolved without looking at the bound object.
    pub fn is_static(&self) -> bool {
        !matches!(self.resolution, AspectResolution::Dynamic)
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() { "value" } else { &self.name };
        match &self.resolution {
            AspectResolution::Fixed(v) => write!(f, "{name}={v}"),
            AspectResolution::Delegate(target) => write!(f, "{name}->{target}"),
            AspectResolution::Dynamic => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_aspects() {
        assert!(Aspect::fixed(REQUIRED, true).is_static());
        assert!(Aspect::delegate(REQUIRED, Aspect::dynamic(ENABLED)).is_static());
        assert!(!Aspect::dynamic(ENABLED).is_static());
    }

    #[test]
    fn display() {
        assert_eq!(Aspect::fixed(REQUIRED, true).to_string(), "required=true");
        assert_eq!(
            Aspect::delegate(REQUIRED, Aspect::dynamic(ENABLED)).to_string(),
            "required->enabled"
        );
        assert_eq!(Aspect::dynamic(VALUE).to_string(), "value");
    }
}
