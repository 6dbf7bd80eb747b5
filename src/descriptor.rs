//! Visual descriptors resolved for component types.

use serde::{Deserialize, Serialize};

use crate::component::ComponentType;

/// Icon drawn in a row cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentIcon {
    /// Text or emoji glyph drawn with the UI font.
    Glyph(String),
    /// Any URI understood by the installed egui image loaders.
    Uri(String),
}

impl ComponentIcon {
    pub fn glyph(glyph: impl Into<String>) -> Self {
        Self::Glyph(glyph.into())
    }

    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri(uri.into())
    }
}

/// How a component type is presented in the hierarchy.
///
/// Built-in descriptors are cached for the lifetime of the
/// [`TypeRegistry`](crate::TypeRegistry) and never change after insertion;
/// there are no mutators, only the `with_*` builders used at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    component_type: ComponentType,
    display_name: String,
    icon: ComponentIcon,
    built_in: bool,
    shown: bool,
    script: Option<String>,
}

impl ComponentDescriptor {
    /// Descriptor for an engine-provided component type.
    pub fn builtin(
        component_type: ComponentType,
        display_name: impl Into<String>,
        icon: ComponentIcon,
    ) -> Self {
        Self {
            component_type,
            display_name: display_name.into(),
            icon,
            built_in: true,
            shown: true,
            script: None,
        }
    }

    /// Descriptor for a user-defined (script) component type.
    pub fn custom(
        component_type: ComponentType,
        display_name: impl Into<String>,
        icon: ComponentIcon,
        script: Option<String>,
    ) -> Self {
        Self {
            component_type,
            display_name: display_name.into(),
            icon,
            built_in: false,
            shown: true,
            script,
        }
    }

    pub fn with_shown(mut self, shown: bool) -> Self {
        self.shown = shown;
        self
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn icon(&self) -> &ComponentIcon {
        &self.icon
    }

    pub fn is_built_in(&self) -> bool {
        self.built_in
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }
}
