//! Decorator configuration.
//!
//! [`DecoratorSettings`] is everything the row decorator needs to know about
//! the user's preferences and the catalog of known component types.
//! [`HierarchySettings`] is the stock implementation, persisted as TOML:
//!
//! ```toml
//! excluded = ["my_game::scene::Transform"]
//!
//! [components]
//! stack_scripts = true
//! grayed_icon = true
//!
//! [[styles]]
//! prefix = "---"
//! display_icons = false
//!
//! [[scripts]]
//! type_name = "my_game::player::PlayerController"
//! display_name = "Player Controller"
//! script = "scripts/player_controller.rs"
//! ```
//!
//! Types are named by their full path ([`ComponentType::path`]), so two types
//! sharing a short name never share an entry.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::component::{Component, ComponentType};
use crate::descriptor::{ComponentDescriptor, ComponentIcon};
use crate::theme;

/// Settings I/O error.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Display toggles for component icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentToggles {
    /// Master switch for the component icon strip.
    pub enabled: bool,
    /// Collapse all user scripts of a row into one icon.
    pub stack_scripts: bool,
    /// Draw a warning icon (and stop) at the first missing script slot.
    pub show_missing_script_warning: bool,
    /// Tint icons of disabled behaviours.
    pub grayed_icon: bool,
    /// Primary click on a behaviour icon flips its enabled flag.
    pub click_to_toggle: bool,
    /// Draw every built-in component, not only those marked shown.
    pub display_builtin: bool,
    /// Draw every user script, not only those marked shown.
    pub display_mono_scripts: bool,
}

impl Default for ComponentToggles {
    fn default() -> Self {
        Self {
            enabled: true,
            stack_scripts: false,
            show_missing_script_warning: true,
            grayed_icon: true,
            click_to_toggle: true,
            display_builtin: true,
            display_mono_scripts: true,
        }
    }
}

/// Per-entity style override, matched by name prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStyle {
    pub prefix: String,
    #[serde(default = "default_true")]
    pub display_icons: bool,
}

/// A user-defined component type known to the settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    /// Full type path.
    pub type_name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default = "default_true")]
    pub shown: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<ComponentIcon>,
}

fn default_true() -> bool {
    true
}

/// Configuration collaborator of the component icon decorator.
pub trait DecoratorSettings {
    fn toggles(&self) -> ComponentToggles;

    /// Whether a built-in type is excluded from the icon strip.
    fn is_excluded(&self, component_type: ComponentType) -> bool;

    fn builtin_descriptor(&self, component_type: ComponentType)
    -> Option<Arc<ComponentDescriptor>>;

    fn custom_descriptor(&self, component_type: ComponentType)
    -> Option<Arc<ComponentDescriptor>>;

    /// Registers the component's type as a custom type. Returns `true` if the
    /// type is known as custom afterwards.
    fn register_custom(&mut self, component: &dyn Component) -> bool;

    /// Whether the style matching this entity name suppresses icons.
    fn icons_hidden_by_style(&self, entity_name: &str) -> bool;
}

/// Stock [`DecoratorSettings`] backed by a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchySettings {
    /// Built-in type paths excluded from the icon strip.
    pub excluded: BTreeSet<String>,
    /// Built-in type paths whose descriptor is not marked shown.
    pub hidden_builtins: BTreeSet<String>,
    // Tables must follow plain values in TOML output.
    pub components: ComponentToggles,
    pub scripts: Vec<ScriptEntry>,
    pub styles: Vec<EntityStyle>,
    #[serde(skip)]
    builtins: HashMap<ComponentType, Arc<ComponentDescriptor>>,
}

impl HierarchySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded hierarchy settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as TOML. Built-in catalog entries are not persisted.
    pub fn save(&self, path: &Path) -> SettingsResult<()> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> SettingsResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Add an engine-provided component type to the built-in catalog.
    pub fn register_builtin<T: Component>(
        &mut self,
        display_name: &str,
        icon: ComponentIcon,
    ) -> &mut Self {
        let component_type = ComponentType::of::<T>();
        let shown = !self.hidden_builtins.contains(component_type.path());
        let descriptor =
            ComponentDescriptor::builtin(component_type, display_name, icon).with_shown(shown);
        self.builtins.insert(component_type, Arc::new(descriptor));
        self
    }

    /// Exclude a built-in type from the icon strip.
    pub fn exclude<T: Component>(&mut self) -> &mut Self {
        self.excluded
            .insert(ComponentType::of::<T>().path().to_owned());
        self
    }

    /// First style whose prefix matches the entity name.
    pub fn style_for(&self, entity_name: &str) -> Option<&EntityStyle> {
        self.styles
            .iter()
            .find(|style| !style.prefix.is_empty() && entity_name.starts_with(&style.prefix))
    }

    fn script_entry(&self, component_type: ComponentType) -> Option<&ScriptEntry> {
        self.scripts
            .iter()
            .find(|entry| entry.type_name == component_type.path())
    }
}

impl DecoratorSettings for HierarchySettings {
    fn toggles(&self) -> ComponentToggles {
        self.components
    }

    fn is_excluded(&self, component_type: ComponentType) -> bool {
        self.excluded.contains(component_type.path())
    }

    fn builtin_descriptor(
        &self,
        component_type: ComponentType,
    ) -> Option<Arc<ComponentDescriptor>> {
        self.builtins.get(&component_type).cloned()
    }

    fn custom_descriptor(
        &self,
        component_type: ComponentType,
    ) -> Option<Arc<ComponentDescriptor>> {
        let entry = self.script_entry(component_type)?;
        let icon = entry
            .icon
            .clone()
            .unwrap_or_else(|| ComponentIcon::glyph(theme::SCRIPT_ICON));
        let descriptor = ComponentDescriptor::custom(
            component_type,
            entry.display_name.as_str(),
            icon,
            entry.script.clone(),
        )
        .with_shown(entry.shown);
        Some(Arc::new(descriptor))
    }

    fn register_custom(&mut self, component: &dyn Component) -> bool {
        let component_type = component.component_type();
        if self.builtins.contains_key(&component_type) {
            return false;
        }
        if self.script_entry(component_type).is_some() {
            return true;
        }

        log::debug!(
            "Registering custom component type {}",
            component_type.path()
        );
        self.scripts.push(ScriptEntry {
            type_name: component_type.path().to_owned(),
            display_name: component_type.name().to_owned(),
            script: component.script().map(str::to_owned),
            shown: true,
            icon: None,
        });
        true
    }

    fn icons_hidden_by_style(&self, entity_name: &str) -> bool {
        self.style_for(entity_name)
            .is_some_and(|style| !style.display_icons)
    }
}
