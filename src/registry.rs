//! Process-lifetime cache of component descriptors.
//!
//! Built-in descriptors are resolved through the settings once and then kept
//! for as long as the registry lives. Custom (script) descriptors are looked
//! up through the settings on every call, since their visibility depends on
//! per-settings state.
//!
//! The registry is shared by every row renderer. Access goes through a
//! [`RwLock`], so several renderers may hold the same `Arc<TypeRegistry>`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::component::{Component, ComponentType};
use crate::descriptor::ComponentDescriptor;
use crate::settings::DecoratorSettings;

/// Cache mapping component types to their built-in descriptors.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    builtins: RwLock<HashMap<ComponentType, Arc<ComponentDescriptor>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached descriptor for `component_type`, if one has been resolved.
    pub fn lookup(&self, component_type: ComponentType) -> Option<Arc<ComponentDescriptor>> {
        self.builtins.read().get(&component_type).cloned()
    }

    /// Resolve the descriptor for a component instance.
    ///
    /// Resolution order:
    /// 1. the registry cache,
    /// 2. the settings' built-in catalog,
    /// 3. the settings' custom catalog,
    /// 4. registering the type as custom, then retrying step 3.
    ///
    /// Only built-in results are cached. Returns `None` if every step fails;
    /// callers skip such components.
    pub fn get_or_register<S>(
        &self,
        component: &dyn Component,
        settings: &mut S,
    ) -> Option<Arc<ComponentDescriptor>>
    where
        S: DecoratorSettings + ?Sized,
    {
        let component_type = component.component_type();
        if let Some(descriptor) = self.lookup(component_type) {
            return Some(descriptor);
        }

        let resolved = settings
            .builtin_descriptor(component_type)
            .or_else(|| settings.custom_descriptor(component_type))
            .or_else(|| {
                if settings.register_custom(component) {
                    settings.custom_descriptor(component_type)
                } else {
                    None
                }
            });

        let Some(descriptor) = resolved else {
            log::trace!(
                "No descriptor for component type {}",
                component_type.path()
            );
            return None;
        };

        if !descriptor.is_built_in() {
            return Some(descriptor);
        }

        // First insertion wins; cached descriptors are never replaced.
        let mut builtins = self.builtins.write();
        Some(builtins.entry(component_type).or_insert(descriptor).clone())
    }

    /// Number of cached built-in descriptors.
    pub fn len(&self) -> usize {
        self.builtins.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.builtins.read().is_empty()
    }
}
