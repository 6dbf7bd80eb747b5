//! Host-side component model consumed by the hierarchy decorator.
//!
//! Components are owned by the host scene. The decorator only ever holds
//! [`ComponentRef`] clones for the duration of one row pass, and
//! [`WeakComponentRef`] for anything that outlives a frame (the inspector
//! popup, a pending context menu).

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Runtime identity of a component type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentType {
    id: TypeId,
    path: &'static str,
}

impl ComponentType {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully-qualified type path, e.g. `"game::physics::Collider"`.
    ///
    /// Persisted settings refer to types by this path.
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Short type name for display, e.g. `"Collider"`.
    pub fn name(&self) -> &'static str {
        short_type_name(self.path)
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentType({})", self.path)
    }
}

/// Extracts the short type name from a fully-qualified Rust type path.
///
/// e.g. `"game::scripts::PlayerController"` → `"PlayerController"`
pub fn short_type_name(full: &str) -> &str {
    // Generic arguments may contain `::` themselves.
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Enable/disable capability of a component.
pub trait Behaviour {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
}

/// A component instance attached to a hierarchy entity.
pub trait Component: Any + Send + Sync {
    fn component_type(&self) -> ComponentType;

    /// Returns the behaviour view if this component can be enabled/disabled.
    fn as_behaviour(&self) -> Option<&dyn Behaviour> {
        None
    }

    fn as_behaviour_mut(&mut self) -> Option<&mut dyn Behaviour> {
        None
    }

    /// Script asset backing a user-defined component, if any.
    fn script(&self) -> Option<&str> {
        None
    }

    /// Immediate-mode property editor for this component.
    fn inspect_ui(&mut self, ui: &mut egui::Ui) {
        ui.label(
            egui::RichText::new("No inspector UI available.")
                .weak()
                .italics(),
        );
    }
}

/// Strong handle to a host-owned component.
#[derive(Clone)]
pub struct ComponentRef {
    owner: Arc<str>,
    inner: Arc<RwLock<dyn Component>>,
}

impl ComponentRef {
    /// Wraps a component owned by the entity named `owner`.
    pub fn new<C: Component>(owner: impl Into<Arc<str>>, component: C) -> Self {
        let inner: Arc<RwLock<dyn Component>> = Arc::new(RwLock::new(component));
        Self {
            owner: owner.into(),
            inner,
        }
    }

    /// Name of the entity this component is attached to.
    pub fn owner_name(&self) -> &str {
        &self.owner
    }

    pub fn read(&self) -> RwLockReadGuard<'_, dyn Component> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, dyn Component> {
        self.inner.write()
    }

    pub fn component_type(&self) -> ComponentType {
        self.inner.read().component_type()
    }

    /// `Some(enabled)` for behaviours, `None` otherwise.
    pub fn behaviour_enabled(&self) -> Option<bool> {
        self.inner.read().as_behaviour().map(Behaviour::is_enabled)
    }

    pub fn downgrade(&self) -> WeakComponentRef {
        WeakComponentRef {
            owner: self.owner.clone(),
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn ptr_eq(&self, other: &ComponentRef) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("owner", &&*self.owner)
            .field(
                "type",
                &self.inner.try_read().map(|c| c.component_type()),
            )
            .finish()
    }
}

/// Non-owning handle; upgrading fails once the host drops the component.
#[derive(Clone)]
pub struct WeakComponentRef {
    owner: Arc<str>,
    inner: Weak<RwLock<dyn Component>>,
}

impl WeakComponentRef {
    pub fn upgrade(&self) -> Option<ComponentRef> {
        self.inner.upgrade().map(|inner| ComponentRef {
            owner: self.owner.clone(),
            inner,
        })
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn owner_name(&self) -> &str {
        &self.owner
    }
}

impl fmt::Debug for WeakComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakComponentRef")
            .field("owner", &&*self.owner)
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// The subject of one hierarchy row.
pub trait HierarchyEntity {
    fn name(&self) -> &str;

    /// Attached components in attachment order. `None` marks a slot whose
    /// script could not be loaded.
    fn components(&self) -> Vec<Option<ComponentRef>>;
}
