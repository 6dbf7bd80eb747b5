//! Component icon strip for hierarchy rows, built on [egui](https://docs.rs/egui).
//!
//! Every row of a hierarchy tree view can show one small icon per attached
//! component, right-aligned and clipped at the row's label. Icons react to
//! clicks:
//!
//! - **secondary click** — object context menu ([`ObjectContextMenu`]),
//! - **Ctrl/Cmd + primary click** — floating inspector ([`InspectorPopup`]),
//! - **primary click** — toggle a behaviour's enabled flag.
//!
//! Component types are resolved to [`ComponentDescriptor`]s through a shared
//! [`TypeRegistry`]. Built-in descriptors are cached there; user scripts are
//! resolved through the [`DecoratorSettings`] every pass.
//!
//! # Usage
//!
//! ```ignore
//! use redlilium_hierarchy_icons::*;
//!
//! // At editor startup
//! let registry = Arc::new(TypeRegistry::new());
//! let menu = Arc::new(ComponentContextMenu::new());
//! let mut renderer = IconRenderer::new(registry, menu.clone());
//! let mut popup = InspectorPopup::default();
//! let mut settings = HierarchySettings::load(Path::new("hierarchy.toml"))?;
//! settings.register_builtin::<Transform>("Transform", ComponentIcon::glyph("✥"));
//!
//! // For every row, every frame
//! if drawer_is_enabled(&settings, &entity) {
//!     renderer.on_draw_init(&entity, &settings);
//!     let reserved = renderer.grid_count() as f32 * DEFAULT_CELL_SIZE;
//!     // ... draw the label leaving `reserved` points free on the right ...
//!     renderer.draw_info(ui, &RowGeometry::new(row, label), &entity, &mut settings, &mut popup);
//! }
//!
//! // Once per frame, after the hierarchy
//! menu.show(ctx, &mut popup);
//! popup.show(ctx);
//! ```

mod component;
mod context_menu;
mod descriptor;
mod interaction;
mod popup;
mod registry;
mod renderer;
mod settings;
pub mod theme;

pub use component::{
    Behaviour, Component, ComponentRef, ComponentType, HierarchyEntity, WeakComponentRef,
    short_type_name,
};
pub use context_menu::ComponentContextMenu;
pub use descriptor::{ComponentDescriptor, ComponentIcon};
pub use interaction::{
    IconAction, InteractionHandler, ObjectContextMenu, PointerClick, toggle_enabled,
};
pub use popup::{ComponentEditor, EditorFactory, EditorView, ImmediateEditors, InspectorPopup};
pub use registry::TypeRegistry;
pub use renderer::{
    CellKind, DEFAULT_CELL_SIZE, IconCell, IconRenderer, RowGeometry, RowState,
    drawer_is_enabled,
};
pub use settings::{
    ComponentToggles, DecoratorSettings, EntityStyle, HierarchySettings, ScriptEntry,
    SettingsError, SettingsResult,
};
