//! Floating inspector window for a single component.
//!
//! One [`InspectorPopup`] owns one shared window: opening another component
//! rebinds the window instead of spawning a new one. The bound component is
//! held weakly; [`InspectorPopup::poll`] (called by [`InspectorPopup::show`]
//! every frame) closes the window once the host has dropped it.

use std::sync::Arc;

use crate::component::{Component, ComponentType, WeakComponentRef};

/// Structured property editor for one component type.
pub trait ComponentEditor: Send {
    fn show(&mut self, ui: &mut egui::Ui, component: &mut dyn Component);
}

/// Result of building an editor for a component type.
pub enum EditorView {
    Structured(Box<dyn ComponentEditor>),
    /// No structured view; call [`Component::inspect_ui`] every frame.
    Immediate,
}

impl std::fmt::Debug for EditorView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structured(_) => f.write_str("EditorView::Structured"),
            Self::Immediate => f.write_str("EditorView::Immediate"),
        }
    }
}

/// Builds editor views for component types.
pub trait EditorFactory: Send + Sync {
    fn build_view(&self, component_type: ComponentType) -> EditorView;
}

/// Factory that always falls back to [`Component::inspect_ui`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateEditors;

impl EditorFactory for ImmediateEditors {
    fn build_view(&self, _component_type: ComponentType) -> EditorView {
        EditorView::Immediate
    }
}

struct PopupBinding {
    component: WeakComponentRef,
    title: String,
    view: EditorView,
}

/// The shared component inspector window.
pub struct InspectorPopup {
    editors: Arc<dyn EditorFactory>,
    binding: Option<PopupBinding>,
    window_id: egui::Id,
}

impl InspectorPopup {
    pub fn new(editors: Arc<dyn EditorFactory>) -> Self {
        Self {
            editors,
            binding: None,
            window_id: egui::Id::new("redlilium_component_inspector_popup"),
        }
    }

    /// Bind the window to `component`. No-op if it has already been released.
    pub fn show_component(&mut self, component: &WeakComponentRef) {
        let Some(live) = component.upgrade() else {
            log::debug!("Inspector target already released; not opening");
            return;
        };

        let component_type = live.component_type();
        let title = format!("{} - {}", live.owner_name(), component_type.name());
        let view = self.editors.build_view(component_type);
        log::debug!("Opening inspector \"{title}\" ({view:?})");

        // Replacing the binding drops the previous editor view.
        self.binding = Some(PopupBinding {
            component: component.clone(),
            title,
            view,
        });
    }

    /// Liveness check for the bound component. Closes the window and
    /// releases its editor view if the component is gone. Returns whether
    /// the window is still open.
    pub fn poll(&mut self) -> bool {
        let Some(binding) = &self.binding else {
            return false;
        };
        if binding.component.is_alive() {
            return true;
        }

        log::warn!(
            "Component behind inspector \"{}\" was released; closing",
            binding.title
        );
        self.close();
        false
    }

    /// Draw the window for this frame.
    pub fn show(&mut self, ctx: &egui::Context) {
        if !self.poll() {
            return;
        }
        let Some(binding) = self.binding.as_mut() else {
            return;
        };
        let Some(component) = binding.component.upgrade() else {
            return;
        };

        let mut open = true;
        egui::Window::new(binding.title.as_str())
            .id(self.window_id)
            .open(&mut open)
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let mut guard = component.write();
                        match &mut binding.view {
                            EditorView::Structured(editor) => editor.show(ui, &mut *guard),
                            EditorView::Immediate => guard.inspect_ui(ui),
                        }
                    });
            });

        if !open {
            self.close();
        }
    }

    /// Close the window and release the editor view.
    pub fn close(&mut self) {
        if let Some(binding) = self.binding.take() {
            log::debug!("Closing inspector \"{}\"", binding.title);
        }
    }

    pub fn is_open(&self) -> bool {
        self.binding.is_some()
    }

    pub fn title(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.title.as_str())
    }

    /// Weak handle of the component currently shown, if any.
    pub fn target(&self) -> Option<&WeakComponentRef> {
        self.binding.as_ref().map(|b| &b.component)
    }
}

impl Default for InspectorPopup {
    fn default() -> Self {
        Self::new(Arc::new(ImmediateEditors))
    }
}

impl std::fmt::Debug for InspectorPopup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InspectorPopup")
            .field("title", &self.title())
            .finish()
    }
}
