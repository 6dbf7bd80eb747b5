//! Stock egui implementation of [`ObjectContextMenu`].

use parking_lot::Mutex;

use crate::component::{ComponentRef, WeakComponentRef};
use crate::interaction::{ObjectContextMenu, toggle_enabled};
use crate::popup::InspectorPopup;

struct PendingMenu {
    anchor: egui::Rect,
    component: WeakComponentRef,
}

/// Component context menu drawn as a foreground area below the clicked cell.
///
/// Icon clicks only record the request; the host calls [`show`](Self::show)
/// once per frame, after the hierarchy has been drawn.
#[derive(Default)]
pub struct ComponentContextMenu {
    pending: Mutex<Option<PendingMenu>>,
}

impl ComponentContextMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.pending.lock().is_some()
    }

    pub fn close(&self) {
        self.pending.lock().take();
    }

    pub fn show(&self, ctx: &egui::Context, popup: &mut InspectorPopup) {
        let (anchor, component) = {
            let pending = self.pending.lock();
            let Some(menu) = pending.as_ref() else {
                return;
            };
            (menu.anchor, menu.component.upgrade())
        };
        let Some(component) = component else {
            self.close();
            return;
        };

        let mut close = false;
        let area = egui::Area::new(egui::Id::new("redlilium_component_context_menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(anchor.left_bottom())
            .show(ctx, |ui| {
                egui::Frame::menu(ui.style()).show(ui, |ui| {
                    close = menu_items(ui, &component, popup);
                });
            });

        if close || area.response.clicked_elsewhere() {
            self.close();
        }
    }
}

/// Returns `true` once an item was picked.
fn menu_items(ui: &mut egui::Ui, component: &ComponentRef, popup: &mut InspectorPopup) -> bool {
    let type_name = component.component_type().name();
    ui.label(egui::RichText::new(type_name).strong());
    ui.separator();

    if ui.button("Inspect").clicked() {
        popup.show_component(&component.downgrade());
        return true;
    }

    if let Some(enabled) = component.behaviour_enabled() {
        let label = if enabled { "Disable" } else { "Enable" };
        if ui.button(label).clicked() {
            toggle_enabled(component);
            return true;
        }
    }

    if ui.button("Copy Type Name").clicked() {
        ui.ctx().copy_text(type_name.to_owned());
        return true;
    }

    false
}

impl ObjectContextMenu for ComponentContextMenu {
    fn show_object_context_menu(&self, anchor: egui::Rect, component: &ComponentRef) {
        *self.pending.lock() = Some(PendingMenu {
            anchor,
            component: component.downgrade(),
        });
    }
}
