//! Click handling for component icon cells.
//!
//! The renderer turns an egui [`Response`](egui::Response) into a
//! [`PointerClick`]. [`InteractionHandler::resolve`] decides what that click
//! means for the component behind the cell, and
//! [`InteractionHandler::dispatch`] carries it out.

use std::sync::Arc;

use crate::component::ComponentRef;
use crate::popup::InspectorPopup;
use crate::settings::ComponentToggles;

/// Host capability that shows the object context menu for a component.
pub trait ObjectContextMenu: Send + Sync {
    fn show_object_context_menu(&self, anchor: egui::Rect, component: &ComponentRef);
}

/// A click on an icon cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerClick {
    /// Primary button; `command` is the platform action modifier (Ctrl / Cmd).
    Primary { command: bool },
    Secondary,
}

impl PointerClick {
    /// Read the click (if any) from a widget response.
    pub fn from_response(response: &egui::Response) -> Option<Self> {
        if response.secondary_clicked() {
            Some(Self::Secondary)
        } else if response.clicked() {
            let command = response.ctx.input(|i| i.modifiers.command);
            Some(Self::Primary { command })
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub enum IconAction {
    ShowContextMenu(ComponentRef),
    OpenInspector(ComponentRef),
    ToggleEnabled(ComponentRef),
}

/// Maps icon clicks to component actions.
pub struct InteractionHandler {
    context_menu: Arc<dyn ObjectContextMenu>,
}

impl InteractionHandler {
    pub fn new(context_menu: Arc<dyn ObjectContextMenu>) -> Self {
        Self { context_menu }
    }

    /// Decide what a click does. Cells without a component (the stacked
    /// scripts cell) never produce an action.
    pub fn resolve(
        &self,
        click: PointerClick,
        component: Option<&ComponentRef>,
        toggles: &ComponentToggles,
    ) -> Option<IconAction> {
        let component = component?;
        match click {
            PointerClick::Secondary => Some(IconAction::ShowContextMenu(component.clone())),
            PointerClick::Primary { command: true } => {
                Some(IconAction::OpenInspector(component.clone()))
            }
            PointerClick::Primary { command: false } => {
                let is_behaviour = component.behaviour_enabled().is_some();
                (is_behaviour && toggles.click_to_toggle)
                    .then(|| IconAction::ToggleEnabled(component.clone()))
            }
        }
    }

    /// Carry out an action. `anchor` is the clicked cell.
    pub fn dispatch(&self, action: IconAction, anchor: egui::Rect, popup: &mut InspectorPopup) {
        match action {
            IconAction::ShowContextMenu(component) => {
                log::debug!(
                    "Context menu for {} on {}",
                    component.component_type().name(),
                    component.owner_name()
                );
                self.context_menu
                    .show_object_context_menu(anchor, &component);
            }
            IconAction::OpenInspector(component) => {
                popup.show_component(&component.downgrade());
            }
            IconAction::ToggleEnabled(component) => {
                toggle_enabled(&component);
            }
        }
    }
}

/// Flip a behaviour's enabled flag. Returns the new state, or `None` if the
/// component is not a behaviour.
pub fn toggle_enabled(component: &ComponentRef) -> Option<bool> {
    let mut guard = component.write();
    let behaviour = guard.as_behaviour_mut()?;
    let enabled = !behaviour.is_enabled();
    behaviour.set_enabled(enabled);
    drop(guard);

    log::debug!(
        "{} on {} {}",
        component.component_type().name(),
        component.owner_name(),
        if enabled { "enabled" } else { "disabled" }
    );
    Some(enabled)
}
