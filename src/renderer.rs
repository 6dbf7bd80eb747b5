//! Per-row component icon strip.
//!
//! For every hierarchy row the host calls, in order:
//!
//! 1. [`drawer_is_enabled`] — skip the strip entirely for this row,
//! 2. [`IconRenderer::on_draw_init`] — snapshot the entity's components,
//! 3. [`IconRenderer::grid_count`] — reserve horizontal space,
//! 4. [`IconRenderer::draw_info`] — lay out, paint and handle clicks.
//!
//! Icons are placed right-to-left from the row's right edge, one square cell
//! each, in attachment order. A cell that would reach into the label region
//! is dropped, which caps the strip at whatever width is available.
//!
//! [`IconRenderer::plan_row`] runs the same policy and layout without egui,
//! so the placement can be inspected (and tested) on its own.

use std::sync::Arc;

use egui::{Rect, pos2, vec2};

use crate::component::{ComponentRef, HierarchyEntity};
use crate::descriptor::{ComponentDescriptor, ComponentIcon};
use crate::interaction::{InteractionHandler, ObjectContextMenu, PointerClick};
use crate::popup::InspectorPopup;
use crate::registry::TypeRegistry;
use crate::settings::{ComponentToggles, DecoratorSettings};
use crate::theme;

/// Side length of an icon cell, in points.
pub const DEFAULT_CELL_SIZE: f32 = 16.0;

/// Whether the icon strip should be drawn for `entity` at all.
pub fn drawer_is_enabled<S>(settings: &S, entity: &dyn HierarchyEntity) -> bool
where
    S: DecoratorSettings + ?Sized,
{
    if settings.icons_hidden_by_style(entity.name()) {
        return false;
    }
    settings.toggles().enabled
}

/// Geometry of one hierarchy row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowGeometry {
    /// Full row rectangle.
    pub row: Rect,
    /// Region reserved for the entity label; icons never cross its right edge.
    pub label: Rect,
    pub cell_size: f32,
}

impl RowGeometry {
    pub fn new(row: Rect, label: Rect) -> Self {
        Self {
            row,
            label,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Cell `index`, counted from the right edge of the row.
    pub fn cell(&self, index: usize) -> Rect {
        let right = self.row.right() - index as f32 * self.cell_size;
        Rect::from_min_size(
            pos2(right - self.cell_size, self.row.top()),
            vec2(self.cell_size, self.cell_size),
        )
    }

    fn overlaps_label(&self, cell: Rect) -> bool {
        cell.left() < self.label.right()
    }
}

/// What a planned cell shows.
#[derive(Debug, Clone)]
pub enum CellKind {
    Component {
        descriptor: Arc<ComponentDescriptor>,
        component: ComponentRef,
    },
    /// All user scripts of the row collapsed into one icon.
    StackedScripts,
    /// A component slot whose script could not be loaded.
    MissingWarning,
}

/// One placed icon.
#[derive(Debug, Clone)]
pub struct IconCell {
    pub rect: Rect,
    pub kind: CellKind,
    pub tooltip: String,
}

impl IconCell {
    pub fn component(&self) -> Option<&ComponentRef> {
        match &self.kind {
            CellKind::Component { component, .. } => Some(component),
            _ => None,
        }
    }

    pub fn icon(&self) -> ComponentIcon {
        match &self.kind {
            CellKind::Component { descriptor, .. } => descriptor.icon().clone(),
            CellKind::StackedScripts => ComponentIcon::glyph(theme::SCRIPT_ICON),
            CellKind::MissingWarning => ComponentIcon::glyph(theme::WARNING_ICON),
        }
    }
}

/// Transient state of the row being drawn.
#[derive(Debug, Default)]
pub struct RowState {
    snapshot: Vec<Option<ComponentRef>>,
    attached: usize,
    rendered: usize,
    visible: Vec<Arc<ComponentDescriptor>>,
    has_behaviour: bool,
    drawn: bool,
}

impl RowState {
    fn reset(&mut self, snapshot: Vec<Option<ComponentRef>>) {
        self.attached = snapshot.len();
        self.has_behaviour = snapshot
            .iter()
            .flatten()
            .any(|component| component.behaviour_enabled().is_some());
        self.snapshot = snapshot;
        self.rendered = 0;
        self.visible.clear();
        self.drawn = false;
    }

    /// Place the next cell unless it would overlap the label.
    fn place(&mut self, geometry: &RowGeometry) -> Option<Rect> {
        let rect = geometry.cell(self.rendered);
        if geometry.overlaps_label(rect) {
            return None;
        }
        self.rendered += 1;
        Some(rect)
    }

    /// Cells drawn so far; `attached` components before the first pass.
    pub fn grid_count(&self) -> usize {
        if self.drawn {
            self.rendered
        } else {
            self.attached
        }
    }

    /// Descriptors drawn as individual icons, in attachment order.
    pub fn visible(&self) -> &[Arc<ComponentDescriptor>] {
        &self.visible
    }

    /// Whether any attached component can be enabled/disabled.
    pub fn has_behaviour(&self) -> bool {
        self.has_behaviour
    }
}

/// Draws the component icon strip of hierarchy rows.
pub struct IconRenderer {
    registry: Arc<TypeRegistry>,
    interaction: InteractionHandler,
    row: RowState,
}

impl IconRenderer {
    pub fn new(registry: Arc<TypeRegistry>, context_menu: Arc<dyn ObjectContextMenu>) -> Self {
        Self {
            registry,
            interaction: InteractionHandler::new(context_menu),
            row: RowState::default(),
        }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn row(&self) -> &RowState {
        &self.row
    }

    /// Start a new row: snapshot the entity's components and reset counters.
    pub fn on_draw_init<S>(&mut self, entity: &dyn HierarchyEntity, _settings: &S)
    where
        S: DecoratorSettings + ?Sized,
    {
        self.row.reset(entity.components());
    }

    /// Horizontal cells the strip occupies. Before the row has been drawn
    /// this is the raw number of attached components.
    pub fn grid_count(&self) -> usize {
        self.row.grid_count()
    }

    /// Apply visibility policy and layout to the current snapshot.
    ///
    /// Consumes the snapshot: afterwards the renderer holds no component
    /// handles, only the counts. Each pass must be preceded by
    /// [`on_draw_init`](Self::on_draw_init); a second pass over the same
    /// snapshot plans nothing and keeps the counts of the first.
    pub fn plan_row<S>(&mut self, geometry: &RowGeometry, settings: &mut S) -> Vec<IconCell>
    where
        S: DecoratorSettings + ?Sized,
    {
        if self.row.drawn {
            log::warn!("Icon row planned twice without on_draw_init");
            return Vec::new();
        }

        let toggles = settings.toggles();
        let snapshot = std::mem::take(&mut self.row.snapshot);
        let mut cells = Vec::new();
        let mut stacked = String::new();
        let mut aborted = false;

        for slot in snapshot {
            let Some(component) = slot else {
                if toggles.show_missing_script_warning {
                    cells.push(self.missing_warning(geometry));
                    aborted = true;
                    break;
                }
                continue;
            };

            let descriptor = self
                .registry
                .get_or_register(&*component.read(), settings);
            let Some(descriptor) = descriptor else {
                continue;
            };

            if descriptor.is_built_in() {
                if settings.is_excluded(descriptor.component_type()) {
                    continue;
                }
                if !toggles.display_builtin && !descriptor.is_shown() {
                    continue;
                }
            } else if toggles.stack_scripts {
                stacked.push_str(descriptor.display_name());
                stacked.push('\n');
                continue;
            } else if !toggles.display_mono_scripts
                && (descriptor.script().is_none() || !descriptor.is_shown())
            {
                continue;
            }

            if let Some(rect) = self.row.place(geometry) {
                self.row.visible.push(descriptor.clone());
                cells.push(IconCell {
                    rect,
                    tooltip: descriptor.display_name().to_owned(),
                    kind: CellKind::Component {
                        descriptor,
                        component,
                    },
                });
            }
        }

        let tooltip = stacked.trim();
        if !aborted && toggles.stack_scripts && !tooltip.is_empty() {
            if let Some(rect) = self.row.place(geometry) {
                cells.push(IconCell {
                    rect,
                    kind: CellKind::StackedScripts,
                    tooltip: tooltip.to_owned(),
                });
            }
        }

        self.row.drawn = true;
        cells
    }

    /// The warning cell ignores the label region so it is always visible.
    fn missing_warning(&mut self, geometry: &RowGeometry) -> IconCell {
        let rect = geometry.cell(self.row.rendered);
        self.row.rendered += 1;
        IconCell {
            rect,
            kind: CellKind::MissingWarning,
            tooltip: theme::MISSING_SCRIPT_TOOLTIP.to_owned(),
        }
    }

    /// Draw the icon strip of the row started by [`on_draw_init`](Self::on_draw_init)
    /// and act on clicks.
    pub fn draw_info<S>(
        &mut self,
        ui: &mut egui::Ui,
        geometry: &RowGeometry,
        entity: &dyn HierarchyEntity,
        settings: &mut S,
        popup: &mut InspectorPopup,
    ) where
        S: DecoratorSettings + ?Sized,
    {
        let cells = self.plan_row(geometry, settings);
        let toggles = settings.toggles();

        for cell in &cells {
            let Some(click) = paint_cell(ui, cell, &toggles) else {
                continue;
            };
            if let Some(action) = self.interaction.resolve(click, cell.component(), &toggles) {
                log::debug!("{}: {:?} on icon", entity.name(), click);
                self.interaction.dispatch(action, cell.rect, popup);
            }
        }
    }
}

/// Paint one cell and report a click on it.
fn paint_cell(ui: &mut egui::Ui, cell: &IconCell, toggles: &ComponentToggles) -> Option<PointerClick> {
    if let CellKind::MissingWarning = cell.kind {
        let label = egui::Label::new(
            egui::RichText::new(theme::WARNING_ICON).color(theme::WARNING),
        );
        ui.put(cell.rect, label).on_hover_text(cell.tooltip.as_str());
        return None;
    }

    let grayed = toggles.grayed_icon
        && cell
            .component()
            .and_then(ComponentRef::behaviour_enabled)
            .is_some_and(|enabled| !enabled);

    // The tint only lives inside this scope.
    let response = ui
        .scope(|ui| {
            if grayed {
                ui.visuals_mut().override_text_color = Some(theme::DISABLED_ICON);
            }
            let tint = ui
                .visuals()
                .override_text_color
                .unwrap_or(egui::Color32::WHITE);
            let button = match cell.icon() {
                ComponentIcon::Glyph(glyph) => egui::Button::new(glyph),
                ComponentIcon::Uri(uri) => egui::Button::image(
                    egui::Image::from_uri(uri)
                        .tint(tint)
                        .fit_to_exact_size(cell.rect.size()),
                ),
            };
            ui.put(cell.rect, button.frame(false))
        })
        .inner
        .on_hover_text(cell.tooltip.as_str());

    PointerClick::from_response(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Behaviour, Component, ComponentType};
    use crate::settings::HierarchySettings;

    struct Transform;
    impl Component for Transform {
        fn component_type(&self) -> ComponentType {
            ComponentType::of::<Self>()
        }
    }

    struct Camera;
    impl Component for Camera {
        fn component_type(&self) -> ComponentType {
            ComponentType::of::<Self>()
        }
    }

    struct Spin {
        enabled: bool,
    }

    impl Behaviour for Spin {
        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }
    }

    impl Component for Spin {
        fn component_type(&self) -> ComponentType {
            ComponentType::of::<Self>()
        }

        fn as_behaviour(&self) -> Option<&dyn Behaviour> {
            Some(self)
        }

        fn as_behaviour_mut(&mut self) -> Option<&mut dyn Behaviour> {
            Some(self)
        }
    }

    struct Row {
        name: &'static str,
        components: Vec<Option<ComponentRef>>,
    }

    impl HierarchyEntity for Row {
        fn name(&self) -> &str {
            self.name
        }

        fn components(&self) -> Vec<Option<ComponentRef>> {
            self.components.clone()
        }
    }

    struct NoMenu;
    impl ObjectContextMenu for NoMenu {
        fn show_object_context_menu(&self, _anchor: Rect, _component: &ComponentRef) {}
    }

    fn settings() -> HierarchySettings {
        let mut settings = HierarchySettings::new();
        settings
            .register_builtin::<Transform>("Transform", ComponentIcon::glyph("✥"))
            .register_builtin::<Camera>("Camera", ComponentIcon::glyph("🎥"));
        settings
    }

    fn renderer() -> IconRenderer {
        IconRenderer::new(Arc::new(TypeRegistry::new()), Arc::new(NoMenu))
    }

    /// 200pt row with a 100pt label: room for six 16pt cells.
    fn geometry() -> RowGeometry {
        RowGeometry::new(
            Rect::from_min_size(pos2(0.0, 0.0), vec2(200.0, 16.0)),
            Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 16.0)),
        )
    }

    fn row(components: Vec<Option<ComponentRef>>) -> Row {
        Row {
            name: "Node",
            components,
        }
    }

    #[test]
    fn cells_are_placed_right_to_left() {
        let geometry = geometry();
        assert_eq!(geometry.cell(0), Rect::from_min_max(pos2(184.0, 0.0), pos2(200.0, 16.0)));
        assert_eq!(geometry.cell(2), Rect::from_min_max(pos2(152.0, 0.0), pos2(168.0, 16.0)));
    }

    #[test]
    fn grid_count_is_raw_count_until_drawn() {
        let mut settings = settings();
        settings.exclude::<Transform>();
        let entity = row(vec![
            Some(ComponentRef::new("Node", Transform)),
            Some(ComponentRef::new("Node", Camera)),
        ]);

        let mut renderer = renderer();
        renderer.on_draw_init(&entity, &settings);
        assert_eq!(renderer.grid_count(), 2);

        let cells = renderer.plan_row(&geometry(), &mut settings);
        assert_eq!(cells.len(), 1);
        assert_eq!(renderer.grid_count(), 1);
        assert_eq!(cells[0].tooltip, "Camera");
    }

    #[test]
    fn overflow_stops_at_label_region() {
        let mut settings = settings();
        let entity = row(
            (0..10)
                .map(|_| Some(ComponentRef::new("Node", Transform)))
                .collect(),
        );

        let mut renderer = renderer();
        renderer.on_draw_init(&entity, &settings);
        let cells = renderer.plan_row(&geometry(), &mut settings);

        assert_eq!(cells.len(), 6);
        assert_eq!(renderer.grid_count(), 6);
        assert!(cells.iter().all(|c| c.rect.left() >= 100.0));
    }

    #[test]
    fn missing_slot_without_warning_is_skipped() {
        let mut settings = settings();
        settings.components.show_missing_script_warning = false;
        let entity = row(vec![None, Some(ComponentRef::new("Node", Camera))]);

        let mut renderer = renderer();
        renderer.on_draw_init(&entity, &settings);
        let cells = renderer.plan_row(&geometry(), &mut settings);

        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].tooltip, "Camera");
    }

    #[test]
    fn hidden_builtins_need_display_builtin() {
        let mut settings = HierarchySettings::new();
        settings
            .hidden_builtins
            .insert(ComponentType::of::<Camera>().path().into());
        settings
            .register_builtin::<Transform>("Transform", ComponentIcon::glyph("✥"))
            .register_builtin::<Camera>("Camera", ComponentIcon::glyph("🎥"));
        settings.components.display_builtin = false;
        let entity = row(vec![
            Some(ComponentRef::new("Node", Transform)),
            Some(ComponentRef::new("Node", Camera)),
        ]);

        let mut renderer = renderer();
        renderer.on_draw_init(&entity, &settings);
        let cells = renderer.plan_row(&geometry(), &mut settings);

        assert_eq!(cells.len(), 1);
        assert_eq!(renderer.row().visible()[0].display_name(), "Transform");
    }

    #[test]
    fn unlisted_scripts_need_display_mono_scripts() {
        let mut settings = settings();
        settings.components.display_mono_scripts = false;
        let entity = row(vec![Some(ComponentRef::new("Node", Spin { enabled: true }))]);

        let mut renderer = renderer();
        renderer.on_draw_init(&entity, &settings);
        // Registered on the fly without a script asset, so it is hidden.
        assert!(renderer.plan_row(&geometry(), &mut settings).is_empty());
        assert!(renderer.row().has_behaviour());

        settings.scripts[0].script = Some("scripts/spin.rs".into());
        renderer.on_draw_init(&entity, &settings);
        assert_eq!(renderer.plan_row(&geometry(), &mut settings).len(), 1);
    }

    #[test]
    fn snapshot_is_released_after_planning() {
        let mut settings = settings();
        let component = ComponentRef::new("Node", Camera);
        let weak = component.downgrade();
        let entity = row(vec![Some(component)]);

        let mut renderer = renderer();
        renderer.on_draw_init(&entity, &settings);
        let cells = renderer.plan_row(&geometry(), &mut settings);
        drop(cells);
        drop(entity);

        assert!(!weak.is_alive());
        assert_eq!(renderer.grid_count(), 1);
    }

    #[test]
    fn has_behaviour_covers_slots_after_an_abort() {
        let mut settings = settings();
        let entity = row(vec![
            None,
            Some(ComponentRef::new("Node", Spin { enabled: true })),
        ]);

        let mut renderer = renderer();
        renderer.on_draw_init(&entity, &settings);
        assert!(renderer.row().has_behaviour());

        let cells = renderer.plan_row(&geometry(), &mut settings);
        assert!(matches!(cells[0].kind, CellKind::MissingWarning));
        assert_eq!(cells.len(), 1);
        assert!(renderer.row().has_behaviour());

        renderer.on_draw_init(&row(vec![Some(ComponentRef::new("Node", Camera))]), &settings);
        assert!(!renderer.row().has_behaviour());
    }

    #[test]
    fn repeated_pass_keeps_previous_counts() {
        let mut settings = settings();
        let entity = row(vec![
            Some(ComponentRef::new("Node", Transform)),
            Some(ComponentRef::new("Node", Camera)),
        ]);

        let mut renderer = renderer();
        renderer.on_draw_init(&entity, &settings);
        assert_eq!(renderer.plan_row(&geometry(), &mut settings).len(), 2);

        assert!(renderer.plan_row(&geometry(), &mut settings).is_empty());
        assert_eq!(renderer.grid_count(), 2);
        assert_eq!(renderer.row().visible().len(), 2);

        renderer.on_draw_init(&entity, &settings);
        assert_eq!(renderer.plan_row(&geometry(), &mut settings).len(), 2);
    }

    /// Text colour recorded in the galley of every painted string.
    fn text_colors(output: &egui::FullOutput) -> Vec<(String, egui::Color32)> {
        output
            .shapes
            .iter()
            .filter_map(|clipped| match &clipped.shape {
                egui::Shape::Text(text) => {
                    let galley = &text.galley;
                    let color = galley.job.sections.first()?.format.color;
                    Some((galley.job.text.clone(), color))
                }
                _ => None,
            })
            .collect()
    }

    fn color_of(colors: &[(String, egui::Color32)], text: &str) -> egui::Color32 {
        colors
            .iter()
            .find(|(painted, _)| painted == text)
            .map(|(_, color)| *color)
            .unwrap_or_else(|| panic!("{text:?} was not painted"))
    }

    #[test]
    fn disabled_behaviour_is_tinted_until_enabled() {
        let mut settings = settings();
        let component = ComponentRef::new("Node", Spin { enabled: false });
        let entity = row(vec![Some(component.clone())]);
        let mut renderer = renderer();
        let mut popup = InspectorPopup::default();
        let ctx = egui::Context::default();

        let mut draw = |renderer: &mut IconRenderer, settings: &mut HierarchySettings| {
            ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    renderer.on_draw_init(&entity, &*settings);
                    renderer.draw_info(ui, &geometry(), &entity, &mut *settings, &mut popup);
                    ui.label("after");
                });
            })
        };

        let colors = text_colors(&draw(&mut renderer, &mut settings));
        assert_eq!(color_of(&colors, theme::SCRIPT_ICON), theme::DISABLED_ICON);
        assert_ne!(color_of(&colors, "after"), theme::DISABLED_ICON);

        crate::interaction::toggle_enabled(&component);
        let colors = text_colors(&draw(&mut renderer, &mut settings));
        assert_ne!(color_of(&colors, theme::SCRIPT_ICON), theme::DISABLED_ICON);
        assert_ne!(color_of(&colors, "after"), theme::DISABLED_ICON);
    }

    #[test]
    fn tint_follows_grayed_icon_toggle() {
        let mut settings = settings();
        settings.components.grayed_icon = false;
        let entity = row(vec![Some(ComponentRef::new("Node", Spin { enabled: false }))]);
        let mut renderer = renderer();
        let mut popup = InspectorPopup::default();
        let ctx = egui::Context::default();

        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                renderer.on_draw_init(&entity, &settings);
                renderer.draw_info(ui, &geometry(), &entity, &mut settings, &mut popup);
            });
        });
        let colors = text_colors(&output);
        assert_ne!(color_of(&colors, theme::SCRIPT_ICON), theme::DISABLED_ICON);
    }

    #[test]
    fn style_and_master_switch_gate_the_drawer() {
        let mut settings = settings();
        settings.styles.push(crate::settings::EntityStyle {
            prefix: "==".into(),
            display_icons: false,
        });

        assert!(drawer_is_enabled(&settings, &row(vec![])));
        let header = Row {
            name: "== Environment ==",
            components: vec![],
        };
        assert!(!drawer_is_enabled(&settings, &header));

        settings.components.enabled = false;
        assert!(!drawer_is_enabled(&settings, &row(vec![])));
    }
}
