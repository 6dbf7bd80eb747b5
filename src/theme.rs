//! Colors and glyphs used by row decorations.

use egui::Color32;

/// Tint for icons of disabled behaviours.
pub const DISABLED_ICON: Color32 = Color32::from_rgb(120, 129, 145);

pub const WARNING: Color32 = Color32::from_rgb(230, 185, 92);

/// Icon of the missing-script warning cell.
pub const WARNING_ICON: &str = "⚠";

/// Default icon for user scripts, also used for the stacked-scripts cell.
pub const SCRIPT_ICON: &str = "📜";

pub const MISSING_SCRIPT_TOOLTIP: &str = "Missing script";
