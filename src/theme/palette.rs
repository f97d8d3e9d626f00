use bevy::prelude::*;

/// Dark text for light panels
pub const LABEL_TEXT: Color = Color::srgb(0.1, 0.1, 0.15);

/// Deep blue for headers
pub const HEADER_TEXT: Color = Color::srgb(0.05, 0.2, 0.4);

/// White text on blue buttons
pub const BUTTON_TEXT: Color = Color::srgb(0.98, 0.98, 1.0);
/// #2a8fbd
pub const BUTTON_BACKGROUND: Color = Color::srgb(0.165, 0.561, 0.741);
/// #47b3e0
pub const BUTTON_HOVERED_BACKGROUND: Color = Color::srgb(0.278, 0.702, 0.878);
/// #1d6a8f
pub const BUTTON_PRESSED_BACKGROUND: Color = Color::srgb(0.114, 0.416, 0.561);

/// Sandy off-white behind full-screen menus
pub const MENU_BACKGROUND: Color = Color::srgb(0.96, 0.93, 0.85);

/// Translucent white behind HUD elements
pub const PANEL_BACKGROUND: Color = Color::srgba(1.0, 1.0, 1.0, 0.8);
pub const PANEL_BORDER: Color = Color::srgb(0.05, 0.2, 0.4);

pub const PROGRESS_TRACK: Color = Color::srgba(0.0, 0.0, 0.0, 0.25);
/// Coral
pub const PROGRESS_FILL: Color = Color::srgb(1.0, 0.5, 0.31);

/// Gold with a hint of orange
pub const BANNER_TEXT: Color = Color::srgb(1.0, 0.78, 0.1);
