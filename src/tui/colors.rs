// Color palette shared by every view
use ratatui::style::Color;

/// Archive / destructive actions
pub const ACCENT_PRIMARY: Color = Color::Rgb(235, 87, 87);
/// Skip / positive actions
pub const ACCENT_SECONDARY: Color = Color::Rgb(111, 207, 151);
/// Titles and selection
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(242, 201, 76);
/// Moved-to-folder items
pub const ACCENT_MOVED: Color = Color::Rgb(86, 204, 242);

pub const TEXT_PRIMARY: Color = Color::Rgb(230, 230, 230);
pub const TEXT_SECONDARY: Color = Color::Rgb(140, 140, 150);

pub const BG_DARK: Color = Color::Rgb(24, 24, 30);
pub const BG_SELECTED: Color = Color::Rgb(50, 50, 64);
pub const BORDER_COLOR: Color = Color::Rgb(80, 80, 96);
