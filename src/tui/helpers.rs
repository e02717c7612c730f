// Rendering helpers that do not depend on a frame
use super::colors::{ACCENT_MOVED, ACCENT_PRIMARY, ACCENT_SECONDARY, TEXT_SECONDARY};
use crate::domain::ItemStatus;
use image::imageops::{self, FilterType};
use image::RgbImage;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Calculates new dimensions to fit an image within max width and height while preserving aspect ratio
pub fn calculate_resize_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if original_width == 0 || original_height == 0 {
        return (0, 0);
    }

    let width_ratio = max_width as f64 / original_width as f64;
    let height_ratio = max_height as f64 / original_height as f64;

    let ratio = width_ratio.min(height_ratio);

    if ratio >= 1.0 {
        (original_width, original_height)
    } else {
        let new_width = (original_width as f64 * ratio) as u32;
        let new_height = (original_height as f64 * ratio) as u32;
        (new_width, new_height)
    }
}

/// Converts an image to styled lines using half-block characters.
///
/// Each cell is an upper half block (▀) whose foreground is the upper pixel
/// and background the lower pixel, so one terminal row shows two pixel rows.
/// The image is scaled to fit `cols` x `rows` cells.
pub fn image_to_halfblock_lines(img: &RgbImage, cols: u16, rows: u16) -> Vec<Line<'static>> {
    let (width, height) = calculate_resize_dimensions(
        img.width(),
        img.height(),
        cols as u32,
        rows as u32 * 2,
    );
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let height = if height % 2 == 0 { height } else { height + 1 };
    let img = imageops::resize(img, width, height, FilterType::Triangle);

    let mut lines = Vec::with_capacity((height / 2) as usize);
    for y in (0..height).step_by(2) {
        let spans: Vec<Span<'static>> = (0..width)
            .map(|x| {
                let upper = img.get_pixel(x, y);
                let lower = img.get_pixel(x, y + 1);
                let style = Style::default()
                    .fg(Color::Rgb(upper[0], upper[1], upper[2]))
                    .bg(Color::Rgb(lower[0], lower[1], lower[2]));
                Span::styled("▀", style)
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines
}

/// Marker glyph and color for an item status
pub fn status_marker(status: ItemStatus) -> (&'static str, Color) {
    match status {
        ItemStatus::Unprocessed => ("○", TEXT_SECONDARY),
        ItemStatus::Archived => ("✗", ACCENT_PRIMARY),
        ItemStatus::Skipped => ("✓", ACCENT_SECONDARY),
        ItemStatus::Moved => ("→", ACCENT_MOVED),
    }
}

/// Shortens `name` to at most `max` characters, keeping the extension visible
pub fn truncate_name(name: &str, max: usize) -> String {
    let count = name.chars().count();
    if count <= max {
        return name.to_string();
    }
    if max <= 1 {
        return "…".chars().take(max).collect();
    }

    let tail: String = match name.rfind('.') {
        Some(dot) if name[dot..].chars().count() < max / 2 => name[dot..].to_string(),
        _ => String::new(),
    };
    let keep = max - 1 - tail.chars().count();
    let head: String = name.chars().take(keep).collect();
    format!("{}…{}", head, tail)
}

/// Window of `len` items of size `width` that keeps `selected` visible, roughly centered
pub fn visible_window(len: usize, selected: usize, width: usize) -> std::ops::Range<usize> {
    if len <= width {
        return 0..len;
    }
    let start = selected
        .saturating_sub(width / 2)
        .min(len - width);
    start..start + width
}
