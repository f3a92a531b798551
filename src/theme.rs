//! Shared colors and styles
//!
//! One place for the accent palette and the key-hint styling used by every
//! help bar and dialog.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

/// Accent colors applied to suggested table icons
pub const ICON_PALETTE: [&str; 7] = [
    "#3B82F6", // blue
    "#10B981", // emerald
    "#F59E0B", // amber
    "#EF4444", // red
    "#8B5CF6", // violet
    "#EC4899", // pink
    "#14B8A6", // teal
];

/// Color of an icon before any suggestion has been applied
pub const DEFAULT_ICON_COLOR: &str = ICON_PALETTE[0];

/// Parse `#RRGGBB` (leading `#` optional) into a terminal color
pub fn hex_to_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Bold key label as used in help bars, e.g. ` q `
pub fn key_hint(key: &str, color: Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", key),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

pub fn title_style(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

/// Format a row count with thousands separators
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_color() {
        assert_eq!(hex_to_color("#3B82F6"), Some(Color::Rgb(0x3B, 0x82, 0xF6)));
        assert_eq!(hex_to_color("10b981"), Some(Color::Rgb(0x10, 0xB9, 0x81)));
        assert_eq!(hex_to_color("#fff"), None);
        assert_eq!(hex_to_color("#zzzzzz"), None);
    }

    #[test]
    fn test_palette_is_valid() {
        for hex in ICON_PALETTE {
            assert!(hex_to_color(hex).is_some(), "{} should parse", hex);
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
