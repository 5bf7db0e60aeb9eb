use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::model::EventCategory;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Resolve the theme once, honoring a preset name from stored
/// preferences. Call before the first `current()`.
pub fn init(preferred_preset: Option<&str>) {
    let _ = THEME.set(Theme::load(preferred_preset));
}

/// Get the active theme (falls back to the default palette when
/// `init` was never called, e.g. in tests).
pub fn current() -> &'static Theme {
    THEME.get_or_init(|| Theme::load(None))
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub highlight: Style,
    categories: [Color; 6],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            today: Style::new().fg(Color::Black).bg(Color::Yellow),
            selected: Style::new().fg(Color::Black).bg(Color::Cyan),
            header: Style::new().fg(Color::White).add_modifier(Modifier::BOLD),
            dim: Style::new().fg(Color::DarkGray),
            border: Style::new().fg(Color::Gray),
            status: Style::new().fg(Color::White).bg(Color::DarkGray),
            highlight: Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            categories: [
                Color::Blue,    // work
                Color::Green,   // personal
                Color::Magenta, // study
                Color::Red,     // health
                Color::Cyan,    // travel
                Color::Gray,    // other
            ],
        }
    }
}

impl Theme {
    /// Color used for a reminder's category badge.
    pub fn category(&self, category: Option<EventCategory>) -> Color {
        let idx = EventCategory::ALL
            .iter()
            .position(|c| Some(*c) == category)
            .unwrap_or(EventCategory::ALL.len() - 1);
        self.categories[idx]
    }

    /// Theme file from the config dir layered over the preferred preset.
    fn load(preferred_preset: Option<&str>) -> Self {
        let config = config_path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|raw| toml::from_str::<ThemeConfig>(&raw).ok())
            .unwrap_or_default();

        let preset_name = config
            .preset
            .as_deref()
            .or(preferred_preset)
            .unwrap_or("default");
        let mut theme = Theme::preset(preset_name);
        theme.apply_overrides(&config);
        theme
    }

    pub fn preset(name: &str) -> Self {
        match name {
            "midnight" => Self::midnight(),
            "paper" => Self::paper(),
            _ => Self::default(),
        }
    }

    fn midnight() -> Self {
        Self {
            today: Style::new().fg(Color::Black).bg(Color::Rgb(189, 147, 249)),
            selected: Style::new().fg(Color::Black).bg(Color::Rgb(139, 233, 253)),
            header: Style::new()
                .fg(Color::Rgb(248, 248, 242))
                .add_modifier(Modifier::BOLD),
            dim: Style::new().fg(Color::Rgb(98, 114, 164)),
            border: Style::new().fg(Color::Rgb(68, 71, 90)),
            status: Style::new()
                .fg(Color::Rgb(248, 248, 242))
                .bg(Color::Rgb(68, 71, 90)),
            highlight: Style::new()
                .bg(Color::Rgb(68, 71, 90))
                .add_modifier(Modifier::BOLD),
            categories: [
                Color::Rgb(139, 233, 253),
                Color::Rgb(80, 250, 123),
                Color::Rgb(255, 121, 198),
                Color::Rgb(255, 85, 85),
                Color::Rgb(241, 250, 140),
                Color::Rgb(98, 114, 164),
            ],
        }
    }

    fn paper() -> Self {
        Self {
            today: Style::new().fg(Color::White).bg(Color::Rgb(181, 137, 0)),
            selected: Style::new().fg(Color::White).bg(Color::Rgb(38, 139, 210)),
            header: Style::new()
                .fg(Color::Rgb(0, 43, 54))
                .add_modifier(Modifier::BOLD),
            dim: Style::new().fg(Color::Rgb(147, 161, 161)),
            border: Style::new().fg(Color::Rgb(147, 161, 161)),
            status: Style::new()
                .fg(Color::Rgb(253, 246, 227))
                .bg(Color::Rgb(88, 110, 117)),
            highlight: Style::new()
                .bg(Color::Rgb(238, 232, 213))
                .add_modifier(Modifier::BOLD),
            categories: [
                Color::Rgb(38, 139, 210),
                Color::Rgb(133, 153, 0),
                Color::Rgb(108, 113, 196),
                Color::Rgb(220, 50, 47),
                Color::Rgb(42, 161, 152),
                Color::Rgb(147, 161, 161),
            ],
        }
    }

    fn apply_overrides(&mut self, config: &ThemeConfig) {
        let lookup = |key: &str| config.colors.get(key).and_then(|s| parse_color(s));

        if let Some(c) = lookup("today_fg") {
            self.today = self.today.fg(c);
        }
        if let Some(c) = lookup("today_bg") {
            self.today = self.today.bg(c);
        }
        if let Some(c) = lookup("selected_fg") {
            self.selected = self.selected.fg(c);
        }
        if let Some(c) = lookup("selected_bg") {
            self.selected = self.selected.bg(c);
        }
        if let Some(c) = lookup("header_fg") {
            self.header = self.header.fg(c);
        }
        if let Some(c) = lookup("dim_fg") {
            self.dim = self.dim.fg(c);
        }
        if let Some(c) = lookup("border_fg") {
            self.border = self.border.fg(c);
        }
        if let Some(c) = lookup("status_fg") {
            self.status = self.status.fg(c);
        }
        if let Some(c) = lookup("status_bg") {
            self.status = self.status.bg(c);
        }
        if let Some(c) = lookup("highlight_bg") {
            self.highlight = self.highlight.bg(c);
        }

        for (i, cat) in EventCategory::ALL.iter().enumerate() {
            if let Some(c) = config
                .categories
                .get(cat.label())
                .and_then(|s| parse_color(s))
            {
                self.categories[i] = c;
            }
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("memocal").join("theme.toml"))
}

// ── TOML config types ──

#[derive(Debug, Deserialize, Default)]
struct ThemeConfig {
    preset: Option<String>,
    #[serde(default)]
    colors: HashMap<String, String>,
    #[serde(default)]
    categories: HashMap<String, String>,
}

/// Parse a color string: hex "#rrggbb", or a named terminal color.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        // Length is in bytes; the ascii check keeps the slices below on
        // char boundaries for any input.
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "lightred" => Some(Color::LightRed),
        "lightgreen" => Some(Color::LightGreen),
        "lightyellow" => Some(Color::LightYellow),
        "lightblue" => Some(Color::LightBlue),
        "lightmagenta" => Some(Color::LightMagenta),
        "lightcyan" => Some(Color::LightCyan),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_named_colors() {
        assert_eq!(parse_color("#3b82f6"), Some(Color::Rgb(0x3b, 0x82, 0xf6)));
        assert_eq!(parse_color("cyan"), Some(Color::Cyan));
        assert_eq!(parse_color("  White "), Some(Color::White));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn rejects_non_ascii_hex_without_panicking() {
        // Six bytes, but with char boundaries that do not line up with
        // the two-byte component slices.
        assert_eq!(parse_color("#a\u{e9}\u{e9}a"), None);
        assert_eq!(parse_color("#\u{e9}\u{e9}\u{e9}"), None);
    }

    #[test]
    fn category_lookup_defaults_to_other() {
        let theme = Theme::default();
        assert_eq!(
            theme.category(None),
            theme.category(Some(EventCategory::Other))
        );
        assert_ne!(
            theme.category(Some(EventCategory::Work)),
            theme.category(Some(EventCategory::Health))
        );
    }
}
