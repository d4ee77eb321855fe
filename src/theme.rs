//! Colors for the card grid.
//! Optionally read from a kitty-style color file named in the config.

use ratatui::style::Color;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub accent: Color,      // Selected card border, key hints (color4/blue)
    pub link: Color,        // URL line (color6/cyan)
    pub dragging: Color,    // Border of the grabbed card (color3/yellow)
    pub danger: Color,      // Delete/clear prompts (color1/red)
    pub success: Color,     // Confirmations (color2/green)
    pub text: Color,        // Card titles (foreground)
    pub text_dim: Color,    // Descriptions, hints (color8)
    pub bg_selected: Color, // Selected card background
    pub border: Color,      // Unselected card borders
    pub header: Color,      // Title bar (color5/magenta)
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(137, 180, 250),
            link: Color::Rgb(148, 226, 213),
            dragging: Color::Rgb(249, 226, 175),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 227, 161),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(49, 50, 68),
            border: Color::Rgb(88, 91, 112),
            header: Color::Rgb(203, 166, 247),
        }
    }
}

impl Theme {
    /// Load from `path` if given and readable, else the built-in palette
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_kitty_conf(&content),
            Err(e) => {
                tracing::warn!("Could not read theme {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Overlay the colors found in a kitty.conf onto the defaults
    fn from_kitty_conf(content: &str) -> Self {
        let colors = Self::parse_kitty_conf(content);
        let base = Self::default();
        let pick = |keys: &[&str], fallback: Color| {
            keys.iter()
                .find_map(|k| colors.get(*k).copied())
                .unwrap_or(fallback)
        };

        Self {
            accent: pick(&["color4", "color12"], base.accent),
            link: pick(&["color6", "color14"], base.link),
            dragging: pick(&["color3", "color11"], base.dragging),
            danger: pick(&["color1", "color9"], base.danger),
            success: pick(&["color2", "color10"], base.success),
            text: pick(&["foreground"], base.text),
            text_dim: pick(&["color8"], base.text_dim),
            bg_selected: pick(&["selection_background", "color0"], base.bg_selected),
            border: pick(&["inactive_border_color", "color8"], base.border),
            header: pick(&["color5", "color13"], base.header),
        }
    }

    /// Parse kitty.conf format: `key #hexcolor`
    fn parse_kitty_conf(content: &str) -> HashMap<String, Color> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let (key, value) = line.split_once(char::is_whitespace)?;
                Some((key.to_string(), Self::parse_hex_color(value)?))
            })
            .collect()
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let hex = s.trim().strip_prefix('#')?;
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();

        match hex.len() {
            6 => Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            3 => Some(Color::Rgb(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Theme::parse_hex_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(Theme::parse_hex_color(" #fff "), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("ff8000"), None);
        assert_eq!(Theme::parse_hex_color("#zzzzzz"), None);
        assert_eq!(Theme::parse_hex_color("#12345"), None);
    }

    #[test]
    fn test_kitty_conf_overrides_known_keys_only() {
        let conf = "# comment\nforeground #eeeeee\ncolor4   #0000ff\ncursor none\n";
        let theme = Theme::from_kitty_conf(conf);
        assert_eq!(theme.text, Color::Rgb(238, 238, 238));
        assert_eq!(theme.accent, Color::Rgb(0, 0, 255));
        assert_eq!(theme.danger, Theme::default().danger);
    }

    #[test]
    fn test_missing_theme_file_uses_defaults() {
        let theme = Theme::load(Some(Path::new("/nonexistent/webcards/kitty.conf")));
        assert_eq!(theme, Theme::default());
        assert_eq!(Theme::load(None), Theme::default());
    }
}
