use ratatui::style::{Color, Modifier, Style};

use crate::notify::NoticeLevel;

/// Colors used across the screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub colors: ThemeColors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColors {
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub header: Color,
    pub text_secondary: Color,
    pub selection: Color,

    pub success: Color,
    pub error: Color,
    pub info: Color,
}

impl Theme {
    /// Create the default dark theme
    pub fn dark() -> Self {
        Self {
            name: "dark",
            colors: ThemeColors {
                foreground: Color::Rgb(230, 230, 230),
                border: Color::DarkGray,
                border_focused: Color::Cyan,
                header: Color::Cyan,
                text_secondary: Color::Gray,
                selection: Color::Rgb(50, 50, 50),
                success: Color::Green,
                error: Color::Red,
                info: Color::Cyan,
            },
        }
    }

    /// Create a light theme
    pub fn light() -> Self {
        Self {
            name: "light",
            colors: ThemeColors {
                foreground: Color::Rgb(30, 30, 30),
                border: Color::Gray,
                border_focused: Color::Blue,
                header: Color::Blue,
                text_secondary: Color::DarkGray,
                selection: Color::Rgb(220, 220, 230),
                success: Color::Rgb(0, 128, 0),
                error: Color::Rgb(178, 34, 34),
                info: Color::Blue,
            },
        }
    }

    /// Theme by config name; unknown names fall back to dark
    pub fn named(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.colors.foreground)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.colors.text_secondary)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.colors.header)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.colors.border_focused)
        } else {
            Style::default().fg(self.colors.border)
        }
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .bg(self.colors.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn notice(&self, level: NoticeLevel) -> Style {
        let color = match level {
            NoticeLevel::Info => self.colors.info,
            NoticeLevel::Success => self.colors.success,
            NoticeLevel::Error => self.colors.error,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_theme() {
        assert_eq!(Theme::named("Light").name, "light");
        assert_eq!(Theme::named("solarized").name, "dark");
    }
}
