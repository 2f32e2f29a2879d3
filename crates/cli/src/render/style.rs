use std::fmt::Display;

use owo_colors::{OwoColorize, Style};

/// Terminal styling that can be switched off as a whole.
///
/// Pad text before painting it: escape codes count toward `format!` widths.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn paint(&self, text: impl Display, style: Style) -> String {
        if self.enabled {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: impl Display) -> String {
        self.paint(text, Style::new().bold())
    }

    pub fn dim(&self, text: impl Display) -> String {
        self.paint(text, Style::new().dimmed())
    }

    pub fn red(&self, text: impl Display) -> String {
        self.paint(text, Style::new().red())
    }

    pub fn green(&self, text: impl Display) -> String {
        self.paint(text, Style::new().green())
    }

    pub fn yellow(&self, text: impl Display) -> String {
        self.paint(text, Style::new().yellow())
    }

    pub fn cyan(&self, text: impl Display) -> String {
        self.paint(text, Style::new().cyan())
    }

    /// Criticals and crashes
    pub fn alarm(&self, text: impl Display) -> String {
        self.paint(text, Style::new().red().bold())
    }
}
