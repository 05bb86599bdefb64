//! Theme, font weight and font family preferences.

use serde::{Deserialize, Serialize};

/// Colour theme. The toolbar button cycles light → dark → black → light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Black,
}

impl Theme {
    pub fn next(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Black,
            Theme::Black => Theme::Light,
        }
    }
}

/// Font weight applied to the whole dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boldness {
    Normal,
    Medium,
    Semibold,
    #[default]
    Bold,
    Extrabold,
}

impl Boldness {
    const LEVELS: [Boldness; 5] = [
        Boldness::Normal,
        Boldness::Medium,
        Boldness::Semibold,
        Boldness::Bold,
        Boldness::Extrabold,
    ];

    pub fn level(self) -> usize {
        Self::LEVELS.iter().position(|b| *b == self).unwrap_or(0)
    }

    /// Next weight, wrapping back to normal after extrabold.
    pub fn next(self) -> Self {
        Self::LEVELS[(self.level() + 1) % Self::LEVELS.len()]
    }

    /// CSS `font-weight`.
    pub fn css_weight(self) -> u16 {
        match self {
            Boldness::Normal => 400,
            Boldness::Medium => 500,
            Boldness::Semibold => 600,
            Boldness::Bold => 700,
            Boldness::Extrabold => 800,
        }
    }
}

pub const FONT_FAMILIES: [&str; 10] = [
    "Inter",
    "Roboto",
    "Poppins",
    "Lato",
    "Montserrat",
    "Open Sans",
    "Source Sans 3",
    "Nunito",
    "Oswald",
    "Merriweather",
];

/// Presentation preferences for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub theme: Theme,
    pub boldness: Boldness,
    font_index: usize,
    #[serde(default)]
    font_menu_open: bool,
}

impl Appearance {
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.next();
    }

    pub fn toggle_bold(&mut self) {
        self.boldness = self.boldness.next();
    }

    /// Advance to the next font family, wrapping around.
    pub fn toggle_font(&mut self) {
        self.font_index = (self.font_index + 1) % FONT_FAMILIES.len();
    }

    pub fn toggle_font_menu(&mut self) {
        self.font_menu_open = !self.font_menu_open;
    }

    /// Pick a font from the menu and close it. Unknown indices are ignored.
    pub fn select_font(&mut self, index: usize) {
        if index >= FONT_FAMILIES.len() {
            tracing::debug!(index, "font index out of range ignored");
            return;
        }
        self.font_index = index;
        self.font_menu_open = false;
    }

    /// A click outside the font menu closes it.
    pub fn close_font_menu(&mut self) {
        self.font_menu_open = false;
    }

    pub fn font_index(&self) -> usize {
        self.font_index
    }

    pub fn font_family(&self) -> &'static str {
        FONT_FAMILIES[self.font_index % FONT_FAMILIES.len()]
    }

    pub fn font_menu_open(&self) -> bool {
        self.font_menu_open
    }
}
