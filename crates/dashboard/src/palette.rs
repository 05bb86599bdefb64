//! Command palette: substring filter plus keyboard selection.

use serde::{Deserialize, Serialize};

use crate::screen::Screen;

/// What running a palette entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "screen", rename_all = "snake_case")]
pub enum PaletteCommand {
    Open(Screen),
    ToggleTheme,
    ToggleBold,
    ToggleFont,
    ToggleRearrange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub label: &'static str,
    pub command: PaletteCommand,
}

static ENTRIES: [PaletteEntry; 7] = [
    PaletteEntry {
        label: "Go to Dashboard",
        command: PaletteCommand::Open(Screen::Dashboard),
    },
    PaletteEntry {
        label: "New Sales Journal",
        command: PaletteCommand::Open(Screen::SalesJournal),
    },
    PaletteEntry {
        label: "New Purchase Journal",
        command: PaletteCommand::Open(Screen::PurchaseJournal),
    },
    PaletteEntry {
        label: "Toggle Theme",
        command: PaletteCommand::ToggleTheme,
    },
    PaletteEntry {
        label: "Toggle Bold",
        command: PaletteCommand::ToggleBold,
    },
    PaletteEntry {
        label: "Next Font",
        command: PaletteCommand::ToggleFont,
    },
    PaletteEntry {
        label: "Rearrange Cards",
        command: PaletteCommand::ToggleRearrange,
    },
];

/// Navigation keys the palette reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteKey {
    Up,
    Down,
    Enter,
    Escape,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandPalette {
    open: bool,
    query: String,
    selected: usize,
}

impl CommandPalette {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Opening always starts from an empty query.
    pub fn open(&mut self) {
        self.open = true;
        self.query.clear();
        self.selected = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.selected = 0;
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.selected = 0;
    }

    /// Entries whose label contains the query, case-insensitively.
    pub fn results(&self) -> Vec<&'static PaletteEntry> {
        let needle = self.query.trim().to_lowercase();
        ENTRIES
            .iter()
            .filter(|entry| entry.label.to_lowercase().contains(&needle))
            .collect()
    }

    /// Handle a key. `Enter` returns the chosen command and closes the palette.
    pub fn press(&mut self, key: PaletteKey) -> Option<PaletteCommand> {
        if !self.open {
            return None;
        }
        let count = self.results().len();
        match key {
            PaletteKey::Down if count > 0 => self.selected = (self.selected + 1) % count,
            PaletteKey::Up if count > 0 => self.selected = (self.selected + count - 1) % count,
            PaletteKey::Up | PaletteKey::Down => {}
            PaletteKey::Escape => self.close(),
            PaletteKey::Enter => {
                let command = self.results().get(self.selected).map(|e| e.command);
                self.close();
                return command;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_lists_everything() {
        let mut palette = CommandPalette::default();
        palette.open();
        assert_eq!(palette.results().len(), ENTRIES.len());
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut palette = CommandPalette::default();
        palette.open();
        palette.set_query("JOURNAL");
        let labels: Vec<&str> = palette.results().iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["New Sales Journal", "New Purchase Journal"]);
    }

    #[test]
    fn arrows_wrap_and_enter_runs_selection() {
        let mut palette = CommandPalette::default();
        palette.open();
        palette.set_query("journal");

        assert_eq!(palette.press(PaletteKey::Up), None);
        assert_eq!(palette.selected(), 1);
        palette.press(PaletteKey::Down);
        assert_eq!(palette.selected(), 0);
        palette.press(PaletteKey::Down);

        assert_eq!(
            palette.press(PaletteKey::Enter),
            Some(PaletteCommand::Open(Screen::PurchaseJournal))
        );
        assert!(!palette.is_open());
    }

    #[test]
    fn enter_with_no_results_does_nothing() {
        let mut palette = CommandPalette::default();
        palette.open();
        palette.set_query("zzz");
        assert_eq!(palette.press(PaletteKey::Down), None);
        assert_eq!(palette.press(PaletteKey::Enter), None);
    }

    #[test]
    fn keys_are_ignored_while_closed() {
        let mut palette = CommandPalette::default();
        assert_eq!(palette.press(PaletteKey::Enter), None);
        assert!(!palette.is_open());
    }

    #[test]
    fn commands_serialize_with_tag() {
        let json = serde_json::to_string(&PaletteCommand::Open(Screen::SalesJournal)).unwrap();
        assert_eq!(json, r#"{"type":"open","screen":"sales_journal"}"#);
        let json = serde_json::to_string(&PaletteCommand::ToggleTheme).unwrap();
        assert_eq!(json, r#"{"type":"toggle_theme"}"#);
    }
}
