//! Named screens and navigation between them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Dashboard,
    SalesJournal,
    PurchaseJournal,
}

/// Buttons on the "New Entry" card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewEntry {
    Sales,
    DirectExpenses,
    Purchase,
    IndirectExpenses,
    Journal,
    StockJournal,
}

impl NewEntry {
    pub const ALL: [NewEntry; 6] = [
        NewEntry::Sales,
        NewEntry::DirectExpenses,
        NewEntry::Purchase,
        NewEntry::IndirectExpenses,
        NewEntry::Journal,
        NewEntry::StockJournal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NewEntry::Sales => "Sales",
            NewEntry::DirectExpenses => "Direct Expenses",
            NewEntry::Purchase => "Purchase",
            NewEntry::IndirectExpenses => "Indirect Expenses",
            NewEntry::Journal => "Journal",
            NewEntry::StockJournal => "Stock Journal",
        }
    }

    /// Screen opened by this button; `None` for entry types without a form.
    pub fn screen(self) -> Option<Screen> {
        match self {
            NewEntry::Sales => Some(Screen::SalesJournal),
            NewEntry::Purchase => Some(Screen::PurchaseJournal),
            _ => None,
        }
    }
}

/// Current screen plus a back stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Navigator {
    current: Screen,
    history: Vec<Screen>,
}

impl Navigator {
    pub fn current(&self) -> Screen {
        self.current
    }

    /// Navigating to the current screen does not grow the back stack.
    pub fn go(&mut self, screen: Screen) {
        if screen == self.current {
            return;
        }
        self.history.push(self.current);
        self.current = screen;
    }

    /// Pop the back stack, landing on the dashboard when it is empty.
    pub fn back(&mut self) -> Screen {
        self.current = self.history.pop().unwrap_or_default();
        self.current
    }

    /// Return to the dashboard and forget the back stack.
    pub fn home(&mut self) {
        self.history.clear();
        self.current = Screen::Dashboard;
    }
}
