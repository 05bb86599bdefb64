//! Summary card grid with drag-to-reorder.

use serde::{Deserialize, Serialize};

/// Stable card identifier (e.g. `cash_flow`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CardId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which renderer a card uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    ProfitLoss,
    BalanceSheet,
    CashFlow,
    FinancialList,
    EntriesList,
    SalesChart,
    NewEntryButtons,
    CustomWidget,
    TodoList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub kind: CardKind,
    /// Spans two grid columns on wide screens.
    #[serde(default)]
    pub wide: bool,
}

impl Card {
    fn new(id: &str, title: &str, kind: CardKind) -> Self {
        Self {
            id: CardId::new(id),
            title: title.to_string(),
            kind,
            wide: false,
        }
    }
}

/// Ordered cards plus rearrange-mode drag state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardBoard {
    cards: Vec<Card>,
    rearranging: bool,
    dragged: Option<CardId>,
}

impl Default for CardBoard {
    fn default() -> Self {
        let mut sales_chart = Card::new("sales_chart", "Sales", CardKind::SalesChart);
        sales_chart.wide = true;

        Self::new(vec![
            Card::new("profit_and_loss", "Profit & Loss", CardKind::ProfitLoss),
            Card::new("balance_sheet", "Balance Sheet", CardKind::BalanceSheet),
            Card::new("cash_flow", "Cash Flow", CardKind::CashFlow),
            Card::new("receivables", "Receivables", CardKind::FinancialList),
            Card::new("payables", "Payables", CardKind::FinancialList),
            Card::new("authorities", "with Authorities", CardKind::FinancialList),
            Card::new("recent_entries", "Recent Entries / Edits", CardKind::EntriesList),
            sales_chart,
            Card::new("new_entry", "New Entry", CardKind::NewEntryButtons),
            Card::new("custom_widget", "Custom Widget", CardKind::CustomWidget),
            Card::new("todo_list", "To do list", CardKind::TodoList),
        ])
    }
}

impl CardBoard {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            rearranging: false,
            dragged: None,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_rearranging(&self) -> bool {
        self.rearranging
    }

    pub fn dragged(&self) -> Option<&CardId> {
        self.dragged.as_ref()
    }

    fn position(&self, id: &CardId) -> Option<usize> {
        self.cards.iter().position(|c| &c.id == id)
    }

    /// Leaving rearrange mode drops any drag in progress.
    pub fn toggle_rearrange(&mut self) {
        self.rearranging = !self.rearranging;
        if !self.rearranging {
            self.dragged = None;
        }
    }

    /// Start dragging `id`. Refused outside rearrange mode or for unknown cards.
    pub fn begin_drag(&mut self, id: &CardId) -> bool {
        if !self.rearranging || self.position(id).is_none() {
            return false;
        }
        self.dragged = Some(id.clone());
        true
    }

    /// The dragged card hovers over `target`: move it into the target's slot.
    pub fn drag_over(&mut self, target: &CardId) {
        if !self.rearranging {
            return;
        }
        let Some(dragged) = self.dragged.clone() else {
            return;
        };
        let (Some(from), Some(to)) = (self.position(&dragged), self.position(target)) else {
            return;
        };
        self.move_card(from, to);
    }

    pub fn end_drag(&mut self) {
        self.dragged = None;
    }

    /// Remove the card at `from` and insert it at `to`. Out of range is a no-op.
    pub fn move_card(&mut self, from: usize, to: usize) {
        if from == to || from >= self.cards.len() || to >= self.cards.len() {
            return;
        }
        let card = self.cards.remove(from);
        self.cards.insert(to, card);
        tracing::debug!(from, to, "card moved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(board: &CardBoard) -> Vec<&str> {
        board.cards().iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn default_board_has_eleven_cards() {
        let board = CardBoard::default();
        assert_eq!(board.cards().len(), 11);
        assert_eq!(board.cards()[0].id.as_str(), "profit_and_loss");
        assert!(board.cards().iter().any(|c| c.wide && c.kind == CardKind::SalesChart));
    }

    #[test]
    fn drag_requires_rearrange_mode() {
        let mut board = CardBoard::default();
        assert!(!board.begin_drag(&CardId::new("cash_flow")));

        board.toggle_rearrange();
        assert!(board.begin_drag(&CardId::new("cash_flow")));
        assert!(!board.begin_drag(&CardId::new("missing")));
    }

    #[test]
    fn drag_over_moves_dragged_card_into_target_slot() {
        let mut board = CardBoard::default();
        board.toggle_rearrange();
        board.begin_drag(&CardId::new("cash_flow"));
        board.drag_over(&CardId::new("profit_and_loss"));

        assert_eq!(
            &ids(&board)[..3],
            &["cash_flow", "profit_and_loss", "balance_sheet"]
        );

        board.drag_over(&CardId::new("todo_list"));
        assert_eq!(ids(&board).last(), Some(&"cash_flow"));

        board.end_drag();
        assert!(board.dragged().is_none());
    }

    #[test]
    fn leaving_rearrange_mode_cancels_drag() {
        let mut board = CardBoard::default();
        board.toggle_rearrange();
        board.begin_drag(&CardId::new("payables"));
        board.toggle_rearrange();
        assert!(board.dragged().is_none());

        let before = board.clone();
        board.drag_over(&CardId::new("profit_and_loss"));
        assert_eq!(board, before);
    }

    proptest! {
        /// Property: moves permute cards, never drop or duplicate them.
        #[test]
        fn moves_preserve_card_set(moves in prop::collection::vec((0usize..12, 0usize..12), 0..20)) {
            let mut board = CardBoard::default();
            let mut expected: Vec<String> = ids(&board).iter().map(|s| s.to_string()).collect();
            for (from, to) in moves {
                board.move_card(from, to);
            }
            let mut actual: Vec<String> = ids(&board).iter().map(|s| s.to_string()).collect();
            expected.sort();
            actual.sort();
            prop_assert_eq!(actual, expected);
        }
    }
}
