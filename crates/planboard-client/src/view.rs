//! Read-only per-column projection of the client's cards.

use planboard_domain::position::column_cards;
use planboard_domain::{BoardId, Card, CardId, Column, ColumnKey};
use serde::Serialize;

use crate::state::SyncPhase;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnView {
    pub column: Column,
    /// Visible cards in display order.
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub board_id: Option<BoardId>,
    pub phase: SyncPhase,
    pub dragging: Option<CardId>,
    /// One entry per column, in workflow order.
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    pub fn build(
        board_id: Option<BoardId>,
        cards: &[Card],
        phase: SyncPhase,
        dragging: Option<CardId>,
    ) -> Self {
        let columns = Column::ALL
            .iter()
            .map(|column| ColumnView {
                column: *column,
                cards: column_cards(cards, ColumnKey::new(board_id, *column))
                    .into_iter()
                    .cloned()
                    .collect(),
            })
            .collect();

        Self {
            board_id,
            phase,
            dragging,
            columns,
        }
    }

    pub fn column(&self, column: Column) -> &[Card] {
        self.columns
            .get(column.index())
            .map(|c| c.cards.as_slice())
            .unwrap_or(&[])
    }

    pub fn titles(&self, column: Column) -> Vec<&str> {
        self.column(column).iter().map(|c| c.title.as_str()).collect()
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.columns
            .iter()
            .flat_map(|c| c.cards.iter())
            .find(|c| c.id == id)
    }

    /// Column and display index of a card.
    pub fn locate(&self, id: CardId) -> Option<(Column, usize)> {
        self.columns.iter().find_map(|c| {
            c.cards
                .iter()
                .position(|card| card.id == id)
                .map(|index| (c.column, index))
        })
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }
}
