//! Point-in-time capture of all board data, used for persistence.

use crate::position::column_cards;
use crate::{Board, BoardId, Card, Column, ColumnKey};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub boards: Vec<Board>,

    /// All cards, including soft-deleted ones.
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty() && self.cards.is_empty()
    }

    /// Visible cards of a board, ordered by column then position.
    pub fn board_cards(&self, board_id: Option<BoardId>) -> Vec<Card> {
        Column::ALL
            .iter()
            .flat_map(|column| column_cards(&self.cards, ColumnKey::new(board_id, *column)))
            .cloned()
            .collect()
    }

    /// Soft-deleted cards of a board, most recently deleted first.
    pub fn deleted_cards(&self, board_id: Option<BoardId>) -> Vec<Card> {
        let mut deleted: Vec<Card> = self
            .cards
            .iter()
            .filter(|c| c.is_deleted && c.board_id == board_id)
            .cloned()
            .collect();
        deleted.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        deleted
    }

    /// Boards in tab order.
    pub fn sorted_boards(&self) -> Vec<Board> {
        let mut boards = self.boards.clone();
        boards.sort_by_key(|b| b.position);
        boards
    }
}
