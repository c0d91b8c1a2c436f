//! Position model.
//!
//! Cards are ordered inside a `(board, column)` partition by a zero-based
//! integer position. Among non-deleted cards the positions of a partition
//! must be exactly `0..n`. Soft deletes may leave a transient gap and
//! restores may leave a transient duplicate; both are normalized by the next
//! reorder touching the partition.

use chrono::Utc;
use planboard_core::{PlanboardError, PlanboardResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::card::Card;
use crate::column::{Column, ColumnKey};

/// A card's place within its board: column plus position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub column: Column,
    pub position: i32,
}

impl Slot {
    pub fn new(column: Column, position: i32) -> Self {
        Self { column, position }
    }
}

/// Non-deleted cards of a partition in display order.
///
/// Ties on position (possible after a restore) are broken by creation time
/// and then id so the order is deterministic.
pub fn column_cards(cards: &[Card], key: ColumnKey) -> Vec<&Card> {
    let mut column: Vec<&Card> = cards
        .iter()
        .filter(|c| c.is_visible() && c.column_key() == key)
        .collect();
    column.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
    column
}

/// Position for a card appended to the partition.
pub fn next_position(cards: &[Card], key: ColumnKey) -> i32 {
    cards
        .iter()
        .filter(|c| c.is_visible() && c.column_key() == key)
        .map(|c| c.position)
        .max()
        .map_or(0, |max| max + 1)
}

/// Clamp a requested insertion index into `[0, len]`.
pub fn clamp_target(position: i32, len: usize) -> usize {
    if position <= 0 {
        0
    } else {
        (position as usize).min(len)
    }
}

/// Check the dense-ordering invariant for one partition.
pub fn verify_dense(cards: &[Card], key: ColumnKey) -> PlanboardResult<()> {
    for (expected, card) in column_cards(cards, key).iter().enumerate() {
        if card.position != expected as i32 {
            return Err(PlanboardError::InvalidState(format!(
                "Column {} is not dense: card {} has position {}, expected {}",
                key, card.id, card.position, expected
            )));
        }
    }
    Ok(())
}

/// Every partition that currently holds a non-deleted card.
pub fn partitions(cards: &[Card]) -> BTreeSet<ColumnKey> {
    cards
        .iter()
        .filter(|c| c.is_visible())
        .map(Card::column_key)
        .collect()
}

/// Check the invariant for every partition.
pub fn verify_all_dense(cards: &[Card]) -> PlanboardResult<()> {
    partitions(cards)
        .into_iter()
        .try_for_each(|key| verify_dense(cards, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn card(board: Option<Uuid>, title: &str, column: Column, position: i32) -> Card {
        Card::new(board, title.to_string(), column, position)
    }

    #[test]
    fn test_column_cards_sorted_and_filtered() {
        let board = Some(Uuid::new_v4());
        let mut deleted = card(board, "D", Column::Backlog, 1);
        deleted.soft_delete(Utc::now());
        let cards = vec![
            card(board, "C", Column::Backlog, 2),
            card(board, "A", Column::Backlog, 0),
            card(board, "X", Column::Done, 0),
            card(None, "Legacy", Column::Backlog, 0),
            deleted,
        ];

        let titles: Vec<_> = column_cards(&cards, ColumnKey::new(board, Column::Backlog))
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[test]
    fn test_next_position_appends_after_max() {
        let key = ColumnKey::new(None, Column::Backlog);
        assert_eq!(next_position(&[], key), 0);

        let cards = vec![
            card(None, "A", Column::Backlog, 0),
            card(None, "B", Column::Backlog, 3),
        ];
        assert_eq!(next_position(&cards, key), 4);
        assert_eq!(next_position(&cards, ColumnKey::new(None, Column::Done)), 0);
    }

    #[test]
    fn test_clamp_target() {
        assert_eq!(clamp_target(-3, 4), 0);
        assert_eq!(clamp_target(0, 4), 0);
        assert_eq!(clamp_target(2, 4), 2);
        assert_eq!(clamp_target(4, 4), 4);
        assert_eq!(clamp_target(99, 4), 4);
        assert_eq!(clamp_target(1, 0), 0);
    }

    #[test]
    fn test_verify_dense_detects_gap_and_duplicate() {
        let key = ColumnKey::new(None, Column::Backlog);
        let dense = vec![
            card(None, "A", Column::Backlog, 0),
            card(None, "B", Column::Backlog, 1),
        ];
        assert!(verify_dense(&dense, key).is_ok());

        let gap = vec![
            card(None, "A", Column::Backlog, 0),
            card(None, "B", Column::Backlog, 2),
        ];
        assert!(verify_dense(&gap, key).is_err());

        let duplicate = vec![
            card(None, "A", Column::Backlog, 0),
            card(None, "B", Column::Backlog, 0),
        ];
        assert!(verify_dense(&duplicate, key).is_err());
    }
}
