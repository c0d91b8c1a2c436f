//! Reorder algorithm.
//!
//! A move is computed as a [`ReorderPlan`]: the moved card's source and
//! target slot plus every position write needed to keep both affected
//! partitions dense. Planning is pure so the client can run it as an
//! optimistic estimate and the store can run it as the authoritative write.

use chrono::Utc;
use planboard_core::{PlanboardError, PlanboardResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::board::BoardId;
use crate::card::{Card, CardId};
use crate::column::{Column, ColumnKey};
use crate::position::{clamp_target, column_cards, Slot};

/// One card's position write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionChange {
    pub card_id: CardId,
    pub from: Slot,
    pub to: Slot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderPlan {
    pub card_id: CardId,
    pub board_id: Option<BoardId>,
    pub from: Slot,
    pub to: Slot,
    /// Writes in application order. Empty for a no-op move.
    pub changes: Vec<PositionChange>,
}

impl ReorderPlan {
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn is_cross_column(&self) -> bool {
        self.from.column != self.to.column
    }

    pub fn affected_ids(&self) -> HashSet<CardId> {
        self.changes.iter().map(|c| c.card_id).collect()
    }

    /// Write the planned positions into `cards`. Returns the number of cards
    /// updated; changes for cards missing from the slice are skipped.
    pub fn apply(&self, cards: &mut [Card]) -> usize {
        let now = Utc::now();
        let mut applied = 0;
        for change in &self.changes {
            if let Some(card) = cards.iter_mut().find(|c| c.id == change.card_id) {
                card.status = change.to.column;
                card.position = change.to.position;
                card.updated_at = now;
                applied += 1;
            }
        }
        applied
    }
}

/// Plan moving `card_id` to `target_position` of `target_column` on its board.
///
/// `target_position` is an index into the target column's ordering with the
/// moved card removed; it is clamped into `[0, len]`. Every card of the
/// affected partitions is assigned its ordinal index and only cards whose
/// slot actually changes produce a write, so on a dense column this is the
/// classic shift (close the gap in the source, open a slot in the target)
/// and on a column with a gap or duplicate it also normalizes the column.
pub fn plan_reorder(
    cards: &[Card],
    card_id: CardId,
    target_column: Column,
    target_position: i32,
) -> PlanboardResult<ReorderPlan> {
    let card = cards
        .iter()
        .find(|c| c.id == card_id && c.is_visible())
        .ok_or_else(|| PlanboardError::card_not_found(card_id))?;

    let source = card.column_key();
    let target = ColumnKey::new(card.board_id, target_column);

    let source_order = column_cards(cards, source);
    let current_index = source_order
        .iter()
        .position(|c| c.id == card_id)
        .ok_or_else(|| {
            PlanboardError::Internal(format!("Card {} missing from column {}", card_id, source))
        })?;

    let mut target_order: Vec<&Card> = column_cards(cards, target)
        .into_iter()
        .filter(|c| c.id != card_id)
        .collect();
    let index = clamp_target(target_position, target_order.len());

    if source == target && index == current_index {
        tracing::debug!("Reorder of card {} is a no-op", card_id);
        return Ok(ReorderPlan {
            card_id,
            board_id: card.board_id,
            from: card.slot(),
            to: card.slot(),
            changes: Vec::new(),
        });
    }

    let mut changes = Vec::new();
    if source != target {
        let remaining: Vec<&Card> = source_order
            .into_iter()
            .filter(|c| c.id != card_id)
            .collect();
        collect_changes(&remaining, source.column, &mut changes);
    }
    target_order.insert(index, card);
    collect_changes(&target_order, target.column, &mut changes);

    let to = Slot::new(target_column, index as i32);
    tracing::debug!(
        "Planned reorder of card {}: {:?} -> {:?} ({} writes)",
        card_id,
        card.slot(),
        to,
        changes.len()
    );

    Ok(ReorderPlan {
        card_id,
        board_id: card.board_id,
        from: card.slot(),
        to,
        changes,
    })
}

fn collect_changes(order: &[&Card], column: Column, changes: &mut Vec<PositionChange>) {
    for (index, card) in order.iter().enumerate() {
        let to = Slot::new(column, index as i32);
        let from = card.slot();
        if from != to {
            changes.push(PositionChange {
                card_id: card.id,
                from,
                to,
            });
        }
    }
}

/// Plan and apply a move in one step.
pub fn reorder(
    cards: &mut [Card],
    card_id: CardId,
    target_column: Column,
    target_position: i32,
) -> PlanboardResult<ReorderPlan> {
    let plan = plan_reorder(cards, card_id, target_column, target_position)?;
    plan.apply(cards);
    Ok(plan)
}
