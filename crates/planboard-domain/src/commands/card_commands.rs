use super::{Command, CommandContext};
use crate::position::next_position;
use crate::{reorder, Card, CardUpdate, Column, ColumnKey, NewCard};
use chrono::Utc;
use planboard_core::{PlanboardError, PlanboardResult};
use uuid::Uuid;

/// Create a card appended to the end of its column.
pub struct CreateCard {
    pub new_card: NewCard,
}

impl Command for CreateCard {
    fn execute(&self, context: &mut CommandContext) -> PlanboardResult<()> {
        if let Some(board_id) = self.new_card.board_id {
            context.board_mut(board_id)?;
        }
        let key = ColumnKey::new(self.new_card.board_id, self.new_card.status);
        let position = next_position(context.cards, key);
        let card = Card::from_new(self.new_card.clone(), position)?;
        context.cards.push(card);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Create card: '{}'", self.new_card.title)
    }
}

/// Patch card fields (never position or column).
pub struct UpdateCard {
    pub card_id: Uuid,
    pub updates: CardUpdate,
}

impl Command for UpdateCard {
    fn execute(&self, context: &mut CommandContext) -> PlanboardResult<()> {
        let card = context.card_mut(self.card_id)?;
        self.updates.clone().apply(card)
    }

    fn description(&self) -> String {
        "Update card".to_string()
    }
}

/// Move a card within or across columns, shifting its siblings.
pub struct ReorderCard {
    pub card_id: Uuid,
    pub column: Column,
    pub position: i32,
}

impl Command for ReorderCard {
    fn execute(&self, context: &mut CommandContext) -> PlanboardResult<()> {
        let plan = reorder(context.cards, self.card_id, self.column, self.position)?;
        if plan.is_noop() {
            tracing::debug!("Card {} already at requested slot", self.card_id);
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "Reorder card {} to {}[{}]",
            self.card_id, self.column, self.position
        )
    }
}

/// Hide a card. Sibling positions are not touched.
pub struct SoftDeleteCard {
    pub card_id: Uuid,
}

impl Command for SoftDeleteCard {
    fn execute(&self, context: &mut CommandContext) -> PlanboardResult<()> {
        let card = context.card_mut(self.card_id)?;
        if card.is_deleted {
            return Err(PlanboardError::InvalidState(format!(
                "Card {} is already deleted",
                self.card_id
            )));
        }
        card.soft_delete(Utc::now());
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete card {}", self.card_id)
    }
}

/// Unhide a soft-deleted card at its stored position.
pub struct RestoreCard {
    pub card_id: Uuid,
}

impl Command for RestoreCard {
    fn execute(&self, context: &mut CommandContext) -> PlanboardResult<()> {
        let card = context.card_mut(self.card_id)?;
        if !card.is_deleted {
            return Err(PlanboardError::InvalidState(format!(
                "Card {} is not deleted",
                self.card_id
            )));
        }
        card.restore();
        Ok(())
    }

    fn description(&self) -> String {
        format!("Restore card {}", self.card_id)
    }
}

/// Remove a card record for good.
pub struct PermanentlyDeleteCard {
    pub card_id: Uuid,
}

impl Command for PermanentlyDeleteCard {
    fn execute(&self, context: &mut CommandContext) -> PlanboardResult<()> {
        let index = context
            .cards
            .iter()
            .position(|c| c.id == self.card_id)
            .ok_or_else(|| PlanboardError::card_not_found(self.card_id))?;
        context.cards.remove(index);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Permanently delete card {}", self.card_id)
    }
}
