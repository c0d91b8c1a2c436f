use planboard_core::PlanboardResult;

pub mod board_commands;
pub mod card_commands;

pub use board_commands::*;
pub use card_commands::*;

/// A state mutation that can be executed against a [`CommandContext`].
pub trait Command: Send + Sync {
    fn execute(&self, context: &mut CommandContext) -> PlanboardResult<()>;

    /// Human-readable description for logs.
    fn description(&self) -> String;
}

/// Mutable view over the aggregates a command may touch.
pub struct CommandContext<'a> {
    pub boards: &'a mut Vec<crate::Board>,
    pub cards: &'a mut Vec<crate::Card>,
}

impl CommandContext<'_> {
    pub fn card_mut(&mut self, id: crate::CardId) -> PlanboardResult<&mut crate::Card> {
        self.cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| planboard_core::PlanboardError::card_not_found(id))
    }

    pub fn board_mut(&mut self, id: crate::BoardId) -> PlanboardResult<&mut crate::Board> {
        self.boards
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| planboard_core::PlanboardError::board_not_found(id))
    }
}
