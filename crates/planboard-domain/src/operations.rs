use async_trait::async_trait;
use planboard_core::PlanboardResult;

use crate::{Board, BoardId, Card, CardId, CardUpdate, Column, NewCard, UserRef};

/// Contract of the card storage service.
///
/// Implementations must serialize writes so that a reorder's position shifts
/// are computed and persisted atomically. `board_id == None` addresses the
/// unassigned bucket.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Non-deleted cards of a board (or of the unassigned bucket).
    async fn list_cards(&self, board_id: Option<BoardId>) -> PlanboardResult<Vec<Card>>;

    /// Fetch a single card, including soft-deleted ones.
    async fn get_card(&self, id: CardId) -> PlanboardResult<Card>;

    /// Create a card appended to its column.
    async fn create_card(&self, new_card: NewCard) -> PlanboardResult<Card>;

    /// Patch fields. Does not shift positions.
    async fn update_card(&self, id: CardId, updates: CardUpdate) -> PlanboardResult<Card>;

    /// Move a card and return the full, freshly ordered card list of its board.
    async fn reorder_card(
        &self,
        id: CardId,
        column: Column,
        position: i32,
    ) -> PlanboardResult<Vec<Card>>;

    async fn soft_delete_card(&self, id: CardId) -> PlanboardResult<()>;

    async fn restore_card(&self, id: CardId) -> PlanboardResult<Card>;

    async fn permanently_delete_card(&self, id: CardId) -> PlanboardResult<()>;

    /// Soft-deleted cards of a board, most recently deleted first.
    async fn list_deleted_cards(&self, board_id: Option<BoardId>) -> PlanboardResult<Vec<Card>>;

    /// Boards in tab order.
    async fn list_boards(&self) -> PlanboardResult<Vec<Board>>;

    async fn create_board(&self, name: String, creator: Option<UserRef>) -> PlanboardResult<Board>;

    async fn rename_board(&self, id: BoardId, name: String) -> PlanboardResult<Board>;

    /// Delete a board; its cards move to the unassigned bucket.
    async fn delete_board(&self, id: BoardId) -> PlanboardResult<()>;
}
