use crate::serialization::JsonSerializer;
use crate::store::json_file_store::JsonFileStore;
use crate::traits::{PersistenceMetadata, PersistenceStore, Serializer, StoreSnapshot};
use async_trait::async_trait;
use planboard_core::{PlanboardError, PlanboardResult};
use planboard_domain::commands::{
    Command, CommandContext, CreateBoard, CreateCard, DeleteBoard, PermanentlyDeleteCard,
    RenameBoard, ReorderCard, RestoreCard, SoftDeleteCard, UpdateCard,
};
use planboard_domain::{
    Board, BoardId, Card, CardId, CardStore, CardUpdate, Column, NewCard, Snapshot, UserRef,
};
use std::path::Path;
use tokio::sync::Mutex;

/// In-process [`CardStore`] backed by an optional JSON file.
///
/// Every write takes the snapshot lock once, runs a domain command against a
/// staged copy, saves it, and only then publishes the copy. Concurrent
/// reorders are therefore serialized and a failed save leaves both memory
/// and disk on the previous state.
pub struct LocalCardStore {
    state: Mutex<Snapshot>,
    backend: Option<JsonFileStore>,
}

impl LocalCardStore {
    pub fn in_memory() -> Self {
        Self::from_snapshot(Snapshot::new())
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
            backend: None,
        }
    }

    /// Open a file-backed store. A missing file starts empty and is created
    /// on the first write.
    pub async fn open(path: impl AsRef<Path>) -> PlanboardResult<Self> {
        let backend = JsonFileStore::new(path);
        let snapshot = if backend.exists().await {
            let (stored, _metadata) = backend.load().await?;
            JsonSerializer.deserialize(&stored.data)?
        } else {
            tracing::info!(
                "No data file at {}, starting empty",
                backend.path().display()
            );
            Snapshot::new()
        };

        Ok(Self {
            state: Mutex::new(snapshot),
            backend: Some(backend),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.backend.as_ref().map(|b| b.path())
    }

    /// Copy of the current data.
    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.clone()
    }

    async fn persist(&self, snapshot: &Snapshot) -> PlanboardResult<()> {
        if let Some(ref backend) = self.backend {
            let data = JsonSerializer.serialize(snapshot)?;
            backend
                .save(StoreSnapshot {
                    data,
                    metadata: PersistenceMetadata::new(backend.instance_id()),
                })
                .await?;
        }
        Ok(())
    }

    async fn execute<T>(
        &self,
        command: Box<dyn Command>,
        read: impl FnOnce(&Snapshot) -> PlanboardResult<T> + Send,
    ) -> PlanboardResult<T> {
        let mut guard = self.state.lock().await;
        let mut staged = guard.clone();

        tracing::debug!("Executing: {}", command.description());
        {
            let mut context = CommandContext {
                boards: &mut staged.boards,
                cards: &mut staged.cards,
            };
            command.execute(&mut context)?;
        }
        let output = read(&staged)?;

        self.persist(&staged).await?;
        *guard = staged;
        Ok(output)
    }
}

fn find_card(snapshot: &Snapshot, id: CardId) -> PlanboardResult<Card> {
    snapshot
        .cards
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .ok_or_else(|| PlanboardError::card_not_found(id))
}

fn find_board(snapshot: &Snapshot, id: BoardId) -> PlanboardResult<Board> {
    snapshot
        .boards
        .iter()
        .find(|b| b.id == id)
        .cloned()
        .ok_or_else(|| PlanboardError::board_not_found(id))
}

#[async_trait]
impl CardStore for LocalCardStore {
    async fn list_cards(&self, board_id: Option<BoardId>) -> PlanboardResult<Vec<Card>> {
        Ok(self.state.lock().await.board_cards(board_id))
    }

    async fn get_card(&self, id: CardId) -> PlanboardResult<Card> {
        find_card(&*self.state.lock().await, id)
    }

    async fn create_card(&self, new_card: NewCard) -> PlanboardResult<Card> {
        self.execute(Box::new(CreateCard { new_card }), |s| {
            s.cards
                .last()
                .cloned()
                .ok_or_else(|| PlanboardError::Internal("Created card missing".to_string()))
        })
        .await
    }

    async fn update_card(&self, id: CardId, updates: CardUpdate) -> PlanboardResult<Card> {
        self.execute(
            Box::new(UpdateCard {
                card_id: id,
                updates,
            }),
            |s| find_card(s, id),
        )
        .await
    }

    async fn reorder_card(
        &self,
        id: CardId,
        column: Column,
        position: i32,
    ) -> PlanboardResult<Vec<Card>> {
        self.execute(
            Box::new(ReorderCard {
                card_id: id,
                column,
                position,
            }),
            |s| {
                let card = find_card(s, id)?;
                Ok(s.board_cards(card.board_id))
            },
        )
        .await
    }

    async fn soft_delete_card(&self, id: CardId) -> PlanboardResult<()> {
        self.execute(Box::new(SoftDeleteCard { card_id: id }), |_| Ok(()))
            .await
    }

    async fn restore_card(&self, id: CardId) -> PlanboardResult<Card> {
        self.execute(Box::new(RestoreCard { card_id: id }), |s| find_card(s, id))
            .await
    }

    async fn permanently_delete_card(&self, id: CardId) -> PlanboardResult<()> {
        self.execute(Box::new(PermanentlyDeleteCard { card_id: id }), |_| Ok(()))
            .await
    }

    async fn list_deleted_cards(&self, board_id: Option<BoardId>) -> PlanboardResult<Vec<Card>> {
        Ok(self.state.lock().await.deleted_cards(board_id))
    }

    async fn list_boards(&self) -> PlanboardResult<Vec<Board>> {
        Ok(self.state.lock().await.sorted_boards())
    }

    async fn create_board(&self, name: String, creator: Option<UserRef>) -> PlanboardResult<Board> {
        self.execute(Box::new(CreateBoard { name, creator }), |s| {
            s.boards
                .last()
                .cloned()
                .ok_or_else(|| PlanboardError::Internal("Created board missing".to_string()))
        })
        .await
    }

    async fn rename_board(&self, id: BoardId, name: String) -> PlanboardResult<Board> {
        self.execute(Box::new(RenameBoard { board_id: id, name }), |s| {
            find_board(s, id)
        })
        .await
    }

    async fn delete_board(&self, id: BoardId) -> PlanboardResult<()> {
        self.execute(Box::new(DeleteBoard { board_id: id }), |_| Ok(()))
            .await
    }
}
