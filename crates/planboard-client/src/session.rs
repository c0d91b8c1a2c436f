use chrono::Utc;
use parking_lot::Mutex;
use planboard_core::{AppConfig, Notification, PlanboardResult};
use planboard_domain::{BoardId, CardId, CardStore};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::drag::DragSignal;
use crate::state::{BoardState, Effect, MoveIntent, StateEvent, SyncPhase};
use crate::view::BoardView;

/// Async driver connecting a [`BoardState`] to a [`CardStore`].
///
/// Cheap to clone; clones share the same state. Each public operation feeds
/// an event to the reducer, runs the resulting effect against the store, and
/// feeds the outcome back until no effect remains. The state lock is never
/// held across an `.await`, so overlapping operations interleave and their
/// responses may arrive out of order; the reducer's sequence guard sorts
/// that out.
#[derive(Clone)]
pub struct BoardClient {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn CardStore>,
    state: Mutex<BoardState>,
    view_tx: watch::Sender<BoardView>,
    config: AppConfig,
}

impl BoardClient {
    /// Open the first board, creating the default board when none exists.
    pub async fn connect(store: Arc<dyn CardStore>, config: AppConfig) -> PlanboardResult<Self> {
        let boards = store.list_boards().await?;
        let board = match boards.into_iter().next() {
            Some(board) => board,
            None => {
                tracing::info!("No boards found, creating '{}'", config.default_board_name);
                store
                    .create_board(config.default_board_name.clone(), None)
                    .await?
            }
        };
        Self::open(store, Some(board.id), config).await
    }

    /// Open a specific board, or the unassigned bucket when `board_id` is `None`.
    pub async fn open(
        store: Arc<dyn CardStore>,
        board_id: Option<BoardId>,
        config: AppConfig,
    ) -> PlanboardResult<Self> {
        let cards = store.list_cards(board_id).await?;
        let state = BoardState::new(board_id, cards, config.undo_window());
        let (view_tx, _) = watch::channel(state.view());

        tracing::debug!(
            "Opened board {:?} with {} cards",
            board_id,
            state.cards().len()
        );
        Ok(Self {
            inner: Arc::new(Inner {
                store,
                state: Mutex::new(state),
                view_tx,
                config,
            }),
        })
    }

    pub fn board_id(&self) -> Option<BoardId> {
        self.inner.state.lock().board_id()
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn view(&self) -> BoardView {
        self.inner.view_tx.borrow().clone()
    }

    /// Receiver that sees a new view after every transition.
    pub fn subscribe(&self) -> watch::Receiver<BoardView> {
        self.inner.view_tx.subscribe()
    }

    pub fn phase(&self) -> SyncPhase {
        self.inner.state.lock().phase()
    }

    /// Copy of the reducer state, for inspection.
    pub fn state(&self) -> BoardState {
        self.inner.state.lock().clone()
    }

    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.inner.state.lock().drain_notifications()
    }

    pub fn begin_drag(&self, card_id: CardId) {
        self.dispatch(StateEvent::DragStarted { card_id });
    }

    pub fn update_drag_target(&self, intent: MoveIntent) {
        self.dispatch(StateEvent::DragOver { intent });
    }

    /// Drop the hover target while keeping the card picked up.
    pub fn clear_drag_target(&self, card_id: CardId) {
        self.dispatch(StateEvent::DragLeft { card_id });
    }

    pub fn cancel_drag(&self) {
        self.dispatch(StateEvent::DragCancelled);
    }

    /// Drop the dragged card on its current target and sync the move.
    pub async fn end_drag(&self) {
        let effect = self.dispatch(StateEvent::DragEnded);
        self.run(effect).await;
    }

    /// Feed a drag controller signal through the matching operation.
    pub async fn handle_signal(&self, signal: DragSignal) {
        match signal {
            DragSignal::Started { card_id } => self.begin_drag(card_id),
            DragSignal::Over(intent) => self.update_drag_target(intent),
            DragSignal::Left { card_id } => self.clear_drag_target(card_id),
            DragSignal::Dropped(intent) => {
                self.update_drag_target(intent);
                self.end_drag().await;
            }
            DragSignal::Cancelled => self.cancel_drag(),
        }
    }

    pub async fn request_delete(&self, card_id: CardId) {
        let effect = self.dispatch(StateEvent::DeleteRequested {
            card_id,
            now: Utc::now(),
        });
        self.run(effect).await;
    }

    pub async fn request_restore(&self, card_id: CardId) {
        let effect = self.dispatch(StateEvent::RestoreRequested {
            card_id,
            now: Utc::now(),
        });
        self.run(effect).await;
    }

    pub async fn request_permanent_delete(&self, card_id: CardId) {
        let effect = self.dispatch(StateEvent::PermanentDeleteRequested { card_id });
        self.run(effect).await;
    }

    /// Reload the board from the store.
    pub async fn refresh(&self) {
        let effect = self.dispatch(StateEvent::RefreshRequested);
        self.run(effect).await;
    }

    /// Evict expired undo entries now.
    pub fn sweep_undo(&self) {
        self.dispatch(StateEvent::UndoSwept { now: Utc::now() });
    }

    /// Periodically evict expired undo entries until the task is aborted.
    pub fn spawn_undo_sweeper(&self) -> JoinHandle<()> {
        let client = self.clone();
        let period = self.inner.config.undo_sweep_interval();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                client.sweep_undo();
            }
        })
    }

    fn dispatch(&self, event: StateEvent) -> Effect {
        let mut state = self.inner.state.lock();
        let effect = state.apply(event);
        self.inner.view_tx.send_replace(state.view());
        effect
    }

    async fn run(&self, mut effect: Effect) {
        let store = &self.inner.store;
        loop {
            let event = match effect {
                Effect::None => return,
                Effect::Commit { seq, intent } => {
                    match store
                        .reorder_card(intent.card_id, intent.column, intent.position)
                        .await
                    {
                        Ok(cards) => StateEvent::CommitSucceeded { seq, cards },
                        Err(error) => StateEvent::CommitFailed { seq, error },
                    }
                }
                Effect::Refresh { seq } => {
                    let board_id = self.board_id();
                    match store.list_cards(board_id).await {
                        Ok(cards) => StateEvent::RefreshSucceeded { seq, cards },
                        Err(error) => StateEvent::RefreshFailed { seq, error },
                    }
                }
                Effect::Delete { seq, card_id } => match store.soft_delete_card(card_id).await {
                    Ok(()) => StateEvent::DeleteSucceeded { seq, card_id },
                    Err(error) => StateEvent::DeleteFailed {
                        seq,
                        card_id,
                        error,
                    },
                },
                Effect::Restore { seq, card_id } => match store.restore_card(card_id).await {
                    Ok(card) => StateEvent::RestoreSucceeded { seq, card },
                    Err(error) => StateEvent::RestoreFailed {
                        seq,
                        card_id,
                        error,
                    },
                },
                Effect::PermanentDelete { seq, card_id } => {
                    match store.permanently_delete_card(card_id).await {
                        Ok(()) => StateEvent::PermanentDeleteSucceeded { seq, card_id },
                        Err(error) => StateEvent::PermanentDeleteFailed {
                            seq,
                            card_id,
                            error,
                        },
                    }
                }
            };
            effect = self.dispatch(event);
        }
    }
}
