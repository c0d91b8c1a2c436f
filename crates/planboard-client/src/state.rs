//! Optimistic client state machine.
//!
//! [`BoardState`] owns the client's copy of one board and advances it through
//! [`BoardState::apply`]. Every transition is synchronous; work that needs the
//! store is returned as an [`Effect`] and its outcome is fed back in as a
//! response event carrying the request's sequence number.
//!
//! Sequence numbers only grow. A response is applied when its sequence is at
//! least that of the latest optimistic mutation and newer than the last
//! applied response. Anything else is discarded, and when the discarded
//! response means the local copy may have drifted from the server (a late
//! move result, a late rejection, or anything arriving while a move is still
//! unconfirmed) a refresh is requested in its place.

use chrono::{DateTime, Duration, Utc};
use planboard_core::{Notification, PlanboardError};
use planboard_domain::{plan_reorder, BoardId, Card, CardId, Column, DeletedCardEntry, Slot};
use serde::{Deserialize, Serialize};

use crate::undo::UndoBuffer;
use crate::view::BoardView;

/// Where a dragged card should land, independent of the input device.
///
/// `position` indexes the target column's ordering with the card removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub card_id: CardId,
    pub column: Column,
    pub position: i32,
}

impl MoveIntent {
    pub fn new(card_id: CardId, column: Column, position: i32) -> Self {
        Self {
            card_id,
            column,
            position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncPhase {
    #[default]
    Idle,
    Dragging,
    PendingCommit,
    Reconciled,
    RolledBack,
}

impl SyncPhase {
    pub fn is_resting(self) -> bool {
        matches!(self, Self::Idle | Self::Reconciled | Self::RolledBack)
    }
}

#[derive(Debug)]
pub enum StateEvent {
    DragStarted {
        card_id: CardId,
    },
    DragOver {
        intent: MoveIntent,
    },
    /// The dragged card is no longer over any column.
    DragLeft {
        card_id: CardId,
    },
    DragEnded,
    DragCancelled,
    CommitSucceeded {
        seq: u64,
        cards: Vec<Card>,
    },
    CommitFailed {
        seq: u64,
        error: PlanboardError,
    },
    RefreshRequested,
    RefreshSucceeded {
        seq: u64,
        cards: Vec<Card>,
    },
    RefreshFailed {
        seq: u64,
        error: PlanboardError,
    },
    DeleteRequested {
        card_id: CardId,
        now: DateTime<Utc>,
    },
    DeleteSucceeded {
        seq: u64,
        card_id: CardId,
    },
    DeleteFailed {
        seq: u64,
        card_id: CardId,
        error: PlanboardError,
    },
    RestoreRequested {
        card_id: CardId,
        now: DateTime<Utc>,
    },
    RestoreSucceeded {
        seq: u64,
        card: Card,
    },
    RestoreFailed {
        seq: u64,
        card_id: CardId,
        error: PlanboardError,
    },
    PermanentDeleteRequested {
        card_id: CardId,
    },
    PermanentDeleteSucceeded {
        seq: u64,
        card_id: CardId,
    },
    PermanentDeleteFailed {
        seq: u64,
        card_id: CardId,
        error: PlanboardError,
    },
    UndoSwept {
        now: DateTime<Utc>,
    },
}

/// Store work requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Commit { seq: u64, intent: MoveIntent },
    Refresh { seq: u64 },
    Delete { seq: u64, card_id: CardId },
    Restore { seq: u64, card_id: CardId },
    PermanentDelete { seq: u64, card_id: CardId },
}

impl Effect {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveDrag {
    card_id: CardId,
    /// Slot the card occupies in the last known truth.
    original: Slot,
    intent: Option<MoveIntent>,
    /// Phase to return to once the drag is over.
    resume: SyncPhase,
}

#[derive(Debug, Clone)]
struct Rollback {
    seq: u64,
    cards: Vec<Card>,
}

#[derive(Debug, Clone)]
pub struct BoardState {
    board_id: Option<BoardId>,
    cards: Vec<Card>,
    phase: SyncPhase,
    drag: Option<ActiveDrag>,
    rollback: Option<Rollback>,
    seq: u64,
    latest_mutation_seq: u64,
    last_applied_seq: u64,
    undo: UndoBuffer,
    notifications: Vec<Notification>,
}

impl BoardState {
    pub fn new(board_id: Option<BoardId>, cards: Vec<Card>, undo_window: Duration) -> Self {
        let mut state = Self {
            board_id,
            cards: Vec::new(),
            phase: SyncPhase::Idle,
            drag: None,
            rollback: None,
            seq: 0,
            latest_mutation_seq: 0,
            last_applied_seq: 0,
            undo: UndoBuffer::new(undo_window),
            notifications: Vec::new(),
        };
        state.replace_cards(cards);
        state
    }

    pub fn board_id(&self) -> Option<BoardId> {
        self.board_id
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn dragging(&self) -> Option<CardId> {
        self.drag.map(|d| d.card_id)
    }

    pub fn drag_intent(&self) -> Option<MoveIntent> {
        self.drag.and_then(|d| d.intent)
    }

    pub fn undo(&self) -> &UndoBuffer {
        &self.undo
    }

    pub fn latest_mutation_seq(&self) -> u64 {
        self.latest_mutation_seq
    }

    pub fn last_applied_seq(&self) -> u64 {
        self.last_applied_seq
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn view(&self) -> BoardView {
        BoardView::build(self.board_id, &self.cards, self.phase, self.dragging())
    }

    pub fn apply(&mut self, event: StateEvent) -> Effect {
        tracing::debug!("Applying {} in phase {:?}", event_name(&event), self.phase);
        match event {
            StateEvent::DragStarted { card_id } => self.on_drag_started(card_id),
            StateEvent::DragOver { intent } => self.on_drag_over(intent),
            StateEvent::DragLeft { card_id } => self.on_drag_left(card_id),
            StateEvent::DragEnded => self.on_drag_ended(),
            StateEvent::DragCancelled => self.on_drag_cancelled(),
            StateEvent::CommitSucceeded { seq, cards } => self.on_commit_succeeded(seq, cards),
            StateEvent::CommitFailed { seq, error } => self.on_commit_failed(seq, error),
            StateEvent::RefreshRequested => Effect::Refresh {
                seq: self.next_seq(),
            },
            StateEvent::RefreshSucceeded { seq, cards } => self.on_refresh_succeeded(seq, cards),
            StateEvent::RefreshFailed { seq, error } => self.on_refresh_failed(seq, error),
            StateEvent::DeleteRequested { card_id, now } => self.on_delete_requested(card_id, now),
            StateEvent::DeleteSucceeded { seq, card_id } => {
                self.on_confirmed("delete", seq, card_id)
            }
            StateEvent::DeleteFailed {
                seq,
                card_id,
                error,
            } => self.on_delete_failed(seq, card_id, error),
            StateEvent::RestoreRequested { card_id, now } => {
                self.on_restore_requested(card_id, now)
            }
            StateEvent::RestoreSucceeded { seq, card } => self.on_restore_succeeded(seq, card),
            StateEvent::RestoreFailed {
                seq,
                card_id,
                error,
            } => self.on_restore_failed(seq, card_id, error),
            StateEvent::PermanentDeleteRequested { card_id } => {
                self.on_permanent_delete_requested(card_id)
            }
            StateEvent::PermanentDeleteSucceeded { seq, card_id } => {
                self.on_confirmed("permanent delete", seq, card_id)
            }
            StateEvent::PermanentDeleteFailed {
                seq,
                card_id,
                error,
            } => self.on_permanent_delete_failed(seq, card_id, error),
            StateEvent::UndoSwept { now } => self.on_undo_swept(now),
        }
    }

    fn on_drag_started(&mut self, card_id: CardId) -> Effect {
        if let Some(active) = self.drag {
            tracing::warn!(
                "Refusing drag of card {}: card {} is already being dragged",
                card_id,
                active.card_id
            );
            self.notify(Notification::warning("A card is already being dragged"));
            return Effect::None;
        }

        let Some(card) = self.card(card_id) else {
            tracing::warn!("Refusing drag of unknown card {}", card_id);
            self.notify(Notification::warning(format!(
                "Card {} is not on this board",
                card_id
            )));
            return Effect::None;
        };

        self.drag = Some(ActiveDrag {
            card_id,
            original: card.slot(),
            intent: None,
            resume: self.phase,
        });
        self.phase = SyncPhase::Dragging;
        Effect::None
    }

    fn on_drag_over(&mut self, intent: MoveIntent) -> Effect {
        let Some(active) = self.drag.as_mut() else {
            tracing::debug!("Ignoring hover for card {} with no drag", intent.card_id);
            return Effect::None;
        };
        if active.card_id != intent.card_id {
            tracing::warn!(
                "Ignoring hover for card {} while dragging {}",
                intent.card_id,
                active.card_id
            );
            return Effect::None;
        }
        if active.intent == Some(intent) {
            return Effect::None;
        }

        active.intent = Some(intent);
        self.show_preview();
        Effect::None
    }

    fn on_drag_left(&mut self, card_id: CardId) -> Effect {
        let Some(active) = self.drag.as_mut() else {
            tracing::debug!("Ignoring leave for card {} with no drag", card_id);
            return Effect::None;
        };
        if active.card_id != card_id || active.intent.is_none() {
            return Effect::None;
        }

        active.intent = None;
        self.show_preview();
        Effect::None
    }

    fn on_drag_ended(&mut self) -> Effect {
        let Some(active) = self.drag.take() else {
            tracing::debug!("Ignoring drag end with no drag");
            return Effect::None;
        };
        self.put_back(&active);
        self.phase = active.resume;

        let Some(intent) = active.intent else {
            tracing::debug!("Drag of card {} ended without a target", active.card_id);
            return Effect::None;
        };

        let plan = match plan_reorder(&self.cards, intent.card_id, intent.column, intent.position)
        {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!("Could not plan move of card {}: {}", intent.card_id, e);
                self.notify(Notification::from_error("Could not move card", &e));
                return Effect::None;
            }
        };
        if plan.is_noop() {
            tracing::debug!("Card {} dropped on its original slot", intent.card_id);
            return Effect::None;
        }

        let before = self.cards.clone();
        plan.apply(&mut self.cards);
        let seq = self.next_mutation_seq();
        self.rollback = Some(Rollback { seq, cards: before });
        self.phase = SyncPhase::PendingCommit;
        tracing::debug!(
            "Optimistically moved card {} to {}[{}] (seq {})",
            intent.card_id,
            intent.column,
            plan.to.position,
            seq
        );
        Effect::Commit { seq, intent }
    }

    fn on_drag_cancelled(&mut self) -> Effect {
        if let Some(active) = self.drag.take() {
            self.put_back(&active);
            self.phase = active.resume;
            tracing::debug!("Drag of card {} cancelled", active.card_id);
        }
        Effect::None
    }

    fn on_commit_succeeded(&mut self, seq: u64, cards: Vec<Card>) -> Effect {
        if !self.accepts(seq) {
            return self.discard("commit", seq, true);
        }
        self.last_applied_seq = seq;
        self.rollback = None;
        self.replace_cards(cards);
        self.settle(SyncPhase::Reconciled);
        Effect::None
    }

    fn on_commit_failed(&mut self, seq: u64, error: PlanboardError) -> Effect {
        if !self.accepts(seq) {
            tracing::warn!("Move rejected (seq {}): {}", seq, error);
            self.notify(Notification::from_error("Could not move card", &error));
            if self.rollback.as_ref().is_some_and(|r| r.seq == seq)
                && self.resting_phase() == SyncPhase::PendingCommit
            {
                self.settle(SyncPhase::RolledBack);
            }
            return self.discard("commit failure", seq, true);
        }
        self.last_applied_seq = seq;
        if let Some(rollback) = self.rollback.take() {
            if rollback.seq == seq {
                self.cards = rollback.cards;
                self.rebase_drag();
            }
        }
        tracing::warn!("Move rejected (seq {}): {}", seq, error);
        self.notify(Notification::from_error("Could not move card", &error));
        self.settle(SyncPhase::RolledBack);
        Effect::Refresh {
            seq: self.next_seq(),
        }
    }

    fn on_refresh_succeeded(&mut self, seq: u64, cards: Vec<Card>) -> Effect {
        if !self.accepts(seq) {
            return self.discard("refresh", seq, false);
        }
        self.last_applied_seq = seq;
        self.replace_cards(cards);
        self.settle_pending();
        Effect::None
    }

    fn on_refresh_failed(&mut self, seq: u64, error: PlanboardError) -> Effect {
        if !self.accepts(seq) {
            return self.discard("refresh failure", seq, false);
        }
        tracing::warn!("Refresh failed (seq {}): {}", seq, error);
        self.notify(Notification::from_error("Could not refresh board", &error));
        self.settle_pending();
        Effect::None
    }

    fn on_delete_requested(&mut self, card_id: CardId, now: DateTime<Utc>) -> Effect {
        if self.dragging() == Some(card_id) {
            tracing::warn!("Refusing delete of card {} while it is dragged", card_id);
            self.notify(Notification::warning("Cannot delete a card while dragging it"));
            return Effect::None;
        }
        let Some(index) = self.cards.iter().position(|c| c.id == card_id) else {
            tracing::warn!("Refusing delete of unknown card {}", card_id);
            self.notify(Notification::warning(format!(
                "Card {} is not on this board",
                card_id
            )));
            return Effect::None;
        };

        let mut card = self.cards.remove(index);
        card.soft_delete(now);
        self.undo.push(DeletedCardEntry::new(card, now));
        let seq = self.next_mutation_seq();
        Effect::Delete { seq, card_id }
    }

    fn on_delete_failed(&mut self, seq: u64, card_id: CardId, error: PlanboardError) -> Effect {
        if !self.accepts(seq) {
            return self.discard("delete failure", seq, true);
        }
        self.last_applied_seq = seq;
        if let Some(entry) = self.undo.remove(card_id) {
            let mut card = entry.into_card();
            card.restore();
            self.insert_card(card);
        }
        tracing::warn!("Delete of card {} rejected: {}", card_id, error);
        self.notify(Notification::from_error("Could not delete card", &error));
        self.settle_pending();
        Effect::Refresh {
            seq: self.next_seq(),
        }
    }

    fn on_restore_requested(&mut self, card_id: CardId, now: DateTime<Utc>) -> Effect {
        let Some(entry) = self.undo.take(card_id, now) else {
            tracing::warn!("Refusing restore of card {}: not in undo window", card_id);
            self.notify(Notification::warning(format!(
                "Card {} can no longer be restored",
                card_id
            )));
            return Effect::None;
        };

        let mut card = entry.into_card();
        card.restore();
        self.insert_card(card);
        let seq = self.next_mutation_seq();
        Effect::Restore { seq, card_id }
    }

    fn on_restore_succeeded(&mut self, seq: u64, card: Card) -> Effect {
        if !self.accepts(seq) {
            return self.discard("restore", seq, false);
        }
        self.last_applied_seq = seq;
        self.insert_card(card);
        self.settle_pending();
        Effect::None
    }

    fn on_restore_failed(&mut self, seq: u64, card_id: CardId, error: PlanboardError) -> Effect {
        if !self.accepts(seq) {
            return self.discard("restore failure", seq, true);
        }
        self.last_applied_seq = seq;
        self.cards.retain(|c| c.id != card_id);
        tracing::warn!("Restore of card {} rejected: {}", card_id, error);
        self.notify(Notification::from_error("Could not restore card", &error));
        self.settle_pending();
        Effect::Refresh {
            seq: self.next_seq(),
        }
    }

    fn on_permanent_delete_requested(&mut self, card_id: CardId) -> Effect {
        if self.dragging() == Some(card_id) {
            tracing::warn!("Refusing purge of card {} while it is dragged", card_id);
            self.notify(Notification::warning("Cannot delete a card while dragging it"));
            return Effect::None;
        }
        self.undo.remove(card_id);
        self.cards.retain(|c| c.id != card_id);
        let seq = self.next_mutation_seq();
        Effect::PermanentDelete { seq, card_id }
    }

    fn on_permanent_delete_failed(
        &mut self,
        seq: u64,
        card_id: CardId,
        error: PlanboardError,
    ) -> Effect {
        if !self.accepts(seq) {
            return self.discard("permanent delete failure", seq, true);
        }
        self.last_applied_seq = seq;
        tracing::warn!("Permanent delete of card {} rejected: {}", card_id, error);
        self.notify(Notification::from_error("Could not delete card", &error));
        self.settle_pending();
        Effect::Refresh {
            seq: self.next_seq(),
        }
    }

    /// Success responses that carry no data.
    fn on_confirmed(&mut self, kind: &str, seq: u64, card_id: CardId) -> Effect {
        if !self.accepts(seq) {
            return self.discard(kind, seq, false);
        }
        tracing::debug!("Server confirmed {} of card {} (seq {})", kind, card_id, seq);
        self.last_applied_seq = seq;
        self.settle_pending();
        Effect::None
    }

    fn on_undo_swept(&mut self, now: DateTime<Utc>) -> Effect {
        let evicted = self.undo.sweep(now);
        if !evicted.is_empty() {
            tracing::debug!("Evicted {} expired undo entries", evicted.len());
        }
        Effect::None
    }

    fn accepts(&self, seq: u64) -> bool {
        seq >= self.latest_mutation_seq && seq > self.last_applied_seq
    }

    /// Drop a response overtaken by a newer request. `drifted` marks
    /// responses whose loss leaves the local copy possibly out of step with
    /// the server; those, and anything arriving while a move is unconfirmed,
    /// are answered with a refresh.
    fn discard(&mut self, kind: &str, seq: u64, drifted: bool) -> Effect {
        tracing::warn!(
            "Discarding stale {} response (seq {}, latest mutation {}, last applied {})",
            kind,
            seq,
            self.latest_mutation_seq,
            self.last_applied_seq
        );
        if self.rollback.as_ref().is_some_and(|r| r.seq == seq) {
            self.rollback = None;
        }
        if drifted || self.rollback.is_some() {
            let seq = self.next_seq();
            tracing::debug!("Requesting refresh (seq {}) to resync", seq);
            Effect::Refresh { seq }
        } else {
            Effect::None
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn next_mutation_seq(&mut self) -> u64 {
        let seq = self.next_seq();
        self.latest_mutation_seq = seq;
        seq
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Phase the state rests in once any drag in progress is over.
    fn resting_phase(&self) -> SyncPhase {
        self.drag.map_or(self.phase, |d| d.resume)
    }

    fn settle(&mut self, outcome: SyncPhase) {
        match self.drag.as_mut() {
            Some(active) => active.resume = outcome,
            None => self.phase = outcome,
        }
    }

    /// Leave `PendingCommit` once the move's own answer has been handled.
    fn settle_pending(&mut self) {
        if self.resting_phase() == SyncPhase::PendingCommit && self.rollback.is_none() {
            self.settle(SyncPhase::Reconciled);
        }
    }

    /// Take `cards` as the new truth for this board. Cards waiting in the
    /// undo buffer stay hidden.
    fn replace_cards(&mut self, cards: Vec<Card>) {
        let board_id = self.board_id;
        let undo = &self.undo;
        self.cards = cards
            .into_iter()
            .filter(|c| c.is_visible() && c.board_id == board_id && !undo.contains(c.id))
            .collect();
        self.rebase_drag();
    }

    fn insert_card(&mut self, card: Card) {
        if !card.is_visible() || card.board_id != self.board_id {
            return;
        }
        match self.cards.iter_mut().find(|c| c.id == card.id) {
            Some(existing) => *existing = card,
            None => self.cards.push(card),
        }
    }

    /// Re-anchor an active drag on fresh data and re-apply its preview, or
    /// cancel it if the dragged card is gone.
    fn rebase_drag(&mut self) {
        let Some(mut active) = self.drag else {
            return;
        };
        match self.card(active.card_id) {
            Some(card) => {
                active.original = card.slot();
                self.drag = Some(active);
                self.show_preview();
            }
            None => {
                tracing::warn!("Dragged card {} vanished; cancelling drag", active.card_id);
                self.drag = None;
                self.phase = active.resume;
                self.notify(Notification::warning(
                    "The card you were moving was removed",
                ));
            }
        }
    }

    fn show_preview(&mut self) {
        let Some(active) = self.drag else {
            return;
        };
        let column = active.intent.map_or(active.original.column, |i| i.column);
        if let Some(card) = self.cards.iter_mut().find(|c| c.id == active.card_id) {
            card.status = column;
        }
    }

    fn put_back(&mut self, active: &ActiveDrag) {
        if let Some(card) = self.cards.iter_mut().find(|c| c.id == active.card_id) {
            card.status = active.original.column;
            card.position = active.original.position;
        }
    }
}

fn event_name(event: &StateEvent) -> &'static str {
    match event {
        StateEvent::DragStarted { .. } => "DragStarted",
        StateEvent::DragOver { .. } => "DragOver",
        StateEvent::DragLeft { .. } => "DragLeft",
        StateEvent::DragEnded => "DragEnded",
        StateEvent::DragCancelled => "DragCancelled",
        StateEvent::CommitSucceeded { .. } => "CommitSucceeded",
        StateEvent::CommitFailed { .. } => "CommitFailed",
        StateEvent::RefreshRequested => "RefreshRequested",
        StateEvent::RefreshSucceeded { .. } => "RefreshSucceeded",
        StateEvent::RefreshFailed { .. } => "RefreshFailed",
        StateEvent::DeleteRequested { .. } => "DeleteRequested",
        StateEvent::DeleteSucceeded { .. } => "DeleteSucceeded",
        StateEvent::DeleteFailed { .. } => "DeleteFailed",
        StateEvent::RestoreRequested { .. } => "RestoreRequested",
        StateEvent::RestoreSucceeded { .. } => "RestoreSucceeded",
        StateEvent::RestoreFailed { .. } => "RestoreFailed",
        StateEvent::PermanentDeleteRequested { .. } => "PermanentDeleteRequested",
        StateEvent::PermanentDeleteSucceeded { .. } => "PermanentDeleteSucceeded",
        StateEvent::PermanentDeleteFailed { .. } => "PermanentDeleteFailed",
        StateEvent::UndoSwept { .. } => "UndoSwept",
    }
}
