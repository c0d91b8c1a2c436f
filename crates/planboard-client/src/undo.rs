use chrono::{DateTime, Duration, Utc};
use planboard_domain::{CardId, DeletedCardEntry};

/// Recently deleted cards that can still be restored.
///
/// Entries are kept newest last. An entry older than the window is never
/// handed out, even if no sweep has evicted it yet.
#[derive(Debug, Clone)]
pub struct UndoBuffer {
    entries: Vec<DeletedCardEntry>,
    window: Duration,
}

impl UndoBuffer {
    pub fn new(window: Duration) -> Self {
        Self {
            entries: Vec::new(),
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a deletion, replacing any older entry for the same card.
    pub fn push(&mut self, entry: DeletedCardEntry) {
        self.entries.retain(|e| e.card_id() != entry.card_id());
        self.entries.push(entry);
    }

    /// Remove and return the entry for `card_id` if it is still within the window.
    pub fn take(&mut self, card_id: CardId, now: DateTime<Utc>) -> Option<DeletedCardEntry> {
        let index = self.entries.iter().position(|e| e.card_id() == card_id)?;
        let entry = self.entries.remove(index);
        if entry.is_expired(now, self.window) {
            tracing::debug!("Undo entry for card {} expired", card_id);
            return None;
        }
        Some(entry)
    }

    /// Drop the entry for `card_id` regardless of age.
    pub fn remove(&mut self, card_id: CardId) -> Option<DeletedCardEntry> {
        let index = self.entries.iter().position(|e| e.card_id() == card_id)?;
        Some(self.entries.remove(index))
    }

    /// Evict expired entries, returning the ids that were dropped.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> Vec<CardId> {
        let window = self.window;
        let mut evicted = Vec::new();
        self.entries.retain(|e| {
            if e.is_expired(now, window) {
                evicted.push(e.card_id());
                false
            } else {
                true
            }
        });
        evicted
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.entries.iter().any(|e| e.card_id() == card_id)
    }

    pub fn entries(&self) -> &[DeletedCardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planboard_domain::{Card, Column};

    fn entry(title: &str, deleted_at: DateTime<Utc>) -> DeletedCardEntry {
        let mut card = Card::new(None, title.to_string(), Column::Backlog, 0);
        card.soft_delete(deleted_at);
        DeletedCardEntry::new(card, deleted_at)
    }

    #[test]
    fn test_take_within_window() {
        let now = Utc::now();
        let mut buffer = UndoBuffer::new(Duration::seconds(30));
        let e = entry("A", now);
        let id = e.card_id();
        buffer.push(e);

        let taken = buffer.take(id, now + Duration::seconds(10)).unwrap();
        assert_eq!(taken.card_id(), id);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_take_refuses_expired_before_sweep() {
        let now = Utc::now();
        let mut buffer = UndoBuffer::new(Duration::seconds(30));
        let e = entry("A", now);
        let id = e.card_id();
        buffer.push(e);

        assert!(buffer.take(id, now + Duration::seconds(31)).is_none());
        assert!(!buffer.contains(id));
    }

    #[test]
    fn test_sweep_evicts_only_expired() {
        let now = Utc::now();
        let mut buffer = UndoBuffer::new(Duration::seconds(30));
        let old = entry("Old", now - Duration::seconds(45));
        let fresh = entry("Fresh", now - Duration::seconds(5));
        let old_id = old.card_id();
        let fresh_id = fresh.card_id();
        buffer.push(old);
        buffer.push(fresh);

        assert_eq!(buffer.sweep(now), vec![old_id]);
        assert_eq!(buffer.len(), 1);
        assert!(buffer.contains(fresh_id));
    }

    #[test]
    fn test_push_replaces_same_card() {
        let now = Utc::now();
        let mut buffer = UndoBuffer::new(Duration::seconds(30));
        let first = entry("A", now - Duration::seconds(20));
        let id = first.card_id();
        let mut again = first.clone();
        again.deleted_at = now;
        buffer.push(first);
        buffer.push(again);

        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.entries()[0].deleted_at, now);
        assert!(buffer.remove(id).is_some());
        assert!(buffer.remove(id).is_none());
    }
}
