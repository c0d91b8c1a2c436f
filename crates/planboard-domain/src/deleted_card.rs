use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::card::{Card, CardId};

/// Snapshot of a soft-deleted card held for undo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedCardEntry {
    pub card: Card,
    pub deleted_at: DateTime<Utc>,
}

impl DeletedCardEntry {
    pub fn new(card: Card, deleted_at: DateTime<Utc>) -> Self {
        Self { card, deleted_at }
    }

    pub fn card_id(&self) -> CardId {
        self.card.id
    }

    /// True once strictly more than `window` has elapsed since deletion.
    pub fn is_expired(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.deleted_at > window
    }

    pub fn into_card(self) -> Card {
        self.card
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    #[test]
    fn test_expiry_boundary() {
        let deleted_at = Utc::now();
        let entry = DeletedCardEntry::new(
            Card::new(None, "Old".to_string(), Column::Done, 0),
            deleted_at,
        );
        let window = Duration::seconds(30);

        assert!(!entry.is_expired(deleted_at + Duration::seconds(29), window));
        assert!(!entry.is_expired(deleted_at + Duration::seconds(30), window));
        assert!(entry.is_expired(deleted_at + Duration::seconds(31), window));
    }
}
