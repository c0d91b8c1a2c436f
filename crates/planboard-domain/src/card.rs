use chrono::{DateTime, Utc};
use planboard_core::{PlanboardError, PlanboardResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::board::BoardId;
use crate::column::{Column, ColumnKey};
use crate::position::Slot;

pub type CardId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl FromStr for CardPriority {
    type Err = PlanboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(PlanboardError::Validation(format!(
                "Unknown priority '{}'",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    #[default]
    Task,
    Research,
    Decision,
    Configuration,
    Bug,
    Feature,
}

impl FromStr for CardType {
    type Err = PlanboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "research" => Ok(Self::Research),
            "decision" => Ok(Self::Decision),
            "configuration" | "config" => Ok(Self::Configuration),
            "bug" => Ok(Self::Bug),
            "feature" => Ok(Self::Feature),
            _ => Err(PlanboardError::Validation(format!(
                "Unknown card type '{}'",
                s
            ))),
        }
    }
}

/// Reference to a person owned by an external identity system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub name: String,
}

impl UserRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    #[serde(default)]
    pub board_id: Option<BoardId>,
    pub title: String,
    /// Rich text body. Never interpreted here.
    #[serde(default)]
    pub content: Option<String>,
    pub status: Column,
    #[serde(default)]
    pub priority: CardPriority,
    #[serde(rename = "type", default)]
    pub card_type: CardType,
    pub position: i32,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignee: Option<UserRef>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(board_id: Option<BoardId>, title: String, status: Column, position: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id,
            title,
            content: None,
            status,
            priority: CardPriority::default(),
            card_type: CardType::default(),
            position,
            due_date: None,
            assignee: None,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a card from a creation request, appended at `position`.
    pub fn from_new(new: NewCard, position: i32) -> PlanboardResult<Self> {
        let title = Self::validate_title(&new.title)?;
        let mut card = Self::new(new.board_id, title, new.status, position);
        card.content = new.content;
        card.priority = new.priority;
        card.card_type = new.card_type;
        card.due_date = new.due_date;
        card.assignee = new.assignee;
        Ok(card)
    }

    /// Trim and reject empty titles.
    pub fn validate_title(title: &str) -> PlanboardResult<String> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(PlanboardError::Validation(
                "Card title must not be empty".to_string(),
            ));
        }
        Ok(trimmed.to_string())
    }

    pub fn column_key(&self) -> ColumnKey {
        ColumnKey::new(self.board_id, self.status)
    }

    pub fn slot(&self) -> Slot {
        Slot::new(self.status, self.position)
    }

    pub fn is_visible(&self) -> bool {
        !self.is_deleted
    }

    /// Hide the card. Sibling positions are left alone.
    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    /// Unhide the card at its stored position.
    pub fn restore(&mut self) {
        self.is_deleted = false;
        self.deleted_at = None;
        self.updated_at = Utc::now();
    }
}

/// Creation request for a card. The store assigns id and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCard {
    pub title: String,
    pub status: Column,
    #[serde(default)]
    pub board_id: Option<BoardId>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub priority: CardPriority,
    #[serde(rename = "type", default)]
    pub card_type: CardType,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignee: Option<UserRef>,
}

impl NewCard {
    pub fn new(title: impl Into<String>, status: Column, board_id: Option<BoardId>) -> Self {
        Self {
            title: title.into(),
            status,
            board_id,
            content: None,
            priority: CardPriority::default(),
            card_type: CardType::default(),
            due_date: None,
            assignee: None,
        }
    }

    pub fn with_priority(mut self, priority: CardPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_type(mut self, card_type: CardType) -> Self {
        self.card_type = card_type;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_assignee(mut self, assignee: UserRef) -> Self {
        self.assignee = Some(assignee);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_new_trims_title_and_copies_fields() {
        let board_id = Uuid::new_v4();
        let new = NewCard::new("  Wire up CI  ", Column::OnDeck, Some(board_id))
            .with_priority(CardPriority::Urgent)
            .with_type(CardType::Configuration)
            .with_assignee(UserRef::new("u-1", "Sam"));

        let card = Card::from_new(new, 3).unwrap();
        assert_eq!(card.title, "Wire up CI");
        assert_eq!(card.status, Column::OnDeck);
        assert_eq!(card.position, 3);
        assert_eq!(card.board_id, Some(board_id));
        assert_eq!(card.priority, CardPriority::Urgent);
        assert_eq!(card.card_type, CardType::Configuration);
        assert_eq!(card.assignee.as_ref().unwrap().name, "Sam");
        assert!(card.is_visible());
    }

    #[test]
    fn test_empty_title_rejected() {
        let new = NewCard::new("   ", Column::Backlog, None);
        assert!(matches!(
            Card::from_new(new, 0),
            Err(PlanboardError::Validation(_))
        ));
    }

    #[test]
    fn test_soft_delete_and_restore_keep_position() {
        let mut card = Card::new(None, "Audit".to_string(), Column::Backlog, 4);
        let now = Utc::now();

        card.soft_delete(now);
        assert!(card.is_deleted);
        assert_eq!(card.deleted_at, Some(now));
        assert_eq!(card.position, 4);

        card.restore();
        assert!(!card.is_deleted);
        assert_eq!(card.deleted_at, None);
        assert_eq!(card.position, 4);
    }

    #[test]
    fn test_type_field_serializes_as_type() {
        let card = Card::new(None, "Spike".to_string(), Column::Backlog, 0);
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["type"], "TASK");
        assert_eq!(value["status"], "BACKLOG");
        assert_eq!(value["priority"], "MEDIUM");
    }

    #[test]
    fn test_legacy_card_without_optional_fields_deserializes() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "title": "Legacy",
            "status": "DONE",
            "position": 0,
            "created_at": Utc::now(),
            "updated_at": Utc::now(),
        });
        let card: Card = serde_json::from_value(json).unwrap();
        assert_eq!(card.board_id, None);
        assert!(!card.is_deleted);
        assert_eq!(card.card_type, CardType::Task);
    }

    #[test]
    fn test_parse_priority_and_type_case_insensitive() {
        assert_eq!("URGENT".parse::<CardPriority>().unwrap(), CardPriority::Urgent);
        assert_eq!("low".parse::<CardPriority>().unwrap(), CardPriority::Low);
        assert_eq!("Bug".parse::<CardType>().unwrap(), CardType::Bug);
        assert!("critical".parse::<CardPriority>().is_err());
    }
}
