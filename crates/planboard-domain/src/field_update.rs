use chrono::{DateTime, Utc};
use planboard_core::{PlanboardError, PlanboardResult};

use crate::card::{Card, CardPriority, CardType, UserRef};

/// Three-state update for an optional field.
///
/// ```
/// use planboard_domain::FieldUpdate;
///
/// let mut due: Option<u32> = Some(3);
/// FieldUpdate::NoChange.apply_to(&mut due);
/// assert_eq!(due, Some(3));
/// FieldUpdate::Clear.apply_to(&mut due);
/// assert_eq!(due, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    NoChange,
    Set(T),
    Clear,
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::NoChange
    }
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            FieldUpdate::NoChange => {}
            FieldUpdate::Set(value) => *field = Some(value),
            FieldUpdate::Clear => *field = None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, FieldUpdate::NoChange)
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Clear,
        }
    }
}

/// Partial card patch. Column and position are not patchable; moves go
/// through [`crate::reorder`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardUpdate {
    pub title: Option<String>,
    pub content: FieldUpdate<String>,
    pub priority: Option<CardPriority>,
    pub card_type: Option<CardType>,
    pub due_date: FieldUpdate<DateTime<Utc>>,
    pub assignee: FieldUpdate<UserRef>,
}

impl CardUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && !self.content.is_change()
            && self.priority.is_none()
            && self.card_type.is_none()
            && !self.due_date.is_change()
            && !self.assignee.is_change()
    }

    /// Validate, then apply to `card`. Nothing is written when validation fails.
    pub fn apply(self, card: &mut Card) -> PlanboardResult<()> {
        let title = self
            .title
            .as_deref()
            .map(Card::validate_title)
            .transpose()?;

        if card.is_deleted {
            return Err(PlanboardError::InvalidState(format!(
                "Card {} is deleted",
                card.id
            )));
        }

        if let Some(title) = title {
            card.title = title;
        }
        self.content.apply_to(&mut card.content);
        if let Some(priority) = self.priority {
            card.priority = priority;
        }
        if let Some(card_type) = self.card_type {
            card.card_type = card_type;
        }
        self.due_date.apply_to(&mut card.due_date);
        self.assignee.apply_to(&mut card.assignee);
        card.updated_at = Utc::now();
        Ok(())
    }
}
