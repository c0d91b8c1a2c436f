use planboard_core::PlanboardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::board::BoardId;

/// Fixed workflow stages. Declaration order is the left-to-right board order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Column {
    #[default]
    Backlog,
    OnDeck,
    InProgress,
    Done,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Backlog,
        Column::OnDeck,
        Column::InProgress,
        Column::Done,
    ];

    pub fn index(self) -> usize {
        match self {
            Column::Backlog => 0,
            Column::OnDeck => 1,
            Column::InProgress => 2,
            Column::Done => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Column to the right, if any.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Column to the left, if any.
    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Column::Backlog => "BACKLOG",
            Column::OnDeck => "ON_DECK",
            Column::InProgress => "IN_PROGRESS",
            Column::Done => "DONE",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = PlanboardError;

    /// Accepts `ON_DECK`, `on-deck`, `On Deck`, `ondeck` and friends.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "backlog" => Ok(Column::Backlog),
            "ondeck" => Ok(Column::OnDeck),
            "inprogress" => Ok(Column::InProgress),
            "done" => Ok(Column::Done),
            _ => Err(PlanboardError::InvalidState(format!(
                "Unknown column '{}'",
                s
            ))),
        }
    }
}

/// A `(board, column)` partition of the position space. `board_id == None`
/// is the unassigned bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey {
    pub board_id: Option<BoardId>,
    pub column: Column,
}

impl ColumnKey {
    pub fn new(board_id: Option<BoardId>, column: Column) -> Self {
        Self { board_id, column }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.board_id {
            Some(board_id) => write!(f, "{}/{}", board_id, self.column),
            None => write!(f, "unassigned/{}", self.column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbours() {
        assert_eq!(Column::Backlog.prev(), None);
        assert_eq!(Column::Backlog.next(), Some(Column::OnDeck));
        assert_eq!(Column::InProgress.prev(), Some(Column::OnDeck));
        assert_eq!(Column::Done.next(), None);
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!("BACKLOG".parse::<Column>().unwrap(), Column::Backlog);
        assert_eq!("on-deck".parse::<Column>().unwrap(), Column::OnDeck);
        assert_eq!("In Progress".parse::<Column>().unwrap(), Column::InProgress);
        assert_eq!("IN_PROGRESS".parse::<Column>().unwrap(), Column::InProgress);
        assert_eq!("done".parse::<Column>().unwrap(), Column::Done);
    }

    #[test]
    fn test_unknown_column_is_invalid_state() {
        let err = "ARCHIVE".parse::<Column>().unwrap_err();
        assert!(matches!(err, PlanboardError::InvalidState(_)));
    }

    #[test]
    fn test_serde_uses_screaming_case() {
        let json = serde_json::to_string(&Column::OnDeck).unwrap();
        assert_eq!(json, "\"ON_DECK\"");
        let back: Column = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(back, Column::InProgress);
    }

    #[test]
    fn test_all_is_in_index_order() {
        for (i, column) in Column::ALL.iter().enumerate() {
            assert_eq!(column.index(), i);
            assert_eq!(Column::from_index(i), Some(*column));
        }
    }
}
