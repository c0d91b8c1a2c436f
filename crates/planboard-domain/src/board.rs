use chrono::{DateTime, Utc};
use planboard_core::{PlanboardError, PlanboardResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::UserRef;

pub type BoardId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    /// Tab order among boards.
    pub position: i32,
    #[serde(default)]
    pub creator: Option<UserRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    pub fn new(name: String, position: i32, creator: Option<UserRef>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            position,
            creator,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate_name(name: &str) -> PlanboardResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PlanboardError::Validation(
                "Board name must not be empty".to_string(),
            ));
        }
        Ok(trimmed.to_string())
    }

    pub fn update_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn update_position(&mut self, position: i32) {
        self.position = position;
        self.updated_at = Utc::now();
    }
}
