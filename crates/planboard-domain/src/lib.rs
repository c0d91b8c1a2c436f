pub mod board;
pub mod card;
pub mod column;
pub mod commands;
pub mod deleted_card;
pub mod field_update;
pub mod operations;
pub mod position;
pub mod reorder;
pub mod snapshot;

pub use board::{Board, BoardId};
pub use card::{Card, CardId, CardPriority, CardType, NewCard, UserRef};
pub use column::{Column, ColumnKey};
pub use deleted_card::DeletedCardEntry;
pub use field_update::{CardUpdate, FieldUpdate};
pub use operations::CardStore;
pub use position::Slot;
pub use reorder::{plan_reorder, reorder, PositionChange, ReorderPlan};
pub use snapshot::Snapshot;
