use super::{Command, CommandContext};
use crate::position::{column_cards, next_position};
use crate::{Board, Column, ColumnKey, UserRef};
use chrono::Utc;
use planboard_core::{PlanboardError, PlanboardResult};
use uuid::Uuid;

/// Create a board appended after the existing tabs.
pub struct CreateBoard {
    pub name: String,
    pub creator: Option<UserRef>,
}

impl Command for CreateBoard {
    fn execute(&self, context: &mut CommandContext) -> PlanboardResult<()> {
        let name = Board::validate_name(&self.name)?;
        let position = context
            .boards
            .iter()
            .map(|b| b.position)
            .max()
            .map_or(0, |max| max + 1);
        context
            .boards
            .push(Board::new(name, position, self.creator.clone()));
        Ok(())
    }

    fn description(&self) -> String {
        format!("Create board: '{}'", self.name)
    }
}

pub struct RenameBoard {
    pub board_id: Uuid,
    pub name: String,
}

impl Command for RenameBoard {
    fn execute(&self, context: &mut CommandContext) -> PlanboardResult<()> {
        let name = Board::validate_name(&self.name)?;
        context.board_mut(self.board_id)?.update_name(name);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Rename board {} to '{}'", self.board_id, self.name)
    }
}

/// Delete a board and move its cards to the unassigned bucket.
///
/// Visible cards are appended after the bucket's existing cards column by
/// column, keeping their relative order. Soft-deleted cards are unassigned
/// with their stored positions.
pub struct DeleteBoard {
    pub board_id: Uuid,
}

impl Command for DeleteBoard {
    fn execute(&self, context: &mut CommandContext) -> PlanboardResult<()> {
        let index = context
            .boards
            .iter()
            .position(|b| b.id == self.board_id)
            .ok_or_else(|| PlanboardError::board_not_found(self.board_id))?;

        let now = Utc::now();
        let mut moved = 0;
        for column in Column::ALL {
            let source = ColumnKey::new(Some(self.board_id), column);
            let base = next_position(context.cards, ColumnKey::new(None, column));
            let order: Vec<Uuid> = column_cards(context.cards, source)
                .iter()
                .map(|c| c.id)
                .collect();

            for (offset, id) in order.iter().enumerate() {
                if let Some(card) = context.cards.iter_mut().find(|c| c.id == *id) {
                    card.board_id = None;
                    card.position = base + offset as i32;
                    card.updated_at = now;
                    moved += 1;
                }
            }
        }

        for card in context
            .cards
            .iter_mut()
            .filter(|c| c.board_id == Some(self.board_id))
        {
            card.board_id = None;
            card.updated_at = now;
        }

        context.boards.remove(index);
        context.boards.sort_by_key(|b| b.position);
        for (position, board) in context.boards.iter_mut().enumerate() {
            if board.position != position as i32 {
                board.update_position(position as i32);
            }
        }

        tracing::debug!(
            "Deleted board {}, moved {} cards to unassigned",
            self.board_id,
            moved
        );
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete board {}", self.board_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CreateCard, SoftDeleteCard};
    use crate::position::verify_all_dense;
    use crate::{Card, NewCard};

    fn run(boards: &mut Vec<Board>, cards: &mut Vec<Card>, command: impl Command) {
        let mut ctx = CommandContext { boards, cards };
        command.execute(&mut ctx).unwrap();
    }

    #[test]
    fn test_create_board_positions_and_validation() {
        let mut boards = vec![];
        let mut cards = vec![];
        run(
            &mut boards,
            &mut cards,
            CreateBoard {
                name: "Ops".to_string(),
                creator: Some(UserRef::new("u-1", "Sam")),
            },
        );
        run(
            &mut boards,
            &mut cards,
            CreateBoard {
                name: " Growth ".to_string(),
                creator: None,
            },
        );
        assert_eq!(boards[0].position, 0);
        assert_eq!(boards[1].position, 1);
        assert_eq!(boards[1].name, "Growth");

        let mut ctx = CommandContext {
            boards: &mut boards,
            cards: &mut cards,
        };
        let err = CreateBoard {
            name: "".to_string(),
            creator: None,
        }
        .execute(&mut ctx)
        .unwrap_err();
        assert!(matches!(err, PlanboardError::Validation(_)));
    }

    #[test]
    fn test_delete_board_unassigns_cards_without_losing_them() {
        let mut boards = vec![
            Board::new("Ops".to_string(), 0, None),
            Board::new("Growth".to_string(), 1, None),
        ];
        let ops = boards[0].id;
        let mut cards = vec![];

        run(
            &mut boards,
            &mut cards,
            CreateCard {
                new_card: NewCard::new("Legacy", Column::Backlog, None),
            },
        );
        for title in ["A", "B", "C"] {
            run(
                &mut boards,
                &mut cards,
                CreateCard {
                    new_card: NewCard::new(title, Column::Backlog, Some(ops)),
                },
            );
        }
        let b = cards.iter().find(|c| c.title == "B").unwrap().id;
        run(&mut boards, &mut cards, SoftDeleteCard { card_id: b });

        run(&mut boards, &mut cards, DeleteBoard { board_id: ops });

        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].name, "Growth");
        assert_eq!(boards[0].position, 0);
        assert_eq!(cards.len(), 4);
        assert!(cards.iter().all(|c| c.board_id.is_none()));

        let unassigned: Vec<_> = column_cards(&cards, ColumnKey::new(None, Column::Backlog))
            .iter()
            .map(|c| c.title.clone())
            .collect();
        assert_eq!(unassigned, vec!["Legacy", "A", "C"]);
        assert!(verify_all_dense(&cards).is_ok());
    }

    #[test]
    fn test_delete_unknown_board_not_found() {
        let mut boards = vec![];
        let mut cards = vec![];
        let mut ctx = CommandContext {
            boards: &mut boards,
            cards: &mut cards,
        };
        let err = DeleteBoard {
            board_id: Uuid::new_v4(),
        }
        .execute(&mut ctx)
        .unwrap_err();
        assert!(matches!(err, PlanboardError::NotFound(_)));
    }
}
