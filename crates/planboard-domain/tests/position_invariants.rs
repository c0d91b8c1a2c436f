use planboard_domain::commands::*;
use planboard_domain::position::{column_cards, verify_all_dense};
use planboard_domain::*;

struct Workspace {
    boards: Vec<Board>,
    cards: Vec<Card>,
}

impl Workspace {
    fn new() -> Self {
        Self {
            boards: vec![Board::new("Ops".to_string(), 0, None)],
            cards: Vec::new(),
        }
    }

    fn board(&self) -> Option<BoardId> {
        Some(self.boards[0].id)
    }

    fn execute(&mut self, command: Box<dyn Command>) -> planboard_core::PlanboardResult<()> {
        let mut ctx = CommandContext {
            boards: &mut self.boards,
            cards: &mut self.cards,
        };
        command.execute(&mut ctx)
    }

    fn create(&mut self, title: &str, status: Column) -> CardId {
        let new_card = NewCard::new(title, status, self.board());
        self.execute(Box::new(CreateCard { new_card })).unwrap();
        self.cards.last().unwrap().id
    }

    fn move_card(&mut self, id: CardId, column: Column, position: i32) {
        self.execute(Box::new(ReorderCard {
            card_id: id,
            column,
            position,
        }))
        .unwrap();
    }

    fn titles(&self, column: Column) -> Vec<String> {
        column_cards(&self.cards, ColumnKey::new(self.board(), column))
            .iter()
            .map(|c| c.title.clone())
            .collect()
    }

    fn visible_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_visible()).count()
    }
}

/// Small deterministic generator so the sequence test is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

#[test]
fn scenario_move_to_top_of_backlog() {
    let mut ws = Workspace::new();
    ws.create("A", Column::Backlog);
    ws.create("B", Column::Backlog);
    let c = ws.create("C", Column::Backlog);

    ws.move_card(c, Column::Backlog, 0);
    assert_eq!(ws.titles(Column::Backlog), vec!["C", "A", "B"]);
    let positions: Vec<_> = column_cards(&ws.cards, ColumnKey::new(ws.board(), Column::Backlog))
        .iter()
        .map(|c| c.position)
        .collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[test]
fn scenario_move_across_columns() {
    let mut ws = Workspace::new();
    let a = ws.create("A", Column::Backlog);
    ws.create("B", Column::Backlog);
    ws.create("X", Column::Done);

    ws.move_card(a, Column::Done, 0);
    assert_eq!(ws.titles(Column::Backlog), vec!["B"]);
    assert_eq!(ws.titles(Column::Done), vec!["A", "X"]);
    assert!(verify_all_dense(&ws.cards).is_ok());
}

#[test]
fn scenario_delete_then_reorder_across_gap() {
    let mut ws = Workspace::new();
    ws.create("A", Column::Backlog);
    let b = ws.create("B", Column::Backlog);
    let c = ws.create("C", Column::Backlog);

    ws.execute(Box::new(SoftDeleteCard { card_id: b })).unwrap();
    let view = column_cards(&ws.cards, ColumnKey::new(ws.board(), Column::Backlog));
    let positions: Vec<_> = view.iter().map(|c| (c.title.clone(), c.position)).collect();
    assert_eq!(
        positions,
        vec![("A".to_string(), 0), ("C".to_string(), 2)]
    );

    ws.move_card(c, Column::Backlog, 0);
    assert_eq!(ws.titles(Column::Backlog), vec!["C", "A"]);
    assert!(verify_all_dense(&ws.cards).is_ok());
}

#[test]
fn scenario_restore_into_free_slot() {
    let mut ws = Workspace::new();
    ws.create("A", Column::Backlog);
    let b = ws.create("B", Column::Backlog);
    ws.create("C", Column::Backlog);

    ws.execute(Box::new(SoftDeleteCard { card_id: b })).unwrap();
    ws.execute(Box::new(RestoreCard { card_id: b })).unwrap();
    assert_eq!(ws.titles(Column::Backlog), vec!["A", "B", "C"]);
}

#[test]
fn restore_collision_is_normalized_by_next_reorder() {
    let mut ws = Workspace::new();
    ws.create("A", Column::Backlog);
    let b = ws.create("B", Column::Backlog);
    let c = ws.create("C", Column::Backlog);

    ws.execute(Box::new(SoftDeleteCard { card_id: b })).unwrap();
    // C jumps to the top, so A now holds position 1 when B comes back.
    ws.move_card(c, Column::Backlog, 0);
    ws.execute(Box::new(RestoreCard { card_id: b })).unwrap();
    assert!(verify_all_dense(&ws.cards).is_err());

    ws.move_card(b, Column::Backlog, 0);
    assert!(verify_all_dense(&ws.cards).is_ok());
    assert_eq!(ws.titles(Column::Backlog).len(), 3);
}

#[test]
fn random_move_sequences_keep_columns_dense_and_conserve_cards() {
    let mut ws = Workspace::new();
    let mut ids = Vec::new();
    for (i, column) in Column::ALL.iter().cycle().take(12).enumerate() {
        ids.push(ws.create(&format!("card-{}", i), *column));
    }
    let total = ws.visible_count();
    let mut rng = Lcg(42);

    for _ in 0..500 {
        let id = ids[rng.next(ids.len() as u64) as usize];
        let column = Column::from_index(rng.next(4) as usize).unwrap();
        let position = rng.next(16) as i32 - 2;
        ws.move_card(id, column, position);

        assert!(verify_all_dense(&ws.cards).is_ok());
        assert_eq!(ws.visible_count(), total);
    }
}

#[test]
fn reorder_to_current_slot_writes_nothing() {
    let mut ws = Workspace::new();
    ws.create("A", Column::OnDeck);
    let b = ws.create("B", Column::OnDeck);
    let before = ws.cards.clone();

    let plan = plan_reorder(&ws.cards, b, Column::OnDeck, 1).unwrap();
    assert!(plan.is_noop());
    ws.move_card(b, Column::OnDeck, 1);
    assert_eq!(ws.cards, before);
}
