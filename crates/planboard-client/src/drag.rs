//! Drag session controller.
//!
//! Turns raw pointer or keyboard input into [`DragSignal`]s carrying
//! [`MoveIntent`]s. Both input paths produce the same intents, so the state
//! machine never knows which device moved the card.

use planboard_core::AppConfig;
use planboard_domain::{CardId, Column};

use crate::state::MoveIntent;
use crate::view::BoardView;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open: the right and bottom edges belong to the neighbour.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

#[derive(Debug, Clone, Copy)]
struct CardZone {
    card_id: CardId,
    column: Column,
    rect: Rect,
}

/// Hit areas registered by the renderer for the current frame.
#[derive(Debug, Clone, Default)]
pub struct DropZones {
    columns: Vec<(Column, Rect)>,
    cards: Vec<CardZone>,
}

impl DropZones {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_column(&mut self, column: Column, rect: Rect) {
        self.columns.retain(|(c, _)| *c != column);
        self.columns.push((column, rect));
    }

    pub fn add_card(&mut self, card_id: CardId, column: Column, rect: Rect) {
        self.cards.retain(|z| z.card_id != card_id);
        self.cards.push(CardZone {
            card_id,
            column,
            rect,
        });
    }

    pub fn clear(&mut self) {
        self.columns.clear();
        self.cards.clear();
    }

    /// Resolve where `dragged` would land if released at `point`.
    ///
    /// Over another card: before it in its upper half, after it in its lower
    /// half. Over empty column space: end of that column. Elsewhere: `None`.
    pub fn resolve(&self, point: Point, dragged: CardId) -> Option<MoveIntent> {
        if let Some(hit) = self
            .cards
            .iter()
            .find(|z| z.card_id != dragged && z.rect.contains(point))
        {
            let order = self.column_order(hit.column, dragged);
            let index = order.iter().position(|id| *id == hit.card_id)?;
            let position = if point.y < hit.rect.mid_y() {
                index
            } else {
                index + 1
            };
            return Some(MoveIntent::new(dragged, hit.column, position as i32));
        }

        self.columns
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(column, _)| {
                let end = self.column_order(*column, dragged).len();
                MoveIntent::new(dragged, *column, end as i32)
            })
    }

    /// Card ids of `column` top to bottom, without the dragged card.
    fn column_order(&self, column: Column, dragged: CardId) -> Vec<CardId> {
        let mut zones: Vec<&CardZone> = self
            .cards
            .iter()
            .filter(|z| z.column == column && z.card_id != dragged)
            .collect();
        zones.sort_by(|a, b| a.rect.y.total_cmp(&b.rect.y));
        zones.into_iter().map(|z| z.card_id).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardAction {
    PickUp,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Drop,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSignal {
    Started { card_id: CardId },
    Over(MoveIntent),
    /// The pointer left every drop zone.
    Left { card_id: CardId },
    Dropped(MoveIntent),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Idle,
    /// Pressed but not yet moved far enough.
    Armed { card_id: CardId, origin: Point },
    Pointer {
        card_id: CardId,
        intent: Option<MoveIntent>,
    },
    Keyboard { intent: MoveIntent },
}

#[derive(Debug, Clone)]
pub struct DragController {
    activation_distance: f32,
    mode: Mode,
}

impl DragController {
    pub fn new(activation_distance: f32) -> Self {
        Self {
            activation_distance,
            mode: Mode::Idle,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.drag_activation_distance)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.mode, Mode::Pointer { .. } | Mode::Keyboard { .. })
    }

    pub fn dragged_card(&self) -> Option<CardId> {
        match self.mode {
            Mode::Pointer { card_id, .. } => Some(card_id),
            Mode::Keyboard { intent } => Some(intent.card_id),
            Mode::Idle | Mode::Armed { .. } => None,
        }
    }

    pub fn intent(&self) -> Option<MoveIntent> {
        match self.mode {
            Mode::Pointer { intent, .. } => intent,
            Mode::Keyboard { intent } => Some(intent),
            Mode::Idle | Mode::Armed { .. } => None,
        }
    }

    pub fn pointer_down(&mut self, card_id: CardId, point: Point) {
        if self.mode != Mode::Idle {
            tracing::debug!("Ignoring press on card {} during a drag", card_id);
            return;
        }
        self.mode = Mode::Armed {
            card_id,
            origin: point,
        };
    }

    pub fn pointer_move(&mut self, point: Point, zones: &DropZones) -> Vec<DragSignal> {
        let mut signals = Vec::new();
        let (card_id, current) = match self.mode {
            Mode::Armed { card_id, origin } => {
                if origin.distance_to(point) < self.activation_distance {
                    return signals;
                }
                tracing::debug!("Pointer drag of card {} activated", card_id);
                signals.push(DragSignal::Started { card_id });
                (card_id, None)
            }
            Mode::Pointer { card_id, intent } => (card_id, intent),
            Mode::Idle | Mode::Keyboard { .. } => return signals,
        };

        let intent = zones.resolve(point, card_id);
        match intent {
            Some(intent) if current != Some(intent) => signals.push(DragSignal::Over(intent)),
            None if current.is_some() => {
                tracing::debug!("Card {} left every column", card_id);
                signals.push(DragSignal::Left { card_id });
            }
            _ => {}
        }
        self.mode = Mode::Pointer { card_id, intent };
        signals
    }

    /// Finish a pointer gesture. A release outside every column cancels.
    pub fn pointer_up(&mut self, point: Point, zones: &DropZones) -> Option<DragSignal> {
        match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Pointer { card_id, .. } => match zones.resolve(point, card_id) {
                Some(intent) => Some(DragSignal::Dropped(intent)),
                None => {
                    tracing::debug!("Card {} released outside any column", card_id);
                    Some(DragSignal::Cancelled)
                }
            },
            Mode::Keyboard { intent } => {
                self.mode = Mode::Keyboard { intent };
                None
            }
            Mode::Idle | Mode::Armed { .. } => None,
        }
    }

    /// Apply a keyboard action. `focused` is the card under the keyboard
    /// cursor and only matters for [`KeyboardAction::PickUp`].
    pub fn handle_key(
        &mut self,
        action: KeyboardAction,
        focused: Option<CardId>,
        view: &BoardView,
    ) -> Option<DragSignal> {
        match (self.mode, action) {
            (Mode::Idle, KeyboardAction::PickUp) => {
                let card_id = focused?;
                let (column, index) = view.locate(card_id)?;
                self.mode = Mode::Keyboard {
                    intent: MoveIntent::new(card_id, column, index as i32),
                };
                Some(DragSignal::Started { card_id })
            }
            (Mode::Keyboard { intent }, KeyboardAction::Drop) => {
                self.mode = Mode::Idle;
                Some(DragSignal::Dropped(intent))
            }
            (Mode::Keyboard { intent }, step) if step != KeyboardAction::Cancel => {
                let next = step_intent(intent, step, view)?;
                if next == intent {
                    return None;
                }
                self.mode = Mode::Keyboard { intent: next };
                Some(DragSignal::Over(next))
            }
            (_, KeyboardAction::Cancel) => self.cancel(),
            _ => None,
        }
    }

    /// Abort whatever gesture is in progress.
    pub fn cancel(&mut self) -> Option<DragSignal> {
        let was_active = self.is_active();
        self.mode = Mode::Idle;
        was_active.then_some(DragSignal::Cancelled)
    }
}

fn step_intent(intent: MoveIntent, action: KeyboardAction, view: &BoardView) -> Option<MoveIntent> {
    let end_of = |column: Column| -> i32 {
        view.column(column)
            .iter()
            .filter(|c| c.id != intent.card_id)
            .count() as i32
    };

    let next = match action {
        KeyboardAction::MoveUp => MoveIntent {
            position: (intent.position - 1).max(0),
            ..intent
        },
        KeyboardAction::MoveDown => MoveIntent {
            position: (intent.position + 1).min(end_of(intent.column)),
            ..intent
        },
        KeyboardAction::MoveLeft | KeyboardAction::MoveRight => {
            let column = if action == KeyboardAction::MoveLeft {
                intent.column.prev()?
            } else {
                intent.column.next()?
            };
            MoveIntent {
                column,
                position: intent.position.min(end_of(column)),
                ..intent
            }
        }
        KeyboardAction::PickUp | KeyboardAction::Drop | KeyboardAction::Cancel => return None,
    };
    Some(next)
}
