pub mod drag;
pub mod keymap;
pub mod session;
pub mod state;
pub mod undo;
pub mod view;

pub use drag::{DragController, DragSignal, DropZones, KeyboardAction, Point, Rect};
pub use keymap::keyboard_action;
pub use session::BoardClient;
pub use state::{BoardState, Effect, MoveIntent, StateEvent, SyncPhase};
pub use undo::UndoBuffer;
pub use view::{BoardView, ColumnView};
