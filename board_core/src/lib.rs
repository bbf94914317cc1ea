//! Client core for the shared tabletop board.
//!
//! Mirrors the backend's entity tables, repaints only the layers a
//! mutation touched (coalesced to one repaint per frame), keeps an
//! action-history cache the view can time-travel through, and turns
//! pointer gestures into reducer requests for the backend. All rules
//! live server-side; nothing here validates a move or rolls a die.

mod board;
mod font;
mod history;
mod input;
mod layer;
mod raster;
mod render;
mod store;

pub use board::{Board, BoardConfig};
pub use history::{ActionLog, HistoryCache, HistoryError, ViewMode, ACTION_LOG_CAPACITY};
pub use input::{hit_unit, DragState, PointerEvent, PointerPhase};
pub use layer::{Layer, LayerMask, RepaintCoalescer};
pub use raster::{PixelSurface, DEFAULT_STROKE};
pub use render::LayerStack;
pub use store::EntityStore;
