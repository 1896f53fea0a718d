//! Board geometry: shapes, the grid and the active piece.

pub use self::{board::*, piece::*, shape::*};

pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod shape;

/// Number of columns.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows.
pub const BOARD_HEIGHT: usize = 20;

/// Row of the bounding box's top edge for a freshly spawned piece.
pub const SPAWN_ROW: i32 = 0;
/// Column of the bounding box's left edge for a freshly spawned piece.
pub const SPAWN_COL: i32 = 3;
