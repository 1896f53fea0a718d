use arrayvec::ArrayVec;

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::ActivePiece,
    shape::{BlockKind, Shape},
};

/// A single cell of the grid.
///
/// Ghost cells are a display overlay only. [`Cell::is_solid`] is false for
/// them, so they never take part in collision or line detection even if one
/// were written onto a [`Board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    /// Nothing here.
    #[default]
    Empty,
    /// A block of the given kind, either locked/active (`ghost == false`)
    /// or part of the landing preview (`ghost == true`).
    Block { kind: BlockKind, ghost: bool },
}

impl Cell {
    #[must_use]
    pub const fn solid(kind: BlockKind) -> Self {
        Cell::Block { kind, ghost: false }
    }

    #[must_use]
    pub const fn ghost(kind: BlockKind) -> Self {
        Cell::Block { kind, ghost: true }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Cell::Block { ghost: false, .. })
    }

    #[must_use]
    pub const fn is_ghost(self) -> bool {
        matches!(self, Cell::Block { ghost: true, .. })
    }

    #[must_use]
    pub const fn kind(self) -> Option<BlockKind> {
        match self {
            Cell::Empty => None,
            Cell::Block { kind, .. } => Some(kind),
        }
    }
}

/// One row of the grid.
pub type Row = [Cell; BOARD_WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; BOARD_WIDTH];

/// Converts signed board coordinates into indices, if they are on the board.
fn to_index(row: i32, col: i32) -> Option<(usize, usize)> {
    let row = usize::try_from(row).ok().filter(|r| *r < BOARD_HEIGHT)?;
    let col = usize::try_from(col).ok().filter(|c| *c < BOARD_WIDTH)?;
    Some((row, col))
}

fn shape_cells(shape: Shape, row: i32, col: i32) -> impl Iterator<Item = (i32, i32)> {
    shape.occupied_cells().map(move |(dr, dc)| {
        // Offsets are bounded by MAX_SHAPE_SIZE.
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let (dr, dc) = (dr as i32, dc as i32);
        (row + dr, col + dc)
    })
}

/// The authoritative grid of locked cells.
///
/// Always exactly [`BOARD_HEIGHT`] rows of [`BOARD_WIDTH`] cells; row 0 is
/// the top. Only solid cells are ever written here: the active piece and the
/// ghost preview live in a [`RenderBoard`].
///
/// # Example
///
/// ```
/// use stackfall_engine::{BlockKind, Board};
///
/// let board = Board::empty();
/// let o = BlockKind::O.spawn_shape();
/// assert!(!board.has_collision(o, 18, 0));
/// assert!(board.has_collision(o, 19, 0)); // below the floor
/// assert!(board.has_collision(o, 0, -1)); // past the left wall
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    /// Returns an all-empty board.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            rows: [EMPTY_ROW; BOARD_HEIGHT],
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.rows[row][col]
    }

    /// Locks a single solid cell. Coordinates must be on the board.
    pub fn fill_cell(&mut self, row: usize, col: usize, kind: BlockKind) {
        self.rows[row][col] = Cell::solid(kind);
    }

    /// Returns whether `shape` placed with its top-left corner at
    /// `(row, col)` overlaps a wall, the floor or a solid cell.
    ///
    /// Cells above the top edge (`row < 0`) are allowed.
    #[must_use]
    pub fn has_collision(&self, shape: Shape, row: i32, col: i32) -> bool {
        shape_cells(shape, row, col).any(|(r, c)| {
            if r < 0 {
                // Only the side walls extend above the board.
                return !usize::try_from(c).is_ok_and(|c| c < BOARD_WIDTH);
            }
            to_index(r, c).is_none_or(|(r, c)| self.rows[r][c].is_solid())
        })
    }

    /// Stamps the piece's cells onto the board as solid blocks.
    ///
    /// Cells above the top edge are discarded.
    pub fn fill_piece(&mut self, piece: &ActivePiece) {
        for (r, c) in piece.cells() {
            if let Some((r, c)) = to_index(r, c) {
                self.rows[r][c] = Cell::solid(piece.kind());
            }
        }
    }

    /// Removes every full row and inserts as many empty rows at the top.
    ///
    /// Rows are scanned bottom to top; the returned [`ClearedRows`] holds
    /// the indices the removed rows had before the clear.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ArrayVec::<usize, BOARD_HEIGHT>::new();
        for y in (0..BOARD_HEIGHT).rev() {
            if self.rows[y].iter().all(|cell| cell.is_solid()) {
                cleared.push(y);
                continue;
            }
            let count = cleared.len();
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..cleared.len()].fill(EMPTY_ROW);
        cleared.reverse();
        ClearedRows { rows: cleared }
    }

    /// Returns whether no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|cell| cell.is_empty())
    }
}

/// Rows removed by one [`Board::clear_full_rows`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearedRows {
    rows: ArrayVec<usize, BOARD_HEIGHT>,
}

impl ClearedRows {
    /// Builds a set of cleared rows from arbitrary indices (sorted ascending).
    ///
    /// # Panics
    ///
    /// Panics if more than [`BOARD_HEIGHT`] indices are given.
    #[must_use]
    pub fn from_indices(indices: &[usize]) -> Self {
        let mut rows: ArrayVec<usize, BOARD_HEIGHT> = indices.iter().copied().collect();
        rows.sort_unstable();
        Self { rows }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// Row indices (before removal), ascending.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.rows
    }

    /// Exactly four rows, all vertically adjacent.
    #[must_use]
    pub fn is_tetris(&self) -> bool {
        self.rows.len() == 4 && self.rows.windows(2).all(|w| w[1] == w[0] + 1)
    }
}

/// Display copy of a [`Board`] with overlays (active piece, ghost).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderBoard {
    rows: [Row; BOARD_HEIGHT],
}

impl RenderBoard {
    #[must_use]
    pub fn new(board: &Board) -> Self {
        Self { rows: board.rows }
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.rows[row][col]
    }

    /// Writes the piece's cells (those on the board) as `cell`.
    pub fn overlay(&mut self, piece: &ActivePiece, ghost: bool) {
        let cell = if ghost {
            Cell::ghost(piece.kind())
        } else {
            Cell::solid(piece.kind())
        };
        for (r, c) in piece.cells() {
            if let Some((r, c)) = to_index(r, c) {
                self.rows[r][c] = cell;
            }
        }
    }
}
