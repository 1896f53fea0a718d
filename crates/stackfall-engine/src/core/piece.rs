use super::{
    SPAWN_COL, SPAWN_ROW,
    board::Board,
    shape::{BlockKind, Shape},
};

/// The falling, player-controlled piece.
///
/// `row`/`col` locate the top-left corner of the shape's bounding box on the
/// board and may be negative (above the top edge). Pieces are values:
/// movement and rotation return new pieces, and the engine decides whether to
/// accept them with [`Board::has_collision`].
///
/// # Example
///
/// ```
/// use stackfall_engine::{ActivePiece, BlockKind, Board};
///
/// let board = Board::empty();
/// let piece = ActivePiece::spawn(BlockKind::O);
/// assert_eq!(piece.drop_row(&board), 18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    kind: BlockKind,
    shape: Shape,
    row: i32,
    col: i32,
}

impl ActivePiece {
    #[must_use]
    pub const fn new(kind: BlockKind, shape: Shape, row: i32, col: i32) -> Self {
        Self {
            kind,
            shape,
            row,
            col,
        }
    }

    /// Places `kind` at the spawn position in its default orientation.
    #[must_use]
    pub const fn spawn(kind: BlockKind) -> Self {
        Self::new(kind, kind.spawn_shape(), SPAWN_ROW, SPAWN_COL)
    }

    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        self.kind
    }

    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    #[must_use]
    pub const fn col(&self) -> i32 {
        self.col
    }

    #[must_use]
    pub const fn shifted(&self, rows: i32, cols: i32) -> Self {
        Self::new(self.kind, self.shape, self.row + rows, self.col + cols)
    }

    /// Rotated 90° clockwise around the same anchor.
    #[must_use]
    pub const fn rotated(&self) -> Self {
        Self::new(self.kind, self.shape.rotated(), self.row, self.col)
    }

    /// Absolute `(row, col)` coordinates of the occupied cells.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (row, col) = (self.row, self.col);
        self.shape.occupied_cells().map(move |(dr, dc)| {
            // Offsets are bounded by MAX_SHAPE_SIZE.
            #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let (dr, dc) = (dr as i32, dc as i32);
            (row + dr, col + dc)
        })
    }

    #[must_use]
    pub fn is_colliding(&self, board: &Board) -> bool {
        board.has_collision(self.shape, self.row, self.col)
    }

    /// Whether moving one row down would still be legal.
    #[must_use]
    pub fn can_fall(&self, board: &Board) -> bool {
        !board.has_collision(self.shape, self.row + 1, self.col)
    }

    /// Lowest legal row for the current column and orientation.
    ///
    /// Both the ghost projection and the hard drop use this search.
    #[must_use]
    pub fn drop_row(&self, board: &Board) -> i32 {
        let mut row = self.row;
        while !board.has_collision(self.shape, row + 1, self.col) {
            row += 1;
        }
        row
    }

    #[must_use]
    pub fn dropped(&self, board: &Board) -> Self {
        Self::new(self.kind, self.shape, self.drop_row(board), self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_position() {
        let piece = ActivePiece::spawn(BlockKind::T);
        assert_eq!((piece.row(), piece.col()), (SPAWN_ROW, SPAWN_COL));
        assert_eq!(piece.shape(), BlockKind::T.spawn_shape());
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(cells, vec![(0, 4), (1, 3), (1, 4), (1, 5)]);
    }

    #[test]
    fn test_shift_and_rotate_keep_kind() {
        let piece = ActivePiece::spawn(BlockKind::L).shifted(2, -1).rotated();
        assert_eq!(piece.kind(), BlockKind::L);
        assert_eq!((piece.row(), piece.col()), (2, 2));
        assert_eq!(piece.shape(), BlockKind::L.spawn_shape().rotated());
    }

    #[test]
    fn test_drop_row_on_empty_board() {
        let board = Board::empty();
        // The I spawn pose occupies only the second row of its box.
        assert_eq!(ActivePiece::spawn(BlockKind::I).drop_row(&board), 18);
        assert_eq!(ActivePiece::spawn(BlockKind::O).drop_row(&board), 18);
        assert_eq!(ActivePiece::spawn(BlockKind::T).drop_row(&board), 18);
        let vertical_i = ActivePiece::spawn(BlockKind::I).rotated();
        assert_eq!(vertical_i.drop_row(&board), 16);
    }

    #[test]
    fn test_drop_row_lands_on_stack() {
        let mut board = Board::empty();
        board.fill_cell(12, 4, BlockKind::Z);
        let piece = ActivePiece::spawn(BlockKind::O);
        assert_eq!(piece.drop_row(&board), 10);
        assert!(!piece.dropped(&board).can_fall(&board));
        assert!(piece.can_fall(&board));
    }

    #[test]
    fn test_drop_row_is_current_row_when_grounded() {
        let board = Board::empty();
        let piece = ActivePiece::spawn(BlockKind::O).shifted(18, 0);
        assert_eq!(piece.drop_row(&board), 18);
        assert!(!piece.is_colliding(&board));
    }
}
