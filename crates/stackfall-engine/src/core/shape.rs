use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Largest bounding box among the seven shapes (the I-piece).
pub const MAX_SHAPE_SIZE: usize = 4;

/// The seven block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum BlockKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<BlockKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BlockKind {
        BlockKind::ALL[rng.random_range(0..BlockKind::LEN)]
    }
}

impl BlockKind {
    /// Number of block kinds (7).
    pub const LEN: usize = 7;

    /// All kinds, in catalog order.
    pub const ALL: [Self; Self::LEN] = [
        BlockKind::I,
        BlockKind::J,
        BlockKind::L,
        BlockKind::O,
        BlockKind::S,
        BlockKind::T,
        BlockKind::Z,
    ];

    /// Returns the shape of this kind in its spawn orientation.
    #[must_use]
    pub const fn spawn_shape(self) -> Shape {
        SPAWN_SHAPES[self as usize]
    }

    /// Returns the single character representation of this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_engine::BlockKind;
    ///
    /// assert_eq!(BlockKind::I.as_char(), 'I');
    /// assert_eq!(BlockKind::Z.as_char(), 'Z');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            BlockKind::I => 'I',
            BlockKind::J => 'J',
            BlockKind::L => 'L',
            BlockKind::O => 'O',
            BlockKind::S => 'S',
            BlockKind::T => 'T',
            BlockKind::Z => 'Z',
        }
    }

    /// Parses a kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_engine::BlockKind;
    ///
    /// assert_eq!(BlockKind::from_char('T'), Some(BlockKind::T));
    /// assert_eq!(BlockKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(BlockKind::I),
            'J' => Some(BlockKind::J),
            'L' => Some(BlockKind::L),
            'O' => Some(BlockKind::O),
            'S' => Some(BlockKind::S),
            'T' => Some(BlockKind::T),
            'Z' => Some(BlockKind::Z),
            _ => None,
        }
    }
}

/// One rotation pose of a block: a square occupancy matrix.
///
/// Only the top-left `size × size` corner of the 4×4 storage is meaningful.
/// Rotation is computed, not looked up: [`Shape::rotated`] turns the bounding
/// box 90° clockwise and never moves it.
///
/// # Example
///
/// ```
/// use stackfall_engine::BlockKind;
///
/// let t = BlockKind::T.spawn_shape();
/// assert_eq!(t.rotated().rotated().rotated().rotated(), t);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    size: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Side length of the bounding box.
    #[must_use]
    pub const fn size(self) -> usize {
        self.size as usize
    }

    /// Returns whether the cell at `(row, col)` of the bounding box is occupied.
    #[must_use]
    pub const fn is_occupied(self, row: usize, col: usize) -> bool {
        row < self.size() && col < self.size() && self.cells[row][col]
    }

    /// Returns the shape rotated 90° clockwise inside the same bounding box.
    #[must_use]
    pub const fn rotated(self) -> Self {
        let size = self.size();
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < size {
            let mut c = 0;
            while c < size {
                cells[c][size - 1 - r] = self.cells[r][c];
                c += 1;
            }
            r += 1;
        }
        Self {
            size: self.size,
            cells,
        }
    }

    /// Iterates over the `(row, col)` offsets of the occupied cells.
    pub fn occupied_cells(self) -> impl Iterator<Item = (usize, usize)> {
        let size = self.size();
        (0..size).flat_map(move |row| {
            (0..size).filter_map(move |col| self.cells[row][col].then_some((row, col)))
        })
    }

    /// Iterates over the rows of the bounding box.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells[..self.size()].iter().map(|row| &row[..self.size()])
    }
}

const SPAWN_SHAPES: [Shape; BlockKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];

    const fn s(size: u8, cells: [[bool; 4]; 4]) -> Shape {
        Shape { size, cells }
    }

    [
        // I-piece
        s(4, [EEEE, [C, C, C, C], EEEE, EEEE]),
        // J-piece
        s(3, [[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // L-piece
        s(3, [[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
        // O-piece
        s(2, [[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // S-piece
        s(3, [[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // T-piece
        s(3, [[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
        // Z-piece
        s(3, [[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
    ]
};

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn cells(shape: Shape) -> Vec<(usize, usize)> {
        shape.occupied_cells().collect()
    }

    #[test]
    fn test_every_shape_has_four_cells() {
        for kind in BlockKind::ALL {
            let mut shape = kind.spawn_shape();
            for _ in 0..4 {
                assert_eq!(shape.occupied_cells().count(), 4, "{kind:?}");
                shape = shape.rotated();
            }
        }
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for kind in BlockKind::ALL {
            let shape = kind.spawn_shape();
            assert_eq!(shape.rotated().rotated().rotated().rotated(), shape);
        }
    }

    #[test]
    fn test_bounding_box_sizes() {
        assert_eq!(BlockKind::I.spawn_shape().size(), 4);
        assert_eq!(BlockKind::O.spawn_shape().size(), 2);
        for kind in [
            BlockKind::J,
            BlockKind::L,
            BlockKind::S,
            BlockKind::T,
            BlockKind::Z,
        ] {
            assert_eq!(kind.spawn_shape().size(), 3);
        }
    }

    #[test]
    fn test_i_rotates_into_third_column() {
        let i = BlockKind::I.spawn_shape();
        assert_eq!(cells(i), vec![(1, 0), (1, 1), (1, 2), (1, 3)]);
        assert_eq!(cells(i.rotated()), vec![(0, 2), (1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn test_o_is_rotation_invariant() {
        let o = BlockKind::O.spawn_shape();
        assert_eq!(o.rotated(), o);
    }

    #[test]
    fn test_t_rotates_clockwise() {
        // .#.      .#.
        // ###  ->  .##
        // ...      .#.
        let t = BlockKind::T.spawn_shape().rotated();
        assert_eq!(cells(t), vec![(0, 1), (1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn test_rows_are_trimmed_to_size() {
        let o = BlockKind::O.spawn_shape();
        let rows: Vec<&[bool]> = o.rows().collect();
        assert_eq!(rows, vec![&[true, true][..], &[true, true][..]]);
        assert!(!o.is_occupied(0, 2));
    }

    #[test]
    fn test_kind_char_conversion() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(BlockKind::from_char('x'), None);
    }

    #[test]
    fn test_uniform_distribution_draws_every_kind() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; BlockKind::LEN];
        for _ in 0..500 {
            let kind: BlockKind = rng.random();
            seen[kind as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
