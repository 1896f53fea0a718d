use crate::ClearedRows;

/// Points awarded for clearing 0 to 4 rows in a single commit.
pub const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Lines needed per level.
pub const LINES_PER_LEVEL: usize = 10;

/// Score for clearing `rows` rows at once.
///
/// # Panics
///
/// Panics if `rows` is more than 4. A single piece spans at most four rows,
/// so anything larger is a broken invariant rather than an input error.
#[must_use]
pub fn points_for(rows: usize) -> usize {
    assert!(
        rows < SCORE_TABLE.len(),
        "cleared {rows} rows in one commit; at most 4 are possible"
    );
    SCORE_TABLE[rows]
}

#[must_use]
pub const fn level_for_lines(lines: usize) -> usize {
    lines / LINES_PER_LEVEL + 1
}

/// What a single commit did to the session statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    pub rows_cleared: usize,
    pub points: usize,
    pub tetris: bool,
    pub perfect_clear: bool,
    /// The new level, if this commit crossed a level boundary.
    pub level_up: Option<usize>,
}

/// Running statistics of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    score: usize,
    lines_cleared: usize,
    tetris_count: usize,
    perfect_clear: bool,
    locked_pieces: usize,
}

impl SessionStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            lines_cleared: 0,
            tetris_count: 0,
            perfect_clear: false,
            locked_pieces: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn lines_cleared(&self) -> usize {
        self.lines_cleared
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        level_for_lines(self.lines_cleared)
    }

    #[must_use]
    pub const fn tetris_count(&self) -> usize {
        self.tetris_count
    }

    /// Whether the most recent commit left the board empty.
    #[must_use]
    pub const fn is_perfect_clear(&self) -> bool {
        self.perfect_clear
    }

    #[must_use]
    pub const fn locked_pieces(&self) -> usize {
        self.locked_pieces
    }

    /// Folds one commit into the statistics.
    ///
    /// # Panics
    ///
    /// Panics if more than four rows were cleared (see [`points_for`]).
    pub fn record_commit(&mut self, cleared: &ClearedRows, perfect_clear: bool) -> CommitOutcome {
        let rows_cleared = cleared.count();
        let points = points_for(rows_cleared);
        let tetris = cleared.is_tetris();
        let level_before = self.level();

        self.score += points;
        self.lines_cleared += rows_cleared;
        self.locked_pieces += 1;
        if tetris {
            self.tetris_count += 1;
        }
        self.perfect_clear = perfect_clear;

        let level = self.level();
        CommitOutcome {
            rows_cleared,
            points,
            tetris,
            perfect_clear,
            level_up: (level > level_before).then_some(level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_table() {
        assert_eq!(points_for(0), 0);
        assert_eq!(points_for(1), 100);
        assert_eq!(points_for(2), 300);
        assert_eq!(points_for(3), 500);
        assert_eq!(points_for(4), 800);
    }

    #[test]
    #[should_panic(expected = "at most 4")]
    fn test_five_rows_is_a_broken_invariant() {
        let _ = points_for(5);
    }

    #[test]
    fn test_level_formula() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(19), 2);
        assert_eq!(level_for_lines(20), 3);
        assert_eq!(level_for_lines(25), 3);
        assert_eq!(level_for_lines(105), 11);
    }

    #[test]
    fn test_record_commit_accumulates() {
        let mut stats = SessionStats::new();
        let outcome = stats.record_commit(&ClearedRows::from_indices(&[18, 19]), false);
        assert_eq!(outcome.points, 300);
        assert_eq!(outcome.level_up, None);
        let outcome = stats.record_commit(&ClearedRows::default(), false);
        assert_eq!(outcome.points, 0);
        assert_eq!(stats.score(), 300);
        assert_eq!(stats.lines_cleared(), 2);
        assert_eq!(stats.locked_pieces(), 2);
        assert_eq!(stats.level(), 1);
    }

    #[test]
    fn test_tetris_only_for_consecutive_rows() {
        let mut stats = SessionStats::new();
        let outcome = stats.record_commit(&ClearedRows::from_indices(&[16, 17, 18, 19]), true);
        assert!(outcome.tetris);
        let outcome = stats.record_commit(&ClearedRows::from_indices(&[13, 15, 17, 19]), false);
        assert!(!outcome.tetris);
        assert_eq!(outcome.points, 800);
        assert_eq!(stats.tetris_count(), 1);
        assert_eq!(stats.score(), 1600);
    }

    #[test]
    fn test_perfect_clear_reflects_last_commit() {
        let mut stats = SessionStats::new();
        stats.record_commit(&ClearedRows::from_indices(&[19]), true);
        assert!(stats.is_perfect_clear());
        stats.record_commit(&ClearedRows::default(), false);
        assert!(!stats.is_perfect_clear());
    }

    #[test]
    fn test_level_up_reported_once() {
        let mut stats = SessionStats::new();
        for _ in 0..2 {
            let outcome = stats.record_commit(&ClearedRows::from_indices(&[16, 17, 18, 19]), false);
            assert_eq!(outcome.level_up, None);
        }
        let outcome = stats.record_commit(&ClearedRows::from_indices(&[18, 19]), false);
        assert_eq!(outcome.level_up, Some(2));
        assert_eq!(stats.level(), 2);
        let outcome = stats.record_commit(&ClearedRows::from_indices(&[19]), false);
        assert_eq!(outcome.level_up, None);
    }
}
