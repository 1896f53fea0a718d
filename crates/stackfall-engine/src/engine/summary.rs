use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{BlockKind, RenderBoard};

use super::{game::EngineState, spawner::UPCOMING_LEN, stats::SessionStats};

/// Final statistics of a session, emitted once at game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub score: usize,
    pub lines_cleared: usize,
    pub level: usize,
    pub tetris_count: usize,
    pub is_perfect_clear: bool,
}

impl From<&SessionStats> for SessionSummary {
    fn from(stats: &SessionStats) -> Self {
        Self {
            score: stats.score(),
            lines_cleared: stats.lines_cleared(),
            level: stats.level(),
            tetris_count: stats.tetris_count(),
            is_perfect_clear: stats.is_perfect_clear(),
        }
    }
}

/// Notifications produced by the engine, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    GameStarted,
    PieceLocked {
        kind: BlockKind,
        rows_cleared: usize,
        points: usize,
    },
    Tetris,
    PerfectClear,
    LevelUp {
        level: usize,
    },
    Paused,
    Resumed,
    GameOver(SessionSummary),
}

/// Everything a front-end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    /// Locked cells with the ghost and the active piece drawn on top.
    pub board: RenderBoard,
    pub score: usize,
    pub level: usize,
    pub lines_cleared: usize,
    /// Upcoming queue, newest first; the last entry spawns next.
    pub upcoming: ArrayVec<BlockKind, UPCOMING_LEN>,
    pub state: EngineState,
    pub is_playing: bool,
    pub is_paused: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_json_keys() {
        let summary = SessionSummary {
            score: 1200,
            lines_cleared: 12,
            level: 2,
            tetris_count: 1,
            is_perfect_clear: false,
        };
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "score": 1200,
                "linesCleared": 12,
                "level": 2,
                "tetrisCount": 1,
                "isPerfectClear": false,
            })
        );
    }

    #[test]
    fn test_summary_from_fresh_stats() {
        let summary = SessionSummary::from(&SessionStats::new());
        assert_eq!(summary.level, 1);
        assert_eq!(summary.score, 0);
        assert!(!summary.is_perfect_clear);
    }
}
