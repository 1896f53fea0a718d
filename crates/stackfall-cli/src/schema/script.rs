use anyhow::{Context as _, bail, ensure};
use serde::{Deserialize, Serialize};
use stackfall_engine::{BOARD_HEIGHT, BOARD_WIDTH, BlockKind, Board, Input};

/// A scripted game for `simulate`.
///
/// ```json
/// {
///   "sequence": ["I", "O"],
///   "board": ["ZZZZZZZZZ."],
///   "steps": [
///     { "input": { "type": "rotate" } },
///     { "wait_ms": 800 },
///     { "input": { "type": "hard_drop" } }
///   ]
/// }
/// ```
///
/// The game is started before the first step, on `board` if given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    /// Fixed piece sequence, repeated; pieces come from the seed when absent
    #[serde(default)]
    pub sequence: Option<Vec<BlockKind>>,
    /// Bottom rows of the starting board, top first: `.` is empty, a kind
    /// letter is a locked block
    #[serde(default)]
    pub board: Vec<String>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Let this much virtual time pass
    WaitMs(u64),
    /// Apply one player input
    Input(Input),
}

impl Script {
    pub fn start_board(&self) -> anyhow::Result<Board> {
        ensure!(
            self.board.len() <= BOARD_HEIGHT,
            "Script board has {} rows; at most {BOARD_HEIGHT} are allowed",
            self.board.len()
        );
        let mut board = Board::empty();
        let top = BOARD_HEIGHT - self.board.len();
        for (offset, line) in self.board.iter().enumerate() {
            let row = top + offset;
            parse_row(&mut board, row, line)
                .with_context(|| format!("Invalid script board row {row}: {line:?}"))?;
        }
        Ok(board)
    }
}

fn parse_row(board: &mut Board, row: usize, line: &str) -> anyhow::Result<()> {
    ensure!(
        line.chars().count() == BOARD_WIDTH,
        "expected {BOARD_WIDTH} cells"
    );
    for (col, ch) in line.chars().enumerate() {
        match ch {
            '.' => {}
            ch => match BlockKind::from_char(ch) {
                Some(kind) => board.fill_cell(row, col, kind),
                None => bail!("unknown cell {ch:?}"),
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use stackfall_engine::Cell;

    use super::*;

    #[test]
    fn test_parse_script() {
        let script: Script = serde_json::from_str(
            r#"{
                "sequence": ["I", "O"],
                "steps": [
                    { "input": { "type": "start_game" } },
                    { "wait_ms": 800 },
                    { "input": { "type": "move_left", "pressed": true } }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(script.sequence, Some(vec![BlockKind::I, BlockKind::O]));
        assert!(script.board.is_empty());
        assert_eq!(script.steps, vec![
            Step::Input(Input::StartGame),
            Step::WaitMs(800),
            Step::Input(Input::MoveLeft { pressed: true }),
        ]);
    }

    #[test]
    fn test_sequence_is_optional() {
        let script: Script = serde_json::from_str(r#"{ "steps": [] }"#).unwrap();
        assert_eq!(script.sequence, None);
        assert!(script.start_board().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_step_is_rejected() {
        let result = serde_json::from_str::<Script>(r#"{ "steps": [{ "sleep": 5 }] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_board_rows_align_to_bottom() {
        let script = Script {
            board: vec!["T.........".into(), "ZZZZZZZZZ.".into()],
            ..Script::default()
        };
        let board = script.start_board().unwrap();
        assert_eq!(board.cell(18, 0), Cell::solid(BlockKind::T));
        assert!(board.cell(18, 1).is_empty());
        assert_eq!(board.cell(19, 8), Cell::solid(BlockKind::Z));
        assert!(board.cell(19, 9).is_empty());
        assert!(board.rows().take(18).flatten().all(|c| c.is_empty()));
    }

    #[test]
    fn test_board_errors() {
        let wrong_width = Script {
            board: vec!["ZZZ".into()],
            ..Script::default()
        };
        let err = wrong_width.start_board().unwrap_err();
        assert!(format!("{err:#}").contains("expected 10 cells"));

        let unknown_cell = Script {
            board: vec!["ZZZZZZZZZX".into()],
            ..Script::default()
        };
        let err = unknown_cell.start_board().unwrap_err();
        assert!(format!("{err:#}").contains("unknown cell 'X'"));

        let too_tall = Script {
            board: vec![".........."; 21].into_iter().map(String::from).collect(),
            ..Script::default()
        };
        assert!(too_tall.start_board().is_err());
    }
}
