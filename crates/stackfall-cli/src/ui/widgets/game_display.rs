use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};
use stackfall_engine::{EngineState, RenderFrame};

use super::{BoardDisplay, StatsDisplay, UpcomingDisplay, color, style};

/// Board, statistics and upcoming queue of one frame, side by side.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    frame: &'a RenderFrame,
}

impl<'a> GameDisplay<'a> {
    pub fn new(frame: &'a RenderFrame) -> Self {
        Self { frame }
    }

    fn border_color(&self) -> Color {
        match self.frame.state {
            _ if self.frame.is_paused => color::YELLOW,
            EngineState::Idle => color::GRAY,
            EngineState::Active | EngineState::Committing => color::WHITE,
            EngineState::GameOver => color::RED,
        }
    }

    fn popup(&self) -> Option<(&'static str, Style)> {
        match self.frame.state {
            _ if self.frame.is_paused => {
                Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW)))
            }
            EngineState::Idle => Some((
                "PRESS ENTER",
                Style::new().fg(color::BLACK).bg(color::WHITE),
            )),
            EngineState::Active | EngineState::Committing => None,
            EngineState::GameOver => {
                Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        }
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = self.border_color();
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(Padding::horizontal(1))
                .border_style(border_color)
                .style(style::DEFAULT)
        };

        let board = BoardDisplay::new(&self.frame.board).block(
            Block::bordered()
                .border_style(border_color)
                .style(style::DEFAULT),
        );
        let stats = StatsDisplay::new(self.frame).block(panel("STATS"));
        let upcoming = UpcomingDisplay::new(self.frame.upcoming.iter().copied()).block(panel("NEXT"));

        let [stats_column, board_column, upcoming_column] = Layout::horizontal([
            Constraint::Length(stats.width()),
            Constraint::Length(board.width()),
            Constraint::Length(upcoming.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] = Layout::vertical([Constraint::Length(stats.height())]).areas(stats_column);
        let [board_area] = Layout::vertical([Constraint::Length(board.height())]).areas(board_column);
        let [upcoming_area] =
            Layout::vertical([Constraint::Length(upcoming.height())]).areas(upcoming_column);

        let board_width = board.width();
        stats.render(stats_area, buf);
        board.render(board_area, buf);
        upcoming.render(upcoming_area, buf);

        if let Some((text, style)) = self.popup() {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area = board_area.centered(Constraint::Length(board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use stackfall_engine::{BlockKind, EngineConfig, GameEngine, PieceSpawner, SequenceRandomizer};

    use super::*;

    fn engine() -> GameEngine {
        let spawner = PieceSpawner::new(Box::new(SequenceRandomizer::new(vec![BlockKind::T])));
        GameEngine::with_spawner(EngineConfig::default(), spawner).unwrap()
    }

    fn rendered_text(frame: &RenderFrame) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        GameDisplay::new(frame).render(area, &mut buf);
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_popups_follow_state() {
        let mut engine = engine();
        assert!(rendered_text(&engine.render()).contains("PRESS ENTER"));

        engine.start_game();
        let text = rendered_text(&engine.render());
        assert!(!text.contains("PRESS ENTER"));
        assert!(text.contains("SCORE:"));
        assert!(text.contains("NEXT"));

        engine.pause();
        assert!(rendered_text(&engine.render()).contains("PAUSED"));
    }

    #[test]
    fn test_border_color() {
        let mut engine = engine();
        let frame = engine.render();
        assert_eq!(GameDisplay::new(&frame).border_color(), color::GRAY);
        engine.start_game();
        engine.pause();
        let frame = engine.render();
        assert_eq!(GameDisplay::new(&frame).border_color(), color::YELLOW);
    }
}
