use std::time::Duration;

use chrono::Utc;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Text,
};
use ratatui_runtime::{App, RenderMode, Runtime};
use stackfall_engine::{EngineEvent, GameEngine, Input, PieceSeed};

use crate::{
    schema::summary::SavedSummary,
    ui::widgets::{GameDisplay, style},
};

const FPS: f64 = 60.0;

/// Without key release events a held soft drop key is treated as released
/// this long after its last (auto-repeated) press.
const SOFT_DROP_RELEASE: Duration = Duration::from_millis(150);

#[derive(Debug)]
pub struct PlayApp {
    engine: GameEngine,
    seed: PieceSeed,
    /// Whether the terminal reports key releases.
    key_releases: bool,
    soft_drop_release_in: Option<Duration>,
    summaries: Vec<SavedSummary>,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(engine: GameEngine, seed: PieceSeed) -> Self {
        Self {
            engine,
            seed,
            key_releases: false,
            soft_drop_release_in: None,
            summaries: vec![],
            is_exiting: false,
        }
    }

    /// Summaries of the games finished during this session.
    pub fn into_summaries(self) -> Vec<SavedSummary> {
        self.summaries
    }

    fn collect_events(&mut self) {
        for event in self.engine.drain_events() {
            if let EngineEvent::GameOver(summary) = event {
                self.summaries.push(SavedSummary {
                    recorded_at: Utc::now(),
                    seed: self.seed,
                    summary,
                });
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let is_playing = self.engine.is_playing();
        let pressed = match key.kind {
            KeyEventKind::Press => true,
            KeyEventKind::Release => false,
            // The engine repeats held moves itself
            KeyEventKind::Repeat => return,
        };

        match key.code {
            KeyCode::Left => self.hold(pressed, |pressed| Input::MoveLeft { pressed }),
            KeyCode::Right => self.hold(pressed, |pressed| Input::MoveRight { pressed }),
            KeyCode::Down => self.soft_drop(pressed),
            _ if !pressed => {}
            KeyCode::Up => self.engine.rotate(),
            KeyCode::Char(' ') => self.engine.hard_drop(),
            KeyCode::Esc | KeyCode::Char('p') if self.engine.is_paused() => self.engine.resume(),
            KeyCode::Esc | KeyCode::Char('p') => self.engine.pause(),
            KeyCode::Enter | KeyCode::Char('s') if !is_playing => {
                self.soft_drop_release_in = None;
                self.engine.start_game();
            }
            KeyCode::Char('q') => self.is_exiting = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.is_exiting = true;
            }
            _ => {}
        }
    }

    fn hold(&mut self, pressed: bool, input: impl Fn(bool) -> Input) {
        self.engine.apply(input(pressed));
        if pressed && !self.key_releases {
            // Each (auto-repeated) press is a single tap
            self.engine.apply(input(false));
        }
    }

    fn soft_drop(&mut self, pressed: bool) {
        self.engine.soft_drop(pressed);
        self.soft_drop_release_in = (pressed && !self.key_releases).then_some(SOFT_DROP_RELEASE);
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_render_mode(RenderMode::throttled_from_rate(FPS));
        self.key_releases = runtime
            .enable_keyboard_enhancement(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            .unwrap_or(false);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        if let Some(key) = event.as_key_event() {
            self.handle_key(key);
            self.collect_events();
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let game_frame = self.engine.render();
        let help_text = if game_frame.is_paused {
            "Controls: Esc P (Resume) | Q (Quit)"
        } else if game_frame.is_playing {
            "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ (Rotate) | Space (Hard Drop) | Esc P (Pause) | Q (Quit)"
        } else {
            "Controls: Enter S (Start) | Q (Quit)"
        };
        let help_text = Text::from(help_text).style(style::HELP).centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(22), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(GameDisplay::new(&game_frame), main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
        let mut elapsed = elapsed;
        if let Some(release_in) = self.soft_drop_release_in {
            if elapsed >= release_in {
                self.engine.advance(release_in);
                elapsed -= release_in;
                self.soft_drop_release_in = None;
                self.engine.soft_drop(false);
            } else {
                self.soft_drop_release_in = Some(release_in - elapsed);
            }
        }
        self.engine.advance(elapsed);
        self.collect_events();
    }

    fn next_update_in(&self) -> Option<Duration> {
        [self.engine.time_until_next_timer(), self.soft_drop_release_in]
            .into_iter()
            .flatten()
            .min()
    }
}
