use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ActivePiece, BlockKind, Board, ConfigError, RenderBoard};

use super::{
    config::EngineConfig,
    scheduler::{Scheduler, TickTier, TimerKind},
    spawner::{PieceSeed, PieceSpawner},
    stats::SessionStats,
    summary::{EngineEvent, RenderFrame, SessionSummary},
};

/// Lifecycle of a game.
///
/// Pausing is an orthogonal flag (see [`GameEngine::is_paused`]): a paused
/// game stays `Active` or `Committing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EngineState {
    /// No game has been started yet.
    Idle,
    /// A piece is falling under gravity.
    Active,
    /// The piece has landed; the next tick locks it unless it can fall again.
    Committing,
    /// A new piece could not be placed.
    GameOver,
}

/// Player commands, as a host would decode them from key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Input {
    StartGame,
    Pause,
    Resume,
    MoveLeft { pressed: bool },
    MoveRight { pressed: bool },
    Rotate,
    SoftDrop { pressed: bool },
    HardDrop,
}

#[derive(Debug, Clone, Copy, Default)]
struct HeldKeys {
    left: bool,
    right: bool,
    soft_drop: bool,
}

impl HeldKeys {
    fn lateral_offset(self) -> i32 {
        i32::from(self.right) - i32::from(self.left)
    }

    fn any_lateral(self) -> bool {
        self.left || self.right
    }
}

/// A headless falling-block game.
///
/// The engine owns the board, the active piece, the upcoming queue, the
/// statistics and two periodic timers. It never reads a clock: the host
/// feeds it [`Input`]s and calls [`Self::advance`] with the time that
/// passed, or drives [`Self::tick`] directly. Outcomes are observed through
/// [`Self::render`] and [`Self::drain_events`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use stackfall_engine::{EngineState, GameEngine, PieceSeed};
///
/// let mut engine = GameEngine::with_seed(PieceSeed::from(42));
/// engine.start_game();
/// assert_eq!(engine.state(), EngineState::Active);
///
/// let row = engine.active_piece().unwrap().row();
/// engine.advance(Duration::from_millis(800));
/// assert_eq!(engine.active_piece().unwrap().row(), row + 1);
/// ```
#[derive(Debug)]
pub struct GameEngine {
    config: EngineConfig,
    spawner: PieceSpawner,
    board: Board,
    piece: Option<ActivePiece>,
    stats: SessionStats,
    state: EngineState,
    paused: bool,
    tier: Option<TickTier>,
    held: HeldKeys,
    scheduler: Scheduler,
    events: Vec<EngineEvent>,
    last_summary: Option<SessionSummary>,
}

impl GameEngine {
    /// Creates an idle engine with the default configuration.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let config = EngineConfig::default();
        let spawner = PieceSpawner::from_kind(config.randomizer, seed);
        Self::build(config, spawner)
    }

    pub fn new(config: EngineConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        let spawner = PieceSpawner::from_kind(config.randomizer, seed);
        Self::with_spawner(config, spawner)
    }

    /// Like [`Self::new`], with a caller-supplied spawner.
    ///
    /// `config.randomizer` is ignored.
    pub fn with_spawner(config: EngineConfig, spawner: PieceSpawner) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, spawner))
    }

    fn build(config: EngineConfig, spawner: PieceSpawner) -> Self {
        Self {
            config,
            spawner,
            board: Board::empty(),
            piece: None,
            stats: SessionStats::new(),
            state: EngineState::Idle,
            paused: false,
            tier: None,
            held: HeldKeys::default(),
            scheduler: Scheduler::new(),
            events: vec![],
            last_summary: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Active or committing, paused or not.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(self.state, EngineState::Active | EngineState::Committing)
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Locked cells only; see [`Self::render`] for the composed view.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.piece.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    #[must_use]
    pub fn lines_cleared(&self) -> usize {
        self.stats.lines_cleared()
    }

    pub fn upcoming(&self) -> impl Iterator<Item = BlockKind> + '_ {
        self.spawner.upcoming()
    }

    /// Current gravity tier, or `None` while gravity is stopped.
    #[must_use]
    pub fn tick_tier(&self) -> Option<TickTier> {
        self.tier
    }

    /// Period of the running gravity timer.
    #[must_use]
    pub fn gravity_interval(&self) -> Option<Duration> {
        self.scheduler.gravity_period()
    }

    /// Time until [`Self::advance`] would next do something.
    #[must_use]
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.scheduler.time_until_next()
    }

    /// Statistics of the session so far, in summary form.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from(&self.stats)
    }

    /// Summary of the last finished session.
    #[must_use]
    pub fn last_summary(&self) -> Option<SessionSummary> {
        self.last_summary
    }

    /// Takes all events produced since the previous call.
    pub fn drain_events(&mut self) -> impl Iterator<Item = EngineEvent> + '_ {
        self.events.drain(..)
    }

    /// Row the active piece would land on if dropped now.
    #[must_use]
    pub fn ghost_row(&self) -> Option<i32> {
        self.piece.map(|piece| piece.drop_row(&self.board))
    }

    #[must_use]
    pub fn render(&self) -> RenderFrame {
        let mut board = RenderBoard::new(&self.board);
        if self.is_playing()
            && let Some(piece) = self.piece
        {
            board.overlay(&piece.dropped(&self.board), true);
            board.overlay(&piece, false);
        }
        RenderFrame {
            board,
            score: self.stats.score(),
            level: self.stats.level(),
            lines_cleared: self.stats.lines_cleared(),
            upcoming: self.spawner.upcoming().collect(),
            state: self.state,
            is_playing: self.is_playing(),
            is_paused: self.paused,
        }
    }

    pub fn apply(&mut self, input: Input) {
        match input {
            Input::StartGame => self.start_game(),
            Input::Pause => self.pause(),
            Input::Resume => self.resume(),
            Input::MoveLeft { pressed } => self.move_left(pressed),
            Input::MoveRight { pressed } => self.move_right(pressed),
            Input::Rotate => self.rotate(),
            Input::SoftDrop { pressed } => self.soft_drop(pressed),
            Input::HardDrop => self.hard_drop(),
        }
    }

    /// Starts a new game on an empty board. Works from any state.
    pub fn start_game(&mut self) {
        self.start_game_with_board(Board::empty());
    }

    /// Starts a new game on a prepared board.
    pub fn start_game_with_board(&mut self, board: Board) {
        self.stop_timers();
        self.board = board;
        self.stats = SessionStats::new();
        self.held = HeldKeys::default();
        self.paused = false;
        self.last_summary = None;
        self.spawner.refill();
        self.events.push(EngineEvent::GameStarted);

        let piece = ActivePiece::spawn(self.spawner.draw());
        let summary = self.summary();
        self.spawn_or_end(piece, summary);
    }

    /// One gravity step.
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        let Some(piece) = self.piece else {
            return;
        };
        match self.state {
            EngineState::Active if piece.can_fall(&self.board) => {
                self.piece = Some(piece.shifted(1, 0));
            }
            EngineState::Active => {
                self.state = EngineState::Committing;
                self.set_tier(TickTier::Sliding);
            }
            EngineState::Committing => self.commit(piece),
            EngineState::Idle | EngineState::GameOver => {}
        }
    }

    /// Runs the timers forward by `elapsed`, firing ticks and repeated
    /// moves in timestamp order.
    pub fn advance(&mut self, elapsed: Duration) {
        let mut remaining = elapsed;
        loop {
            let (spent, fired) = self.scheduler.elapse(remaining);
            remaining = remaining.saturating_sub(spent);
            match fired {
                Some(TimerKind::Gravity) => self.tick(),
                Some(TimerKind::Repeat) => {
                    self.shift_by_held();
                }
                None => break,
            }
        }
    }

    pub fn pause(&mut self) {
        if !self.is_playing() || self.paused {
            return;
        }
        self.paused = true;
        self.held = HeldKeys::default();
        self.stop_timers();
        self.events.push(EngineEvent::Paused);
    }

    pub fn resume(&mut self) {
        if !self.is_playing() || !self.paused {
            return;
        }
        self.paused = false;
        self.set_tier(TickTier::Normal);
        self.events.push(EngineEvent::Resumed);
    }

    pub fn move_left(&mut self, pressed: bool) {
        self.set_lateral(pressed, |held| &mut held.left);
    }

    pub fn move_right(&mut self, pressed: bool) {
        self.set_lateral(pressed, |held| &mut held.right);
    }

    /// Rotates clockwise in place; rejected if the result collides.
    pub fn rotate(&mut self) {
        if self.accepts_input() {
            self.try_replace(ActivePiece::rotated);
        }
    }

    pub fn soft_drop(&mut self, pressed: bool) {
        if !self.accepts_input() {
            if !pressed {
                self.held.soft_drop = false;
            }
            return;
        }
        self.held.soft_drop = pressed;
        self.set_tier(if pressed {
            TickTier::Fast
        } else {
            TickTier::Normal
        });
    }

    /// Moves the piece to its ghost row. It locks on the next tick unless
    /// it is moved off its support during the sliding grace period.
    pub fn hard_drop(&mut self) {
        if !self.accepts_input() {
            return;
        }
        let Some(piece) = self.piece else {
            return;
        };
        self.piece = Some(piece.dropped(&self.board));
        self.state = EngineState::Committing;
        self.set_tier(TickTier::Sliding);
    }

    fn accepts_input(&self) -> bool {
        self.is_playing() && !self.paused
    }

    fn set_lateral(&mut self, pressed: bool, key: impl FnOnce(&mut HeldKeys) -> &mut bool) {
        if !self.accepts_input() {
            // Releases still register so a key cannot get stuck.
            if !pressed {
                *key(&mut self.held) = false;
            }
            return;
        }
        *key(&mut self.held) = pressed;
        self.shift_by_held();
        if self.held.any_lateral() {
            self.scheduler.arm_repeat_timer(self.config.move_repeat());
        } else {
            self.scheduler.cancel_repeat_timer();
        }
    }

    fn shift_by_held(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let offset = self.held.lateral_offset();
        offset != 0 && self.try_replace(|piece| piece.shifted(0, offset))
    }

    fn try_replace(&mut self, f: impl FnOnce(&ActivePiece) -> ActivePiece) -> bool {
        let Some(piece) = self.piece else {
            return false;
        };
        let moved = f(&piece);
        if moved.is_colliding(&self.board) {
            return false;
        }
        self.piece = Some(moved);
        true
    }

    /// Switches gravity to `tier`, re-arming only if the period changes.
    fn set_tier(&mut self, tier: TickTier) {
        let period = self.config.tick_duration(tier, self.stats.level());
        if self.scheduler.gravity_period() != Some(period) {
            self.scheduler.arm_gravity_timer(period);
        }
        self.tier = Some(tier);
    }

    fn stop_timers(&mut self) {
        self.scheduler.cancel_gravity_timer();
        self.scheduler.cancel_repeat_timer();
        self.tier = None;
    }

    fn commit(&mut self, piece: ActivePiece) {
        if piece.can_fall(&self.board) {
            // Slid off its support during the grace period.
            self.state = EngineState::Active;
            self.set_tier(TickTier::Normal);
            return;
        }

        self.board.fill_piece(&piece);
        let cleared = self.board.clear_full_rows();
        let perfect_clear = self.board.is_empty();
        let before = self.summary();
        let outcome = self.stats.record_commit(&cleared, perfect_clear);

        self.events.push(EngineEvent::PieceLocked {
            kind: piece.kind(),
            rows_cleared: outcome.rows_cleared,
            points: outcome.points,
        });
        if outcome.tetris {
            self.events.push(EngineEvent::Tetris);
        }
        if outcome.perfect_clear {
            self.events.push(EngineEvent::PerfectClear);
        }
        if let Some(level) = outcome.level_up {
            self.events.push(EngineEvent::LevelUp { level });
        }

        // A game-ending commit reports the lines, level and tetrises
        // accumulated before it, but its own points and perfect clear.
        let summary = SessionSummary {
            score: self.stats.score(),
            is_perfect_clear: self.stats.is_perfect_clear(),
            ..before
        };
        let next = ActivePiece::spawn(self.spawner.advance());
        self.spawn_or_end(next, summary);
    }

    /// Places `piece`, or ends the game reporting `summary` if it collides.
    fn spawn_or_end(&mut self, piece: ActivePiece, summary: SessionSummary) {
        if piece.is_colliding(&self.board) {
            self.game_over(summary);
            return;
        }
        self.piece = Some(piece);
        self.state = EngineState::Active;
        self.set_tier(TickTier::Normal);
    }

    fn game_over(&mut self, summary: SessionSummary) {
        self.piece = None;
        self.state = EngineState::GameOver;
        self.paused = false;
        self.held = HeldKeys::default();
        self.stop_timers();
        self.last_summary = Some(summary);
        self.events.push(EngineEvent::GameOver(summary));
    }
}
