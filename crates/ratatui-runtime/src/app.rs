use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// Trait for TUI applications.
///
/// Applications executed by `Runtime::run()` must implement this trait.
pub trait App {
    /// Initializes the application.
    ///
    /// Called at the start of `Runtime::run()`. Use this to configure the render mode.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    ///
    /// [`Self::update`] has already been called with the time elapsed up to this event.
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame);

    /// Advances application state by `elapsed` wall-clock time.
    fn update(&mut self, runtime: &mut Runtime, elapsed: Duration);

    /// Time after the previous update at which the next update is due.
    ///
    /// `None` means the application only needs updates alongside terminal events.
    fn next_update_in(&self) -> Option<Duration> {
        None
    }
}
