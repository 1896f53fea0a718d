use std::{io, time::Instant};

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};

use crate::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
};

/// TUI application runtime.
///
/// Manages the event loop and executes applications that implement the `App` trait.
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
    keyboard_enhancement: Option<KeyboardEnhancementFlags>,
}

impl Runtime {
    /// Creates a new Runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the render mode.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Requests keyboard enhancement `flags` (e.g. key release events) for
    /// the duration of `run()`.
    ///
    /// Returns whether the terminal supports them. Nothing is requested when
    /// it does not.
    pub fn enable_keyboard_enhancement(
        &mut self,
        flags: KeyboardEnhancementFlags,
    ) -> io::Result<bool> {
        let supported = terminal::supports_keyboard_enhancement()?;
        self.keyboard_enhancement = supported.then_some(flags);
        Ok(supported)
    }

    /// Runs the application.
    ///
    /// 1. Calls `app.init()` for initialization
    /// 2. Runs the event loop until `app.should_exit()` returns true
    ///    - update deadline reached: calls `app.update()`
    ///    - render due: calls `app.draw()`
    ///    - terminal event: calls `app.update()`, then `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            if let Some(flags) = self.keyboard_enhancement {
                execute!(io::stdout(), PushKeyboardEnhancementFlags(flags))?;
            }
            let result = self.run_loop(app, terminal);
            if self.keyboard_enhancement.is_some() {
                execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
            }
            result
        })
    }

    fn run_loop<A>(&mut self, app: &mut A, terminal: &mut ratatui::DefaultTerminal) -> io::Result<()>
    where
        A: App,
    {
        while !app.should_exit() {
            match self.events.next(app.next_update_in())? {
                TuiEvent::Update(elapsed) => {
                    app.update(self, elapsed);
                }
                TuiEvent::Render => {
                    terminal.draw(|f| app.draw(f))?;
                }
                TuiEvent::Crossterm(event) => {
                    let elapsed = self.events.take_elapsed(Instant::now());
                    app.update(self, elapsed);
                    app.handle_event(self, event);
                }
            }
        }
        Ok(())
    }
}
