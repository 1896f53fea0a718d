use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::event::TuiEvent;

/// Rendering trigger mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Render at fixed intervals.
    Interval(Duration),
    /// Render after state changes (update or crossterm event).
    #[default]
    OnDirty,
    /// Render after state changes, but with minimum interval between renders.
    ///
    /// If events occur faster than the interval, they are batched into one render.
    Throttled(Duration),
}

impl RenderMode {
    /// Creates `Interval` mode from frame rate (FPS).
    #[must_use]
    pub fn interval_from_rate(rate: f64) -> Self {
        Self::Interval(Duration::from_secs_f64(1.0 / rate))
    }

    /// Creates `Throttled` mode from frame rate (FPS).
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// What the loop should do at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Update,
    Render,
    /// Wait for a terminal event, at most this long (`None`: indefinitely).
    Wait(Option<Duration>),
}

/// Event loop state management.
///
/// Tracks the last update and render instants and returns the next event
/// via `next()`. Update deadlines come from the application on every call.
#[derive(Debug)]
pub(super) struct EventLoop {
    render_mode: RenderMode,
    last_update: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates a new `EventLoop` with render mode `OnDirty`.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        let past_time = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            render_mode: RenderMode::default(),
            last_update: now,
            last_render: past_time,
            dirty: true, // Initial render is required on startup
        }
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Restarts the update clock and returns the time since the last update.
    pub(super) fn take_elapsed(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last_update);
        self.last_update = now;
        self.dirty = true;
        elapsed
    }

    /// Returns the next event.
    ///
    /// `update_in` is the application's next update deadline, relative to
    /// the last update. Blocks until that deadline, a render time, or a
    /// crossterm event.
    pub(super) fn next(&mut self, update_in: Option<Duration>) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            match self.plan(now, update_in) {
                Step::Update => return Ok(TuiEvent::Update(self.take_elapsed(now))),
                Step::Render => {
                    self.last_render = now;
                    self.dirty = false;
                    return Ok(TuiEvent::Render);
                }
                Step::Wait(timeout) => {
                    if let Some(timeout) = timeout
                        && !event::poll(timeout)?
                    {
                        continue;
                    }
                    self.dirty = true;
                    return Ok(event::read()?.into());
                }
            }
        }
    }

    fn plan(&self, now: Instant, update_in: Option<Duration>) -> Step {
        let next_update_at = update_in.map(|interval| self.last_update + interval);
        if next_update_at.is_some_and(|at| now >= at) {
            return Step::Update;
        }

        let do_render = match self.render_mode {
            RenderMode::Interval(interval) => now.duration_since(self.last_render) >= interval,
            RenderMode::OnDirty => self.dirty,
            RenderMode::Throttled(interval) => {
                self.dirty && now.duration_since(self.last_render) >= interval
            }
        };
        if do_render {
            return Step::Render;
        }

        let next_render_at = match self.render_mode {
            RenderMode::Interval(interval) => Some(self.last_render + interval),
            RenderMode::OnDirty => None,
            RenderMode::Throttled(interval) => self.dirty.then(|| self.last_render + interval),
        };
        let timeout = [next_update_at, next_render_at]
            .into_iter()
            .flatten()
            .min()
            .map(|at| at.saturating_duration_since(now));
        Step::Wait(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn rendered(mut events: EventLoop, now: Instant) -> EventLoop {
        events.last_render = now;
        events.dirty = false;
        events
    }

    #[test]
    fn test_initial_render() {
        let now = Instant::now();
        let events = EventLoop::starting_at(now);
        assert_eq!(events.plan(now, None), Step::Render);
    }

    #[test]
    fn test_idle_waits_forever() {
        let now = Instant::now();
        let events = rendered(EventLoop::starting_at(now), now);
        assert_eq!(events.plan(now + ms(5000), None), Step::Wait(None));
    }

    #[test]
    fn test_waits_until_update_deadline() {
        let now = Instant::now();
        let events = rendered(EventLoop::starting_at(now), now);
        assert_eq!(
            events.plan(now + ms(300), Some(ms(800))),
            Step::Wait(Some(ms(500)))
        );
        assert_eq!(events.plan(now + ms(800), Some(ms(800))), Step::Update);
    }

    #[test]
    fn test_update_takes_priority_over_render() {
        let now = Instant::now();
        let events = EventLoop::starting_at(now);
        assert_eq!(events.plan(now + ms(10), Some(ms(5))), Step::Update);
    }

    #[test]
    fn test_take_elapsed_restarts_clock() {
        let now = Instant::now();
        let mut events = rendered(EventLoop::starting_at(now), now);
        assert_eq!(events.take_elapsed(now + ms(120)), ms(120));
        assert!(events.dirty);
        assert_eq!(events.take_elapsed(now + ms(150)), ms(30));
        let events = rendered(events, now + ms(150));
        assert_eq!(
            events.plan(now + ms(150), Some(ms(100))),
            Step::Wait(Some(ms(100)))
        );
    }

    #[test]
    fn test_throttled_render_batches() {
        let now = Instant::now();
        let mut events = rendered(EventLoop::starting_at(now), now);
        events.set_render_mode(RenderMode::Throttled(ms(16)));
        events.dirty = true;
        assert_eq!(events.plan(now + ms(4), None), Step::Wait(Some(ms(12))));
        assert_eq!(events.plan(now + ms(16), None), Step::Render);
    }

    #[test]
    fn test_interval_render() {
        let now = Instant::now();
        let mut events = rendered(EventLoop::starting_at(now), now);
        events.set_render_mode(RenderMode::Interval(ms(50)));
        assert_eq!(events.plan(now + ms(20), None), Step::Wait(Some(ms(30))));
        assert_eq!(events.plan(now + ms(50), None), Step::Render);
    }

    #[test]
    fn test_rate_constructors() {
        assert_eq!(
            RenderMode::throttled_from_rate(50.0),
            RenderMode::Throttled(ms(20))
        );
        assert_eq!(
            RenderMode::interval_from_rate(10.0),
            RenderMode::Interval(ms(100))
        );
    }
}
