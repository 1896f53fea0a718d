//! A small deadline-driven runtime for ratatui applications.
//!
//! The application tells the runtime when it next needs an update
//! ([`App::next_update_in`]); the runtime sleeps in `crossterm::event::poll`
//! until then, a terminal event arrives, or a render is due. Every update
//! receives the wall-clock time elapsed since the previous one, and an
//! update always runs before a terminal event is handled, so applications
//! see time and input in order.

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
