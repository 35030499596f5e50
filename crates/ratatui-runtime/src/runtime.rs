use std::{io, time::Duration};

use tracing::trace;

use crate::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
};

/// TUI application runtime.
///
/// Owns the event loop and the single tick timer, and executes applications
/// that implement the `App` trait.
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    /// Creates a new Runtime with no tick timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any pending ticks and ticks every `interval` from now on.
    ///
    /// The first tick fires immediately.
    pub fn schedule_ticks(&mut self, interval: Duration) {
        trace!(?interval, "ticks scheduled");
        self.events.schedule_ticks(interval);
    }

    /// Cancels any pending ticks. A cancelled schedule never fires again.
    pub fn cancel_ticks(&mut self) {
        if self.events.tick_interval().is_some() {
            trace!("ticks cancelled");
        }
        self.events.cancel_ticks();
    }

    /// Interval of the current tick schedule, if any.
    #[must_use]
    pub fn tick_interval(&self) -> Option<Duration> {
        self.events.tick_interval()
    }

    /// Sets the render mode.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Runs the application.
    ///
    /// 1. Calls `app.init()` for initialization
    /// 2. Runs the event loop until `app.should_exit()` returns true
    ///    - `Event::Tick`: calls `app.update()`
    ///    - `Event::Render`: calls `app.draw()`
    ///    - `Event::Crossterm`: calls `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => {
                        app.update(&mut self);
                    }
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => {
                        app.handle_event(&mut self, event);
                    }
                }
            }
            Ok(())
        })
    }
}
