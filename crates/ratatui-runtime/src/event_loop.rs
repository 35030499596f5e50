use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::event::TuiEvent;

/// Rendering trigger mode.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Render after state changes (tick or crossterm event).
    #[default]
    OnDirty,
    /// Render after state changes, but with minimum interval between renders.
    ///
    /// If events occur faster than the interval, they are batched into one render.
    Throttled(Duration),
}

impl RenderMode {
    /// Creates `Throttled` mode from frame rate (FPS).
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// A repeating tick deadline.
///
/// Scheduling replaces the previous deadline, so at most one schedule exists.
/// A fresh schedule is due immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct TickTimer {
    interval: Duration,
    next_at: Instant,
}

impl TickTimer {
    pub(super) fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_at: now,
        }
    }

    pub(super) fn interval(&self) -> Duration {
        self.interval
    }

    pub(super) fn next_at(&self) -> Instant {
        self.next_at
    }

    /// Returns `true` and arms the next deadline if a tick is due at `now`.
    ///
    /// Missed deadlines are not replayed: the next one is measured from `now`.
    pub(super) fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_at {
            return false;
        }
        self.next_at = now + self.interval;
        true
    }
}

/// Event loop state management.
///
/// Manages the tick timer and render mode, and returns the next event via `next()`.
/// Without a scheduled timer, no tick events are generated.
#[derive(Debug)]
pub(super) struct EventLoop {
    ticks: Option<TickTimer>,
    render_mode: RenderMode,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates a new `EventLoop` with no tick timer and `OnDirty` rendering.
    pub fn new() -> Self {
        let now = Instant::now();
        let past_time = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            ticks: None,
            render_mode: RenderMode::default(),
            last_render: past_time,
            dirty: true, // Initial render is required on startup
        }
    }

    /// Cancels the current timer and starts a new one firing right away.
    pub(super) fn schedule_ticks(&mut self, interval: Duration) {
        self.ticks = Some(TickTimer::new(interval, Instant::now()));
    }

    pub(super) fn cancel_ticks(&mut self) {
        self.ticks = None;
    }

    pub(super) fn tick_interval(&self) -> Option<Duration> {
        self.ticks.map(|timer| timer.interval())
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Returns the next event.
    ///
    /// Blocks until a tick/render time is reached or a crossterm event occurs.
    /// Without a timer and nothing to render, only waits for crossterm events.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(timer) = &mut self.ticks
                && timer.poll(now)
            {
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            let do_render = match self.render_mode {
                RenderMode::OnDirty => self.dirty,
                RenderMode::Throttled(interval) => {
                    self.dirty && now.duration_since(self.last_render) >= interval
                }
            };
            if do_render {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.ticks.map(|timer| timer.next_at());
        let next_render_at = match self.render_mode {
            RenderMode::OnDirty => self.dirty.then_some(now),
            RenderMode::Throttled(interval) => self.dirty.then(|| self.last_render + interval),
        };
        let next_timeout_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(800);

    #[test]
    fn test_new_timer_fires_immediately() {
        let now = Instant::now();
        let mut timer = TickTimer::new(INTERVAL, now);
        assert!(timer.poll(now));
        assert_eq!(timer.next_at(), now + INTERVAL);
    }

    #[test]
    fn test_timer_waits_for_interval() {
        let start = Instant::now();
        let mut timer = TickTimer::new(INTERVAL, start);
        assert!(timer.poll(start));

        assert!(!timer.poll(start + INTERVAL / 2));
        assert!(timer.poll(start + INTERVAL));
        assert!(!timer.poll(start + INTERVAL + INTERVAL / 2));
    }

    #[test]
    fn test_late_poll_does_not_replay_missed_ticks() {
        let start = Instant::now();
        let mut timer = TickTimer::new(INTERVAL, start);
        assert!(timer.poll(start));

        let late = start + INTERVAL * 5;
        assert!(timer.poll(late));
        assert!(!timer.poll(late));
        assert_eq!(timer.next_at(), late + INTERVAL);
    }

    #[test]
    fn test_schedule_replaces_and_cancel_stops() {
        let mut events = EventLoop::new();
        assert_eq!(events.tick_interval(), None);

        events.schedule_ticks(INTERVAL);
        events.schedule_ticks(Duration::from_millis(650));
        assert_eq!(events.tick_interval(), Some(Duration::from_millis(650)));

        events.cancel_ticks();
        assert_eq!(events.tick_interval(), None);
        assert!(events.ticks.is_none());
    }

    #[test]
    fn test_timeout_without_timer_or_dirty_state_blocks() {
        let mut events = EventLoop::new();
        events.dirty = false;
        assert_eq!(events.compute_timeout(Instant::now()), None);

        events.schedule_ticks(INTERVAL);
        assert_eq!(events.compute_timeout(Instant::now()), Some(Duration::ZERO));
    }
}
