//! Minimal terminal event loop for tick-driven applications.
//!
//! The [`Runtime`] owns the only timer: applications request ticks with
//! [`Runtime::schedule_ticks`] and stop them with [`Runtime::cancel_ticks`].

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
