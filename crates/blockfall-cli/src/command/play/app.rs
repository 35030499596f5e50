use std::fmt;

use blockfall_engine::{BestScoreStore, Effects, GameEngine, GameState, TickSchedule};
use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use ratatui_runtime::{App, RenderMode, Runtime};
use tracing::{debug, warn};

use crate::{
    command::play::keyboard::{Control, KeyboardState},
    ui::widgets::{GameDisplay, KeyBinding, KeyBindingDisplay},
};

const FPS: f64 = 60.0;

type Binding = (&'static [&'static str], &'static str, Control);

const LOADING_BINDINGS: &[Binding] = &[
    (&["Enter", "Space"], "Start", Control::Start),
    (&["S"], "Sound", Control::Sound),
    (&["Q"], "Quit", Control::Quit),
];

const STARTED_BINDINGS: &[Binding] = &[
    (&["←"], "Left", Control::Left),
    (&["→"], "Right", Control::Right),
    (&["↑"], "Rotate", Control::Rotate),
    (&["↓"], "Drop", Control::Down),
    (&["P"], "Pause", Control::Pause),
    (&["R"], "Reset", Control::Reset),
    (&["S"], "Sound", Control::Sound),
    (&["Q"], "Quit", Control::Quit),
];

const PAUSED_BINDINGS: &[Binding] = &[
    (&["Enter", "P"], "Resume", Control::Start),
    (&["R"], "Reset", Control::Reset),
    (&["S"], "Sound", Control::Sound),
    (&["Q"], "Quit", Control::Quit),
];

const OVER_BINDINGS: &[Binding] = &[
    (&["R"], "Reset", Control::Reset),
    (&["Q"], "Quit", Control::Quit),
];

/// Terminal host for a [`GameEngine`]: maps keys to commands and keeps the
/// runtime's tick timer in line with the engine's requests.
#[derive(Debug)]
pub(crate) struct PlayApp<S> {
    engine: GameEngine,
    store: S,
    keyboard: KeyboardState,
    is_exiting: bool,
}

impl<S> PlayApp<S>
where
    S: BestScoreStore,
    S::Error: fmt::Display,
{
    pub(crate) fn new(engine: GameEngine, store: S) -> Self {
        Self {
            engine,
            store,
            keyboard: KeyboardState::default(),
            is_exiting: false,
        }
    }

    pub(crate) fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub(crate) fn into_store(self) -> S {
        self.store
    }

    fn handle_control(&mut self, runtime: &mut Runtime, control: Control) {
        self.keyboard.press(control);
        let Some(command) = control.command() else {
            debug!("quit requested");
            self.is_exiting = true;
            return;
        };
        let effects = self.engine.apply(command);
        self.apply_effects(runtime, effects);
    }

    fn apply_effects(&mut self, runtime: &mut Runtime, effects: Effects) {
        match effects.schedule {
            Some(TickSchedule::Every(interval)) => runtime.schedule_ticks(interval),
            Some(TickSchedule::Stop) => runtime.cancel_ticks(),
            None => {}
        }
        if effects.changed {
            self.record_best_score();
        }
    }

    fn record_best_score(&mut self) {
        let points = self.engine.state().points();
        if let Err(err) = self.store.record(points) {
            warn!(points, %err, "failed to save best score");
        }
    }

    fn key_bindings(&self) -> Vec<KeyBinding<'static>> {
        let bindings = match self.engine.state().game_state() {
            GameState::Loading => LOADING_BINDINGS,
            GameState::Started => STARTED_BINDINGS,
            GameState::Paused => PAUSED_BINDINGS,
            GameState::Over => OVER_BINDINGS,
        };
        bindings
            .iter()
            .map(|&(keys, description, control)| {
                (keys, description, self.keyboard.is_pressed(control))
            })
            .collect()
    }
}

impl<S> App for PlayApp<S>
where
    S: BestScoreStore,
    S::Error: fmt::Display,
{
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_render_mode(RenderMode::throttled_from_rate(FPS));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        if let Some(control) = event.as_key_press_event().and_then(Control::from_key) {
            self.handle_control(runtime, control);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let state = self.engine.state();
        let game_display = GameDisplay::new(state, self.store.load().max(state.best_score()));
        let bindings = self.key_bindings();
        let help = KeyBindingDisplay::new(&bindings);

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(game_display.height()),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(game_display, main_area);
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, runtime: &mut Runtime) {
        let effects = self.engine.tick();
        self.keyboard.clear();
        self.apply_effects(runtime, effects);
    }
}
