use std::time::Instant;

use crossterm::event::Event;
use pairs_engine::{BestScoreStore, GameSession};
use ratatui::Frame;

use crate::{
    command::play::screen::PlayScreen,
    tui::{App, RenderMode, Tui},
};

const FPS: f64 = 60.0;

/// Connects a [`PlayScreen`] to the terminal and the wall clock.
#[derive(Debug)]
pub struct PlayApp<S> {
    screen: PlayScreen<S>,
    started: Instant,
}

impl<S> PlayApp<S>
where
    S: BestScoreStore,
{
    pub fn new(session: GameSession, store: S) -> Self {
        Self {
            screen: PlayScreen::new(session, store),
            started: Instant::now(),
        }
    }

    pub fn into_parts(self) -> (GameSession, S) {
        self.screen.into_parts()
    }

    fn schedule_wake(&self, tui: &mut Tui) {
        tui.wake_at(self.screen.next_wake().map(|due| self.started + due));
    }
}

impl<S> App for PlayApp<S>
where
    S: BestScoreStore,
{
    fn init(&mut self, tui: &mut Tui) {
        tui.set_render_mode(RenderMode::throttled_from_rate(FPS));
        self.started = Instant::now();
    }

    fn should_exit(&self) -> bool {
        self.screen.should_exit()
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) {
        self.screen.handle_event(&event, self.started.elapsed());
        self.schedule_wake(tui);
    }

    fn draw(&self, frame: &mut Frame) {
        self.screen.draw(frame);
    }

    fn update(&mut self, tui: &mut Tui) {
        self.screen.update(self.started.elapsed());
        self.schedule_wake(tui);
    }
}
