//! TUI module for pulsefield
//!
//! Drives the simulation from the frame loop and turns mouse drags into node
//! commands.

mod field;
mod sequencer;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};

use pulsefield::{
    geometry::Point,
    io::{input::Gesture, playback::PlaybackSink},
    Simulation,
};

use field::render_field;
use sequencer::render_sequencer;

/// Longest stretch of time one frame may cover, in nominal ticks
const MAX_DELTA: f64 = 4.0;

pub struct UiApp<S: PlaybackSink> {
    sim: Simulation,
    sink: S,
    gesture: Gesture,
    /// Where the field was last drawn, for mapping mouse cells to the world
    field_area: Rect,
    /// Status line; replaced by actions, cleared by nothing
    status: Option<String>,
    paused: bool,
    should_quit: bool,
}

impl<S: PlaybackSink> UiApp<S> {
    pub fn new(sim: Simulation, sink: S, status: Option<String>) -> Self {
        Self {
            sim,
            sink,
            gesture: Gesture::new(),
            field_area: Rect::default(),
            status,
            paused: false,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let tick_rate = self.sim.config().tick_rate;
        let mut last = Instant::now();

        while !self.should_quit {
            let now = Instant::now();
            let delta = (now - last).as_secs_f64() * tick_rate;
            last = now;
            if !self.paused {
                self.sim.advance(delta.min(MAX_DELTA), &mut self.sink);
            }

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                self.paused = !self.paused;
            }
            KeyCode::Char('r') => {
                self.sim.reset();
                self.status = Some("reset".into());
            }
            KeyCode::Char('a') => {
                let (key, mode) = self.next_scale(self.sim.beats().len());
                self.status = Some(match self.sim.add_beat(&key, &mode) {
                    Ok(index) => format!("added beat {index}: {key}-{mode}"),
                    Err(err) => err.to_string(),
                });
            }
            KeyCode::Char('x') => {
                let last = self.sim.beats().len().checked_sub(1);
                self.status = Some(match last.map(|index| self.sim.remove_beat(index)) {
                    Some(Ok(())) => "removed last beat".into(),
                    Some(Err(err)) => err.to_string(),
                    None => "no beats to remove".into(),
                });
            }
            KeyCode::Char('k') => {
                self.status = Some(self.rekey_current());
            }
            KeyCode::Char('s') => {
                self.status = Some(format!("?{}", self.sim.serialize_state()));
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.gesture.press();
            }
            MouseEventKind::Drag(MouseButton::Left) => {}
            MouseEventKind::Up(MouseButton::Left) => {
                self.gesture.release();
                return;
            }
            _ => return,
        }

        let Some(point) = self.cell_to_world(mouse.column, mouse.row) else {
            return;
        };
        if let Some(command) = self.gesture.track(self.sim.grid(), point) {
            if let Err(err) = self.sim.submit(command) {
                self.status = Some(err.to_string());
            }
        }
    }

    /// Centre of a terminal cell in world coordinates, if it lies on the field.
    fn cell_to_world(&self, column: u16, row: u16) -> Option<Point> {
        let area = self.field_area;
        if area.width == 0 || area.height == 0 {
            return None;
        }
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return None;
        }

        let config = self.sim.config();
        let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
        let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
        Some(Point::new(fx * config.width, fy * config.height))
    }

    /// Cycle through the scale table by position.
    fn next_scale(&self, position: usize) -> (String, String) {
        let scales = self.sim.scales();
        scales
            .iter()
            .nth(position % scales.len().max(1))
            .map(|s| (s.key().to_string(), s.mode().to_string()))
            .unwrap_or_else(|| ("a".into(), "min".into()))
    }

    fn rekey_current(&mut self) -> String {
        let Some(index) = self.sim.beats().current_index() else {
            return "no current beat".into();
        };
        let position = self
            .sim
            .beats()
            .current()
            .and_then(|beat| {
                self.sim
                    .scales()
                    .iter()
                    .position(|s| s.key() == beat.key() && s.mode() == beat.mode())
            })
            .map_or(0, |p| p + 1);

        let (key, mode) = self.next_scale(position);
        match self.sim.set_beat_scale(index, &key, &mode) {
            Ok(()) => format!("beat {index} is now {key}-{mode}"),
            Err(err) => err.to_string(),
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(1)])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(30)])
            .split(rows[0]);

        let snapshot = self.sim.snapshot();
        self.field_area = render_field(frame, columns[0], &snapshot, self.sim.config());
        render_sequencer(frame, columns[1], &self.sim, self.paused);

        let help = match &self.status {
            Some(status) => format!(" {status}"),
            None => " [Q] Quit  [Space] Pause  [R] Reset  [A] Add  [X] Remove  [K] Re-key  [S] Save".into(),
        };
        let help = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[1]);
    }
}
