//! Sequencer panel - session info and the beat rotation

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use pulsefield::Simulation;

const BAR_WIDTH: usize = 10;

pub fn render_sequencer(frame: &mut Frame, area: Rect, sim: &Simulation, paused: bool) {
    let block = Block::default().title(" Beats ").borders(Borders::ALL);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" seed {}  ", sim.seed()), Style::default().fg(Color::Cyan)),
            Span::styled(
                if paused { "⏸ Paused" } else { "▶ Running" },
                Style::default().fg(if paused { Color::Yellow } else { Color::Green }),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                " tick {}  pins {}/{}",
                sim.tick_count(),
                sim.grid().active_count(),
                sim.grid().len()
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::raw(""),
    ];

    let current = sim.beats().current_index();
    for (index, beat) in sim.beats().iter().enumerate() {
        let marker = if current == Some(index) { "▶" } else { " " };
        let progress = if beat.is_active() {
            (beat.strength().clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar = format!("{}{}", "█".repeat(progress), "·".repeat(BAR_WIDTH - progress));

        lines.push(Line::from(vec![
            Span::raw(format!(" {marker} {index:>2} ")),
            Span::styled(
                format!("{}-{:<4}", beat.key(), beat.mode()),
                Style::default().fg(if beat.is_active() { Color::White } else { Color::Gray }),
            ),
            Span::styled(bar, Style::default().fg(Color::Cyan)),
        ]));
    }

    let free = sim.beats().limit().saturating_sub(sim.beats().len());
    lines.push(Line::from(Span::styled(
        format!(" {free} slot(s) free"),
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
