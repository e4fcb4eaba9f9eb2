//! TUI module for synthgrid
//!
//! Draws the latest grid snapshot, the transport bar and the palette.

mod grid_view;
mod transport;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use synth_grid::BlockConfig;

use crate::app::App;
use grid_view::render_grid;
use transport::render_transport;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // transport, grid, palette, help
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_transport(frame, chunks[0], &app.snapshot);

    let grid_block = Block::default().title(" Grid ").borders(Borders::ALL);
    let grid_inner = grid_block.inner(chunks[1]);
    frame.render_widget(grid_block, chunks[1]);
    render_grid(frame, grid_inner, &app.snapshot, app.cursor);

    let palette: Vec<Span> = BlockConfig::TAGS
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            Span::styled(
                format!(" [{}] {} ", i + 1, tag),
                Style::default().fg(Color::Cyan),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(palette)), chunks[2]);

    let help = Paragraph::new(format!(
        " [Arrows] Move  [1-9] Place  [Del] Remove  [C] Clear  [T] Test setup  [Space] Play/Stop  [Q] Quit  | {}",
        app.status
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}
