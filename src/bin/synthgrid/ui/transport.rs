//! Transport bar widget - shows play state, grid size and block counts

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use synth_grid::GridSnapshot;

pub fn render_transport(frame: &mut Frame, area: Rect, snapshot: &GridSnapshot) {
    let block = Block::default().title(" synthgrid ").borders(Borders::ALL);

    let play_symbol = if snapshot.playing { "▶" } else { "⏸" };
    let play_state_str = if snapshot.playing { "Playing" } else { "Stopped" };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} {}  ", play_symbol, play_state_str),
            Style::default().fg(if snapshot.playing {
                Color::Green
            } else {
                Color::Yellow
            }),
        ),
        Span::styled(
            format!("{}x{}  ", snapshot.width, snapshot.height),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Blocks: {}  ", snapshot.block_count()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Sources: {}  Sinks: {}", snapshot.sources.len(), snapshot.sinks.len()),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
