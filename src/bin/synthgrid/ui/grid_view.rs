//! Grid widget - one fixed-width cell per slot, scrolled to keep the cursor visible

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use synth_grid::grid::CellView;
use synth_grid::{Coord, GridSnapshot, SlotKind};

const CELL_WIDTH: usize = 7;

/// First visible index so that `cursor` stays inside a window of `visible`.
fn scroll_offset(cursor: usize, visible: usize) -> usize {
    if visible == 0 {
        0
    } else {
        cursor.saturating_sub(visible - 1)
    }
}

fn cell_text(cell: &CellView) -> String {
    match cell.kind {
        SlotKind::Empty => format!("{:^7}", "·"),
        SlotKind::Right => "───────".to_string(),
        SlotKind::Down => format!("{:^7}", "│"),
        SlotKind::Cross => "───┼───".to_string(),
        SlotKind::Block => {
            let name: String = cell.name.chars().take(CELL_WIDTH - 2).collect();
            format!("[{:^5}]", name)
        }
    }
}

fn cell_style(cell: &CellView) -> Style {
    let color = match cell.kind {
        SlotKind::Empty => Color::DarkGray,
        SlotKind::Right | SlotKind::Down => Color::Gray,
        SlotKind::Cross => Color::Yellow,
        SlotKind::Block if !cell.has_input => {
            if cell.playing {
                Color::LightGreen
            } else {
                Color::Green
            }
        }
        SlotKind::Block if cell.block_type.as_deref() == Some("output") => Color::Magenta,
        SlotKind::Block => Color::Cyan,
    };
    Style::default().fg(color)
}

pub fn render_grid(frame: &mut Frame, area: Rect, snapshot: &GridSnapshot, cursor: Coord) {
    let visible_cols = area.width as usize / CELL_WIDTH;
    let visible_rows = area.height as usize;
    let first_x = scroll_offset(cursor.x, visible_cols);
    let first_y = scroll_offset(cursor.y, visible_rows);

    let mut lines = Vec::with_capacity(visible_rows);
    for y in first_y..snapshot.height.min(first_y + visible_rows) {
        let spans: Vec<Span> = (first_x..snapshot.width.min(first_x + visible_cols))
            .filter_map(|x| snapshot.cell(x, y))
            .map(|cell| {
                let mut style = cell_style(cell);
                if cursor == Coord::new(cell.x, cell.y) {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Span::styled(cell_text(cell), style)
            })
            .collect();
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), area);
}
