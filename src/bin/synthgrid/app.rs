//! Application state and event loop

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use rtrb::{Consumer, RingBuffer};
use std::time::Duration;
use tracing::{info, warn};

use synth_grid::blocks::{GainParams, OscillatorParams, ReverbParams};
use synth_grid::{BlockConfig, Coord, GridConfig, GridSnapshot, Placement, SynthGrid};

use crate::ui;

/// Snapshots in flight between the grid and the renderer
const SNAPSHOT_QUEUE: usize = 4;

/// Demo board: three oscillators through reverb and two gains into an output
/// in the bottom-right corner. Needs at least a 3x5 grid.
fn test_setup(width: usize, height: usize) -> Vec<Placement> {
    let osc = || BlockConfig::Oscillator(OscillatorParams::default());
    let gain = || BlockConfig::Gain(GainParams::default());
    [
        (0, 0, osc()),
        (2, 0, BlockConfig::Reverb(ReverbParams::default())),
        (0, 4, osc()),
        (1, 3, osc()),
        (2, 4, gain()),
        (2, height.saturating_sub(1), gain()),
        (
            width.saturating_sub(1),
            height.saturating_sub(1),
            BlockConfig::Output(GainParams::default()),
        ),
    ]
    .into_iter()
    .map(|(x, y, config)| Placement { x, y, config })
    .collect()
}

pub struct App {
    grid: SynthGrid,
    /// Debounced snapshots pushed by the grid
    snapshot_rx: Consumer<GridSnapshot>,
    /// Latest snapshot received
    pub snapshot: GridSnapshot,
    pub cursor: Coord,
    /// Last action or error, shown in the help bar
    pub status: String,
    should_quit: bool,
}

impl App {
    pub fn new(config: GridConfig) -> Self {
        let (snapshot_tx, snapshot_rx) = RingBuffer::<GridSnapshot>::new(SNAPSHOT_QUEUE);
        let mut grid = SynthGrid::new(config);
        grid.subscribe(snapshot_tx);
        let snapshot = GridSnapshot::capture(&grid);

        Self {
            grid,
            snapshot_rx,
            snapshot,
            cursor: Coord::new(0, 0),
            status: String::from("ready"),
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.grid.poll_changes();
            self.poll_snapshots();

            terminal.draw(|frame| ui::render(frame, self))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.grid.stop_sound(None);
        Ok(())
    }

    fn poll_snapshots(&mut self) {
        while let Ok(snapshot) = self.snapshot_rx.pop() {
            self.snapshot = snapshot;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1, 0),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(0, 1),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.place(BlockConfig::TAGS[index]);
            }
            KeyCode::Backspace | KeyCode::Delete => {
                let Coord { x, y } = self.cursor;
                match self.grid.remove(x, y) {
                    Ok(()) => self.status = format!("removed ({}, {})", x, y),
                    Err(e) => self.report(e),
                }
            }
            KeyCode::Char('c') => {
                self.grid.clear();
                self.status = String::from("cleared");
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                let layout = test_setup(self.grid.width(), self.grid.height());
                match self.grid.restore(&layout) {
                    Ok(()) => self.status = String::from("test setup loaded"),
                    Err(e) => self.report(e),
                }
            }
            KeyCode::Char(' ') => self.toggle_transport(),
            _ => {}
        }
    }

    fn move_cursor(&mut self, dx: isize, dy: isize) {
        let max_x = self.grid.width().saturating_sub(1);
        let max_y = self.grid.height().saturating_sub(1);
        self.cursor.x = self.cursor.x.saturating_add_signed(dx).min(max_x);
        self.cursor.y = self.cursor.y.saturating_add_signed(dy).min(max_y);
    }

    fn place(&mut self, tag: &str) {
        let Coord { x, y } = self.cursor;
        let result = self
            .grid
            .create_block(tag)
            .and_then(|block| self.grid.insert(x, y, block));
        match result {
            Ok(()) => {
                let name = self.grid[(x, y)].name().to_string();
                self.status = format!("placed {} at ({}, {})", name, x, y);
            }
            Err(e) => self.report(e),
        }
    }

    fn toggle_transport(&mut self) {
        if self.grid.is_playing() {
            self.grid.stop_sound(None);
            self.status = String::from("stopped");
        } else {
            self.grid.play_sound(None);
            self.status = String::from("playing");
        }
        info!(playing = self.grid.is_playing(), "transport toggled");
        // transport state is not a structural change, refresh directly
        self.snapshot = GridSnapshot::capture(&self.grid);
    }

    fn report(&mut self, e: synth_grid::GridError) {
        warn!(error = %e, "grid operation failed");
        self.status = e.to_string();
    }
}
