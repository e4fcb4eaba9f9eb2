//! synthgrid - terminal front-end for the synth grid
//!
//! Run with: cargo run --bin synthgrid -- --width 16 --height 10

mod app;
mod ui;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};

use app::App;
use synth_grid::GridConfig;

#[derive(Parser, Debug)]
#[command(name = "synthgrid", about = "Place blocks on a grid, get a wired signal graph")]
struct Args {
    /// Grid width in cells
    #[arg(long, default_value_t = 16)]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = 10)]
    height: usize,

    /// Log file (the terminal is taken by the UI)
    #[arg(long, default_value = "synthgrid.log")]
    log: PathBuf,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(&args.log)?;

    let config = GridConfig::new(args.width, args.height);
    let mut app = App::new(config);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}

fn init_logging(path: &Path) -> EyreResult<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}
