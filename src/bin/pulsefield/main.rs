//! pulsefield - waves, pins and pings in the terminal
//!
//! Run with: cargo run -- --seed 8643 --nodes 30,43,44,55

mod app;
mod cli;
mod ui;

use clap::Parser;

use cli::Args;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let sim = app::build_simulation(&args)?;

    if args.headless {
        return app::run_headless(sim, args.ticks);
    }

    let terminal = ratatui::init();
    let res = app::run_interactive(terminal, sim);
    ratatui::restore();
    res
}
