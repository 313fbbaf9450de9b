use clap::Parser;

use pulsefield::io::state::{BeatSpec, SavedState};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Session seed (random when omitted)
    #[arg(long)]
    pub seed: Option<u32>,

    /// Nodes per row
    #[arg(long, default_value_t = 12)]
    pub columns: u32,

    /// Nodes per column
    #[arg(long, default_value_t = 12)]
    pub rows: u32,

    /// Upper bound on columns x rows
    #[arg(long, default_value_t = 144)]
    pub max_nodes: usize,

    /// Beats to start with, e.g. `a-min,d-maj`
    #[arg(long, value_delimiter = ',')]
    pub beats: Vec<BeatSpec>,

    /// Row-major node indices to activate, e.g. `30,43,44`
    #[arg(long, value_delimiter = ',')]
    pub nodes: Vec<usize>,

    /// Share-link query to restore (overrides seed, beats and nodes)
    #[arg(long, value_name = "QUERY")]
    pub state: Option<SavedState>,

    /// Maximum waves in flight at once
    #[arg(long, default_value_t = 2)]
    pub beat_frequency: usize,

    /// Run without the TUI and print every strike to stdout
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// Ticks to simulate in headless mode
    #[arg(long, default_value_t = 600)]
    pub ticks: u64,
}
