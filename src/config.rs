//! Command-line configuration.
//!
//! All tunables for a session are gathered here: maze dimensions, floor
//! count, loop behavior, the RNG seed, and where path logs land. Parsed once
//! at startup and carried inside the application state.

use std::path::PathBuf;

use clap::Parser;

/// Multi-floor sessions default to fewer extra loops per floor.
const LOOP_CHANCE_MULTI: f64 = 0.02;
/// Single-floor sessions get a slightly loopier maze.
const LOOP_CHANCE_SINGLE: f64 = 0.05;

/// First-person multi-floor maze crawler.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Maze rows per floor (rounded up to odd; minimum 3, or 5 with multiple floors)
    #[arg(long, default_value_t = 21)]
    pub rows: usize,

    /// Maze columns per floor (rounded up to odd; minimum 3, or 5 with multiple floors)
    #[arg(long, default_value_t = 21)]
    pub cols: usize,

    /// Number of stacked floors; 1 disables ladders, the key, and exit locking
    #[arg(long, default_value_t = 3)]
    pub floors: usize,

    /// Probability of removing each candidate wall to form a loop
    #[arg(long, value_name = "CHANCE")]
    pub loop_chance: Option<f64>,

    /// Generate a perfect maze with no extra loop connections
    #[arg(long)]
    pub no_loops: bool,

    /// Random seed; omit for a fresh maze every run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory for path-log files written on quit or exit
    #[arg(long, default_value = "path-logs")]
    pub log_dir: PathBuf,
}

impl Config {
    /// Whether loop injection runs at all.
    pub fn allow_loops(&self) -> bool {
        !self.no_loops
    }

    /// The loop probability actually used: the explicit `--loop-chance` when
    /// given, otherwise a default keyed on the floor count.
    pub fn effective_loop_chance(&self) -> f64 {
        self.loop_chance.unwrap_or(if self.floors > 1 {
            LOOP_CHANCE_MULTI
        } else {
            LOOP_CHANCE_SINGLE
        })
    }
}
