//! # court
//!
//! Command-line scorekeeper driving the Courtside match kernel.
//!
//! ## Commands
//!
//! - `new`: Start a match (rules file and/or flags)
//! - `point`: Award a rally to side A or B
//! - `fault`: Record a service fault
//! - `undo`: Take back the last point
//! - `pause` / `resume`: Suspend and resume play
//! - `serving-side` / `server`: Manual serve corrections
//! - `status`: Show the scoreboard
//! - `replay`: Apply a JSON file of deltas
//! - `list`: List stored matches
//!
//! ## Example
//!
//! ```bash
//! # Doubles game to 11, sides swap at 6
//! court new
//!
//! # Singles game to 15 with no two-point rule
//! court new --singles --to 15 --no-win-by-two
//!
//! # Score
//! court point a
//! court fault
//! court point b
//! court status
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use court_core::{MatchId, Side, SideSwitchPolicy, TeamSize};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod store;

use commands::new::NewOptions;
use commands::play::Action;
use commands::{archive, list, new, play, replay, status};

/// Command-line scorekeeper for racket-sport matches.
#[derive(Parser, Debug)]
#[command(name = "court")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory for match records
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Act on this match instead of the current one
    #[arg(long = "match", global = true)]
    match_id: Option<MatchId>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a new match and make it current
    New {
        /// TOML rules file
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Singles match
        #[arg(long, conflicts_with = "doubles")]
        singles: bool,

        /// Doubles match
        #[arg(long, conflicts_with = "singles")]
        doubles: bool,

        /// Winning score
        #[arg(long)]
        to: Option<u32>,

        /// First to the winning score wins, no two-point lead needed
        #[arg(long)]
        no_win_by_two: bool,

        /// When ends swap: every-point, halfway, six, or a combined score
        #[arg(long, value_parser = new::parse_switch)]
        switch: Option<SideSwitchPolicy>,

        /// Time limit in seconds
        #[arg(long)]
        time_limit: Option<u64>,

        /// Maximum number of rallies
        #[arg(long)]
        max_rallies: Option<u32>,

        /// Side that serves first
        #[arg(long)]
        first: Option<Side>,
    },

    /// Award a rally to a side
    Point {
        /// Side that won the rally (a or b)
        side: Side,
    },

    /// Record a service fault by the serving team
    Fault,

    /// Take back the last point
    Undo,

    /// Remove one point from a side
    Decrement {
        /// Side losing the point (a or b)
        side: Side,
    },

    /// Pause play
    Pause,

    /// Resume play
    Resume,

    /// End the match now
    Complete,

    /// Return the match to 0-0
    Reset,

    /// Set the serving side, or hand the serve over
    ServingSide {
        /// New serving side (a or b)
        side: Option<Side>,
    },

    /// Set the serving partner, or swap partners (doubles)
    Server {
        /// Server number (1 or 2)
        index: Option<u8>,
    },

    /// Record the match clock
    Clock {
        /// Elapsed playing time in seconds
        secs: u64,

        /// Clock is still running
        #[arg(long)]
        running: bool,
    },

    /// Show the scoreboard
    Status,

    /// Apply a JSON array of deltas
    Replay {
        /// Delta file
        file: PathBuf,
    },

    /// List stored matches
    List {
        /// Include archived matches
        #[arg(long)]
        all: bool,
    },

    /// Hide a match from the list
    Archive {
        /// Bring an archived match back
        #[arg(long)]
        restore: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    // Ensure data directory exists
    std::fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

    let match_id = cli.match_id;
    let action = match cli.command {
        Commands::New {
            rules,
            singles,
            doubles,
            to,
            no_win_by_two,
            switch,
            time_limit,
            max_rallies,
            first,
        } => {
            let team_size = if singles {
                Some(TeamSize::Singles)
            } else if doubles {
                Some(TeamSize::Doubles)
            } else {
                None
            };
            let options = NewOptions {
                rules,
                team_size,
                to,
                no_win_by_two,
                switch,
                time_limit,
                max_rallies,
                first,
            };
            new::run(&data_dir, &options)?;
            return Ok(());
        }
        Commands::Status => return status::run(&data_dir, match_id),
        Commands::Replay { file } => return replay::run(&data_dir, match_id, &file),
        Commands::List { all } => return list::run(&data_dir, all),
        Commands::Archive { restore } => return archive::run(&data_dir, match_id, !restore),
        Commands::Point { side } => Action::Point(side),
        Commands::Fault => Action::Fault,
        Commands::Undo => Action::Undo,
        Commands::Decrement { side } => Action::Decrement(side),
        Commands::Pause => Action::Pause,
        Commands::Resume => Action::Resume,
        Commands::Complete => Action::Complete,
        Commands::Reset => Action::Reset,
        Commands::ServingSide { side } => Action::ServingSide(side),
        Commands::Server { index } => Action::Server(index),
        Commands::Clock { secs, running } => Action::Clock { secs, running },
    };

    play::run(&data_dir, match_id, action)
}

/// Get the default data directory for court.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("io", "courtside", "court")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
