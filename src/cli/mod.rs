//! Command-line interface for dailies
//!
//! Defines the CLI structure using clap derive macros. Each command group is
//! implemented in its own submodule and reports through the shared `output`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::output::OutputOptions;
use crate::storage::Storage;
use crate::tracker::Tracker;

mod status;
mod task;
mod timers;

/// dailies - recurring checklist
///
/// Tracks daily, weekly, and rotating in-game objectives and clears
/// completions automatically when their reset boundary passes.
#[derive(Parser, Debug)]
#[command(name = "dailies")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory for state and configuration
    #[arg(long, global = true, env = "DAILIES_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the checklist, timers, and reset countdown
    Status,

    /// Show rotating timer countdowns
    Timers,

    /// Put a hidden task back on the checklist
    Show {
        /// Task id
        id: String,
    },

    /// Hide a task from the checklist
    Hide {
        /// Task id
        id: String,
    },

    /// Mark tasks completed for the current period
    Done {
        /// Task ids to complete
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Un-complete all visible tasks
    Reset,

    /// Force a tier reset without waiting for the boundary
    Simulate {
        /// Tier to reset: day, week, or timers
        tier: String,
    },

    /// Interactive checklist in the terminal
    Tui,
}

/// Shared per-invocation context for command implementations
pub(crate) struct Context {
    pub data_dir: Option<PathBuf>,
    pub output: OutputOptions,
}

impl Context {
    /// Open storage and a tracker loaded from it
    pub fn open(&self) -> Result<(Storage, Tracker)> {
        let storage = Storage::resolve(self.data_dir.clone())?;
        let tracker = Tracker::open(&storage)?;
        Ok((storage, tracker))
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let ctx = Context {
            data_dir: self.data_dir,
            output: OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
        };

        match self.command {
            Commands::Status => status::run(&ctx),
            Commands::Timers => timers::run(&ctx),
            Commands::Show { id } => task::set_visible(&ctx, &id, true),
            Commands::Hide { id } => task::set_visible(&ctx, &id, false),
            Commands::Done { ids } => task::done(&ctx, &ids),
            Commands::Reset => task::reset(&ctx),
            Commands::Simulate { tier } => task::simulate(&ctx, &tier),
            Commands::Tui => {
                let (storage, tracker) = ctx.open()?;
                crate::ui::checklist::run(storage, tracker)
            }
        }
    }
}
