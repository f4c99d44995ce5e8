use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::config::ThemeMode;
use crate::model::day::{is_valid_time, parse_day};

#[derive(Parser)]
#[command(name = "wf", about = concat!("weekflow v", env!("CARGO_PKG_VERSION"), " - plan the week, follow the day"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// View to open the TUI in: flow, manage, boards
    #[arg(long)]
    pub mode: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all boards
    Boards,
    /// Board management
    Board(BoardCmd),
    /// List the active board's tasks (all days, or one)
    Tasks(TasksArgs),
    /// Show today's checklist on the active board
    Today,
    /// Add a task to the active board
    Add(AddArgs),
    /// Flip a task between done and not done
    Toggle(TaskRef),
    /// Change a task's time and/or title
    Edit(EditArgs),
    /// Remove a task
    Rm(RmArgs),
    /// Copy every task of one day onto another
    Template(TemplateArgs),
    /// Print the Mermaid flowchart for a day of the active board
    Diagram(DiagramArgs),
    /// Show or set the light/dark theme preference
    Theme(ThemeArgs),
    /// View or clear the recovery log
    Recovery(RecoveryArgs),
    /// Print where the data, config, and log files live
    Where,
}

// ---------------------------------------------------------------------------
// Value parsers
// ---------------------------------------------------------------------------

/// A weekday as `0`..`6` (Sunday = 0) or a name like `mon`/`Tuesday`
pub fn day_arg(s: &str) -> Result<u8, String> {
    parse_day(s).ok_or_else(|| format!("'{}' is not a day (0-6 or a weekday name)", s))
}

/// A 24-hour `HH:MM` time
pub fn time_arg(s: &str) -> Result<String, String> {
    if is_valid_time(s) {
        Ok(s.to_string())
    } else {
        Err(format!("'{}' is not a time (expected HH:MM)", s))
    }
}

fn theme_arg(s: &str) -> Result<ThemeMode, String> {
    ThemeMode::parse_mode(s).ok_or_else(|| format!("'{}' is not a theme (light or dark)", s))
}

// ---------------------------------------------------------------------------
// Board args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct BoardCmd {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Create a board and make it active
    New(BoardNewArgs),
    /// Rename a board
    Rename(BoardRenameArgs),
    /// Copy a board with every task reset to not done
    Dup(BoardDupArgs),
    /// Make a board the active one
    Use(BoardIdArg),
    /// Delete a board and all of its tasks
    Rm(BoardRmArgs),
}

#[derive(Args)]
pub struct BoardNewArgs {
    /// Board name
    pub name: String,
}

#[derive(Args)]
pub struct BoardIdArg {
    /// Board id or exact name
    pub board: String,
}

#[derive(Args)]
pub struct BoardRenameArgs {
    /// Board id or exact name
    pub board: String,
    /// New name
    pub name: String,
}

#[derive(Args)]
pub struct BoardDupArgs {
    /// Board id or exact name
    pub board: String,
    /// Name of the copy
    pub name: String,
}

#[derive(Args)]
pub struct BoardRmArgs {
    /// Board id or exact name
    pub board: String,
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TasksArgs {
    /// Only this day (0-6 or a weekday name)
    #[arg(long, value_parser = day_arg)]
    pub day: Option<u8>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Day (0-6 or a weekday name)
    #[arg(value_parser = day_arg)]
    pub day: u8,
    /// Start time (HH:MM)
    #[arg(value_parser = time_arg)]
    pub time: String,
    /// Task title
    pub title: String,
}

#[derive(Args)]
pub struct TaskRef {
    /// Day (0-6 or a weekday name)
    #[arg(value_parser = day_arg)]
    pub day: u8,
    /// Task id
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    #[command(flatten)]
    pub task: TaskRef,
    /// New start time (HH:MM)
    #[arg(long, value_parser = time_arg)]
    pub time: Option<String>,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Args)]
pub struct RmArgs {
    #[command(flatten)]
    pub task: TaskRef,
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args)]
pub struct TemplateArgs {
    /// Source day (0-6 or a weekday name)
    #[arg(value_parser = day_arg)]
    pub from: u8,
    /// Destination day (0-6 or a weekday name)
    #[arg(value_parser = day_arg)]
    pub to: u8,
}

#[derive(Args)]
pub struct DiagramArgs {
    /// Day to draw (default: today)
    #[arg(long, value_parser = day_arg)]
    pub day: Option<u8>,
    /// Theme variables to embed (default: the saved preference)
    #[arg(long, value_parser = theme_arg)]
    pub theme: Option<ThemeMode>,
}

#[derive(Args)]
pub struct ThemeArgs {
    /// light or dark (omit to print the current one)
    #[arg(value_parser = theme_arg)]
    pub mode: Option<ThemeMode>,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryArgs {
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Delete the recovery log
    #[arg(long)]
    pub clear: bool,
}
