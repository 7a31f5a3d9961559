//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::{ParentRef, Position};

/// School emergency-contact network: staff roster and organization chart
#[derive(Parser, Debug)]
#[command(name = "schoolnet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// School id (default: `school` from config)
    #[arg(short, long, global = true, env = "SCHOOLNET_SCHOOL")]
    pub school: Option<String>,

    /// Data directory (default: `data_dir` from config)
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    /// Extra config file applied over the global one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the staff roster
    Staff {
        #[command(subcommand)]
        command: StaffCommands,
    },

    /// Show and rearrange the organization chart
    Chart {
        #[command(subcommand)]
        command: ChartCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum StaffCommands {
    /// List staff in tier order
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the roster with the records in a JSON file
    Import {
        /// JSON array of {id?, name, department, position, contact}
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Add one staff member
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        department: String,
        /// principal, vice_principal, department_head or staff
        #[arg(long)]
        position: Position,
        #[arg(long)]
        contact: String,
        /// Explicit id (default: generated)
        #[arg(long)]
        id: Option<String>,
    },

    /// Remove all staff
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ChartCommands {
    /// Print the chart (saved layout if any, otherwise derived from the roster)
    Show {
        /// Print the forest as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a node and save the result as the layout
    Move {
        /// Id of the node being moved
        node_id: String,
        /// Current parent id, or "root"
        #[arg(long)]
        from: ParentRef,
        /// Current index under the parent
        #[arg(long)]
        from_index: usize,
        /// New parent id, or "root"
        #[arg(long)]
        to: ParentRef,
        /// New index under the new parent
        #[arg(long)]
        to_index: usize,
    },

    /// Discard the saved layout
    Reset,

    /// List staff left out of the chart (no department head for their department)
    Orphans,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Create global config template
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
