use crate::matching::ForumSort;
use crate::types::{EntityKind, ItemId, Role};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "curalink")]
#[command(about = "Match patients and researchers with trials, experts and research", long_about = None)]
pub struct Cli {
    /// Config file (default: $CURALINK_CONFIG, then <config dir>/curalink/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Serve sample data only; never contact the backend
    #[arg(long, global = true)]
    pub offline: bool,
    #[command(subcommand)]
    pub command: Commands,
}

/// Patient fields; omitted values come from the saved patient profile.
#[derive(Args, Debug, Clone, Default)]
pub struct PatientOpts {
    #[arg(short, long)]
    pub condition: Option<String>,
    #[arg(short, long)]
    pub location: Option<String>,
    /// Store the given condition and location as the patient profile
    #[arg(long)]
    pub save: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the MCP server over stdio
    Serve,
    /// Normalize a free-text condition
    Condition {
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,
    },
    /// Normalize a free-text location
    Location {
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,
    },
    Trials {
        #[command(flatten)]
        patient: PatientOpts,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        phase: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Only trials whose site contains this text
        #[arg(long)]
        site: Option<String>,
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
        /// Print a plain-language brief for each trial
        #[arg(long)]
        brief: bool,
    },
    Experts {
        #[command(flatten)]
        patient: PatientOpts,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        specialty: Option<String>,
        /// Only experts whose location contains this text
        #[arg(long)]
        site: Option<String>,
        #[arg(long)]
        available_only: bool,
        /// Include experts who are not on the platform
        #[arg(long)]
        include_external: bool,
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },
    Publications {
        #[command(flatten)]
        patient: PatientOpts,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        journal: Option<String>,
        #[arg(long)]
        year: Option<String>,
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },
    Forums {
        #[command(flatten)]
        patient: PatientOpts,
        #[arg(long)]
        category: Option<String>,
        /// relevance, popular or unanswered
        #[arg(long, default_value = "relevance")]
        sort: ForumSort,
    },
    Collaborators {
        /// Researcher specialty (repeatable)
        #[arg(long = "specialty")]
        specialties: Vec<String>,
        /// Research interest (repeatable)
        #[arg(long = "interest")]
        interests: Vec<String>,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
        /// Only collaborators whose specialty contains this text
        #[arg(long)]
        only_specialty: Option<String>,
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum FavoriteAction {
    /// Add an item to favorites, or remove it if already saved
    Toggle {
        /// patient or researcher
        role: Role,
        /// trial, expert, publication, forum_post or collaborator
        kind: EntityKind,
        id: ItemId,
    },
    List {
        role: Role,
    },
}
