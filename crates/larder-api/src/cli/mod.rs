//! CLI command definitions for the `larder` binary.
//!
//! Uses clap derive macros for argument parsing. Authoring commands open an
//! interactive wizard; the rest print styled text or `--json`.

pub mod author;
pub mod catalog;
pub mod output;
pub mod recipe;
pub mod sessions;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Author recipes step by step.
#[derive(Parser)]
#[command(name = "larder", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Keep recipes in memory instead of sending them to the backend.
    #[arg(long, global = true)]
    pub offline: bool,

    /// Override the recipe backend URL from config.toml.
    #[arg(long, global = true, env = "LARDER_BASE_URL")]
    pub base_url: Option<String>,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Author a new recipe interactively.
    #[command(alias = "new")]
    Author,

    /// Continue an autosaved authoring session.
    Resume {
        /// Session ID to resume (prompts with a list when omitted).
        session: Option<String>,
    },

    /// Edit a recipe that was already saved to the backend.
    Edit {
        /// Recipe ID assigned by the backend.
        id: String,
    },

    /// Show a saved recipe.
    Show {
        /// Recipe ID assigned by the backend.
        id: String,
    },

    /// List catalog entries.
    Catalog {
        /// Only this kind (ingredient, seasoning, preparation, utensil, instruction).
        kind: Option<String>,
    },

    /// List autosaved authoring sessions.
    Sessions {
        /// Delete the autosaved session with this ID instead of listing.
        #[arg(long)]
        delete: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["larder", "show", "r1", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Show { ref id } if id == "r1"));
    }

    #[test]
    fn test_parse_sessions_delete() {
        let cli = Cli::try_parse_from(["larder", "sessions", "--delete", "abc"]).unwrap();
        assert!(matches!(cli.command, Commands::Sessions { delete: Some(ref s) } if s == "abc"));
    }

    #[test]
    fn test_author_alias_and_offline() {
        let cli = Cli::try_parse_from(["larder", "--offline", "new"]).unwrap();
        assert!(cli.offline);
        assert!(matches!(cli.command, Commands::Author));
    }

    #[test]
    fn test_edit_requires_id() {
        assert!(Cli::try_parse_from(["larder", "edit"]).is_err());
    }
}
