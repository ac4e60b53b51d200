//! Larder CLI entry point.
//!
//! Binary name: `larder`
//!
//! Parses CLI arguments, initializes logging, the session database and the
//! persistence gateway, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::{AppState, StateOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,larder=debug",
        _ => "trace",
    };
    if let Err(e) = larder_observe::tracing_setup::init_tracing(filter, cli.otel) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "larder", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(StateOptions {
        offline: cli.offline,
        base_url: cli.base_url.clone(),
    })
    .await?;

    let result = match cli.command {
        Commands::Author => cli::author::run_author(&state).await,
        Commands::Resume { session } => cli::author::run_resume(&state, session).await,
        Commands::Edit { id } => cli::author::run_edit(&state, &id).await,
        Commands::Show { id } => cli::recipe::show_recipe(&state, &id, cli.json).await,
        Commands::Catalog { kind } => cli::catalog::list_catalog(&state, kind.as_deref(), cli.json),
        Commands::Sessions { delete } => match delete {
            Some(session_id) => cli::sessions::delete_session(&state, &session_id, cli.json).await,
            None => cli::sessions::list_sessions(&state, cli.json).await,
        },
        Commands::Completions { .. } => Ok(()),
    };

    larder_observe::tracing_setup::shutdown_tracing();
    result
}
