//! `todo` binary.
//!
//! Task subcommands work on the JSON task file; `serve` runs the REST API
//! over the SQLite database.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use std::sync::Arc;
use todo_phases::api;
use todo_phases::cli::tasks::{self, EXIT_ERROR};
use todo_phases::cli::{Cli, Command, ServeArgs};
use todo_phases::config::{Config, ConfigLoader, ConfigPaths};
use todo_phases::db::Database;
use todo_phases::logging::{self, LogTarget};
use todo_phases::store::TaskStore;
use tracing::{Level, info};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::from(EXIT_ERROR));
    };

    // Keep task output clean unless asked otherwise.
    let level = if cli.verbose {
        Level::DEBUG
    } else if matches!(command, Command::Serve(_)) {
        Level::INFO
    } else {
        Level::WARN
    };
    let target: LogTarget = cli.log.parse()?;
    logging::init(&target, level)?;

    // --config behaves like TODO_CONFIG_PATH
    let mut loader = ConfigLoader::load_with(ConfigPaths::discover(), |key| {
        if key == "TODO_CONFIG_PATH"
            && let Some(path) = &cli.config
        {
            return Some(path.clone());
        }
        std::env::var(key).ok()
    })?;
    if let Some(path) = loader.config_path() {
        info!("Config: {}", path.display());
    }

    let config = loader.config_mut();
    if let Some(tasks_file) = &cli.tasks_file {
        config.tasks.file = tasks_file.into();
    }
    if let Some(db_path) = &cli.database {
        config.server.db_path = db_path.into();
    }
    let config = loader.into_config();

    if let Command::Serve(args) = command {
        run_server(config, args).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut store = TaskStore::open(&config.tasks.file);
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();

    let code = match &command {
        Command::Add(args) => tasks::run_add(&mut store, args, &mut stdout, &mut stderr)?,
        Command::List(args) => tasks::run_list(&store, args, &mut stdout)?,
        Command::Complete(args) => {
            tasks::run_complete(&mut store, args, &mut stdout, &mut stderr)?
        }
        Command::Incomplete(args) => {
            tasks::run_incomplete(&mut store, args, &mut stdout, &mut stderr)?
        }
        Command::Serve(_) => EXIT_ERROR,
    };

    Ok(ExitCode::from(code))
}

/// Run the REST API until Ctrl-C.
async fn run_server(mut config: Config, args: ServeArgs) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    config.ensure_db_dir()?;

    info!("Starting Todo API v{}", env!("CARGO_PKG_VERSION"));
    info!("Database: {:?}", config.server.db_path);

    let db = Arc::new(Database::open(&config.server.db_path)?);
    info!("Database initialized successfully");

    let handle = api::start_server(db, &config.server).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    handle.shutdown().await;

    Ok(())
}
