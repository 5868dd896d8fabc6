mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use taskboard_core::AppConfig;
use taskboard_domain::{TaskPersistence, TaskStore};
use taskboard_persistence::{FileKeyValueStore, LocalStorageAdapter};
use taskboard_tui::App;
use tracing_subscriber::EnvFilter;

fn init_logging() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("TASKBOARD_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let config = AppConfig::load();
    let path = context::data_file(cli.file.as_deref(), &config);

    match cli.command {
        None => {
            let persistence: Box<dyn TaskPersistence> =
                Box::new(LocalStorageAdapter::new(FileKeyValueStore::new(&path)));
            let mut app = App::new(TaskStore::open(persistence), &config);

            taskboard_tui::install_panic_hook();
            app.run().await?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "taskboard", &mut std::io::stdout());
        }
        Some(cmd) => {
            let mut board = context::open_board(path);

            match cmd {
                Commands::Task(task_cmd) => handlers::task::handle(&mut board, task_cmd.action)?,
                Commands::Board(board_cmd) => handlers::board::handle(&board, board_cmd.action)?,
                Commands::Column(column_cmd) => {
                    handlers::column::handle(&mut board, column_cmd.action)?
                }
                Commands::Completions { .. } => {}
            }
        }
    }

    Ok(())
}
