//! ai-screenshooter CLI entry point

use std::process::ExitCode;

use clap::Parser;

use ai_screenshooter::cli::{
    handle_config_command, handle_status, handle_stop, run_start, AppPaths, Cli, Commands,
    Presenter, EXIT_ERROR,
};
use ai_screenshooter::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();
    let paths = AppPaths::resolve();

    match cli.command {
        Commands::Start(options) => run_start(options, paths).await,
        Commands::Status => handle_status(&paths, &presenter),
        Commands::Stop => handle_stop(&paths, &presenter).await,
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
    }
}
