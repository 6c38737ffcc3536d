// src/main.rs
mod cli;
mod commands;
mod logging;

use clap::{CommandFactory, Parser};
use cli::{Args, Command, is_config_operation};
use wagyu_sports::config::Config;
use wagyu_sports::constants::SNAPSHOT_ROOT_DIR;
use wagyu_sports::error::AppError;
use wagyu_sports::odds_api::OddsOptions;
use wagyu_sports::snapshots::SnapshotDir;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Configuration operations run before logging and never touch the network
    if is_config_operation(&args) {
        if args.list_config {
            return commands::handle_list_config_command().await;
        }
        return commands::handle_config_update_command(&args).await;
    }

    let Some(command) = args.command.clone() else {
        Args::command().print_help()?;
        return Ok(());
    };

    let mut config = Config::load().await?;
    if let Some(api_key) = &args.api_key {
        config.api_key = Some(api_key.clone());
    }

    let (log_file_path, _guard) = logging::setup_logging(&args, &config).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    let mut snapshot = if args.save {
        Some(SnapshotDir::create(SNAPSHOT_ROOT_DIR).await?)
    } else {
        None
    };

    let result = match command {
        Command::Serve {
            test_mode,
            fixtures_dir,
        } => commands::handle_serve_command(&config, test_mode, fixtures_dir).await,
        Command::Sports { all } => {
            commands::handle_sports_command(&config, all, &mut snapshot).await
        }
        Command::Odds {
            sport,
            regions,
            markets,
            odds_format,
            date_format,
        } => {
            let options = OddsOptions {
                regions,
                markets,
                odds_format,
                date_format,
                extra: Vec::new(),
            };
            commands::handle_odds_command(&config, &sport, options, &mut snapshot).await
        }
        Command::Window {
            region,
            start,
            end,
            timezone,
        } => {
            commands::handle_window_command(&config, region, start, end, timezone, &mut snapshot)
                .await
        }
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {e}");
    }
    result
}
