use crate::cli::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;
use wagyu_sports::config::Config;
use wagyu_sports::error::AppError;
use wagyu_sports::mcp::OddsMcpServer;
use wagyu_sports::odds_api::{FixtureSource, OddsClient, OddsOptions, WindowRequest};
use wagyu_sports::snapshots::SnapshotDir;

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles configuration update commands (--set-api-key, --set-log-file, --clear-log-file).
///
/// Reads the stored config file without environment overrides so values
/// from the environment are never persisted by accident.
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    let config_path = Config::get_config_path();
    let mut config = if Path::new(&config_path).exists() {
        Config::load_from_path(&config_path).await?
    } else {
        Config::default()
    };

    if let Some(new_key) = &args.new_api_key {
        config.api_key = Some(new_key.trim().to_string());
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    config.validate()?;
    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

/// Runs the MCP server until stdin closes.
pub async fn handle_serve_command(
    config: &Config,
    test_mode: bool,
    fixtures_dir: Option<String>,
) -> Result<(), AppError> {
    let mut config = config.clone();
    if fixtures_dir.is_some() {
        config.fixtures_dir = fixtures_dir;
    }
    let server = OddsMcpServer::from_config(&config, test_mode || config.test_mode)?;
    server.run_stdio().await
}

pub async fn handle_sports_command(
    config: &Config,
    all: bool,
    snapshot: &mut Option<SnapshotDir>,
) -> Result<(), AppError> {
    let envelope = if config.test_mode {
        fixtures(config).sports(all).await?
    } else {
        OddsClient::from_config(config)?.get_sports(all).await?
    };
    emit("sports", &envelope, snapshot).await
}

pub async fn handle_odds_command(
    config: &Config,
    sport: &str,
    options: OddsOptions,
    snapshot: &mut Option<SnapshotDir>,
) -> Result<(), AppError> {
    let envelope = if config.test_mode {
        fixtures(config).odds(sport).await?
    } else {
        OddsClient::from_config(config)?
            .get_odds(sport, &options)
            .await?
    };
    emit(&format!("odds_{sport}"), &envelope, snapshot).await
}

pub async fn handle_window_command(
    config: &Config,
    region: Option<String>,
    start: Option<String>,
    end: Option<String>,
    timezone: Option<String>,
    snapshot: &mut Option<SnapshotDir>,
) -> Result<(), AppError> {
    let timezone = timezone.unwrap_or_else(|| config.timezone.clone());
    let request = WindowRequest::parse(start.as_deref(), end.as_deref(), Some(&timezone))?;

    let report = if config.test_mode {
        fixtures(config).sports_in_window(&request).await?
    } else {
        let region = region.unwrap_or_else(|| config.region.clone());
        OddsClient::from_config(config)?
            .sports_with_games_in_window(&region, &request)
            .await?
    };
    info!("{} sports with games in the window", report.data.len());
    emit("sports_in_window", &report, snapshot).await
}

fn fixtures(config: &Config) -> FixtureSource {
    FixtureSource::new(config.fixtures_dir_or_default())
}

/// Prints `value` as pretty JSON and saves it when snapshots are enabled.
async fn emit<T: Serialize>(
    name: &str,
    value: &T,
    snapshot: &mut Option<SnapshotDir>,
) -> Result<(), AppError> {
    emit_to(&mut std::io::stdout(), name, value, snapshot).await
}

/// Writes only the JSON document to `out`. Snapshot notices go to stderr so
/// piped output stays parseable.
async fn emit_to<W: Write, T: Serialize>(
    out: &mut W,
    name: &str,
    value: &T,
    snapshot: &mut Option<SnapshotDir>,
) -> Result<(), AppError> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    if let Some(snapshot) = snapshot {
        let path = snapshot.save(name, value).await?;
        eprintln!("Saved to {}", path.display());
    }
    Ok(())
}
