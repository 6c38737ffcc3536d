use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Returns true when the arguments only touch configuration and no command
/// should run.
pub fn is_config_operation(args: &Args) -> bool {
    args.list_config
        || args.new_api_key.is_some()
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
}

/// Wagyu Sports odds client
///
/// Fetches sports and betting odds from The Odds API, finds sports with games
/// inside a time window, and serves the same operations as MCP tools over stdio.
///
/// The API key is read from ODDS_API_KEY (environment or .env file), the
/// config file, or --api-key.
#[derive(Parser, Debug)]
#[command(about, long_about = None, version)]
#[command(styles = get_styles())]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// API key for this run only. Overrides ODDS_API_KEY and the config file.
    #[arg(long = "api-key", global = true, help_heading = "Connection")]
    pub api_key: Option<String>,

    /// Save every response as pretty-printed JSON under test_outputs/test{N}/.
    #[arg(long = "save", global = true, help_heading = "Output")]
    pub save: bool,

    /// Store the API key in the config file.
    #[arg(long = "set-api-key", value_name = "API_KEY", help_heading = "Configuration")]
    pub new_api_key: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Also write logs to stderr. Ignored by `serve`, which logs only to the file.
    #[arg(long = "debug", global = true, help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", global = true, help_heading = "Debug")]
    pub log_file: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the MCP server on stdin/stdout.
    Serve {
        /// Answer tool calls from fixture files instead of the live API.
        #[arg(long = "test-mode")]
        test_mode: bool,

        /// Directory holding the fixture files used in test mode.
        #[arg(long = "fixtures-dir")]
        fixtures_dir: Option<String>,
    },

    /// List available sports.
    Sports {
        /// Include out-of-season sports.
        #[arg(long = "all")]
        all: bool,
    },

    /// Fetch odds for one sport.
    Odds {
        /// Sport key, e.g. basketball_nba
        sport: String,

        /// Comma-separated regions, e.g. us,uk
        #[arg(long)]
        regions: Option<String>,

        /// Comma-separated markets, e.g. h2h,spreads
        #[arg(long)]
        markets: Option<String>,

        /// decimal or american
        #[arg(long = "odds-format")]
        odds_format: Option<String>,

        /// unix or iso
        #[arg(long = "date-format")]
        date_format: Option<String>,
    },

    /// List active sports with games starting inside a time window.
    Window {
        /// Betting region. Defaults to the configured region.
        #[arg(long)]
        region: Option<String>,

        /// Window start, ISO-8601. Without an offset it is read in --timezone. Defaults to now.
        #[arg(long)]
        start: Option<String>,

        /// Window end, ISO-8601. Defaults to 23:59:59 today in --timezone.
        #[arg(long)]
        end: Option<String>,

        /// IANA timezone name. Defaults to the configured timezone.
        #[arg(long)]
        timezone: Option<String>,
    },
}
