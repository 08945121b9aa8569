//! Command-line parsing for the FRED-to-PostgreSQL sync tool.
//!
//! Argument parsing is kept separate from dispatch (`app`) so the sync and
//! analysis code never sees clap types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::ConfigOverrides;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fred-db", version, about = "Mirror FRED series into PostgreSQL and analyse them")]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Log verbosity (written to stderr).
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one or more series and create one table per series.
    ///
    /// Stops at the first failure.
    Sync(SyncArgs),
    /// Sync a named list of series, continuing past failures.
    Batch(BatchArgs),
    /// Clean, difference and test a series for a unit root.
    Analyze(AnalyzeArgs),
    /// Write a series to CSV in the shape of its table.
    Export(ExportArgs),
}

/// Connection settings. Each flag overrides its environment variable.
#[derive(Debug, Args, Clone, Default)]
pub struct ConnectionArgs {
    /// Database host [env: PGHOST].
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Database name [env: PGDATABASE, default: fred].
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Database user [env: PGUSER].
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Database password [env: PGPW or PGPASSWORD].
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Database port [env: PGPORT, default: 5432].
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// FRED API key [env: FRED_API_KEY].
    #[arg(long, global = true)]
    pub api_key: Option<String>,
}

impl ConnectionArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            database: self.database.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            port: self.port,
            api_key: self.api_key.clone(),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct SyncArgs {
    /// FRED series identifiers, e.g. GFDEBTN CSUSHPISA.
    #[arg(required = true)]
    pub series: Vec<String>,

    /// Print the SQL instead of touching PostgreSQL.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// `name=SERIES_ID` entries. Defaults to the built-in list.
    #[arg(long = "series", value_name = "NAME=ID")]
    pub series: Vec<String>,

    /// Print the SQL instead of touching PostgreSQL.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    /// FRED series identifier.
    #[arg(required_unless_present = "csv", conflicts_with = "csv")]
    pub series: Option<String>,

    /// Analyse a FRED CSV download instead of fetching.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Write the analysis report to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// FRED series identifier.
    pub series: String,

    /// Output path. Defaults to `<table_name>.csv`.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_tracing(self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::parse_from(["fred-db", "sync", "GFDEBTN", "--dry-run", "--port", "6543", "--log-level", "debug"]);
        assert_eq!(cli.connection.port, Some(6543));
        assert_eq!(cli.log_level, LogLevel::Debug);
        match cli.command {
            Command::Sync(args) => {
                assert_eq!(args.series, vec!["GFDEBTN"]);
                assert!(args.dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn batch_series_flag_repeats() {
        let cli = Cli::parse_from(["fred-db", "batch", "--series", "gdp=A191RL1Q225SBEA", "--series", "GFDEBTN"]);
        match cli.command {
            Command::Batch(args) => assert_eq!(args.series.len(), 2),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn analyze_requires_a_source() {
        assert!(Cli::try_parse_from(["fred-db", "analyze"]).is_err());
        assert!(Cli::try_parse_from(["fred-db", "analyze", "GFDEBTN", "--csv", "x.csv"]).is_err());
        assert!(Cli::try_parse_from(["fred-db", "analyze", "--csv", "x.csv"]).is_ok());
    }
}
