use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use trendlens::cli::{self, OutputFormat, UptrendsArgs};
use trendlens::{config, logging};

#[derive(Debug, Parser)]
#[command(name = "trendlens")]
#[command(about = "Browse trending search terms from the terminal")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the weeks the backend has indexed
    Weeks {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Terms whose rank improved across a week range
    Uptrends {
        /// First week id (defaults to the saved or trailing-window start)
        #[arg(long)]
        start: Option<i64>,
        /// Last week id
        #[arg(long)]
        end: Option<i64>,
        /// Only terms matching these words (comma or space separated)
        #[arg(long)]
        include: Option<String>,
        /// Drop terms matching these words
        #[arg(long)]
        exclude: Option<String>,
        /// Sort column: term, start_rank, end_rank, total_improvement, weeks
        #[arg(long)]
        sort: Option<String>,
        /// Sort direction: asc, desc
        #[arg(long)]
        dir: Option<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Chart one term's rank history
    Series {
        /// The term to chart
        term: String,
        #[arg(long)]
        start: Option<i64>,
        #[arg(long)]
        end: Option<i64>,
        /// Also write the chart as SVG to this file
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Rebuild the backend index and reload the week catalog
    Reindex,
    /// Interactive dashboard
    Dash {
        /// Override the configured mode: demo or pro
        #[arg(long)]
        mode: Option<String>,
    },
    /// Manage configuration (show, init, set, reset)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective (merged) configuration
    Show,
    /// Create a default config file at ~/.trendlens/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a single value, e.g. `trendlens config set dashboard.mode pro`
    Set { key: String, value: String },
    /// Reset the global config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let cfg = config::load();
    logging::set_enabled(cfg.logging.enabled);

    match app.command {
        Commands::Weeks { format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_weeks(&cfg, fmt)
        }
        Commands::Uptrends {
            start,
            end,
            include,
            exclude,
            sort,
            dir,
            format,
        } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            let args = UptrendsArgs {
                start,
                end,
                include,
                exclude,
                sort,
                dir,
            };
            cli::run_uptrends(&cfg, &args, fmt)
        }
        Commands::Series {
            term,
            start,
            end,
            svg,
        } => cli::run_series(&cfg, &term, start, end, svg.as_deref()),
        Commands::Reindex => cli::run_reindex(&cfg),
        Commands::Dash { mode } => cli::run_dash(&cfg, mode.as_deref()),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
