//! alexfetch - command-line client for the OpenAlex REST API
//!
//! Each subcommand runs one paginated endpoint wrapper and writes the
//! resulting records as JSON Lines or Parquet.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "alexfetch")]
#[command(about = "Fetch works and institutions from the OpenAlex API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./alexfetch.toml or ~/.config/alexfetch/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Records per page
    #[arg(long, global = true)]
    per_page: Option<u32>,

    /// Contact address for the OpenAlex polite pool
    #[arg(long, global = true)]
    mailto: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Maximum retry attempts per page for transient failures
    #[arg(long, global = true)]
    max_retries: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch works by DOI, author, institution or ROR
    Works(cmd::works::WorksArgs),
    /// Fetch works cited by, or citing, seed works
    References(cmd::references::ReferencesArgs),
    /// Look up one institution by ROR ID
    Institution(cmd::institution::InstitutionArgs),
    /// Decode a Python literal and print it as JSON
    Literal(cmd::literal::LiteralArgs),
    /// Show current configuration
    Config,
}

impl Cli {
    /// Fold command-line overrides into the loaded config
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.base_url {
            config.api.base_url = url.clone();
        }
        if let Some(n) = self.per_page {
            config.api.per_page = n;
        }
        if let Some(mailto) = &self.mailto {
            config.api.mailto = Some(mailto.clone());
        }
        if let Some(secs) = self.timeout {
            config.http.timeout = secs;
        }
        if let Some(n) = self.max_retries {
            config.http.max_retries = n;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(alexfetch_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug, spinners show activity
    //   non-TTY: info unless --debug, logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    alexfetch_core::init_logging(quiet, cli.debug, multi);

    let mut config = if let Some(path) = &cli.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };
    cli.apply_overrides(&mut config);

    alexfetch_core::set_http_config(config.http_config());

    match cli.command {
        Command::Works(args) => cmd::works::run(args, &config, &progress),
        Command::References(args) => cmd::references::run(args, &config, &progress),
        Command::Institution(args) => cmd::institution::run(args, &config, &progress),
        Command::Literal(args) => cmd::literal::run(args),
        Command::Config => {
            let http = config.http_config();
            cmd::print_summary(
                &progress,
                "Setting",
                &[
                    ("Base URL", config.api.base_url.clone()),
                    ("Per page", config.api.per_page.to_string()),
                    (
                        "Mailto",
                        config.api.mailto.clone().unwrap_or_else(|| "not set".into()),
                    ),
                    ("User agent", http.user_agent),
                    ("Timeout", format!("{}s", config.http.timeout)),
                    ("Connect timeout", format!("{}s", config.http.connect_timeout)),
                    ("Max retries", config.http.max_retries.to_string()),
                    ("Retry base delay", format!("{}ms", config.http.retry_base_ms)),
                    ("Seed concurrency", config.seeds.concurrency.to_string()),
                    ("Compression level", config.output.compression_level.to_string()),
                ],
            );
            Ok(())
        }
    }
}
