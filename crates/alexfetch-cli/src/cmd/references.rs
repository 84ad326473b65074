//! References subcommand - citation neighbourhoods of seed works

use alexfetch_core::SharedProgress;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use super::OutputArgs;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ReferencesArgs {
    #[command(subcommand)]
    pub direction: Direction,

    /// Seeds fetched at once (default: [seeds] concurrency from config)
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Subcommand, Debug)]
pub enum Direction {
    /// Works cited by each seed
    Outgoing {
        /// Seed work IDs (e.g. W2741809807)
        #[arg(required = true, value_delimiter = ',')]
        work_ids: Vec<String>,
    },
    /// Works citing each seed
    Incoming {
        /// Seed work IDs (e.g. W2741809807)
        #[arg(required = true, value_delimiter = ',')]
        work_ids: Vec<String>,
    },
}

pub fn run(args: ReferencesArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let mut client_config = config.client_config();
    if let Some(n) = args.concurrency {
        client_config.seed_concurrency = n;
    }

    let (title, work_ids) = match &args.direction {
        Direction::Outgoing { work_ids } => ("Outgoing references", work_ids),
        Direction::Incoming { work_ids } => ("Incoming references", work_ids),
    };
    let (client, line) = super::client(client_config, progress, "references");
    log::info!(
        "{title}: {} seeds, concurrency {}",
        work_ids.len(),
        client.config().seed_concurrency
    );

    let table = match &args.direction {
        Direction::Outgoing { work_ids } => client.all_outgoing_referenced_works(work_ids),
        Direction::Incoming { work_ids } => client.all_incoming_referenced_works(work_ids),
    };
    line.finish_and_clear();
    let table = table.with_context(|| format!("{title}: fetch failed"))?;

    super::emit(&table, &args.output, config, progress, title)
}
