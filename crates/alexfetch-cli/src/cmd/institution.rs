//! Institution subcommand - single ROR lookup

use alexfetch_core::SharedProgress;
use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use super::OutputArgs;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct InstitutionArgs {
    /// ROR ID (bare or https://ror.org/ URL)
    pub ror_id: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn run(args: InstitutionArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let (client, line) = super::client(config.client_config(), progress, "institution");
    let record = client.institution_by_ror(&args.ror_id);
    line.finish_and_clear();
    let record = record.with_context(|| format!("Institution lookup failed for {}", args.ror_id))?;

    match &args.output.output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&Value::Object(record))?;
            std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote institution to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&record)?),
    }
    Ok(())
}
