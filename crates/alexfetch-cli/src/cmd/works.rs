//! Works subcommand - paginated /works queries

use alexfetch_core::SharedProgress;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use super::OutputArgs;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct WorksArgs {
    #[command(subcommand)]
    pub by: WorksBy,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Subcommand, Debug)]
pub enum WorksBy {
    /// Works matching any of the given DOIs
    Dois {
        /// DOIs (comma-separated or repeated)
        #[arg(required = true, value_delimiter = ',')]
        dois: Vec<String>,
    },
    /// Works by one author
    Author {
        /// OpenAlex author ID (e.g. A5023888391)
        author_id: String,
    },
    /// Works by corresponding institution, year, type and OA status
    Corresponding {
        /// Institution IDs (comma-separated)
        #[arg(long, required = true, value_delimiter = ',')]
        institutions: Vec<String>,

        /// Publication year
        #[arg(long)]
        year: i32,

        /// Work types, e.g. article,review (comma-separated)
        #[arg(long = "type", required = true, value_delimiter = ',')]
        types: Vec<String>,

        /// Open-access statuses, e.g. gold,green (comma-separated)
        #[arg(long = "oa-status", required = true, value_delimiter = ',')]
        oa_statuses: Vec<String>,
    },
    /// Works affiliated with a ROR-identified institution in one year
    Ror {
        /// ROR ID (bare or https://ror.org/ URL)
        ror_id: String,

        /// Publication year
        #[arg(long)]
        year: i32,
    },
}

pub fn run(args: WorksArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let (client, line) = super::client(config.client_config(), progress, "works");

    let (title, table) = match &args.by {
        WorksBy::Dois { dois } => ("Works by DOI", client.works_by_dois(dois)),
        WorksBy::Author { author_id } => ("Works by author", client.works_by_author(author_id)),
        WorksBy::Corresponding {
            institutions,
            year,
            types,
            oa_statuses,
        } => (
            "Works by corresponding institution",
            client.works_by_corresponding_institutions(institutions, *year, types, oa_statuses),
        ),
        WorksBy::Ror { ror_id, year } => ("Works by ROR", client.works_by_ror(ror_id, *year)),
    };
    line.finish_and_clear();
    let table = table.with_context(|| format!("{title}: fetch failed"))?;

    super::emit(&table, &args.output, config, progress, title)
}
