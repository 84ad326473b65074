pub mod institution;
pub mod literal;
pub mod references;
pub mod works;

use std::path::{Path, PathBuf};

use alexfetch_core::{ProgressContext, SharedProgress, fmt_num};
use alexfetch_openalex::export::{self, Format};
use alexfetch_openalex::{ClientConfig, OpenAlex, RecordTable};
use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use indicatif::ProgressBar;

use crate::config::Config;

/// Where fetched records go
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output file (.jsonl or .parquet); JSON Lines on stdout when omitted
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,
}

/// Client wired to a fresh progress line named `label`.
///
/// The caller clears the returned bar once the fetch is over.
pub fn client(config: ClientConfig, progress: &SharedProgress, label: &str) -> (OpenAlex, ProgressBar) {
    let line = progress.query_line(label);
    (OpenAlex::new(config).with_progress(line.clone()), line)
}

/// Print a key-value summary table on stderr, above any live spinners
pub fn print_summary(progress: &ProgressContext, title: &str, rows: &[(&str, String)]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new(title).fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    progress.println(format!("\n{table}"));
}

/// Write `table` to `path`, returning whether a file was produced.
///
/// A table without columns cannot be stored as Parquet; any file left at
/// `path` by an earlier run is removed so it is not mistaken for this
/// result. JSON Lines output is always (re)written, empty if need be.
fn write_file(table: &RecordTable, path: &Path, compression_level: i32) -> Result<bool> {
    if table.columns().is_empty() && Format::from_path(path) == Some(Format::Parquet) {
        if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to remove stale {}", path.display()))?;
            log::warn!("No records; removed stale {}", path.display());
        } else {
            log::warn!("No records; {} not written", path.display());
        }
        return Ok(false);
    }
    export::write_table(table, path, compression_level)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

/// Write `table` to the requested destination and summarize it
pub fn emit(
    table: &RecordTable,
    out: &OutputArgs,
    config: &Config,
    progress: &ProgressContext,
    title: &str,
) -> Result<()> {
    let destination = match &out.output {
        Some(path) => {
            if write_file(table, path, config.output.compression_level)? {
                path.display().to_string()
            } else {
                "-".to_string()
            }
        }
        None => {
            let stdout = std::io::stdout().lock();
            export::write_jsonl(table, stdout).context("Failed to write records to stdout")?;
            "stdout".to_string()
        }
    };

    print_summary(
        progress,
        title,
        &[
            ("Records", fmt_num(table.len())),
            ("Columns", table.columns().len().to_string()),
            ("Output", destination),
        ],
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table_of(ids: &[&str]) -> RecordTable {
        let records = ids
            .iter()
            .map(|id| match json!({"id": id}) {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            })
            .collect();
        RecordTable::from_records(records)
    }

    #[test]
    fn empty_result_removes_stale_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("works.parquet");
        std::fs::write(&path, b"from an earlier run").unwrap();

        let written = write_file(&RecordTable::new(), &path, 3).unwrap();
        assert!(!written);
        assert!(!path.exists());
    }

    #[test]
    fn empty_result_truncates_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("works.jsonl");
        std::fs::write(&path, "{\"id\":\"W-old\"}\n").unwrap();

        let written = write_file(&RecordTable::new(), &path, 3).unwrap();
        assert!(written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn records_are_written_as_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("works.parquet");
        assert!(write_file(&table_of(&["W1", "W2"]), &path, 3).unwrap());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn emit_with_hidden_progress() {
        let dir = tempfile::tempdir().unwrap();
        let out = OutputArgs {
            output: Some(dir.path().join("works.jsonl")),
        };
        let progress = ProgressContext::hidden();
        emit(&table_of(&["W1"]), &out, &Config::default(), &progress, "Works").unwrap();
        let text = std::fs::read_to_string(out.output.unwrap()).unwrap();
        assert_eq!(text, "{\"id\":\"W1\"}\n");
    }
}
