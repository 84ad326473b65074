//! Table export to JSON Lines and Parquet

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use serde_json::Value;

use crate::table::RecordTable;

/// Output format, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    JsonLines,
    Parquet,
}

impl Format {
    /// `.parquet` → Parquet, `.jsonl`/`.ndjson`/`.json` → JSON Lines
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "parquet" => Some(Self::Parquet),
            "jsonl" | "ndjson" | "json" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// One record per line, keys as returned by the API
pub fn write_jsonl<W: Write>(table: &RecordTable, writer: W) -> io::Result<usize> {
    let mut writer = BufWriter::new(writer);
    for row in table.rows() {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(table.len())
}

/// Cell text for the flat Parquet layout: strings verbatim, other scalars
/// in JSON notation, arrays/objects as JSON text, null as a null cell.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Flatten the table into one Utf8 column per table column
pub fn to_record_batch(table: &RecordTable) -> io::Result<RecordBatch> {
    if table.columns().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "table has no columns",
        ));
    }
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .map(|name| Field::new(name, DataType::Utf8, true))
        .collect();
    let arrays: Vec<ArrayRef> = table
        .columns()
        .iter()
        .map(|name| {
            let cells: StringArray = table
                .column(name)
                .map(|v| v.and_then(cell_text))
                .collect();
            Arc::new(cells) as ArrayRef
        })
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).map_err(io::Error::other)
}

/// Zstd Parquet file, written to `<path>.tmp` then renamed into place
pub fn write_parquet(table: &RecordTable, path: &Path, zstd_level: i32) -> io::Result<usize> {
    let batch = to_record_batch(table)?;
    let tmp_path = path.with_extension("parquet.tmp");
    if tmp_path.exists() {
        fs::remove_file(&tmp_path)?;
    }

    let file = File::create(&tmp_path)?;
    let level = ZstdLevel::try_new(zstd_level)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(level))
        .build();
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), Some(props)).map_err(io::Error::other)?;
    writer.write(&batch).map_err(io::Error::other)?;
    writer.close().map_err(io::Error::other)?;
    fs::rename(&tmp_path, path)?;
    Ok(batch.num_rows())
}

/// Write `table` to `path` in the format implied by its extension
pub fn write_table(table: &RecordTable, path: &Path, zstd_level: i32) -> io::Result<usize> {
    let format = Format::from_path(path).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unsupported output extension: {}", path.display()),
        )
    })?;
    let rows = match format {
        Format::Parquet => write_parquet(table, path, zstd_level)?,
        Format::JsonLines => write_jsonl(table, File::create(path)?)?,
    };
    log::info!("Wrote {rows} rows to {}", path.display());
    Ok(rows)
}
