use crate::models::{HistoryRow, RankingRow, HISTORY_COLUMNS, RANKING_COLUMNS};
use anyhow::{Context, Result};
use csv::WriterBuilder;
use log::info;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Spreadsheet tools need the BOM to pick UTF-8 for channel names and titles.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    Ok(())
}

fn write_rows<W: Write, T: Serialize>(
    out: W,
    header: Option<&[&str]>,
    rows: &[T],
) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(out);
    if let Some(header) = header {
        wtr.write_record(header)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Replaces the snapshot table. The header is written even when there are no rows.
pub fn write_snapshot(path: &Path, rows: &[RankingRow]) -> Result<()> {
    ensure_parent(path)?;
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    file.write_all(UTF8_BOM)?;
    write_rows(file, Some(&RANKING_COLUMNS[..]), rows)
        .with_context(|| format!("write {}", path.display()))?;
    info!("Wrote {} ranking rows to {}", rows.len(), path.display());
    Ok(())
}

/// Appends to the history log, starting it with BOM and header if it is new.
pub fn append_history(path: &Path, rows: &[HistoryRow]) -> Result<()> {
    ensure_parent(path)?;
    let is_new = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;

    let header = if is_new {
        file.write_all(UTF8_BOM)?;
        Some(&HISTORY_COLUMNS[..])
    } else {
        None
    };
    write_rows(file, header, rows).with_context(|| format!("append {}", path.display()))?;
    info!("Appended {} history rows to {}", rows.len(), path.display());
    Ok(())
}
