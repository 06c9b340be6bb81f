use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::Result;

/// Read up to `limit` records from a CSV file, handing each one to `parse`
/// together with its 1-based line number.
///
/// A file with fewer than `limit` records yields what it has.
pub fn read_csv_records<T, P, F>(path: P, limit: usize, has_headers: bool, mut parse: F) -> Result<Vec<T>>
where
    P: AsRef<Path>,
    F: FnMut(&StringRecord, usize) -> Result<T>,
{
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_path(path)?;

    let mut parsed = Vec::with_capacity(limit.min(1 << 16));
    for (idx, record) in reader.records().take(limit).enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(idx + 1);
        parsed.push(parse(&record, line)?);
    }

    if parsed.len() < limit {
        log::warn!("{}: expected {} records, read {}", path.display(), limit, parsed.len());
    }
    Ok(parsed)
}
