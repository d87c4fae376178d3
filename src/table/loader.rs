// SPDX-License-Identifier: PMPL-1.0-or-later

//! CSV reader for the association dataset

use crate::error::{DataSourceError, DataSourceResult};
use crate::types::{AssociationRecord, AssociationTable};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const FIELD_COUNT: usize = 3;

/// Load the full table from a dataset file, in file order
pub fn load_table(path: &Path) -> DataSourceResult<AssociationTable> {
    let file = File::open(path).map_err(|source| DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(file)?;
    debug!(
        path = %path.display(),
        records = table.len(),
        "loaded association table"
    );
    Ok(table)
}

/// Parse a table from any byte stream in dataset format
pub fn read_table<R: Read>(mut reader: R) -> DataSourceResult<AssociationTable> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).map_err(csv::Error::from)?;

    // flexible: field count is checked per row so the error names the line
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(buf.as_slice());

    let mut lines = LineCounter::new(&buf);
    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let line = row
            .position()
            .map(|pos| lines.line_at(pos.byte()))
            .unwrap_or(0);
        records.push(parse_record(&row, line)?);
    }

    Ok(AssociationTable::from_records(records))
}

/// Source line of a record from its byte offset. The csv reader leaves
/// skipped blank lines out of its own line count.
struct LineCounter<'a> {
    buf: &'a [u8],
    offset: usize,
    line: u64,
}

impl<'a> LineCounter<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: 0,
            line: 1,
        }
    }

    /// Offsets must be non-decreasing across calls
    fn line_at(&mut self, byte: u64) -> u64 {
        let mut start = usize::try_from(byte)
            .unwrap_or(usize::MAX)
            .clamp(self.offset, self.buf.len());
        // a record position may sit before the blank lines preceding it
        while start < self.buf.len() && matches!(self.buf[start], b'\r' | b'\n') {
            start += 1;
        }
        self.line += self.buf[self.offset..start]
            .iter()
            .filter(|&&b| b == b'\n')
            .count() as u64;
        self.offset = start;
        self.line
    }
}

fn parse_record(row: &StringRecord, line: u64) -> DataSourceResult<AssociationRecord> {
    if row.len() != FIELD_COUNT {
        return Err(DataSourceError::FieldCount {
            line,
            found: row.len(),
        });
    }

    let disease = &row[0];
    let symptom = &row[1];
    if disease.is_empty() {
        return Err(DataSourceError::EmptyField {
            line,
            field: "disease",
        });
    }
    if symptom.is_empty() {
        return Err(DataSourceError::EmptyField {
            line,
            field: "symptom",
        });
    }

    let group_number = row[2]
        .trim()
        .parse::<i64>()
        .map_err(|_| DataSourceError::GroupNumber {
            line,
            value: row[2].to_string(),
        })?;

    Ok(AssociationRecord::new(disease, symptom, group_number))
}
