//! The structural parse of a sheet: a header row and rows of untyped cell text.

use crate::model::mapping::Mapping;
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// A row that was dropped during the structural parse, and why.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// The 1-based line in the source where the row started, when known.
    line: Option<u64>,
    reason: String,
}

impl SkippedRow {
    pub fn new(line: Option<u64>, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }

    pub fn line(&self) -> Option<u64> {
        self.line
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// One data row of the sheet. Cells are addressed by column index through the table's `Mapping`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    line: u64,
    values: Vec<String>,
}

impl RawRecord {
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The text of the cell at column `ix`. A row that is shorter than the header row reads as
    /// `None` for its missing trailing cells.
    pub fn value(&self, ix: usize) -> Option<&str> {
        self.values.get(ix).map(String::as_str)
    }
}

/// Represents the rows of a sheet before any cleaning, including the header mapping and any rows
/// that could not be used at all.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    mapping: Mapping,
    rows: Vec<RawRecord>,
    skipped: Vec<SkippedRow>,
}

impl RawTable {
    /// Parses CSV data. The first record is the header row.
    ///
    /// A row with more cells than there are headers, or a row that is not valid UTF-8, is skipped
    /// and recorded in `skipped`. Running out of input before a header row is found is an error.
    pub fn from_csv(data: impl AsRef<[u8]>) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(Cursor::new(data.as_ref()));

        let mut records = rdr.records();
        let mapping = match records.next() {
            Some(header_row) => {
                let header_row = header_row.context("Unable to read the header row")?;
                Mapping::new(header_row.iter())
            }
            None => bail!("The source is empty, there is no header row"),
        };

        let mut table = RawTable {
            mapping,
            ..RawTable::default()
        };

        for result in records {
            match result {
                Ok(record) => {
                    let line = record.position().map(|p| p.line()).unwrap_or_default();
                    table.push(line, record.iter().map(String::from).collect());
                }
                Err(e) if e.is_io_error() => {
                    return Err(e).context("Unable to read the source");
                }
                Err(e) => {
                    let line = e.position().map(|p| p.line());
                    table.skipped.push(SkippedRow::new(line, e.to_string()));
                }
            }
        }

        Ok(table)
    }

    /// Given rows that have already been split into cells, parse the header and data rows into a
    /// `RawTable`. Rows are numbered from 1, starting with the header row.
    ///
    /// These generics are confusing, but think of it like this: `rows` is something that looks
    /// like `Vec<Vec<String>>`.
    pub fn parse<S, R, I>(rows: I) -> Result<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
        I: IntoIterator<Item = R>,
    {
        let mut rows = rows.into_iter();
        let mapping = match rows.next() {
            Some(header_row) => Mapping::new(header_row),
            None => bail!("An empty data set cannot be parsed into a RawTable"),
        };

        let mut table = RawTable {
            mapping,
            ..RawTable::default()
        };

        for (row_ix, row) in rows.enumerate() {
            let values: Vec<String> = row.into_iter().map(|s| s.into()).collect();
            table.push(row_ix as u64 + 2, values);
        }

        Ok(table)
    }

    fn push(&mut self, line: u64, values: Vec<String>) {
        let len = self.mapping.len();
        if values.len() > len {
            self.skipped.push(SkippedRow::new(
                Some(line),
                format!(
                    "The row has {} fields but the header row has {len}",
                    values.len()
                ),
            ));
            return;
        }
        self.rows.push(RawRecord { line, values });
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn rows(&self) -> &[RawRecord] {
        &self.rows
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }
}
