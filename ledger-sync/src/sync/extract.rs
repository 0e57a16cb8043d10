//! Row extraction: eligible records plus the index map back to sheet rows
//!
//! Records and their row positions are pushed in lockstep, so position `i`
//! of the compacted sequence always belongs to `index_map[i]`. The map is
//! built once per invocation and never recomputed.

use std::fmt;

use super::outcome::STATUS_OK;
use super::record::SheetRecord;
use crate::workbook::{RowPosition, Table};

/// 0-based position of a record within the compacted sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompactedIndex(pub usize);

impl fmt::Display for CompactedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps each compacted index to the sheet row it came from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexMap {
    positions: Vec<RowPosition>,
}

impl IndexMap {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[cfg(test)]
    pub fn get(&self, index: CompactedIndex) -> Option<RowPosition> {
        self.positions.get(index.0).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CompactedIndex, RowPosition)> + '_ {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, row)| (CompactedIndex(i), *row))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractOptions {
    /// Leave out rows whose status already reads OK
    pub skip_processed: bool,
}

/// Compacted records paired with their index map
#[derive(Debug, Clone)]
pub struct Extraction<R> {
    records: Vec<R>,
    index_map: IndexMap,
    already_processed: Vec<RowPosition>,
}

impl<R> Extraction<R> {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            index_map: IndexMap::default(),
            already_processed: Vec::new(),
        }
    }

    fn push(&mut self, row: RowPosition, record: R) {
        self.records.push(record);
        self.index_map.positions.push(row);
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn index_map(&self) -> &IndexMap {
        &self.index_map
    }

    /// Rows left out because they were already marked OK
    pub fn already_processed(&self) -> &[RowPosition] {
        &self.already_processed
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records with their sheet rows, in compacted order
    pub fn iter(&self) -> impl Iterator<Item = (RowPosition, &R)> + '_ {
        self.index_map.positions.iter().copied().zip(self.records.iter())
    }
}

/// Outcome of scanning a sheet
#[derive(Debug, Clone)]
pub enum Extracted<R> {
    /// No eligible rows; a normal terminal state, not an error
    Empty { already_processed: Vec<RowPosition> },
    Ready(Extraction<R>),
}

/// Scan the sheet in order, skipping the header and every ineligible row
pub fn extract<R: SheetRecord>(table: &Table, options: ExtractOptions) -> Extracted<R> {
    let status_column = R::schema().status_column;
    let mut extraction = Extraction::new();

    for (row, cells) in table.data_rows() {
        let Some(record) = R::from_row(cells) else {
            continue;
        };

        if options.skip_processed {
            let processed = status_column
                .is_some_and(|col| table.get(row, col).as_text().trim() == STATUS_OK);
            if processed {
                extraction.already_processed.push(row);
                continue;
            }
        }

        extraction.push(row, record);
    }

    if extraction.is_empty() {
        Extracted::Empty {
            already_processed: extraction.already_processed,
        }
    } else {
        Extracted::Ready(extraction)
    }
}
