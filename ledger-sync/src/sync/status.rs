//! Status write-back into the source sheet

use anyhow::Result;

use crate::workbook::RowPosition;
#[cfg(test)]
use crate::workbook::Table;

/// Destination for per-row status text
pub trait StatusSink {
    /// Record the status of one row
    fn write_status(&mut self, row: RowPosition, status: &str) -> Result<()>;

    /// Persist everything written so far
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes statuses straight into an in-memory table
#[cfg(test)]
pub struct TableStatus<'a> {
    table: &'a mut Table,
    column: usize,
}

#[cfg(test)]
impl<'a> TableStatus<'a> {
    pub fn new(table: &'a mut Table, column: usize) -> Self {
        Self { table, column }
    }
}

#[cfg(test)]
impl StatusSink for TableStatus<'_> {
    fn write_status(&mut self, row: RowPosition, status: &str) -> Result<()> {
        self.table.set(row, self.column, status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::Cell;

    #[test]
    fn test_table_status_overwrites_cell() {
        let mut table = Table::new("Budgets");
        let row = RowPosition::new(2).unwrap();
        {
            let mut sink = TableStatus::new(&mut table, 2);
            sink.write_status(row, "limit must be > 0").unwrap();
            sink.write_status(row, "OK").unwrap();
            sink.flush().unwrap();
        }
        assert_eq!(table.get(row, 2), &Cell::text("OK"));
    }
}
