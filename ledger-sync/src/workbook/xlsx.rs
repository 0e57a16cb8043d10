//! Excel-backed workbook store
//!
//! Reading goes through calamine, writing through rust_xlsxwriter. Saving
//! rewrites the whole file from the in-memory model, so cell styling in the
//! original file is not preserved.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook};
use chrono::{Datelike, Duration, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook as XlsxWorkbook, Worksheet};

use super::{Cell, Table, Workbook, WorkbookStore, parse_date};

#[derive(Debug, Clone)]
pub struct XlsxStore {
    path: PathBuf,
}

impl XlsxStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WorkbookStore for XlsxStore {
    fn load(&self) -> Result<Workbook> {
        let path = &self.path;
        let mut xlsx: Xlsx<_> = open_workbook(path)
            .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

        let sheet_names: Vec<String> = xlsx.sheet_names().to_vec();
        let mut workbook = Workbook::new();

        for sheet_name in sheet_names {
            let range = xlsx
                .worksheet_range(&sheet_name)
                .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

            // Ranges start at the first used cell; keep absolute positions
            let (first_row, first_col) = range.start().unwrap_or((0, 0));
            let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); first_row as usize];

            for row in range.rows() {
                let mut cells = vec![Cell::Empty; first_col as usize];
                cells.extend(row.iter().map(cell_from_data));
                rows.push(cells);
            }

            workbook.insert(Table::from_rows(sheet_name, rows));
        }

        Ok(workbook)
    }

    fn save(&self, workbook: &Workbook) -> Result<()> {
        let mut xlsx = XlsxWorkbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        for table in workbook.sheets() {
            let worksheet = xlsx.add_worksheet();
            worksheet.set_name(table.name())?;

            for (row_idx, row) in table.rows().iter().enumerate() {
                for (col_idx, cell) in row.iter().enumerate() {
                    write_cell(worksheet, row_idx as u32, col_idx as u16, cell, &date_format)?;
                }
            }
        }

        xlsx.save(&self.path)
            .with_context(|| format!("Failed to save Excel file: {}", self.path.display()))?;

        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match excel_serial_to_date(dt.as_f64()) {
            Some(date) => Cell::Date(date),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_date(s) {
            Some(date) => Cell::Date(date),
            None => Cell::text(s.clone()),
        },
        Data::DurationIso(s) => Cell::text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

/// Convert an Excel 1900-system serial day number to a date
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let days = serial.floor() as i64;
    // Serial 60 is the nonexistent 1900-02-29
    let epoch = if days >= 61 {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    };
    epoch.checked_add_signed(Duration::days(days))
}

fn write_cell(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    date_format: &Format,
) -> Result<()> {
    match cell {
        Cell::Empty => { /* Leave cell empty */ }
        Cell::Text(s) => { ws.write_string(row, col, s)?; }
        Cell::Number(n) => { ws.write_number(row, col, *n)?; }
        Cell::Bool(b) => { ws.write_boolean(row, col, *b)?; }
        Cell::Date(d) => {
            let datetime = ExcelDateTime::from_ymd(d.year() as u16, d.month() as u8, d.day() as u8)?;
            ws.write_datetime_with_format(row, col, &datetime, date_format)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::{RowPosition, schema};

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(excel_serial_to_date(45658.0), NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(excel_serial_to_date(45658.75), NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(excel_serial_to_date(1.0), NaiveDate::from_ymd_opt(1900, 1, 1));
        assert_eq!(excel_serial_to_date(0.0), None);
    }

    #[test]
    fn test_cell_from_data() {
        assert_eq!(cell_from_data(&Data::String(String::new())), Cell::Empty);
        assert_eq!(cell_from_data(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(
            cell_from_data(&Data::DateTimeIso("2025-12-01T00:00:00".to_string())),
            Cell::Date(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap())
        );
    }

    #[test]
    fn test_save_and_load_keeps_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let store = XlsxStore::new(dir.path().join("books.xlsx"));

        let mut workbook = Workbook::with_default_sheets();
        let row = RowPosition::new(2).unwrap();
        {
            let transactions = workbook.sheet_mut(schema::TRANSACTIONS.name).unwrap();
            transactions.set(row, 0, 10.0);
            transactions.set(row, 1, "food");
            transactions.set(row, 3, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
            transactions.set(row, 4, "OK");
        }
        store.save(&workbook).unwrap();

        let loaded = store.load().unwrap();
        let transactions = loaded.sheet(schema::TRANSACTIONS.name).unwrap();
        assert_eq!(transactions.get(row, 0).as_number(), Some(10.0));
        assert_eq!(transactions.get(row, 1), &Cell::text("food"));
        assert_eq!(
            transactions.get(row, 3).as_date(),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        assert_eq!(transactions.get(row, 4), &Cell::text("OK"));
        assert!(loaded.sheet(schema::REPORT.name).is_some());
    }
}
