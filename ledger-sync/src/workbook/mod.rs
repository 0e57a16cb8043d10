//! Workbook model shared by every sheet-facing component
//!
//! A workbook is a set of named tables of loosely typed cells. It is loaded
//! from and saved to a [`WorkbookStore`], either an `.xlsx` file or a
//! directory holding one CSV file per sheet.

pub mod csv_dir;
pub mod schema;
pub mod xlsx;

use std::fmt;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;

pub use csv_dir::CsvDirStore;
pub use schema::SheetSchema;
pub use xlsx::XlsxStore;

/// Date formats accepted when a date arrives as text
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y"];

/// 1-based position of a row in its sheet; the header is row 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowPosition(u32);

impl RowPosition {
    #[cfg(test)]
    pub const HEADER: RowPosition = RowPosition(1);

    /// Returns `None` for 0, which is not a valid sheet row
    pub const fn new(row: u32) -> Option<Self> {
        if row > 0 { Some(Self(row)) } else { None }
    }

    #[cfg(test)]
    pub fn get(self) -> u32 {
        self.0
    }

    fn offset(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for RowPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    /// Spreadsheet truthiness: empty cells, blank text, zero, NaN and `false` are falsy
    pub fn is_truthy(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Text(s) => !s.trim().is_empty(),
            Cell::Number(n) => *n != 0.0 && !n.is_nan(),
            Cell::Bool(b) => *b,
            Cell::Date(_) => true,
        }
    }

    /// Numeric value, parsing text cells when they hold a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Calendar date, parsing text cells in the common spreadsheet formats
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => parse_date(s.trim()),
            _ => None,
        }
    }

    /// Display text of the cell, empty for empty cells
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Bool(b) => b.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::text(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    // ISO timestamps keep only their date part
    let s = s.split('T').next().unwrap_or(s);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Whole numbers print without a fractional part
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// A named sheet of cells; row 1 is the header
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    name: String,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    #[cfg(test)]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Build a table from its header followed by data rows
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// New table holding only the schema's header row
    pub fn with_schema(schema: &SheetSchema) -> Self {
        let header = schema.columns.iter().map(|c| Cell::text(*c)).collect();
        Self::from_rows(schema.name, vec![header])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows including the header
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Data rows in sheet order, header skipped
    pub fn data_rows(&self) -> impl Iterator<Item = (RowPosition, &[Cell])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(offset, cells)| (RowPosition(offset as u32 + 1), cells.as_slice()))
    }

    /// Cell at a position; cells outside the written area read as empty
    pub fn get(&self, row: RowPosition, col: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.rows
            .get(row.offset())
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Set a cell, growing the table as needed
    pub fn set(&mut self, row: RowPosition, col: usize, value: impl Into<Cell>) {
        let offset = row.offset();
        if self.rows.len() <= offset {
            self.rows.resize_with(offset + 1, Vec::new);
        }
        let cells = &mut self.rows[offset];
        if cells.len() <= col {
            cells.resize(col + 1, Cell::Empty);
        }
        cells[col] = value.into();
    }

    pub fn push_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

/// Ordered collection of sheets
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    sheets: Vec<Table>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Workbook with every known sheet and its header row
    pub fn with_default_sheets() -> Self {
        Self {
            sheets: schema::ALL
                .iter()
                .map(|schema| Table::with_schema(schema))
                .collect(),
        }
    }

    pub fn sheets(&self) -> &[Table] {
        &self.sheets
    }

    #[cfg(test)]
    pub fn sheet(&self, name: &str) -> Option<&Table> {
        self.sheets.iter().find(|s| s.name == name)
    }

    #[cfg(test)]
    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    /// Fetch a sheet, creating it with the schema header when missing
    pub fn sheet_or_create(&mut self, schema: &SheetSchema) -> &mut Table {
        match self.sheets.iter().position(|s| s.name == schema.name) {
            Some(idx) => &mut self.sheets[idx],
            None => {
                self.sheets.push(Table::with_schema(schema));
                let last = self.sheets.len() - 1;
                &mut self.sheets[last]
            }
        }
    }

    pub fn insert(&mut self, table: Table) {
        match self.sheets.iter_mut().find(|s| s.name == table.name) {
            Some(existing) => *existing = table,
            None => self.sheets.push(table),
        }
    }
}

/// Persistent backing for a workbook
pub trait WorkbookStore {
    fn load(&self) -> Result<Workbook>;
    fn save(&self, workbook: &Workbook) -> Result<()>;
    fn location(&self) -> &Path;
}

/// Pick a store from the path: `.xlsx` files use the Excel store, anything
/// else is treated as a directory of CSV sheets
pub fn open_store(path: &Path) -> Box<dyn WorkbookStore> {
    let is_xlsx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));

    if is_xlsx {
        Box::new(XlsxStore::new(path))
    } else {
        Box::new(CsvDirStore::new(path))
    }
}
