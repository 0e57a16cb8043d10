//! Directory-of-CSV workbook store: one `<Sheet>.csv` file per sheet

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{Cell, Table, Workbook, WorkbookStore, schema};

#[derive(Debug, Clone)]
pub struct CsvDirStore {
    dir: PathBuf,
}

impl CsvDirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn sheet_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", name))
    }
}

impl WorkbookStore for CsvDirStore {
    fn load(&self) -> Result<Workbook> {
        if !self.dir.is_dir() {
            anyhow::bail!(
                "Workbook directory does not exist: {}",
                self.dir.display()
            );
        }

        let mut entries: Vec<PathBuf> = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list directory: {}", self.dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
            })
            .collect();
        entries.sort();

        // Known sheets first, in their canonical order
        entries.sort_by_key(|path| {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
            schema::ALL
                .iter()
                .position(|s| s.name == stem)
                .unwrap_or(schema::ALL.len())
        });

        let mut workbook = Workbook::new();
        for path in entries {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .context("Sheet file name is not valid UTF-8")?
                .to_string();
            workbook.insert(read_sheet(&path, name)?);
        }

        Ok(workbook)
    }

    fn save(&self, workbook: &Workbook) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;

        for table in workbook.sheets() {
            write_sheet(&self.sheet_path(table.name()), table)?;
        }

        Ok(())
    }

    fn location(&self) -> &Path {
        &self.dir
    }
}

fn read_sheet(path: &Path, name: String) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open sheet: {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Failed to parse sheet: {}", path.display()))?;
        rows.push(record.iter().map(Cell::from).collect());
    }

    Ok(Table::from_rows(name, rows))
}

fn write_sheet(path: &Path, table: &Table) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to create sheet: {}", path.display()))?;

    for row in table.rows() {
        writer.write_record(row.iter().map(Cell::as_text))?;
    }
    writer.flush()?;

    Ok(())
}
