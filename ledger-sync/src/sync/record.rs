//! Row-to-record conversion for each synchronizable sheet

use crate::api::{NewBudget, NewTransaction, Operation};
use crate::workbook::schema::{self, budgets, transactions};
use crate::workbook::{Cell, SheetSchema};

/// A record that can be built from a sheet row and sent to the gateway
pub trait SheetRecord: Clone {
    /// Sheet layout the record is read from
    fn schema() -> &'static SheetSchema;

    /// Build the record when every required cell is present and truthy;
    /// `None` means the row is not eligible and must be skipped
    fn from_row(row: &[Cell]) -> Option<Self>;

    /// Single-record create call for this record
    fn create_operation(&self) -> Operation;
}

fn cell(row: &[Cell], col: usize) -> &Cell {
    static EMPTY: Cell = Cell::Empty;
    row.get(col).unwrap_or(&EMPTY)
}

/// Non-zero number; text cells are parsed
fn required_number(row: &[Cell], col: usize) -> Option<f64> {
    let cell = cell(row, col);
    if !cell.is_truthy() {
        return None;
    }
    cell.as_number().filter(|n| *n != 0.0)
}

fn required_text(row: &[Cell], col: usize) -> Option<String> {
    let cell = cell(row, col);
    cell.is_truthy().then(|| cell.as_text().trim().to_string())
}

impl SheetRecord for NewTransaction {
    fn schema() -> &'static SheetSchema {
        &schema::TRANSACTIONS
    }

    fn from_row(row: &[Cell]) -> Option<Self> {
        let amount = required_number(row, transactions::AMOUNT)?;
        let category = required_text(row, transactions::CATEGORY)?;

        let date_cell = cell(row, transactions::DATE);
        if !date_cell.is_truthy() {
            return None;
        }
        let date = match date_cell.as_date() {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => date_cell.as_text().trim().to_string(),
        };

        Some(NewTransaction {
            amount,
            category,
            description: cell(row, transactions::DESCRIPTION).as_text(),
            date,
        })
    }

    fn create_operation(&self) -> Operation {
        Operation::CreateTransaction {
            transaction: self.clone(),
        }
    }
}

impl SheetRecord for NewBudget {
    fn schema() -> &'static SheetSchema {
        &schema::BUDGETS
    }

    fn from_row(row: &[Cell]) -> Option<Self> {
        Some(NewBudget {
            category: required_text(row, budgets::CATEGORY)?,
            limit: required_number(row, budgets::LIMIT)?,
        })
    }

    fn create_operation(&self) -> Operation {
        Operation::CreateBudget {
            budget: self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_transaction_from_complete_row() {
        let row = vec![
            Cell::Number(10.0),
            Cell::text("food"),
            Cell::Empty,
            Cell::Date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
        ];
        let tx = NewTransaction::from_row(&row).unwrap();

        assert_eq!(tx.amount, 10.0);
        assert_eq!(tx.category, "food");
        assert_eq!(tx.description, "");
        assert_eq!(tx.date, "2025-01-01");
    }

    #[test]
    fn test_transaction_requires_amount_category_date() {
        let blank = vec![Cell::Number(0.0), Cell::Empty, Cell::Empty, Cell::Empty];
        assert!(NewTransaction::from_row(&blank).is_none());

        let no_date = vec![Cell::Number(5.0), Cell::text("food")];
        assert!(NewTransaction::from_row(&no_date).is_none());

        let no_category = vec![Cell::Number(5.0), Cell::text("  "), Cell::Empty, Cell::text("2025-01-01")];
        assert!(NewTransaction::from_row(&no_category).is_none());

        let text_amount = vec![Cell::text("abc"), Cell::text("food"), Cell::Empty, Cell::text("2025-01-01")];
        assert!(NewTransaction::from_row(&text_amount).is_none());
    }

    #[test]
    fn test_unparsed_date_text_is_passed_through() {
        let row = vec![
            Cell::text("12.50"),
            Cell::text("food"),
            Cell::text("lunch"),
            Cell::text("next friday"),
        ];
        let tx = NewTransaction::from_row(&row).unwrap();
        assert_eq!(tx.amount, 12.5);
        assert_eq!(tx.description, "lunch");
        assert_eq!(tx.date, "next friday");
    }

    #[test]
    fn test_budget_requires_category_and_limit() {
        let row = vec![Cell::text("rent"), Cell::Number(1200.0), Cell::text("OK")];
        assert_eq!(
            NewBudget::from_row(&row),
            Some(NewBudget {
                category: "rent".to_string(),
                limit: 1200.0
            })
        );
        assert!(NewBudget::from_row(&[Cell::text("rent")]).is_none());
        assert!(NewBudget::from_row(&[Cell::Empty, Cell::Number(3.0)]).is_none());
    }

    #[test]
    fn test_create_operations() {
        let budget = NewBudget {
            category: "rent".to_string(),
            limit: 1.0,
        };
        assert_eq!(budget.create_operation().path(), "/api/budgets");
    }
}
