//! Fixed column layouts for each sheet the tool reads or writes

/// Column layout of a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetSchema {
    /// Sheet name as shown in the workbook
    pub name: &'static str,
    /// Header labels, in column order
    pub columns: &'static [&'static str],
    /// Column receiving per-row sync status, if the sheet has one
    pub status_column: Option<usize>,
}

#[cfg(test)]
impl SheetSchema {
    pub fn column(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(label))
    }
}

/// Credentials and token; values live on row 2
pub const AUTH: SheetSchema = SheetSchema {
    name: "Auth",
    columns: &["email", "password", "token"],
    status_column: None,
};

pub const TRANSACTIONS: SheetSchema = SheetSchema {
    name: "Transactions",
    columns: &["amount", "category", "description", "date", "status"],
    status_column: Some(4),
};

pub const BUDGETS: SheetSchema = SheetSchema {
    name: "Budgets",
    columns: &["category", "limit", "status"],
    status_column: Some(2),
};

pub const REPORT: SheetSchema = SheetSchema {
    name: "Report",
    columns: &["Category", "Total"],
    status_column: None,
};

pub const ALL: [SheetSchema; 4] = [AUTH, TRANSACTIONS, BUDGETS, REPORT];

/// Column indices of the Auth sheet
pub mod auth {
    pub const EMAIL: usize = 0;
    pub const PASSWORD: usize = 1;
    pub const TOKEN: usize = 2;
}

/// Column indices of the Transactions sheet
pub mod transactions {
    pub const AMOUNT: usize = 0;
    pub const CATEGORY: usize = 1;
    pub const DESCRIPTION: usize = 2;
    pub const DATE: usize = 3;
}

/// Column indices of the Budgets sheet
pub mod budgets {
    pub const CATEGORY: usize = 0;
    pub const LIMIT: usize = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_columns_match_labels() {
        assert_eq!(TRANSACTIONS.status_column, TRANSACTIONS.column("status"));
        assert_eq!(BUDGETS.status_column, BUDGETS.column("Status"));
        assert_eq!(AUTH.column("token"), Some(auth::TOKEN));
        assert_eq!(TRANSACTIONS.column("date"), Some(transactions::DATE));
    }
}
