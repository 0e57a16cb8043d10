//! Credential store over the Auth sheet
//!
//! Row 2 holds email, password and the current token. The token cell is the
//! only state that survives between invocations.

use crate::api::{Credentials, Session};
use crate::error::{Result, SyncError};
use crate::workbook::schema::auth;
use crate::workbook::{Cell, RowPosition, Table};

const VALUES_ROW: RowPosition = match RowPosition::new(2) {
    Some(row) => row,
    None => unreachable!(),
};

pub struct CredentialStore<'a> {
    table: &'a mut Table,
}

impl<'a> CredentialStore<'a> {
    pub fn new(table: &'a mut Table) -> Self {
        Self { table }
    }

    /// Email and password as typed into the sheet
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.table.get(VALUES_ROW, auth::EMAIL).as_text().trim(),
            self.table.get(VALUES_ROW, auth::PASSWORD).as_text(),
        )
    }

    /// Overwrite the stored token
    pub fn store_session(&mut self, session: &Session) {
        self.table.set(VALUES_ROW, auth::TOKEN, session.token());
    }

    pub fn clear_session(&mut self) {
        self.table.set(VALUES_ROW, auth::TOKEN, Cell::Empty);
    }

    /// Read the session without taking a mutable borrow of the sheet
    pub fn read_session(table: &Table) -> Result<Session> {
        let token = table.get(VALUES_ROW, auth::TOKEN).as_text();
        let email = Some(table.get(VALUES_ROW, auth::EMAIL).as_text())
            .filter(|e| !e.trim().is_empty());
        Session::new(token, email).ok_or(SyncError::MissingSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::schema;

    #[test]
    fn test_empty_sheet_has_no_session() {
        let table = Table::with_schema(&schema::AUTH);
        assert!(matches!(
            CredentialStore::read_session(&table),
            Err(SyncError::MissingSession)
        ));
    }

    #[test]
    fn test_credentials_read_from_values_row() {
        let mut table = Table::with_schema(&schema::AUTH);
        table.push_row(vec![" me@example.com ".into(), "pw".into()]);
        let store = CredentialStore::new(&mut table);

        assert_eq!(store.credentials(), Credentials::new("me@example.com", "pw"));
    }

    #[test]
    fn test_store_and_clear_session() {
        let mut table = Table::with_schema(&schema::AUTH);
        {
            let mut store = CredentialStore::new(&mut table);
            store.store_session(&Session::new("t1", None).unwrap());
            store.store_session(&Session::new("t2", None).unwrap());
        }
        assert_eq!(CredentialStore::read_session(&table).unwrap().token(), "t2");

        CredentialStore::new(&mut table).clear_session();
        assert!(matches!(
            CredentialStore::read_session(&table),
            Err(SyncError::MissingSession)
        ));
    }

    #[test]
    fn test_numeric_password_cell_reads_as_text() {
        let mut table = Table::with_schema(&schema::AUTH);
        table.push_row(vec!["me@example.com".into(), Cell::Number(1234.0)]);
        let store = CredentialStore::new(&mut table);
        assert_eq!(store.credentials().password, "1234");
    }
}
