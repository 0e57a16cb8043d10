//! Category summary fetched from the gateway and rendered into the Report sheet

use std::collections::BTreeMap;

use chrono::{Datelike, Local, NaiveDate};
use log::debug;

use crate::api::{ApiClient, Operation, Session};
use crate::error::{Result, SyncError};
use crate::workbook::{Cell, Table, schema};

/// One line of the summary
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub category: String,
    pub total: f64,
}

/// Fetch category totals for `[from, to]`, sorted by category
pub async fn fetch_summary(
    client: &ApiClient,
    session: &Session,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<ReportRow>> {
    let operation = Operation::ReportSummary { from, to };
    let result = client.execute(&operation, Some(session)).await?;
    if result.is_error() {
        return Err(SyncError::RequestFailed {
            status: result.status_code,
            body: result.body,
        });
    }
    parse_summary(&result.body)
}

/// Parse a `{category: total}` object into rows ordered by category
pub fn parse_summary(body: &str) -> Result<Vec<ReportRow>> {
    let totals: BTreeMap<String, f64> = serde_json::from_str(body)
        .map_err(|e| SyncError::InvalidResponse(format!("report summary: {}", e)))?;
    debug!("Report summary has {} categories", totals.len());

    Ok(totals
        .into_iter()
        .map(|(category, total)| ReportRow { category, total })
        .collect())
}

/// Replace the sheet contents with the header and one row per category
pub fn render_report(table: &mut Table, rows: &[ReportRow]) {
    table.clear();
    table.push_row(
        schema::REPORT
            .columns
            .iter()
            .map(|label| Cell::text(*label))
            .collect(),
    );
    for row in rows {
        table.push_row(vec![Cell::text(&row.category), Cell::Number(row.total)]);
    }
}

/// First and last day of the current month
pub fn default_range() -> (NaiveDate, NaiveDate) {
    month_range(Local::now().date_naive())
}

fn month_range(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = day.with_day(1).unwrap_or(day);
    let last = first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(day);
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::HttpResponse;
    use crate::testing::ScriptedTransport;
    use crate::workbook::RowPosition;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_summary_sorted_by_category() {
        let rows = parse_summary(r#"{"b": 5, "a": 3}"#).unwrap();
        assert_eq!(
            rows,
            vec![
                ReportRow {
                    category: "a".to_string(),
                    total: 3.0
                },
                ReportRow {
                    category: "b".to_string(),
                    total: 5.0
                },
            ]
        );
    }

    #[test]
    fn test_summary_rejects_non_object() {
        assert!(matches!(
            parse_summary("[1, 2]"),
            Err(SyncError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_render_clears_previous_report() {
        let mut table = Table::with_schema(&schema::REPORT);
        for i in 0..5 {
            table.push_row(vec![Cell::text(format!("old{}", i)), Cell::Number(1.0)]);
        }

        let rows = parse_summary(r#"{"rent": 1200.5, "food": 80}"#).unwrap();
        render_report(&mut table, &rows);

        assert_eq!(table.row_count(), 3);
        let first = RowPosition::new(2).unwrap();
        assert_eq!(table.get(RowPosition::HEADER, 0), &Cell::text("Category"));
        assert_eq!(table.get(first, 0), &Cell::text("food"));
        assert_eq!(table.get(first, 1), &Cell::Number(80.0));
    }

    #[test]
    fn test_month_range() {
        assert_eq!(
            month_range(date("2024-02-14")),
            (date("2024-02-01"), date("2024-02-29"))
        );
        assert_eq!(
            month_range(date("2025-12-31")),
            (date("2025-12-01"), date("2025-12-31"))
        );
    }

    #[tokio::test]
    async fn test_fetch_summary_sends_range() {
        let transport = ScriptedTransport::new();
        transport.push(HttpResponse::new(200, r#"{"food": 12.5}"#));
        let client = transport.client();
        let session = Session::new("jwt", None).unwrap();

        let rows = fetch_summary(&client, &session, date("2025-12-01"), date("2025-12-31"))
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        let requests = transport.requests();
        assert_eq!(
            requests[0].url,
            "http://gateway.test/api/reports/summary?from=2025-12-01&to=2025-12-31"
        );
        assert_eq!(requests[0].bearer.as_deref(), Some("jwt"));
    }

    #[tokio::test]
    async fn test_fetch_summary_failure_keeps_body() {
        let transport = ScriptedTransport::new();
        transport.push(HttpResponse::new(400, "invalid date range"));
        let client = transport.client();
        let session = Session::new("jwt", None).unwrap();

        let err = fetch_summary(&client, &session, date("2025-12-31"), date("2025-12-01"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, SyncError::RequestFailed { status: 400, ref body } if body == "invalid date range")
        );
    }
}
