// src/export.rs
//! CSV export of the full result set for a search

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::core::gateway::{EmployeeGateway, PageQuery};
use crate::directory::cache::RowCache;
use crate::error::DirectoryResult;
use crate::types::employee::{Column, EmployeeRecord};

/// Fetch every row matching `search`, independent of what the view has loaded.
pub async fn collect_all(
    gateway: &dyn EmployeeGateway,
    search: &str,
    page_size: usize,
) -> DirectoryResult<Vec<EmployeeRecord>> {
    let mut collected = RowCache::new();
    let mut offset = 0;

    loop {
        let page = gateway
            .list_employees(&PageQuery {
                offset,
                limit: page_size,
                search: search.to_string(),
            })
            .await?;

        let fetched = page.rows.len();
        collected.append(page.rows);
        offset += fetched;
        debug!("Export fetched {} rows, offset={}", fetched, offset);

        // A reported total is authoritative: backends may cap `limit` below
        // what was asked, so a short page alone does not mean the end.
        let done = match page.total {
            Some(total) => fetched == 0 || offset as u64 >= total,
            None => fetched < page_size,
        };
        if done {
            break;
        }
    }

    info!("Collected {} rows for export (search={:?})", collected.len(), search);
    Ok(collected.rows().to_vec())
}

/// Header row of column labels, then one line per record. Absent values are
/// written empty; values with commas, quotes or newlines are quoted.
pub fn render_csv(rows: &[EmployeeRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(Column::ALL.iter().map(|c| c.label()))
        .context("Failed to write CSV header")?;

    for row in rows {
        writer
            .write_record(Column::ALL.iter().map(|c| row.value(*c).unwrap_or("")))
            .with_context(|| format!("Failed to write CSV row for {}", row.employee_id))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV: {}", e))
}

/// `employees_<all|filtered>_<timestamp>.csv`
pub fn export_file_name(search: &str, now: DateTime<Utc>) -> String {
    let scope = if search.trim().is_empty() {
        "all"
    } else {
        "filtered"
    };
    format!("employees_{}_{}.csv", scope, now.format("%Y-%m-%dT%H-%M-%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::testing::FakeGateway;
    use chrono::TimeZone;

    #[test]
    fn test_csv_escaping() {
        let mut row = EmployeeRecord::new(1).with_name("Rahman, Abdul");
        row.experience = Some("3 years \"senior\"".into());
        row.location = Some("Dhaka\nMirpur".into());

        let out = String::from_utf8(render_csv(&[row]).unwrap()).unwrap();
        let mut lines = out.splitn(2, '\n');

        assert_eq!(
            lines.next().unwrap(),
            "Employee Name,Age,Mobile Number,Location,Nearest Route,Education Profile,\
             Recent Education,Field of Expertise,Experience,CV Link,Masked CV Link,Agreement PDF"
        );
        let body = lines.next().unwrap();
        assert!(body.starts_with("\"Rahman, Abdul\",,,\"Dhaka\nMirpur\","));
        assert!(body.contains("\"3 years \"\"senior\"\"\""));
    }

    #[test]
    fn test_file_name_scope_and_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 9, 5, 30).unwrap();
        assert_eq!(export_file_name("", now), "employees_all_2026-10-15T09-05-30.csv");
        assert_eq!(
            export_file_name("accountant", now),
            "employees_filtered_2026-10-15T09-05-30.csv"
        );
    }

    #[tokio::test]
    async fn test_collect_all_ignores_view_window() {
        // 411 employees, 137 of them accountants.
        let gateway = FakeGateway::with_employees(411);
        let rows = collect_all(&gateway, "accountant", 50).await.unwrap();

        assert_eq!(rows.len(), 137);
        let csv = String::from_utf8(render_csv(&rows).unwrap()).unwrap();
        assert_eq!(csv.lines().count(), 138);
    }

    #[tokio::test]
    async fn test_collect_all_pages_past_capped_limit() {
        let gateway = FakeGateway::with_employees(411).with_limit_cap(200);
        let rows = collect_all(&gateway, "", 500).await.unwrap();

        assert_eq!(rows.len(), 411);
        assert_eq!(
            gateway.calls(),
            vec!["list 0 500 ", "list 200 500 ", "list 400 500 "]
        );
    }

    #[tokio::test]
    async fn test_collect_all_short_page_without_total() {
        let gateway = FakeGateway::with_employees(120).without_total();
        let rows = collect_all(&gateway, "", 50).await.unwrap();

        assert_eq!(rows.len(), 120);
        assert_eq!(gateway.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_collect_all_stops_on_exact_multiple() {
        let gateway = FakeGateway::with_employees(100);
        let rows = collect_all(&gateway, "", 50).await.unwrap();

        assert_eq!(rows.len(), 100);
        assert_eq!(gateway.calls().len(), 2);
    }
}
