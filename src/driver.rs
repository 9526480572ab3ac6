//! Read the class table, print it, and append today's row below it.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;

use crate::error::DriverError;
use crate::sheets::{CellRange, SheetsApi, ValueInputOption, ValueRange, cell_text};

pub const SHEET_NAME: &str = "ClassData";
pub const ACTIVITY: &str = "squash";

/// Columns A-B from row 2, skipping the header row.
pub fn read_range() -> CellRange {
    CellRange::new(SHEET_NAME, "A", 2, "B")
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub rows_read: usize,
    pub write_range: CellRange,
    pub appended: Vec<Value>,
}

/// The row appended on `today`, e.g. `["10/19/2026", "squash"]`.
pub fn new_row(today: NaiveDate) -> Vec<Value> {
    vec![
        Value::String(today.format("%-m/%-d/%Y").to_string()),
        Value::String(ACTIVITY.to_string()),
    ]
}

pub async fn run<S, W>(
    api: &mut S,
    spreadsheet_id: &str,
    today: NaiveDate,
    out: &mut W,
) -> Result<Report>
where
    S: SheetsApi,
    W: Write,
{
    let read_range = read_range();

    writeln!(out, "reading spreadsheet")?;
    let response = api
        .get_values(spreadsheet_id, &read_range.to_string())
        .await
        .context("Unable to retrieve data from sheet")?;

    let rows = response.values;
    tracing::debug!(rows = rows.len(), range = %read_range, "values read");

    writeln!(out, "last Row: {}", rows.len())?;
    print_rows(&rows, out)?;

    let write_range = read_range.below(rows.len());
    let row = new_row(today);
    let body = ValueRange::rows(write_range.to_string(), vec![row.clone()]);

    api.update_values(
        spreadsheet_id,
        &write_range.to_string(),
        &body,
        ValueInputOption::UserEntered,
    )
    .await
    .context("Unable to append data to sheet")?;

    writeln!(out, "Appended row to {}", write_range)?;

    Ok(Report {
        rows_read: rows.len(),
        write_range,
        appended: row,
    })
}

/// Prints each row as `name, activity`, preceded by its index.
pub fn print_rows<W: Write>(rows: &[Vec<Value>], out: &mut W) -> Result<()> {
    if rows.is_empty() {
        writeln!(out, "No data found.")?;
        return Ok(());
    }

    writeln!(out, "Name, Activity:")?;
    for (index, row) in rows.iter().enumerate() {
        let [name, activity, ..] = row.as_slice() else {
            return Err(DriverError::ShortRow {
                index,
                len: row.len(),
            }
            .into());
        };

        writeln!(out, "{}", index)?;
        writeln!(out, "{}, {}", cell_text(name), cell_text(activity))?;
    }

    Ok(())
}
