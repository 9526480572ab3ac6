//! Sheets API value types and the read/update seam the driver talks through.

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A block of cell values, as exchanged with the `spreadsheets.values` endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,

    /// Trailing empty rows and cells are omitted by the API, so rows may be ragged.
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    pub fn rows(range: impl Into<String>, values: Vec<Vec<Value>>) -> Self {
        ValueRange {
            range: Some(range.into()),
            major_dimension: Some("ROWS".to_string()),
            values,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: Option<u32>,
    #[serde(default)]
    pub updated_columns: Option<u32>,
    #[serde(default)]
    pub updated_cells: Option<u32>,
}

/// How the backend interprets written values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueInputOption {
    /// Stored exactly as given.
    Raw,
    /// Parsed as if typed into the UI: dates, numbers and formulas are recognized.
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInputOption::Raw => "RAW",
            ValueInputOption::UserEntered => "USER_ENTERED",
        }
    }
}

/// A1-notation range whose rows are open-ended, e.g. `ClassData!A2:B`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub sheet: String,
    pub start_column: String,
    pub start_row: usize,
    pub end_column: String,
}

impl CellRange {
    pub fn new(sheet: &str, start_column: &str, start_row: usize, end_column: &str) -> Self {
        CellRange {
            sheet: sheet.to_string(),
            start_column: start_column.to_string(),
            start_row,
            end_column: end_column.to_string(),
        }
    }

    /// Same columns, starting right below `rows` rows of data read from this range.
    pub fn below(&self, rows: usize) -> Self {
        CellRange {
            start_row: self.start_row + rows,
            ..self.clone()
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}!{}{}:{}",
            self.sheet, self.start_column, self.start_row, self.end_column
        )
    }
}

/// Display form of a cell: strings without quotes, anything else as JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// The two calls the driver makes against a spreadsheet.
#[allow(async_fn_in_trait)]
pub trait SheetsApi {
    async fn get_values(&mut self, spreadsheet_id: &str, range: &str) -> Result<ValueRange>;

    async fn update_values(
        &mut self,
        spreadsheet_id: &str,
        range: &str,
        values: &ValueRange,
        input: ValueInputOption,
    ) -> Result<UpdateValuesResponse>;
}
