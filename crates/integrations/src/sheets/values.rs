//! Request and response shapes of the Sheets values API.

use hornero_core::records::{CellValue, ColumnFormat, serial_date};
use serde::Deserialize;
use serde_json::{Value, json};

/// Last column touched when a row is cleared.
pub(crate) const LAST_COLUMN: char = 'Z';

/// Response of `values:append`.
#[derive(Debug, Deserialize)]
pub(crate) struct AppendResponse {
    #[serde(default)]
    pub updates: Option<AppendUpdates>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppendUpdates {
    #[serde(default)]
    pub updated_range: Option<String>,
}

/// Response of the spreadsheet metadata call.
#[derive(Debug, Deserialize)]
pub(crate) struct SpreadsheetMeta {
    #[serde(default)]
    pub sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SheetEntry {
    pub properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SheetProperties {
    pub sheet_id: i64,
    pub title: String,
}

/// JSON form of a cell. Dates go out as serial day numbers.
pub(crate) fn cell_json(cell: &CellValue) -> Value {
    match cell {
        CellValue::Text(text) => Value::String(text.clone()),
        CellValue::Number(n) => n
            .normalize()
            .to_string()
            .parse::<serde_json::Number>()
            .map_or_else(|_| Value::String(n.to_string()), Value::Number),
        CellValue::Bool(flag) => Value::Bool(*flag),
        CellValue::Date(date) => Value::from(serial_date(*date)),
        CellValue::Empty => Value::String(String::new()),
    }
}

/// Body carrying a single row.
pub(crate) fn row_body(values: &[CellValue]) -> Value {
    let row: Vec<Value> = values.iter().map(cell_json).collect();
    json!({ "values": [row] })
}

/// Row number of the first cell of an A1 range such as `gastos!A7:J7`.
pub(crate) fn first_row(range: &str) -> Option<u32> {
    let cells = range.rsplit_once('!').map_or(range, |(_, cells)| cells);
    let first = cells.split(':').next()?;
    let digits: String = first
        .chars()
        .skip_while(char::is_ascii_alphabetic)
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// `repeatCell` requests that apply `formats` to one row.
pub(crate) fn format_requests(sheet_id: i64, row: u32, formats: &[ColumnFormat]) -> Vec<Value> {
    formats
        .iter()
        .map(|format| {
            let column = format.index();
            json!({
                "repeatCell": {
                    "range": {
                        "sheetId": sheet_id,
                        "startRowIndex": row.saturating_sub(1),
                        "endRowIndex": row,
                        "startColumnIndex": column,
                        "endColumnIndex": column + 1,
                    },
                    "cell": {
                        "userEnteredFormat": {
                            "numberFormat": { "type": format.kind, "pattern": format.pattern }
                        }
                    },
                    "fields": "userEnteredFormat.numberFormat",
                }
            })
        })
        .collect()
}
