//! Spreadsheet (xlsx/xls/ods) reader.

use crate::error::{Result, ScreenError};
use calamine::{open_workbook_auto, Data, Reader};
use log::debug;
use std::path::Path;

/// Read one sheet of a workbook into a grid of string cells.
///
/// `sheet` defaults to the first sheet. Rows above `header_row` (0-based,
/// counted from the top of the sheet) are discarded.
pub fn read_sheet<P: AsRef<Path>>(
    path: P,
    sheet: Option<&str>,
    header_row: usize,
) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path.as_ref())?;
    let names = workbook.sheet_names();
    let name = match sheet {
        Some(s) if names.iter().any(|n| n == s) => s.to_string(),
        Some(s) => return Err(ScreenError::MissingSheet(s.to_string())),
        None => names
            .first()
            .cloned()
            .ok_or_else(|| ScreenError::EmptyData("Workbook has no sheets".to_string()))?,
    };
    debug!("Reading sheet '{}' from {:?}", name, path.as_ref());

    let range = workbook.worksheet_range(&name)?;
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let grid = range
        .rows()
        .enumerate()
        .filter(|(i, _)| first_row + i >= header_row)
        .map(|(_, cells)| cells.iter().map(cell_to_string).collect())
        .collect();
    Ok(grid)
}

/// Render a cell as text; error cells read as blank.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Float(2.0)), "2");
        assert_eq!(cell_to_string(&Data::Float(0.25)), "0.25");
        assert_eq!(cell_to_string(&Data::Int(707)), "707");
        assert_eq!(cell_to_string(&Data::String(" VE707-36 ".into())), "VE707-36");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
