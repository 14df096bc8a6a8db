//! Delimited text (TSV/CSV) reader.

use crate::error::Result;
use std::path::Path;

/// Read a delimited file into a grid of string cells.
///
/// The first `skip_rows` records are discarded. Records may differ in length.
pub fn read_delimited<P: AsRef<Path>>(
    path: P,
    delimiter: u8,
    skip_rows: usize,
) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut grid = Vec::new();
    for record in reader.records().skip(skip_rows) {
        let record = record?;
        grid.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_skip_rows_and_ragged_records() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "VEDA heat map export").unwrap();
        writeln!(file, "metabolite\tA\tB").unwrap();
        writeln!(file, "glucose\t0.2\t1.9").unwrap();
        writeln!(file, "lactate\t1.1").unwrap();
        file.flush().unwrap();

        let grid = read_delimited(file.path(), b'\t', 1).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], vec!["metabolite", "A", "B"]);
        assert_eq!(grid[2], vec!["lactate", "1.1"]);
    }
}
