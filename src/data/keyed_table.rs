//! Keyed dense table of metabolite measurements across strains.

use crate::error::{Result, ScreenError};
use log::warn;
use nalgebra::DMatrix;
use std::collections::HashMap;

/// A dense table addressed by string keys.
///
/// Rows represent metabolites, columns represent strains. Every cell is an
/// `f64`; values that were blank in the source are stored as NaN, which fails
/// every threshold comparison.
#[derive(Debug, Clone)]
pub struct KeyedTable {
    /// Dense values (metabolites × strains)
    values: DMatrix<f64>,
    /// Metabolite identifiers (row keys)
    row_ids: Vec<String>,
    /// Strain identifiers (column keys)
    col_ids: Vec<String>,
    row_index: HashMap<String, usize>,
    col_index: HashMap<String, usize>,
}

impl KeyedTable {
    /// Create a table from a dense matrix and its row and column keys.
    ///
    /// Fails when the key counts do not match the matrix shape or when a key
    /// appears twice on the same axis.
    pub fn new(values: DMatrix<f64>, row_ids: Vec<String>, col_ids: Vec<String>) -> Result<Self> {
        let (nrows, ncols) = values.shape();
        if nrows != row_ids.len() {
            return Err(ScreenError::DimensionMismatch {
                expected: nrows,
                actual: row_ids.len(),
            });
        }
        if ncols != col_ids.len() {
            return Err(ScreenError::DimensionMismatch {
                expected: ncols,
                actual: col_ids.len(),
            });
        }
        let row_index = build_index(&row_ids, "metabolite")?;
        let col_index = build_index(&col_ids, "strain")?;
        Ok(Self {
            values,
            row_ids,
            col_ids,
            row_index,
            col_index,
        })
    }

    /// Build a table from row-major values.
    pub fn from_rows(row_ids: Vec<String>, col_ids: Vec<String>, rows: &[Vec<f64>]) -> Result<Self> {
        if rows.len() != row_ids.len() {
            return Err(ScreenError::DimensionMismatch {
                expected: row_ids.len(),
                actual: rows.len(),
            });
        }
        let ncols = col_ids.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != ncols) {
            return Err(ScreenError::DimensionMismatch {
                expected: ncols,
                actual: bad.len(),
            });
        }
        let values = DMatrix::from_fn(row_ids.len(), ncols, |r, c| rows[r][c]);
        Self::new(values, row_ids, col_ids)
    }

    /// Parse a grid of string cells into a table.
    ///
    /// The first grid row is the header: its first cell names the index and is
    /// ignored, the remaining cells are column keys. Every following row is a
    /// row key followed by numeric cells. Rows with a blank key are skipped and
    /// columns with a blank header are dropped. Blank, `NA` and `nan` cells
    /// become NaN.
    pub fn from_grid(grid: &[Vec<String>]) -> Result<Self> {
        let header = grid
            .first()
            .ok_or_else(|| ScreenError::EmptyData("Table has no header row".to_string()))?;

        // (grid column, key) for every named data column
        let mut columns: Vec<(usize, String)> = Vec::new();
        for (col, name) in header.iter().enumerate().skip(1) {
            let name = name.trim();
            if name.is_empty() {
                warn!("Dropping column {} with a blank header", col);
                continue;
            }
            columns.push((col, name.to_string()));
        }
        if columns.is_empty() {
            return Err(ScreenError::EmptyData(
                "Table must have at least one strain column".to_string(),
            ));
        }

        let mut row_ids = Vec::new();
        let mut rows = Vec::new();
        for (row_idx, fields) in grid.iter().enumerate().skip(1) {
            let key = fields.first().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() {
                continue;
            }
            let mut values = Vec::with_capacity(columns.len());
            for &(col, _) in &columns {
                let raw = fields.get(col).map(|s| s.as_str()).unwrap_or("");
                values.push(parse_cell(raw, row_idx, col)?);
            }
            row_ids.push(key.to_string());
            rows.push(values);
        }
        if row_ids.is_empty() {
            return Err(ScreenError::EmptyData("Table has no metabolite rows".to_string()));
        }

        let col_ids = columns.into_iter().map(|(_, name)| name).collect();
        Self::from_rows(row_ids, col_ids, &rows)
    }

    /// Value for a (metabolite, strain) pair.
    pub fn get(&self, metabolite: &str, strain: &str) -> Result<f64> {
        let row = self.row_position(metabolite)?;
        let col = self.col_position(strain)?;
        Ok(self.values[(row, col)])
    }

    /// Value at a positional (row, col).
    #[inline]
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }

    /// Position of a metabolite row.
    pub fn row_position(&self, metabolite: &str) -> Result<usize> {
        self.row_index
            .get(metabolite)
            .copied()
            .ok_or_else(|| ScreenError::MissingMetabolite(metabolite.to_string()))
    }

    /// Position of a strain column.
    pub fn col_position(&self, strain: &str) -> Result<usize> {
        self.col_index
            .get(strain)
            .copied()
            .ok_or_else(|| ScreenError::MissingStrain(strain.to_string()))
    }

    /// Check whether a metabolite row exists.
    pub fn has_row(&self, metabolite: &str) -> bool {
        self.row_index.contains_key(metabolite)
    }

    /// Check whether a strain column exists.
    pub fn has_col(&self, strain: &str) -> bool {
        self.col_index.contains_key(strain)
    }

    /// Number of metabolites (rows).
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.row_ids.len()
    }

    /// Number of strains (columns).
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.col_ids.len()
    }

    /// Metabolite identifiers in row order.
    #[inline]
    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    /// Strain identifiers in column order.
    #[inline]
    pub fn col_ids(&self) -> &[String] {
        &self.col_ids
    }

    /// Values of one strain column, in row order.
    pub fn column(&self, strain: &str) -> Result<Vec<f64>> {
        let col = self.col_position(strain)?;
        Ok(self.values.column(col).iter().copied().collect())
    }

    /// New table without the given strain column.
    pub fn drop_column(&self, strain: &str) -> Result<Self> {
        let col = self.col_position(strain)?;
        let values = self.values.clone().remove_column(col);
        let col_ids = self
            .col_ids
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != col)
            .map(|(_, id)| id.clone())
            .collect();
        Self::new(values, self.row_ids.clone(), col_ids)
    }

    /// New table with column keys renamed through `mapping`.
    ///
    /// Columns without an entry keep their key. Renaming two columns onto the
    /// same key is a duplicate-key error.
    pub fn rename_columns(&self, mapping: &HashMap<String, String>) -> Result<Self> {
        let col_ids = self
            .col_ids
            .iter()
            .map(|id| mapping.get(id).cloned().unwrap_or_else(|| id.clone()))
            .collect();
        Self::new(self.values.clone(), self.row_ids.clone(), col_ids)
    }
}

fn build_index(keys: &[String], axis: &'static str) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(keys.len());
    for (i, key) in keys.iter().enumerate() {
        if index.insert(key.clone(), i).is_some() {
            return Err(ScreenError::DuplicateKey {
                axis,
                key: key.clone(),
            });
        }
    }
    Ok(index)
}

fn parse_cell(raw: &str, row: usize, col: usize) -> Result<f64> {
    let v = raw.trim();
    if v.is_empty() || v.eq_ignore_ascii_case("na") || v.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    v.parse::<f64>().map_err(|_| ScreenError::InvalidValue {
        value: raw.to_string(),
        row,
        col,
    })
}
