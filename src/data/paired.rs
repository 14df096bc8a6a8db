//! Ratio and p-value tables checked for key alignment.

use crate::data::KeyedTable;
use crate::error::{Result, ScreenError};
use std::collections::HashSet;

/// A ratio table and its matched p-value table.
///
/// Both tables share the same metabolite keys and strain keys. Their order
/// may differ; all cross-table access goes through keys. The ratio table's
/// order is the canonical one for scans and reports.
#[derive(Debug, Clone)]
pub struct PairedTables {
    ratios: KeyedTable,
    pvalues: KeyedTable,
}

impl PairedTables {
    /// Pair two tables, verifying that row and column key sets match.
    pub fn new(ratios: KeyedTable, pvalues: KeyedTable) -> Result<Self> {
        check_keys("metabolite", ratios.row_ids(), pvalues.row_ids())?;
        check_keys("strain", ratios.col_ids(), pvalues.col_ids())?;
        Ok(Self { ratios, pvalues })
    }

    /// Ratio table (metabolite level vs. control medium).
    #[inline]
    pub fn ratios(&self) -> &KeyedTable {
        &self.ratios
    }

    /// Matched p-value table.
    #[inline]
    pub fn pvalues(&self) -> &KeyedTable {
        &self.pvalues
    }

    /// Ratio and p-value for a (metabolite, strain) pair.
    pub fn get(&self, metabolite: &str, strain: &str) -> Result<(f64, f64)> {
        Ok((
            self.ratios.get(metabolite, strain)?,
            self.pvalues.get(metabolite, strain)?,
        ))
    }

    /// Metabolites in ratio-table order.
    pub fn metabolites(&self) -> &[String] {
        self.ratios.row_ids()
    }

    /// Strains in ratio-table order.
    pub fn strains(&self) -> &[String] {
        self.ratios.col_ids()
    }
}

fn check_keys(axis: &str, left: &[String], right: &[String]) -> Result<()> {
    let right_set: HashSet<&String> = right.iter().collect();
    if let Some(missing) = left.iter().find(|k| !right_set.contains(k)) {
        return Err(ScreenError::KeyMismatch(format!(
            "{} '{}' has a ratio but no p-value",
            axis, missing
        )));
    }
    let left_set: HashSet<&String> = left.iter().collect();
    if let Some(extra) = right.iter().find(|k| !left_set.contains(k)) {
        return Err(ScreenError::KeyMismatch(format!(
            "{} '{}' has a p-value but no ratio",
            axis, extra
        )));
    }
    Ok(())
}
