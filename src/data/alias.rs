//! Strain alias resolution.

use crate::data::KeyedTable;
use crate::error::{Result, ScreenError};
use std::collections::HashMap;

/// Mapping from strain aliases to canonical strain identifiers.
///
/// Applied once when tables are loaded; everything downstream works on
/// canonical keys only.
#[derive(Debug, Clone, Default)]
pub struct StrainAliases {
    mapping: HashMap<String, String>,
}

impl StrainAliases {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (alias, canonical) pairs. The first pair for an alias wins.
    pub fn from_pairs<I, A, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: Into<String>,
    {
        let mut mapping = HashMap::new();
        for (alias, canonical) in pairs {
            mapping.entry(alias.into()).or_insert_with(|| canonical.into());
        }
        Self { mapping }
    }

    /// Build from a grid whose first row names the columns.
    ///
    /// Rows with a blank alias or blank canonical id are skipped.
    pub fn from_grid(grid: &[Vec<String>], alias_column: &str, canonical_column: &str) -> Result<Self> {
        let header = grid
            .first()
            .ok_or_else(|| ScreenError::EmptyData("Alias table has no header row".to_string()))?;
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| ScreenError::MissingColumn(name.to_string()))
        };
        let alias_idx = find(alias_column)?;
        let canonical_idx = find(canonical_column)?;

        let pairs = grid.iter().skip(1).filter_map(|row| {
            let alias = row.get(alias_idx).map(|s| s.trim()).unwrap_or("");
            let canonical = row.get(canonical_idx).map(|s| s.trim()).unwrap_or("");
            if alias.is_empty() || canonical.is_empty() {
                None
            } else {
                Some((alias.to_string(), canonical.to_string()))
            }
        });
        Ok(Self::from_pairs(pairs))
    }

    /// Add or override a single alias.
    pub fn insert(&mut self, alias: &str, canonical: &str) {
        self.mapping.insert(alias.to_string(), canonical.to_string());
    }

    /// Canonical id for a strain key; unmapped keys are already canonical.
    pub fn canonical<'a>(&'a self, strain: &'a str) -> &'a str {
        self.mapping.get(strain).map(String::as_str).unwrap_or(strain)
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// New table with strain columns renamed to canonical ids.
    pub fn apply(&self, table: &KeyedTable) -> Result<KeyedTable> {
        table.rename_columns(&self.mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_from_grid_first_alias_wins() {
        let g = grid(&[
            &["strain alias", "strainID"],
            &["P12", "VE707-01"],
            &["P12", "VE707-99"],
            &["", "VE707-05"],
            &["P13", "VE707-02"],
        ]);
        let aliases = StrainAliases::from_grid(&g, "strain alias", "strainID").unwrap();
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases.canonical("P12"), "VE707-01");
        assert_eq!(aliases.canonical("VE707-36"), "VE707-36");
    }

    #[test]
    fn test_missing_column() {
        let g = grid(&[&["alias", "id"], &["a", "b"]]);
        let err = StrainAliases::from_grid(&g, "strain alias", "id").unwrap_err();
        assert!(matches!(err, ScreenError::MissingColumn(ref c) if c == "strain alias"));
    }

    #[test]
    fn test_insert_overrides() {
        let mut aliases = StrainAliases::from_pairs([("P88D4_1", "VE707-40")]);
        aliases.insert("P88D4_1", "VE707-43");
        assert_eq!(aliases.canonical("P88D4_1"), "VE707-43");
    }

    #[test]
    fn test_apply_renames_without_mutating() {
        let table = KeyedTable::from_rows(
            vec!["glucose".into()],
            vec!["P12".into(), "VE707-36".into()],
            &[vec![1.0, 2.0]],
        )
        .unwrap();
        let aliases = StrainAliases::from_pairs([("P12", "VE707-01")]);
        let renamed = aliases.apply(&table).unwrap();
        assert_eq!(renamed.col_ids(), &["VE707-01", "VE707-36"]);
        assert_eq!(table.col_ids(), &["P12", "VE707-36"]);
    }
}
