//! Strain Metabolite Screening Library
//!
//! Finds the metabolites a strain of interest produces or consumes that no
//! other strain, or only a few, share. Inputs are a table of metabolite
//! ratios against a control medium (metabolites × strains) and a matched
//! table of p-values.
//!
//! # Overview
//!
//! - **data**: Keyed tables, paired ratio/p-value tables, strain aliases, results
//! - **io**: Loading tables from TSV/CSV files and spreadsheets
//! - **classify**: Thresholds and the unique/rare classification
//! - **profile**: Per-strain counts of significant effects
//! - **report**: Workbook export and volcano plots
//! - **pipeline**: YAML configuration and screen execution
//!
//! # Example
//!
//! ```no_run
//! use metabolite_screen::prelude::*;
//!
//! let tables = load_tables(
//!     &TableSource::new("ratios.tsv"),
//!     &TableSource::new("pvalues.tsv"),
//!     None,
//! )
//! .unwrap();
//!
//! let outcomes = Screen::new()
//!     .target("VE707-36")
//!     .thresholds(Thresholds::default())
//!     .output_dir("results")
//!     .plots(true)
//!     .run(&tables)
//!     .unwrap();
//! ```

pub mod classify;
pub mod data;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod profile;
pub mod report;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::classify::{candidates, classify, classify_paired, Direction, Thresholds};
    pub use crate::data::{
        ClassificationResult, ClassificationSummary, DirectionResult, KeyedTable, PairedTables,
        Rarity, SharedMetabolite, StrainAliases,
    };
    pub use crate::error::{Result, ScreenError};
    pub use crate::io::{load_aliases, load_table, TableSource};
    pub use crate::pipeline::{
        load_tables, run_screen, AliasConfig, Screen, ScreenConfig, ScreenOutcome,
    };
    pub use crate::profile::{profile_significance, SignificanceProfile, StrainEffects};
    pub use crate::report::{
        log2_ratio, neg_log2_pvalue, workbook_path, write_plots, write_workbook,
    };
}
