//! Screen configuration and execution.

use crate::classify::{classify_paired, Thresholds};
use crate::data::{ClassificationResult, PairedTables, StrainAliases};
use crate::error::{Result, ScreenError};
use crate::io::{load_aliases, load_table, TableSource};
use crate::report::{workbook_path, write_plots, write_workbook};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn default_alias_column() -> String {
    "strain alias".to_string()
}

fn default_canonical_column() -> String {
    "strainID".to_string()
}

/// Where strain aliases come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasConfig {
    /// Table holding alias and canonical-id columns.
    pub source: TableSource,
    /// Column holding aliases.
    #[serde(default = "default_alias_column")]
    pub alias_column: String,
    /// Column holding canonical strain ids.
    #[serde(default = "default_canonical_column")]
    pub canonical_column: String,
    /// Extra aliases; these override entries from the table.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl AliasConfig {
    /// Load the alias table and apply the extra entries.
    pub fn load(&self) -> Result<StrainAliases> {
        let mut aliases = load_aliases(&self.source, &self.alias_column, &self.canonical_column)?;
        for (alias, canonical) in &self.extra {
            aliases.insert(alias, canonical);
        }
        Ok(aliases)
    }
}

/// Screen configuration for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Name of the screen.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ratio table source.
    pub ratios: TableSource,
    /// P-value table source.
    pub pvalues: TableSource,
    /// Optional alias table applied to both tables' strain columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<AliasConfig>,
    /// Strains to screen, one workbook each.
    pub targets: Vec<String>,
    /// Classification thresholds.
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Directory receiving workbooks and plots.
    pub output_dir: PathBuf,
    /// Render PNG plots.
    #[serde(default)]
    pub plots: bool,
}

impl ScreenConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(ScreenError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(ScreenError::from)
    }

    /// An example configuration for a spreadsheet export with alias table.
    pub fn example() -> Self {
        Self {
            name: "VE707-36 screen".to_string(),
            description: Some("Unique and rare metabolites of VE707-36".to_string()),
            ratios: TableSource::new("data/VEDA-01-23VS HEAT MAP.XLSX")
                .sheet("Heat_map_for_analysis")
                .header_row(2),
            pvalues: TableSource::new("data/VEDA-01-23VS HEAT MAP.XLSX")
                .sheet("p_values")
                .header_row(3),
            aliases: Some(AliasConfig {
                source: TableSource::new("data/707_strainalias_strainID_key.xlsx"),
                alias_column: default_alias_column(),
                canonical_column: default_canonical_column(),
                extra: [("P88D4_1".to_string(), "VE707-43".to_string())].into(),
            }),
            targets: vec!["VE707-36".to_string()],
            thresholds: Thresholds::default(),
            output_dir: PathBuf::from("results"),
            plots: true,
        }
    }

    /// Load, alias and pair the ratio and p-value tables.
    pub fn load_tables(&self) -> Result<PairedTables> {
        let aliases = match &self.aliases {
            Some(config) => Some(config.load()?),
            None => None,
        };
        load_tables(&self.ratios, &self.pvalues, aliases.as_ref())
    }
}

/// Load both tables, rename strains to canonical ids and pair them.
pub fn load_tables(
    ratios: &TableSource,
    pvalues: &TableSource,
    aliases: Option<&StrainAliases>,
) -> Result<PairedTables> {
    let mut ratio_table = load_table(ratios)?;
    let mut pvalue_table = load_table(pvalues)?;
    if let Some(aliases) = aliases {
        ratio_table = aliases.apply(&ratio_table)?;
        pvalue_table = aliases.apply(&pvalue_table)?;
    }
    PairedTables::new(ratio_table, pvalue_table)
}

/// Everything a screen produced for one target strain.
#[derive(Debug, Clone)]
pub struct ScreenOutcome {
    pub result: ClassificationResult,
    /// Workbook path.
    pub workbook: PathBuf,
    /// PNG paths, empty when plotting is off.
    pub plots: Vec<PathBuf>,
}

/// Builder for configuring and running screens.
#[derive(Debug, Clone)]
pub struct Screen {
    name: String,
    targets: Vec<String>,
    thresholds: Thresholds,
    output_dir: PathBuf,
    plots: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a screen with default thresholds writing to `results/`.
    pub fn new() -> Self {
        Self {
            name: "unnamed".to_string(),
            targets: Vec::new(),
            thresholds: Thresholds::default(),
            output_dir: PathBuf::from("results"),
            plots: false,
        }
    }

    /// Create from a config.
    pub fn from_config(config: &ScreenConfig) -> Self {
        Self {
            name: config.name.clone(),
            targets: config.targets.clone(),
            thresholds: config.thresholds,
            output_dir: config.output_dir.clone(),
            plots: config.plots,
        }
    }

    /// Set the screen name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Add a target strain.
    pub fn target(mut self, strain: &str) -> Self {
        self.targets.push(strain.to_string());
        self
    }

    /// Set the classification thresholds.
    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set the output directory.
    pub fn output_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Enable or disable PNG plots.
    pub fn plots(mut self, enabled: bool) -> Self {
        self.plots = enabled;
        self
    }

    /// Target strains in run order.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Classify every target and write its workbook (and plots).
    ///
    /// Every target is checked against the tables before anything is written.
    pub fn run(&self, tables: &PairedTables) -> Result<Vec<ScreenOutcome>> {
        if self.targets.is_empty() {
            return Err(ScreenError::InvalidParameter(
                "Screen needs at least one target strain".to_string(),
            ));
        }
        self.thresholds.validate()?;
        for target in &self.targets {
            tables.ratios().col_position(target)?;
        }
        std::fs::create_dir_all(&self.output_dir)?;

        info!(
            "Running screen '{}' for {} target(s) over {} metabolites x {} strains",
            self.name,
            self.targets.len(),
            tables.metabolites().len(),
            tables.strains().len()
        );

        let mut outcomes = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let result = classify_paired(tables, target, &self.thresholds)?;

            let workbook = workbook_path(&self.output_dir, target);
            write_workbook(&result, &workbook)?;

            let plots = if self.plots {
                write_plots(tables, &result, &self.output_dir)?
            } else {
                Vec::new()
            };

            outcomes.push(ScreenOutcome {
                result,
                workbook,
                plots,
            });
        }
        Ok(outcomes)
    }
}

/// Load the configured tables and run the configured screen.
pub fn run_screen(config: &ScreenConfig) -> Result<Vec<ScreenOutcome>> {
    let tables = config.load_tables()?;
    Screen::from_config(config).run(&tables)
}
