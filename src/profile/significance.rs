//! Per-strain significance profiling for paired tables.

use crate::classify::{Direction, Thresholds};
use crate::data::PairedTables;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Significant effect counts for one strain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrainEffects {
    pub strain: String,
    /// Metabolites the strain significantly produces.
    pub n_produced: usize,
    /// Metabolites the strain significantly consumes.
    pub n_consumed: usize,
    /// Produced metabolites no other strain produces.
    pub n_sole_producer: usize,
    /// Consumed metabolites no other strain consumes.
    pub n_sole_consumer: usize,
}

/// Overview of significant effects across every strain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignificanceProfile {
    pub n_metabolites: usize,
    pub n_strains: usize,
    /// Per-strain counts, in table column order.
    pub strains: Vec<StrainEffects>,
    /// Metabolites no strain significantly produces or consumes.
    pub n_unaffected: usize,
}

impl SignificanceProfile {
    /// Counts for a single strain.
    pub fn strain(&self, strain: &str) -> Option<&StrainEffects> {
        self.strains.iter().find(|s| s.strain == strain)
    }
}

impl std::fmt::Display for SignificanceProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Significance Profile")?;
        writeln!(f, "  Metabolites: {}", self.n_metabolites)?;
        writeln!(f, "  Strains:     {}", self.n_strains)?;
        writeln!(f, "  Unaffected metabolites: {}", self.n_unaffected)?;
        writeln!(f)?;
        writeln!(
            f,
            "  {:<20} {:>9} {:>9} {:>13} {:>13}",
            "strain", "produced", "consumed", "sole_producer", "sole_consumer"
        )?;
        for s in &self.strains {
            writeln!(
                f,
                "  {:<20} {:>9} {:>9} {:>13} {:>13}",
                s.strain, s.n_produced, s.n_consumed, s.n_sole_producer, s.n_sole_consumer
            )?;
        }
        Ok(())
    }
}

/// Count significant produced and consumed metabolites for every strain.
pub fn profile_significance(
    tables: &PairedTables,
    thresholds: &Thresholds,
) -> Result<SignificanceProfile> {
    thresholds.validate()?;
    let strains = tables.strains();
    let metabolites = tables.metabolites();

    // passes[direction][metabolite][strain]
    let mut passes = [
        vec![vec![false; strains.len()]; metabolites.len()],
        vec![vec![false; strains.len()]; metabolites.len()],
    ];
    for (d, direction) in Direction::ALL.iter().enumerate() {
        for (m, metabolite) in metabolites.iter().enumerate() {
            for (s, strain) in strains.iter().enumerate() {
                let (ratio, pvalue) = tables.get(metabolite, strain)?;
                passes[d][m][s] = thresholds.passes(*direction, ratio, pvalue);
            }
        }
    }

    let count_for = |d: usize, s: usize| passes[d].iter().filter(|row| row[s]).count();
    let sole_for = |d: usize, s: usize| {
        passes[d]
            .iter()
            .filter(|row| row[s] && row.iter().filter(|&&p| p).count() == 1)
            .count()
    };

    let effects = strains
        .iter()
        .enumerate()
        .map(|(s, strain)| StrainEffects {
            strain: strain.clone(),
            n_produced: count_for(0, s),
            n_consumed: count_for(1, s),
            n_sole_producer: sole_for(0, s),
            n_sole_consumer: sole_for(1, s),
        })
        .collect();

    let n_unaffected = (0..metabolites.len())
        .filter(|&m| !passes[0][m].iter().any(|&p| p) && !passes[1][m].iter().any(|&p| p))
        .count();

    Ok(SignificanceProfile {
        n_metabolites: metabolites.len(),
        n_strains: strains.len(),
        strains: effects,
        n_unaffected,
    })
}
