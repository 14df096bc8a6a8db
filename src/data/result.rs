//! Result types for unique and rare metabolite classification.

use crate::classify::{Direction, Thresholds};
use serde::{Deserialize, Serialize};

/// How widely a target-strain effect is shared with other strains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    /// No other strain shares the effect.
    Unique,
    /// Between one and the rarity threshold of other strains share it.
    Rare,
    /// More strains than the rarity threshold share it.
    Common,
}

impl Rarity {
    /// Classify by the number of other strains sharing an effect.
    pub fn from_count(n_other: usize, rarity_level: usize) -> Self {
        if n_other == 0 {
            Self::Unique
        } else if n_other <= rarity_level {
            Self::Rare
        } else {
            Self::Common
        }
    }

    /// Get the descriptive name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unique => "unique",
            Self::Rare => "rare",
            Self::Common => "common",
        }
    }
}

/// A target-strain metabolite together with the other strains sharing its effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedMetabolite {
    /// Metabolite identifier.
    pub metabolite: String,
    /// Other strains with the same effect, in table column order.
    pub other_strains: Vec<String>,
}

impl SharedMetabolite {
    /// Number of other strains sharing the effect.
    pub fn n_other(&self) -> usize {
        self.other_strains.len()
    }
}

/// Classification of the target strain's metabolites in one direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionResult {
    /// Produced or consumed.
    pub direction: Direction,
    /// Metabolites no other strain shares, in scan order.
    pub unique: Vec<String>,
    /// Metabolites shared with a bounded number of other strains.
    pub rare: Vec<SharedMetabolite>,
    /// Metabolites shared too widely to be rare. Not part of the workbook.
    pub common: Vec<SharedMetabolite>,
}

impl DirectionResult {
    /// Create an empty result for a direction.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            unique: Vec::new(),
            rare: Vec::new(),
            common: Vec::new(),
        }
    }

    /// Number of target-strain candidates scanned in this direction.
    pub fn n_candidates(&self) -> usize {
        self.unique.len() + self.rare.len() + self.common.len()
    }

    /// Other strains for a rare metabolite.
    pub fn rare_strains(&self, metabolite: &str) -> Option<&[String]> {
        self.rare
            .iter()
            .find(|r| r.metabolite == metabolite)
            .map(|r| r.other_strains.as_slice())
    }

    /// Every candidate with its sharing count, unique first, then rare, then common.
    pub fn candidates(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.unique
            .iter()
            .map(|m| (m.as_str(), 0))
            .chain(self.rare.iter().map(|r| (r.metabolite.as_str(), r.n_other())))
            .chain(self.common.iter().map(|r| (r.metabolite.as_str(), r.n_other())))
    }
}

/// Unique and rare metabolites of one target strain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Strain the screen was run for.
    pub target_strain: String,
    /// Thresholds the screen used.
    pub thresholds: Thresholds,
    /// Metabolites the target strain produces.
    pub produced: DirectionResult,
    /// Metabolites the target strain consumes.
    pub consumed: DirectionResult,
}

impl ClassificationResult {
    /// Result for one direction.
    pub fn direction(&self, direction: Direction) -> &DirectionResult {
        match direction {
            Direction::Produced => &self.produced,
            Direction::Consumed => &self.consumed,
        }
    }

    /// Counts per direction and class.
    pub fn summary(&self) -> ClassificationSummary {
        ClassificationSummary {
            target_strain: self.target_strain.clone(),
            produced_candidates: self.produced.n_candidates(),
            unique_produced: self.produced.unique.len(),
            rare_produced: self.produced.rare.len(),
            consumed_candidates: self.consumed.n_candidates(),
            unique_consumed: self.consumed.unique.len(),
            rare_consumed: self.consumed.rare.len(),
        }
    }
}

/// Summary counts for a classification result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub target_strain: String,
    pub produced_candidates: usize,
    pub unique_produced: usize,
    pub rare_produced: usize,
    pub consumed_candidates: usize,
    pub unique_consumed: usize,
    pub rare_consumed: usize,
}

impl std::fmt::Display for ClassificationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Target strain: {}", self.target_strain)?;
        writeln!(
            f,
            "Produced: {} significant, {} unique, {} rare",
            self.produced_candidates, self.unique_produced, self.rare_produced
        )?;
        writeln!(
            f,
            "Consumed: {} significant, {} unique, {} rare",
            self.consumed_candidates, self.unique_consumed, self.rare_consumed
        )?;
        Ok(())
    }
}
