//! Thresholds and the per-strain significance test.

use crate::error::{Result, ScreenError};
use serde::{Deserialize, Serialize};

/// Cut-offs used to call a metabolite produced, consumed, and rare.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Ratio at or below which a metabolite counts as consumed.
    pub consumption: f64,
    /// Ratio at or above which a metabolite counts as produced.
    pub production: f64,
    /// Largest p-value that counts as significant.
    pub pvalue: f64,
    /// Inclusive upper bound on other strains sharing an effect for it to be rare.
    pub rarity: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            consumption: 0.5,
            production: 1.5,
            pvalue: 0.05,
            rarity: 3,
        }
    }
}

impl Thresholds {
    /// Reject cut-offs that would make the two directions overlap or that
    /// cannot be compared.
    pub fn validate(&self) -> Result<()> {
        if !self.consumption.is_finite() || !self.production.is_finite() {
            return Err(ScreenError::InvalidParameter(
                "Ratio thresholds must be finite".to_string(),
            ));
        }
        if self.consumption < 0.0 || self.production < 0.0 {
            return Err(ScreenError::InvalidParameter(
                "Ratio thresholds cannot be negative".to_string(),
            ));
        }
        if self.consumption >= self.production {
            return Err(ScreenError::InvalidParameter(format!(
                "Consumption threshold ({}) must be below production threshold ({})",
                self.consumption, self.production
            )));
        }
        if !(0.0..=1.0).contains(&self.pvalue) {
            return Err(ScreenError::InvalidParameter(
                "P-value threshold must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Does a single (ratio, p-value) observation pass the test in `direction`?
    #[inline]
    pub fn passes(&self, direction: Direction, ratio: f64, pvalue: f64) -> bool {
        let effect = match direction {
            Direction::Produced => ratio >= self.production,
            Direction::Consumed => ratio <= self.consumption,
        };
        effect && pvalue <= self.pvalue
    }
}

/// Direction of a metabolite change relative to the control medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Produced,
    Consumed,
}

impl Direction {
    /// Both directions, produced first.
    pub const ALL: [Direction; 2] = [Direction::Produced, Direction::Consumed];

    /// Get the descriptive name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Produced => "produced",
            Self::Consumed => "consumed",
        }
    }

    /// Column header for the "other strains" list in reports.
    pub fn other_strains_header(&self) -> &'static str {
        match self {
            Self::Produced => "Other_Producing_Strains",
            Self::Consumed => "Other_Consuming_Strains",
        }
    }
}
