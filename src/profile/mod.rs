//! Dataset profiling before a screen.

mod significance;

pub use significance::{profile_significance, SignificanceProfile, StrainEffects};
