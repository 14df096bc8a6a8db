//! Unique and rare metabolite classification.

pub mod scan;
pub mod threshold;

pub use scan::{candidates, classify, classify_paired};
pub use threshold::{Direction, Thresholds};
