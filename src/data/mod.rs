//! Data structures for strain metabolite screening.

mod alias;
mod keyed_table;
mod paired;
mod result;

pub use alias::StrainAliases;
pub use keyed_table::KeyedTable;
pub use paired::PairedTables;
pub use result::{
    ClassificationResult, ClassificationSummary, DirectionResult, Rarity, SharedMetabolite,
};
