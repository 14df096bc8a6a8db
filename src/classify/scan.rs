//! Cross-strain rarity scan.

use crate::classify::{Direction, Thresholds};
use crate::data::{
    ClassificationResult, DirectionResult, KeyedTable, PairedTables, Rarity, SharedMetabolite,
};
use crate::error::Result;
use log::{debug, info};

/// Classify the unique and rare metabolites of `target_strain`.
///
/// Pairs the two tables first; see [`classify_paired`].
pub fn classify(
    ratios: &KeyedTable,
    pvalues: &KeyedTable,
    target_strain: &str,
    thresholds: &Thresholds,
) -> Result<ClassificationResult> {
    ratios.col_position(target_strain)?;
    let tables = PairedTables::new(ratios.clone(), pvalues.clone())?;
    classify_paired(&tables, target_strain, thresholds)
}

/// Classify the unique and rare metabolites of `target_strain`.
///
/// For each direction, metabolites that pass the significance test at the
/// target strain become candidates. Each candidate is then tested against
/// every other strain in the same direction:
/// - no other strain passes: unique
/// - 1 to `thresholds.rarity` other strains pass: rare
/// - more: common
pub fn classify_paired(
    tables: &PairedTables,
    target_strain: &str,
    thresholds: &Thresholds,
) -> Result<ClassificationResult> {
    thresholds.validate()?;
    tables.ratios().col_position(target_strain)?;

    // Comparison set excludes the target itself
    let others = tables.ratios().drop_column(target_strain)?;

    let scan = |direction: Direction| -> Result<DirectionResult> {
        let found = candidates(tables, target_strain, direction, thresholds)?;
        scan_direction(tables, &others, &found, direction, thresholds)
    };
    let produced = scan(Direction::Produced)?;
    let consumed = scan(Direction::Consumed)?;

    info!(
        "{}: {} produced ({} unique, {} rare), {} consumed ({} unique, {} rare)",
        target_strain,
        produced.n_candidates(),
        produced.unique.len(),
        produced.rare.len(),
        consumed.n_candidates(),
        consumed.unique.len(),
        consumed.rare.len()
    );

    Ok(ClassificationResult {
        target_strain: target_strain.to_string(),
        thresholds: *thresholds,
        produced,
        consumed,
    })
}

/// Metabolites passing the significance test at `strain`, in table row order.
pub fn candidates(
    tables: &PairedTables,
    strain: &str,
    direction: Direction,
    thresholds: &Thresholds,
) -> Result<Vec<String>> {
    let ratios = tables.ratios();
    let col = ratios.col_position(strain)?;
    let mut found = Vec::new();
    for (row, metabolite) in ratios.row_ids().iter().enumerate() {
        let ratio = ratios.value(row, col);
        let pvalue = tables.pvalues().get(metabolite, strain)?;
        if thresholds.passes(direction, ratio, pvalue) {
            found.push(metabolite.clone());
        }
    }
    Ok(found)
}

/// Sort candidates into unique, rare and common by how many of `others` share them.
fn scan_direction(
    tables: &PairedTables,
    others: &KeyedTable,
    candidates: &[String],
    direction: Direction,
    thresholds: &Thresholds,
) -> Result<DirectionResult> {
    let mut result = DirectionResult::new(direction);
    for metabolite in candidates {
        let row = others.row_position(metabolite)?;
        let mut sharing = Vec::new();
        for (col, strain) in others.col_ids().iter().enumerate() {
            let ratio = others.value(row, col);
            let pvalue = tables.pvalues().get(metabolite, strain)?;
            if thresholds.passes(direction, ratio, pvalue) {
                sharing.push(strain.clone());
            }
        }

        let rarity = Rarity::from_count(sharing.len(), thresholds.rarity);
        debug!(
            "{} {}: {} other strains, {}",
            direction.name(),
            metabolite,
            sharing.len(),
            rarity.name()
        );
        match rarity {
            Rarity::Unique => result.unique.push(metabolite.clone()),
            Rarity::Rare => result.rare.push(SharedMetabolite {
                metabolite: metabolite.clone(),
                other_strains: sharing,
            }),
            Rarity::Common => result.common.push(SharedMetabolite {
                metabolite: metabolite.clone(),
                other_strains: sharing,
            }),
        }
    }
    Ok(result)
}
