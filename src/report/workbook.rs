//! Multi-sheet xlsx export of classification results.

use crate::classify::{Direction, Thresholds};
use crate::data::{ClassificationResult, DirectionResult};
use crate::error::Result;
use crate::report::plot::sanitize_file_name;
use log::info;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};

/// Separator used when a strain list is written into one cell.
pub const STRAIN_LIST_SEPARATOR: &str = ", ";

/// Conventional workbook path for a target strain inside `output_dir`.
pub fn workbook_path<P: AsRef<Path>>(output_dir: P, target_strain: &str) -> PathBuf {
    output_dir
        .as_ref()
        .join(format!(
            "unique_and_rare_metabolites_{}.xlsx",
            sanitize_file_name(target_strain)
        ))
}

/// Write run parameters and all four result sets to an xlsx workbook.
///
/// Sheets, in order: `run_info`, `rare_produced`, `rare_consumed`,
/// `unique_produced`, `unique_consumed`. The workbook is built in memory and
/// saved in one step.
pub fn write_workbook<P: AsRef<Path>>(result: &ClassificationResult, path: P) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    write_run_info(workbook.add_worksheet(), &result.thresholds, &header)?;
    for direction in Direction::ALL {
        write_rare(workbook.add_worksheet(), result.direction(direction), &header)?;
    }
    for direction in Direction::ALL {
        write_unique(workbook.add_worksheet(), result.direction(direction), &header)?;
    }

    workbook.save(path.as_ref())?;
    info!("Wrote {:?}", path.as_ref());
    Ok(())
}

fn write_run_info(sheet: &mut Worksheet, thresholds: &Thresholds, header: &Format) -> Result<()> {
    sheet.set_name("run_info")?;
    sheet.write_string_with_format(0, 0, "parameter", header)?;
    sheet.write_string_with_format(0, 1, "set_point", header)?;

    let rows = [
        ("consumption_threshold", thresholds.consumption),
        ("production_threshold", thresholds.production),
        ("p_value_threshold", thresholds.pvalue),
        ("rarity_threshold", thresholds.rarity as f64),
    ];
    for (i, (name, value)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *name)?;
        sheet.write_number(row, 1, *value)?;
    }
    Ok(())
}

fn write_rare(sheet: &mut Worksheet, result: &DirectionResult, header: &Format) -> Result<()> {
    sheet.set_name(format!("rare_{}", result.direction.name()))?;
    sheet.write_string_with_format(0, 0, "Metabolite", header)?;
    sheet.write_string_with_format(0, 1, result.direction.other_strains_header(), header)?;

    for (i, rare) in result.rare.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, rare.metabolite.as_str())?;
        sheet.write_string(row, 1, rare.other_strains.join(STRAIN_LIST_SEPARATOR))?;
    }
    Ok(())
}

fn write_unique(sheet: &mut Worksheet, result: &DirectionResult, header: &Format) -> Result<()> {
    sheet.set_name(format!("unique_{}", result.direction.name()))?;
    sheet.write_string_with_format(0, 1, "Metabolite", header)?;

    for (i, metabolite) in result.unique.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, i as f64)?;
        sheet.write_string(row, 1, metabolite.as_str())?;
    }
    Ok(())
}
