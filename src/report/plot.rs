//! Volcano-style PNG plots of classified metabolites.

use crate::classify::{Direction, Thresholds};
use crate::data::{ClassificationResult, PairedTables, Rarity};
use crate::error::{Result, ScreenError};
use crate::report::color::generate_palette;
use log::{info, warn};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Ratios of exactly zero are raised to this value before the log transform.
pub const RATIO_FLOOR: f64 = 0.01;

/// P-values of exactly zero are raised to this value before the log transform.
pub const PVALUE_FLOOR: f64 = 1e-12;

/// log2 of a ratio, with zero floored to [`RATIO_FLOOR`].
pub fn log2_ratio(ratio: f64) -> f64 {
    if ratio == 0.0 {
        RATIO_FLOOR.log2()
    } else {
        ratio.log2()
    }
}

/// -log2 of a p-value, with zero floored to [`PVALUE_FLOOR`].
///
/// Values outside `[0, 1]` (and NaN) give NaN.
pub fn neg_log2_pvalue(pvalue: f64) -> f64 {
    if !(0.0..=1.0).contains(&pvalue) {
        f64::NAN
    } else if pvalue == 0.0 {
        -PVALUE_FLOOR.log2()
    } else {
        -pvalue.log2()
    }
}

/// Replace characters that are unsafe in file names with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Role of a strain in a single-metabolite plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrainRole {
    Target,
    Sharing,
    Other,
}

/// One strain's position for a single metabolite.
#[derive(Debug, Clone, PartialEq)]
pub struct StrainPoint {
    pub strain: String,
    pub role: StrainRole,
    pub x: f64,
    pub y: f64,
}

/// One target-strain metabolite in the combined volcano plot.
#[derive(Debug, Clone, PartialEq)]
pub struct VolcanoPoint {
    pub metabolite: String,
    pub direction: Direction,
    pub n_other: usize,
    pub rarity: Rarity,
    pub x: f64,
    pub y: f64,
}

impl VolcanoPoint {
    /// Marker radius grows with the number of sharing strains.
    pub fn radius(&self) -> i32 {
        4 + 2 * self.n_other.min(8) as i32
    }
}

fn transformed(tables: &PairedTables, metabolite: &str, strain: &str) -> Result<(f64, f64)> {
    let (ratio, pvalue) = tables.get(metabolite, strain)?;
    if pvalue == 0.0 {
        warn!(
            "p-value of 0 for {} in {}; plotted at {:e}",
            metabolite, strain, PVALUE_FLOOR
        );
    }
    Ok((log2_ratio(ratio), neg_log2_pvalue(pvalue)))
}

/// Every strain's transformed values for one metabolite.
///
/// Strains whose values do not transform to finite numbers are left out.
pub fn metabolite_points(
    tables: &PairedTables,
    metabolite: &str,
    target_strain: &str,
    sharing: &[String],
) -> Result<Vec<StrainPoint>> {
    let mut points = Vec::with_capacity(tables.strains().len());
    for strain in tables.strains() {
        let (x, y) = transformed(tables, metabolite, strain)?;
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        let role = if strain == target_strain {
            StrainRole::Target
        } else if sharing.contains(strain) {
            StrainRole::Sharing
        } else {
            StrainRole::Other
        };
        points.push(StrainPoint {
            strain: strain.clone(),
            role,
            x,
            y,
        });
    }
    Ok(points)
}

/// Target-strain values for every candidate metabolite in both directions.
pub fn volcano_points(
    tables: &PairedTables,
    result: &ClassificationResult,
) -> Result<Vec<VolcanoPoint>> {
    let mut points = Vec::new();
    for direction in Direction::ALL {
        for (metabolite, n_other) in result.direction(direction).candidates() {
            let (x, y) = transformed(tables, metabolite, &result.target_strain)?;
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            points.push(VolcanoPoint {
                metabolite: metabolite.to_string(),
                direction,
                n_other,
                rarity: Rarity::from_count(n_other, result.thresholds.rarity),
                x,
                y,
            });
        }
    }
    Ok(points)
}

/// Axis ranges covering the points and threshold guide lines, with padding.
fn axis_ranges(
    coords: impl Iterator<Item = (f64, f64)>,
    thresholds: &Thresholds,
) -> ((f64, f64), (f64, f64)) {
    let mut x_min = log2_ratio(thresholds.consumption);
    let mut x_max = log2_ratio(thresholds.production);
    let mut y_max = neg_log2_pvalue(thresholds.pvalue);
    for (x, y) in coords {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_max = y_max.max(y);
    }
    let pad = ((x_max - x_min) * 0.08).max(0.25);
    ((x_min - pad, x_max + pad), (0.0, y_max * 1.1 + 0.5))
}

type DrawResult = std::result::Result<(), Box<dyn Error>>;

fn draw_guides<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    thresholds: &Thresholds,
    x_range: (f64, f64),
    y_range: (f64, f64),
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let guide = || RGBColor(120, 120, 120).mix(0.7).stroke_width(1);
    for x in [log2_ratio(thresholds.consumption), log2_ratio(thresholds.production)] {
        chart.draw_series(LineSeries::new(vec![(x, y_range.0), (x, y_range.1)], guide()))?;
    }
    let y = neg_log2_pvalue(thresholds.pvalue);
    chart.draw_series(LineSeries::new(vec![(x_range.0, y), (x_range.1, y)], guide()))?;
    Ok(())
}

fn draw_metabolite(
    points: &[StrainPoint],
    thresholds: &Thresholds,
    title: &str,
    path: &Path,
) -> DrawResult {
    let root = BitMapBackend::new(path, (1100, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_range, y_range) = axis_ranges(points.iter().map(|p| (p.x, p.y)), thresholds);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

    chart
        .configure_mesh()
        .x_desc("log2(ratio)")
        .y_desc("-log2(p-value)")
        .draw()?;
    draw_guides(&mut chart, thresholds, x_range, y_range)?;

    let colors = generate_palette(points.len());
    for (point, &color) in points.iter().zip(colors.iter()) {
        let (radius, label) = match point.role {
            StrainRole::Target => (9, format!("{} (target)", point.strain)),
            StrainRole::Sharing => (7, format!("{} (shared)", point.strain)),
            StrainRole::Other => (4, point.strain.clone()),
        };
        chart
            .draw_series(std::iter::once(Circle::new(
                (point.x, point.y),
                radius,
                color.filled(),
            )))?
            .label(label)
            .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_volcano(
    points: &[VolcanoPoint],
    thresholds: &Thresholds,
    title: &str,
    path: &Path,
) -> DrawResult {
    let root = BitMapBackend::new(path, (1200, 900)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_range, y_range) = axis_ranges(points.iter().map(|p| (p.x, p.y)), thresholds);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

    chart
        .configure_mesh()
        .x_desc("log2(ratio)")
        .y_desc("-log2(p-value)")
        .draw()?;
    draw_guides(&mut chart, thresholds, x_range, y_range)?;

    let groups = [
        (Rarity::Common, RGBColor(180, 180, 180)),
        (Rarity::Rare, RGBColor(255, 140, 0)),
        (Rarity::Unique, RED),
    ];
    for (rarity, color) in groups {
        let members: Vec<&VolcanoPoint> = points.iter().filter(|p| p.rarity == rarity).collect();
        chart
            .draw_series(
                members
                    .iter()
                    .map(|p| Circle::new((p.x, p.y), p.radius(), color.mix(0.8).filled())),
            )?
            .label(format!("{} (N={})", rarity.name(), members.len()))
            .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));

        if rarity != Rarity::Common {
            chart.draw_series(members.iter().map(|p| {
                Text::new(
                    p.metabolite.clone(),
                    (p.x, p.y),
                    ("sans-serif", 13).into_font().color(&BLACK),
                )
            }))?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Render one PNG for a rare metabolite.
pub fn plot_metabolite<P: AsRef<Path>>(
    tables: &PairedTables,
    result: &ClassificationResult,
    direction: Direction,
    metabolite: &str,
    path: P,
) -> Result<()> {
    let sharing = result
        .direction(direction)
        .rare_strains(metabolite)
        .unwrap_or(&[]);
    let points = metabolite_points(tables, metabolite, &result.target_strain, sharing)?;
    let title = format!("{} {} by {}", metabolite, direction.name(), result.target_strain);
    draw_metabolite(&points, &result.thresholds, &title, path.as_ref())
        .map_err(|e| ScreenError::Plot(e.to_string()))
}

/// Render the combined volcano PNG for a target strain.
pub fn plot_volcano<P: AsRef<Path>>(
    tables: &PairedTables,
    result: &ClassificationResult,
    path: P,
) -> Result<()> {
    let points = volcano_points(tables, result)?;
    let title = format!("{} significant metabolites", result.target_strain);
    draw_volcano(&points, &result.thresholds, &title, path.as_ref())
        .map_err(|e| ScreenError::Plot(e.to_string()))
}

/// Render every rare-metabolite plot and the combined volcano plot.
///
/// Files go to `<output_dir>/plots/<target>/<direction>_<metabolite>.png` and
/// `<output_dir>/plots/<target>_volcano.png`. Returns the paths written.
pub fn write_plots<P: AsRef<Path>>(
    tables: &PairedTables,
    result: &ClassificationResult,
    output_dir: P,
) -> Result<Vec<PathBuf>> {
    let target = sanitize_file_name(&result.target_strain);
    let plot_dir = output_dir.as_ref().join("plots");
    let strain_dir = plot_dir.join(&target);
    std::fs::create_dir_all(&strain_dir)?;

    let mut written = Vec::new();
    for direction in Direction::ALL {
        for rare in &result.direction(direction).rare {
            let path = strain_dir.join(format!(
                "{}_{}.png",
                direction.name(),
                sanitize_file_name(&rare.metabolite)
            ));
            plot_metabolite(tables, result, direction, &rare.metabolite, &path)?;
            written.push(path);
        }
    }

    let volcano = plot_dir.join(format!("{}_volcano.png", target));
    plot_volcano(tables, result, &volcano)?;
    written.push(volcano);

    info!("Wrote {} plots to {:?}", written.len(), plot_dir);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_paired;
    use crate::data::KeyedTable;
    use approx::assert_relative_eq;

    fn paired() -> PairedTables {
        let rows = vec!["X".to_string(), "Y".to_string()];
        let cols = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let ratios = KeyedTable::from_rows(
            rows.clone(),
            cols.clone(),
            &[vec![4.0, 2.0, 0.0], vec![0.25, 1.0, 1.0]],
        )
        .unwrap();
        let pvalues = KeyedTable::from_rows(
            rows,
            cols,
            &[vec![0.0625, 0.01, 0.5], vec![0.0, 0.5, f64::NAN]],
        )
        .unwrap();
        PairedTables::new(ratios, pvalues).unwrap()
    }

    #[test]
    fn test_log2_ratio_floor() {
        assert_relative_eq!(log2_ratio(4.0), 2.0);
        assert_relative_eq!(log2_ratio(0.0), 0.01f64.log2());
        assert!(log2_ratio(-1.0).is_nan());
    }

    #[test]
    fn test_neg_log2_pvalue_floor() {
        assert_relative_eq!(neg_log2_pvalue(0.25), 2.0);
        assert!(neg_log2_pvalue(0.0).is_finite());
        assert_relative_eq!(neg_log2_pvalue(0.0), -(1e-12f64).log2());
        assert_relative_eq!(neg_log2_pvalue(1.0), 0.0);
    }

    #[test]
    fn test_neg_log2_pvalue_out_of_range() {
        assert!(neg_log2_pvalue(2.0).is_nan());
        assert!(neg_log2_pvalue(-0.1).is_nan());
        assert!(neg_log2_pvalue(f64::NAN).is_nan());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("2-hydroxy/butyrate (iso)"), "2-hydroxy_butyrate__iso_");
        assert_eq!(sanitize_file_name("VE707-36"), "VE707-36");
    }

    #[test]
    fn test_metabolite_points_roles() {
        let tables = paired();
        let points = metabolite_points(&tables, "X", "A", &["B".to_string()]).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].role, StrainRole::Target);
        assert_eq!(points[1].role, StrainRole::Sharing);
        assert_eq!(points[2].role, StrainRole::Other);
        assert_relative_eq!(points[0].x, 2.0);
        assert_relative_eq!(points[0].y, 4.0);
        // zero ratio is floored rather than dropped
        assert_relative_eq!(points[2].x, 0.01f64.log2());
    }

    #[test]
    fn test_metabolite_points_skip_nan() {
        let tables = paired();
        let points = metabolite_points(&tables, "Y", "A", &[]).unwrap();
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.strain != "C"));
    }

    #[test]
    fn test_volcano_points() {
        let tables = paired();
        let thresholds = Thresholds {
            pvalue: 0.1,
            ..Default::default()
        };
        let result = classify_paired(&tables, "A", &thresholds).unwrap();
        let points = volcano_points(&tables, &result).unwrap();

        assert_eq!(points.len(), 2);
        let x = points.iter().find(|p| p.metabolite == "X").unwrap();
        assert_eq!(x.direction, Direction::Produced);
        assert_eq!(x.n_other, 1);
        assert_eq!(x.rarity, Rarity::Rare);
        assert_eq!(x.radius(), 6);

        let y = points.iter().find(|p| p.metabolite == "Y").unwrap();
        assert_eq!(y.direction, Direction::Consumed);
        assert_eq!(y.rarity, Rarity::Unique);
        assert!(y.y.is_finite());
    }

    #[test]
    fn test_axis_ranges_include_guides() {
        let t = Thresholds::default();
        let (x, y) = axis_ranges(std::iter::empty(), &t);
        assert!(x.0 < 0.5f64.log2() && x.1 > 1.5f64.log2());
        assert_eq!(y.0, 0.0);
        assert!(y.1 > -(0.05f64).log2());
    }
}
