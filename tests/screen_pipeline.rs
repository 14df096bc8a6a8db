//! Integration tests for the screen pipeline.

use metabolite_screen::io::read_sheet;
use metabolite_screen::prelude::*;
use std::io::Write;
use tempfile::{tempdir, Builder, NamedTempFile};

const STRAINS: [&str; 6] = ["P12", "VE707-02", "VE707-03", "VE707-04", "VE707-05", "VE707-36"];

/// Synthetic screen around target VE707-36 (last column).
///
/// - indole: produced only by the target (unique)
/// - butyrate: produced by the target and one other strain (rare, k = 1)
/// - acetate: produced by the target and three others (rare, k = rarity)
/// - propionate: produced by the target and four others (common)
/// - glucose: consumed by the target and P12 (rare consumed, via alias)
/// - lactate: consumed only by the target, but p = 0 (unique consumed)
/// - citrate: target ratio high but not significant (not a candidate)
fn ratio_rows() -> Vec<(&'static str, [f64; 6])> {
    vec![
        ("indole", [1.0, 1.2, 0.9, 1.4, 1.0, 3.0]),
        ("butyrate", [1.0, 2.5, 1.0, 1.0, 1.0, 2.0]),
        ("acetate", [1.6, 1.7, 1.8, 1.0, 1.0, 1.9]),
        ("propionate", [1.6, 1.7, 1.8, 1.9, 2.0, 2.2]),
        ("glucose", [0.1, 1.0, 1.0, 1.0, 1.0, 0.2]),
        ("lactate", [1.0, 1.0, 1.0, 1.0, 1.0, 0.0]),
        ("citrate", [1.0, 1.0, 1.0, 1.0, 1.0, 5.0]),
    ]
}

fn pvalue_for(metabolite: &str, strain: usize) -> f64 {
    match (metabolite, strain) {
        ("citrate", 5) => 0.3,
        ("lactate", 5) => 0.0,
        ("propionate", 4) => 0.2,
        _ => 0.01,
    }
}

/// Write a table with `preamble` junk rows above the header.
fn write_table(values: impl Fn(usize, &str, f64) -> f64, preamble: usize) -> NamedTempFile {
    let mut file = Builder::new().suffix(".tsv").tempfile().unwrap();
    for i in 0..preamble {
        writeln!(file, "export line {}", i).unwrap();
    }
    writeln!(file, "Metabolite\t{}", STRAINS.join("\t")).unwrap();
    for (metabolite, ratios) in ratio_rows() {
        let cells: Vec<String> = ratios
            .iter()
            .enumerate()
            .map(|(s, &r)| values(s, metabolite, r).to_string())
            .collect();
        writeln!(file, "{}\t{}", metabolite, cells.join("\t")).unwrap();
    }
    file.flush().unwrap();
    file
}

fn write_aliases() -> NamedTempFile {
    let mut file = Builder::new().suffix(".tsv").tempfile().unwrap();
    writeln!(file, "strain alias\tstrainID").unwrap();
    writeln!(file, "P12\tVE707-01").unwrap();
    file.flush().unwrap();
    file
}

struct Fixture {
    ratios: NamedTempFile,
    pvalues: NamedTempFile,
    aliases: NamedTempFile,
}

fn fixture() -> Fixture {
    Fixture {
        ratios: write_table(|_, _, r| r, 2),
        pvalues: write_table(|s, m, _| pvalue_for(m, s), 3),
        aliases: write_aliases(),
    }
}

fn load(fx: &Fixture) -> PairedTables {
    let aliases = load_aliases(&TableSource::new(fx.aliases.path()), "strain alias", "strainID")
        .unwrap();
    load_tables(
        &TableSource::new(fx.ratios.path()).header_row(2),
        &TableSource::new(fx.pvalues.path()).header_row(3),
        Some(&aliases),
    )
    .unwrap()
}

#[test]
fn test_aliases_applied_to_both_tables() {
    let fx = fixture();
    let tables = load(&fx);
    assert_eq!(tables.strains()[0], "VE707-01");
    assert!(tables.pvalues().has_col("VE707-01"));
    assert!(!tables.ratios().has_col("P12"));
}

#[test]
fn test_classification() {
    let fx = fixture();
    let tables = load(&fx);
    let result = classify_paired(&tables, "VE707-36", &Thresholds::default()).unwrap();

    assert_eq!(result.produced.unique, vec!["indole"]);
    assert_eq!(result.produced.rare_strains("butyrate").unwrap(), &["VE707-02"]);
    assert_eq!(
        result.produced.rare_strains("acetate").unwrap(),
        &["VE707-01", "VE707-02", "VE707-03"]
    );
    // propionate: four other producers, VE707-05 not significant
    assert_eq!(result.produced.common.len(), 1);
    assert_eq!(result.produced.common[0].metabolite, "propionate");
    assert_eq!(result.produced.common[0].n_other(), 4);

    assert_eq!(result.consumed.rare_strains("glucose").unwrap(), &["VE707-01"]);
    assert_eq!(result.consumed.unique, vec!["lactate"]);

    let all: Vec<&str> = Direction::ALL
        .iter()
        .flat_map(|&d| result.direction(d).candidates().map(|(m, _)| m))
        .collect();
    assert!(!all.contains(&"citrate"));
}

#[test]
fn test_unique_and_rare_disjoint() {
    let fx = fixture();
    let tables = load(&fx);
    for target in tables.strains() {
        let result = classify_paired(&tables, target, &Thresholds::default()).unwrap();
        for direction in Direction::ALL {
            let r = result.direction(direction);
            for unique in &r.unique {
                assert!(r.rare.iter().all(|s| &s.metabolite != unique));
            }
            for rare in &r.rare {
                assert!(rare.n_other() >= 1 && rare.n_other() <= 3);
                assert!(!rare.other_strains.contains(target));
            }
        }
    }
}

#[test]
fn test_candidates_match_per_strain_test() {
    let fx = fixture();
    let tables = load(&fx);
    let t = Thresholds::default();
    for direction in Direction::ALL {
        let found = candidates(&tables, "VE707-36", direction, &t).unwrap();
        for metabolite in tables.metabolites() {
            let (ratio, pvalue) = tables.get(metabolite, "VE707-36").unwrap();
            assert_eq!(found.contains(metabolite), t.passes(direction, ratio, pvalue));
        }
    }
}

#[test]
fn test_classification_is_idempotent() {
    let fx = fixture();
    let tables = load(&fx);
    let first = classify_paired(&tables, "VE707-36", &Thresholds::default()).unwrap();
    let second = classify_paired(&tables, "VE707-36", &Thresholds::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_rarity_level_moves_boundary() {
    let fx = fixture();
    let tables = load(&fx);
    let t = Thresholds {
        rarity: 2,
        ..Default::default()
    };
    let result = classify_paired(&tables, "VE707-36", &t).unwrap();
    assert!(result.produced.rare_strains("acetate").is_none());
    assert!(result.produced.common.iter().any(|c| c.metabolite == "acetate"));
}

#[test]
fn test_screen_writes_workbook() {
    let fx = fixture();
    let tables = load(&fx);
    let out = tempdir().unwrap();

    let outcomes = Screen::new()
        .name("integration")
        .target("VE707-36")
        .target("VE707-01")
        .output_dir(out.path())
        .run(&tables)
        .unwrap();

    assert_eq!(outcomes.len(), 2);
    for outcome in &outcomes {
        assert!(outcome.workbook.exists());
        assert!(outcome.plots.is_empty());
    }
    assert_eq!(outcomes[0].workbook, workbook_path(out.path(), "VE707-36"));

    let rare = read_sheet(&outcomes[0].workbook, Some("rare_produced"), 0).unwrap();
    assert_eq!(rare.len(), 3);
    assert_eq!(rare[1], vec!["butyrate", "VE707-02"]);

    let unique = read_sheet(&outcomes[0].workbook, Some("unique_consumed"), 0).unwrap();
    assert_eq!(unique[1], vec!["0", "lactate"]);
}

#[test]
fn test_screen_fails_before_writing_for_unknown_target() {
    let fx = fixture();
    let tables = load(&fx);
    let out = tempdir().unwrap();

    let err = Screen::new()
        .target("VE707-99")
        .output_dir(out.path())
        .run(&tables)
        .unwrap_err();
    assert!(err.is_key_lookup());
    assert!(!workbook_path(out.path(), "VE707-99").exists());
}

#[test]
fn test_screen_checks_every_target_before_writing() {
    let fx = fixture();
    let tables = load(&fx);
    let out = tempdir().unwrap();

    let err = Screen::new()
        .target("VE707-36")
        .target("VE707-99")
        .output_dir(out.path())
        .run(&tables)
        .unwrap_err();
    assert!(err.is_key_lookup());
    assert!(!workbook_path(out.path(), "VE707-36").exists());
}

#[test]
fn test_screen_writes_plots() {
    let fx = fixture();
    let tables = load(&fx);
    let out = tempdir().unwrap();

    let outcomes = Screen::new()
        .target("VE707-36")
        .output_dir(out.path())
        .plots(true)
        .run(&tables)
        .unwrap();

    // butyrate, acetate (produced) and glucose (consumed) are rare; lactate
    // has p = 0 and lands on the volcano plot through the floor
    let plots = &outcomes[0].plots;
    let strain_dir = out.path().join("plots").join("VE707-36");
    let expected = vec![
        strain_dir.join("produced_butyrate.png"),
        strain_dir.join("produced_acetate.png"),
        strain_dir.join("consumed_glucose.png"),
        out.path().join("plots").join("VE707-36_volcano.png"),
    ];
    assert_eq!(plots, &expected);
    for path in plots {
        assert!(path.exists(), "missing plot {:?}", path);
        assert!(std::fs::metadata(path).unwrap().len() > 0);
    }
}

#[test]
fn test_run_screen_from_yaml() {
    let fx = fixture();
    let out = tempdir().unwrap();
    let yaml = format!(
        r#"
name: yaml screen
ratios: {{ path: "{}", header_row: 2 }}
pvalues: {{ path: "{}", header_row: 3 }}
aliases:
  source: {{ path: "{}" }}
  extra: {{ VE707-05: VE707-50 }}
targets: [VE707-36]
thresholds: {{ rarity: 3 }}
output_dir: "{}"
"#,
        fx.ratios.path().display(),
        fx.pvalues.path().display(),
        fx.aliases.path().display(),
        out.path().display()
    );
    let config = ScreenConfig::from_yaml(&yaml).unwrap();
    let outcomes = run_screen(&config).unwrap();

    assert_eq!(outcomes.len(), 1);
    let result = &outcomes[0].result;
    assert_eq!(result.produced.unique, vec!["indole"]);
    assert!(config.load_tables().unwrap().ratios().has_col("VE707-50"));
}

#[test]
fn test_profile() {
    let fx = fixture();
    let tables = load(&fx);
    let profile = profile_significance(&tables, &Thresholds::default()).unwrap();
    let target = profile.strain("VE707-36").unwrap();
    assert_eq!(target.n_produced, 4);
    assert_eq!(target.n_consumed, 2);
    assert_eq!(target.n_sole_producer, 1);
    assert_eq!(target.n_sole_consumer, 1);
}
