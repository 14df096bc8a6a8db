//! mscreen - unique and rare metabolite screening CLI
//!
//! Command-line interface for screening a strain's metabolites against all
//! other strains in a ratio / p-value dataset.

use clap::{Args, Parser, Subcommand, ValueEnum};
use metabolite_screen::classify::Thresholds;
use metabolite_screen::data::{ClassificationResult, PairedTables};
use metabolite_screen::error::{Result, ScreenError};
use metabolite_screen::io::{load_aliases, TableSource};
use metabolite_screen::pipeline::{load_tables, run_screen, Screen, ScreenConfig, ScreenOutcome};
use metabolite_screen::profile::profile_significance;
use std::path::PathBuf;

/// Output format for printed results
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Unique and rare metabolite screening
#[derive(Parser)]
#[command(name = "mscreen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Ratio / p-value inputs shared by several commands
#[derive(Args)]
struct TableArgs {
    /// Ratio table (xlsx/xls/ods, or TSV/CSV)
    #[arg(short, long)]
    ratios: PathBuf,

    /// P-value table (xlsx/xls/ods, or TSV/CSV)
    #[arg(short, long)]
    pvalues: PathBuf,

    /// Sheet holding ratios (default: first sheet)
    #[arg(long)]
    ratio_sheet: Option<String>,

    /// Sheet holding p-values (default: first sheet)
    #[arg(long)]
    pvalue_sheet: Option<String>,

    /// 0-based header row of the ratio table
    #[arg(long, default_value = "0")]
    ratio_header_row: usize,

    /// 0-based header row of the p-value table
    #[arg(long, default_value = "0")]
    pvalue_header_row: usize,

    /// Strain alias table used to rename strain columns
    #[arg(short, long)]
    aliases: Option<PathBuf>,

    /// Alias column in the alias table
    #[arg(long, default_value = "strain alias")]
    alias_column: String,

    /// Canonical strain id column in the alias table
    #[arg(long, default_value = "strainID")]
    canonical_column: String,
}

impl TableArgs {
    fn load(&self) -> Result<PairedTables> {
        let ratios = TableSource {
            path: self.ratios.clone(),
            sheet: self.ratio_sheet.clone(),
            header_row: self.ratio_header_row,
            delimiter: None,
        };
        let pvalues = TableSource {
            path: self.pvalues.clone(),
            sheet: self.pvalue_sheet.clone(),
            header_row: self.pvalue_header_row,
            delimiter: None,
        };
        let aliases = match &self.aliases {
            Some(path) => Some(load_aliases(
                &TableSource::new(path),
                &self.alias_column,
                &self.canonical_column,
            )?),
            None => None,
        };
        load_tables(&ratios, &pvalues, aliases.as_ref())
    }
}

/// Classification thresholds
#[derive(Args)]
struct ThresholdArgs {
    /// Ratio at or below which a metabolite is consumed
    #[arg(long, default_value = "0.5")]
    consumption: f64,

    /// Ratio at or above which a metabolite is produced
    #[arg(long, default_value = "1.5")]
    production: f64,

    /// Largest significant p-value
    #[arg(long, default_value = "0.05")]
    pvalue: f64,

    /// Most other strains sharing an effect for it to count as rare
    #[arg(long, default_value = "3")]
    rarity: usize,
}

impl From<&ThresholdArgs> for Thresholds {
    fn from(args: &ThresholdArgs) -> Self {
        Thresholds {
            consumption: args.consumption,
            production: args.production,
            pvalue: args.pvalue,
            rarity: args.rarity,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a screen from a YAML configuration file
    Run {
        /// Path to screen configuration YAML
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Classify unique and rare metabolites for one or more strains
    Classify {
        #[command(flatten)]
        tables: TableArgs,

        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// Target strain (repeat for several)
        #[arg(short, long, required = true)]
        target: Vec<String>,

        /// Output directory for workbooks and plots
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Render PNG plots
        #[arg(long)]
        plots: bool,

        /// Print results as text, json or yaml
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Count significant produced and consumed metabolites per strain
    Profile {
        #[command(flatten)]
        tables: TableArgs,

        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Generate an example screen configuration
    Example {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "screen.yaml")]
        output: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config } => cmd_run(&config),

        Commands::Classify {
            tables,
            thresholds,
            target,
            output,
            plots,
            format,
        } => cmd_classify(&tables, (&thresholds).into(), &target, &output, plots, format),

        Commands::Profile {
            tables,
            thresholds,
            format,
        } => cmd_profile(&tables, (&thresholds).into(), format),

        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Run a screen from configuration
fn cmd_run(config_path: &PathBuf) -> Result<()> {
    eprintln!("Loading screen configuration from {:?}...", config_path);
    let config_str = std::fs::read_to_string(config_path)?;
    let config = ScreenConfig::from_yaml(&config_str)?;

    let outcomes = run_screen(&config)?;
    report_outcomes(&outcomes, OutputFormat::Text)
}

/// Classify directly from command-line arguments
fn cmd_classify(
    tables: &TableArgs,
    thresholds: Thresholds,
    targets: &[String],
    output: &PathBuf,
    plots: bool,
    format: OutputFormat,
) -> Result<()> {
    let paired = tables.load()?;

    let mut screen = Screen::new()
        .name("cli")
        .thresholds(thresholds)
        .output_dir(output)
        .plots(plots);
    for target in targets {
        screen = screen.target(target);
    }

    let outcomes = screen.run(&paired)?;
    report_outcomes(&outcomes, format)
}

fn report_outcomes(outcomes: &[ScreenOutcome], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let results: Vec<&ClassificationResult> = outcomes.iter().map(|o| &o.result).collect();
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        OutputFormat::Yaml => {
            let results: Vec<&ClassificationResult> = outcomes.iter().map(|o| &o.result).collect();
            println!("{}", serde_yaml::to_string(&results)?);
        }
        OutputFormat::Text => {
            for outcome in outcomes {
                print!("{}", outcome.result.summary());
                println!("  Workbook: {}", outcome.workbook.display());
                if !outcome.plots.is_empty() {
                    println!("  Plots:    {}", outcome.plots.len());
                }
                for rare in &outcome.result.produced.rare {
                    println!(
                        "  rare produced  {:<30} {}",
                        rare.metabolite,
                        rare.other_strains.join(", ")
                    );
                }
                for rare in &outcome.result.consumed.rare {
                    println!(
                        "  rare consumed  {:<30} {}",
                        rare.metabolite,
                        rare.other_strains.join(", ")
                    );
                }
                println!();
            }
        }
    }
    Ok(())
}

/// Profile significant effects per strain
fn cmd_profile(tables: &TableArgs, thresholds: Thresholds, format: OutputFormat) -> Result<()> {
    let paired = tables.load()?;
    let profile = profile_significance(&paired, &thresholds)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profile)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&profile)?),
        OutputFormat::Text => print!("{}", profile),
    }
    Ok(())
}

/// Write an example configuration
fn cmd_example(output: &PathBuf) -> Result<()> {
    if output.exists() {
        return Err(ScreenError::InvalidParameter(format!(
            "{:?} already exists",
            output
        )));
    }
    let yaml = ScreenConfig::example().to_yaml()?;
    std::fs::write(output, yaml)?;
    eprintln!("Wrote example configuration to {:?}", output);
    Ok(())
}
