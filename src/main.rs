use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod aggregate;
mod branch;
mod loader;
mod models;
mod rank;
mod report;
mod validate;

use models::{BranchRule, Component, Dataset};

#[derive(Parser)]
#[command(name = "gradebook-report")]
#[command(about = "Class averages, total checks and toppers from a gradebook export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Source {
    /// Gradebook workbook (.xlsx/.xls/.ods, first sheet) or delimited text; the first row is a header
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Field delimiter for delimited text
    #[arg(long, default_value_t = ',')]
    delimiter: char,
    /// JSON file with branch rules ([{"label": .., "pattern": ..}])
    #[arg(long)]
    branches: Option<PathBuf>,
}

impl Source {
    fn load(&self) -> anyhow::Result<(Dataset, Vec<BranchRule>)> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter must be a single ASCII character");
        }
        let dataset = loader::load_dataset(&self.file, self.delimiter as u8)?;
        let rules = match &self.branches {
            Some(path) => branch::load_rules(path)?,
            None => branch::default_rules(),
        };
        Ok((dataset, rules))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print averages, total mismatches and toppers to stdout
    Summary {
        #[command(flatten)]
        source: Source,
        #[arg(long, default_value_t = rank::PODIUM_SIZE)]
        limit: usize,
        /// Also list toppers for each branch
        #[arg(long)]
        branch_rankings: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rank students on a single component
    Top {
        #[command(flatten)]
        source: Source,
        #[arg(long, value_enum)]
        component: Component,
        /// Restrict the ranking to one branch
        #[arg(long)]
        branch: Option<String>,
        #[arg(long, default_value_t = rank::PODIUM_SIZE)]
        limit: usize,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        source: Source,
        #[arg(long, default_value_t = rank::PODIUM_SIZE)]
        limit: usize,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary {
            source,
            limit,
            branch_rankings,
            json,
        } => {
            let (dataset, rules) = source.load()?;
            let class_report = report::build_class_report(&dataset, &rules, limit);
            if json {
                println!("{}", serde_json::to_string_pretty(&class_report)?);
            } else {
                print!("{}", report::render_text(&class_report, branch_rankings));
            }
        }
        Commands::Top {
            source,
            component,
            branch: branch_name,
            limit,
        } => {
            let (dataset, rules) = source.load()?;
            let (place, entries) =
                report::rank_scope(&dataset, &rules, component, branch_name.as_deref(), limit)?;

            if entries.is_empty() {
                println!("No {} scores found in {}.", component.label(), place);
                return Ok(());
            }

            println!("Top {} in {} for {}:", entries.len(), place, component.label());
            for (index, entry) in entries.iter().enumerate() {
                println!(
                    "No. {} in {}: Id: {}, Marks: {:.2}",
                    index + 1,
                    place,
                    entry.student_id,
                    entry.score
                );
            }
        }
        Commands::Report { source, limit, out } => {
            let (dataset, rules) = source.load()?;
            let class_report = report::build_class_report(&dataset, &rules, limit);
            let markdown = report::render_markdown(
                &class_report,
                &display_name(&source.file),
                chrono::Local::now().date_naive(),
            );
            std::fs::write(&out, markdown)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
