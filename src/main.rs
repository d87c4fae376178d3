// SPDX-License-Identifier: PMPL-1.0-or-later

//! diagno: related-symptom suggestions and most-probable-disease lookup
//!
//! Command-line front end over the inference engine. Reads a headerless
//! `disease,symptom,group_number` dataset and answers suggestion and
//! diagnosis queries, either from arguments or as JSON requests.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use diagno::config::EngineConfig;
use diagno::diagnostics;
use diagno::engine::TableSource;
use diagno::report::{self, ReportGenerator, ReportOutputFormat};
use diagno::types::*;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "diagno")]
#[command(version)]
#[command(about = "Symptom suggestions and most-probable-disease lookup")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (JSON or YAML)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Association dataset (disease,symptom,group_number; no header)
    #[arg(short, long, global = true, value_name = "FILE")]
    dataset: Option<PathBuf>,

    /// Treatment catalog (JSON or YAML)
    #[arg(short, long, global = true, value_name = "FILE")]
    treatments: Option<PathBuf>,

    /// How diseases are scored
    #[arg(long, global = true, value_enum)]
    scoring: Option<ScoringArg>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: ReportOutputFormat,

    /// Verbose logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest symptoms related to the observed ones
    Suggest {
        /// Observed symptoms
        #[arg(value_name = "SYMPTOM", required = true)]
        symptoms: Vec<String>,

        /// Save the report to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report the most probable disease for the observed symptoms
    Diagnose {
        /// Observed symptoms
        #[arg(value_name = "SYMPTOM", required = true)]
        symptoms: Vec<String>,

        /// Include the full disease ranking
        #[arg(short, long)]
        ranking: bool,

        /// Save the report to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Answer a JSON request ({"symptoms": [...]}) from a file or stdin
    Request {
        /// Operation to run
        #[arg(long, value_enum)]
        op: OperationArg,

        /// Request file (default: stdin)
        #[arg(value_name = "REQUEST")]
        input: Option<PathBuf>,
    },

    /// List every symptom known to the dataset
    Symptoms,

    /// Check configuration, dataset and treatment catalog
    Check,
}

// CLI argument types
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OperationArg {
    Suggest,
    Diagnose,
}

impl From<OperationArg> for Operation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Suggest => Operation::Suggest,
            OperationArg::Diagnose => Operation::Diagnose,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ScoringArg {
    Rows,
    DistinctSymptoms,
}

impl From<ScoringArg> for ScoringMode {
    fn from(arg: ScoringArg) -> Self {
        match arg {
            ScoringArg::Rows => ScoringMode::Rows,
            ScoringArg::DistinctSymptoms => ScoringMode::DistinctSymptoms,
        }
    }
}

impl Cli {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = EngineConfig::resolve(self.config.as_deref())?;
        if let Some(dataset) = &self.dataset {
            config.dataset = dataset.clone();
        }
        if let Some(treatments) = &self.treatments {
            config.treatments = Some(treatments.clone());
        }
        if let Some(scoring) = self.scoring {
            config.scoring = scoring.into();
        }
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn emit(
    inference: &report::InferenceReport,
    format: ReportOutputFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    match output {
        Some(path) => {
            report::save_report(inference, &path, format)?;
            println!("Report saved to: {}", path.display());
        }
        None => report::print_report(inference, format)?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = cli.engine_config()?;
    let dataset_label = config.dataset.display().to_string();

    match cli.command {
        Commands::Suggest { symptoms, output } => {
            let service = config.build_service()?;
            let symptoms: HashSet<String> = symptoms.into_iter().collect();
            let reply = service
                .suggest(&symptoms)
                .with_context(|| format!("loading dataset {}", dataset_label))?;

            let report = ReportGenerator::new(dataset_label).suggestion(&symptoms, reply);
            emit(&report, cli.format, output)?;
        }

        Commands::Diagnose {
            symptoms,
            ranking,
            output,
        } => {
            let service = config.build_service()?;
            let symptoms: HashSet<String> = symptoms.into_iter().collect();
            let (reply, scores) = if ranking {
                service.diagnose_ranked(&symptoms)
            } else {
                service.diagnose(&symptoms).map(|reply| (reply, Vec::new()))
            }
            .with_context(|| format!("loading dataset {}", dataset_label))?;

            let report = ReportGenerator::new(dataset_label).diagnosis(&symptoms, reply, scores);
            emit(&report, cli.format, output)?;
        }

        Commands::Request { op, input } => {
            let raw = match &input {
                Some(path) => fs::read_to_string(path)
                    .with_context(|| format!("reading request {}", path.display()))?,
                None => io::read_to_string(io::stdin()).context("reading request from stdin")?,
            };
            let request: SymptomRequest =
                serde_json::from_str(&raw).context("parsing symptom request")?;

            let service = config.build_service()?;
            let reply = service
                .handle(op.into(), &request)
                .with_context(|| format!("loading dataset {}", dataset_label))?;
            println!("{}", serde_json::to_string(&reply)?);
        }

        Commands::Symptoms => {
            let table = config
                .table_source()?
                .load()
                .with_context(|| format!("loading dataset {}", dataset_label))?;
            let symptoms = table.symptoms();
            match cli.format {
                ReportOutputFormat::Text => {
                    for symptom in &symptoms {
                        println!("{}", symptom);
                    }
                }
                ReportOutputFormat::Json => println!("{}", serde_json::to_string_pretty(&symptoms)?),
                ReportOutputFormat::Yaml => print!("{}", serde_yaml::to_string(&symptoms)?),
            }
        }

        Commands::Check => {
            diagnostics::run_self_diagnostics(&config)?;
        }
    }

    Ok(())
}
