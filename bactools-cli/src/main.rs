//! # Bactools CLI - Batch Gene Prediction
//!
//! Runs a gene predictor over a single assembly or over every file in a
//! directory, writing one output directory per assembly.
//!
//! ## Usage
//!
//! ```bash
//! # One assembly, output next to it in contigs_prodigal/
//! bactools -i contigs.fasta
//!
//! # Every file in a directory, outputs collected under results/
//! bactools -i assemblies/ -o results/
//!
//! # Annotate with Prokka instead
//! bactools -i contigs.fasta -t prokka
//! ```
//!
//! ## Options
//!
//! - `-i, --input <PATH>`: FASTA file or directory of FASTA files (required)
//! - `-o, --output <DIR>`: Parent directory for the per-assembly outputs
//! - `-t, --tool <TOOL>`: Predictor to run: prodigal or prokka (default: prodigal)
//! - `-q, --quiet`: Only log warnings and errors
//!
//! Binary locations are read from `BACTOOLS_PRODIGAL`, `BACTOOLS_PROKKA` and
//! `BACTOOLS_SEQSTATS`. A directory run never stops on a bad file: failures
//! are logged, counted and reported in the final summary line.

use bactools_core::config::{BactoolsConfig, env_flag};
use bactools_core::tools::{ExternalTool, Prodigal, Prokka};
use bactools_core::types::{BactoolsError, SetKind, Tool};
use bactools_core::Assembly;
use clap::{Arg, ArgAction, Command, value_parser};
use log::{Level, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Runs `tool` on one contigs file and logs how many genes it found.
fn process_assembly(
    contigs: &Path,
    output: Option<&Path>,
    tool: Tool,
    config: &BactoolsConfig,
) -> Result<(), BactoolsError> {
    let mut assembly = Assembly::from_contigs(contigs, config.clone())?;
    let runner: Box<dyn ExternalTool> = match tool {
        Tool::Prodigal => Box::new(Prodigal::from_config(config)),
        Tool::Prokka => Box::new(Prokka::from_config(config)),
    };
    let out = assembly.run_with(runner.as_ref(), output)?;
    let dir = out.dir.clone();

    match assembly.sequence_count(tool, SetKind::Gene) {
        Ok(genes) => info!("{} genes predicted into {}", genes, dir.display()),
        Err(e) => warn!("Could not count genes in {}: {e}", dir.display()),
    }
    Ok(())
}

/// Regular files directly inside `dir`, sorted by name.
fn list_input_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    files.retain(|p| p.is_file());
    files.sort();
    Ok(files)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("bactools")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Runs gene prediction on bacterial assemblies")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .help("Input FASTA file or directory containing FASTA files"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Parent directory for output folders (default: next to each input)"),
        )
        .arg(
            Arg::new("tool")
                .short('t')
                .long("tool")
                .value_name("TOOL")
                .help("Predictor to run: prodigal or prokka")
                .default_value("prodigal"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Quiet mode"),
        )
        .get_matches();

    let quiet = matches.get_flag("quiet")
        || std::env::var("BACTOOLS_QUIET").is_ok_and(|v| env_flag(&v));
    simple_logger::init_with_level(if quiet { Level::Warn } else { Level::Info })?;

    let start = Instant::now();
    let config = BactoolsConfig::from_env();
    let output = matches.get_one::<PathBuf>("output").map(PathBuf::as_path);
    let tool: Tool = matches
        .get_one::<String>("tool")
        .map_or(Ok(Tool::Prodigal), |s| s.parse())?;
    let Some(input) = matches.get_one::<PathBuf>("input") else {
        return Err("missing --input".into());
    };

    let mut success = 0usize;
    let mut failure = 0usize;

    if input.is_file() {
        info!("Starting {tool}. Input file is {}", input.display());
        process_assembly(input, output, tool, &config)?;
        success += 1;
    } else if input.is_dir() {
        let files = list_input_files(input)?;
        info!(
            "Starting {tool}. {} files to be processed in {}",
            files.len(),
            input.display()
        );
        for file in &files {
            info!("Running {tool} for {}", file.display());
            match process_assembly(file, output, tool, &config) {
                Ok(()) => success += 1,
                Err(e) => {
                    error!("Error for {}: {e}", file.display());
                    failure += 1;
                }
            }
        }
    } else {
        return Err(Box::new(BactoolsError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input not found: {}", input.display()),
        ))));
    }

    println!(
        "Done. {success} assemblies processed. {failure} errors. Took {:.2?}.",
        start.elapsed()
    );
    Ok(())
}
