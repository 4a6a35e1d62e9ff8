//! # Bactools - bacterial assembly gene prediction toolkit
//!
//! A thin orchestration layer around external gene predictors. It validates
//! FASTA input, runs Prodigal or Prokka on an assembly, discovers the files
//! they produce and loads the resulting gene and protein sets.
//!
//! ## Overview
//!
//! The central type is [`Assembly`]: one contigs file plus whatever each
//! predictor contributed to it. External binaries are invoked synchronously
//! and only ever through their command line, so Prodigal, Prokka and
//! seqstats must be installed (or pointed at via [`config::BactoolsConfig`]).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bactools_core::{Assembly, config::BactoolsConfig};
//! use bactools_core::types::{SetKind, Tool};
//!
//! let mut assembly = Assembly::from_contigs("data/x.fasta", BactoolsConfig::default())?;
//!
//! // Writes data/x_prodigal/x_prodigal_{genes.fna,proteins.faa,cds.gbk,scores.txt}
//! assembly.run_prodigal()?;
//!
//! let genes = assembly.sequence_count(Tool::Prodigal, SetKind::Gene)?;
//! println!("Found {genes} genes");
//! # Ok::<(), bactools_core::types::BactoolsError>(())
//! ```
//!
//! ## Reusing earlier runs
//!
//! Output directories from a previous run can be attached without running
//! anything:
//!
//! ```rust,no_run
//! use bactools_core::{Assembly, config::{BactoolsConfig, RecordMode}};
//! use bactools_core::types::Tool;
//!
//! let mut assembly = Assembly::new(BactoolsConfig::default());
//! assembly.attach_output(Tool::Prodigal, "data/x_prodigal")?;
//! let proteins = assembly.load_protset(Tool::Prodigal, RecordMode::Lazy)?;
//! println!("{} proteins", proteins.count()?);
//! # Ok::<(), bactools_core::types::BactoolsError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`assembly`]: The [`Assembly`] aggregate and its lifecycle
//! - [`config`]: Binary locations and loading options
//! - [`output`]: Classification of tool output directories
//! - [`results`]: Record sets, Prodigal gene rows and size formatting
//! - [`sequence`]: FASTA validation and record loading
//! - [`tools`]: External tool invocation
//! - [`types`]: Shared enums and the error type
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, BactoolsError>`](types::BactoolsError),
//! covering:
//!
//! - Invalid or missing input files
//! - Missing tool binaries and non-zero exits
//! - Absent or ambiguous output files

pub mod assembly;
pub mod config;
pub mod output;
pub mod results;
pub mod sequence;
pub mod tools;
pub mod types;

pub use assembly::{Assembly, load_from_fasta};
pub use types::BactoolsError;
