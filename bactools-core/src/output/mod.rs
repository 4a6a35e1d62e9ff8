//! Discovery of gene prediction output files.
//!
//! External predictors write a directory of files whose role is only encoded
//! in the file name. This module maps those names to [`OutputRole`]s through
//! a per-tool suffix table and collects the result in a [`PredictionOutput`].
//!
//! ## Suffix tables
//!
//! | Role       | Prodigal        | Prokka |
//! |------------|-----------------|--------|
//! | `Genes`    | `_genes.fna`    | `.ffn` |
//! | `Proteins` | `_proteins.faa` | `.faa` |
//! | `Cds`      | `_cds.gbk`      | `.gbk` |
//! | `Scores`   | `_scores.txt`   | (none) |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use bactools_core::output::classify_output_dir;
//! use bactools_core::types::{OutputRole, Tool};
//!
//! let output = classify_output_dir(Tool::Prodigal, "contigs_prodigal")?;
//! if let Some(genes) = output.get(OutputRole::Genes) {
//!     println!("genes in {}", genes.display());
//! }
//! # Ok::<(), bactools_core::types::BactoolsError>(())
//! ```

use crate::types::{BactoolsError, OutputRole, Tool};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

const PRODIGAL_SUFFIXES: &[(&str, OutputRole)] = &[
    ("_genes.fna", OutputRole::Genes),
    ("_proteins.faa", OutputRole::Proteins),
    ("_cds.gbk", OutputRole::Cds),
    ("_scores.txt", OutputRole::Scores),
];

const PROKKA_SUFFIXES: &[(&str, OutputRole)] = &[
    (".ffn", OutputRole::Genes),
    (".faa", OutputRole::Proteins),
    (".gbk", OutputRole::Cds),
];

/// Suffix table used to classify a tool's output files.
#[must_use]
pub const fn suffix_scheme(tool: Tool) -> &'static [(&'static str, OutputRole)] {
    match tool {
        Tool::Prodigal => PRODIGAL_SUFFIXES,
        Tool::Prokka => PROKKA_SUFFIXES,
    }
}

/// Role of a single file name under `tool`'s naming convention.
#[must_use]
pub fn classify_file_name(tool: Tool, file_name: &str) -> Option<OutputRole> {
    suffix_scheme(tool)
        .iter()
        .find(|(suffix, _)| file_name.ends_with(suffix))
        .map(|&(_, role)| role)
}

/// Files produced by one tool run, keyed by role.
///
/// A `None` role means the tool did not emit that artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionOutput {
    /// Tool whose naming convention was applied
    pub tool: Tool,
    /// Scanned directory
    pub dir: PathBuf,
    /// Gene nucleotide FASTA
    pub genes: Option<PathBuf>,
    /// Protein FASTA
    pub proteins: Option<PathBuf>,
    /// Coding sequence annotation
    pub cds: Option<PathBuf>,
    /// Start score table
    pub scores: Option<PathBuf>,
}

impl PredictionOutput {
    /// An output with no roles assigned yet.
    pub fn empty<P: Into<PathBuf>>(tool: Tool, dir: P) -> Self {
        Self {
            tool,
            dir: dir.into(),
            genes: None,
            proteins: None,
            cds: None,
            scores: None,
        }
    }

    fn slot(&mut self, role: OutputRole) -> &mut Option<PathBuf> {
        match role {
            OutputRole::Genes => &mut self.genes,
            OutputRole::Proteins => &mut self.proteins,
            OutputRole::Cds => &mut self.cds,
            OutputRole::Scores => &mut self.scores,
        }
    }

    #[must_use]
    pub fn get(&self, role: OutputRole) -> Option<&Path> {
        match role {
            OutputRole::Genes => self.genes.as_deref(),
            OutputRole::Proteins => self.proteins.as_deref(),
            OutputRole::Cds => self.cds.as_deref(),
            OutputRole::Scores => self.scores.as_deref(),
        }
    }

    /// Like [`get`](Self::get) but reports an absent role as an error.
    pub fn require(&self, role: OutputRole) -> Result<&Path, BactoolsError> {
        self.get(role).ok_or(BactoolsError::MissingRole {
            tool: self.tool,
            role,
        })
    }

    /// Assigns `path` to `role`; a role that is already taken is an error.
    pub fn assign(&mut self, role: OutputRole, path: PathBuf) -> Result<(), BactoolsError> {
        let slot = self.slot(role);
        if let Some(first) = slot {
            return Err(BactoolsError::AmbiguousOutput {
                role,
                first: first.clone(),
                second: path,
            });
        }
        *slot = Some(path);
        Ok(())
    }

    /// Number of roles present.
    #[must_use]
    pub fn len(&self) -> usize {
        [&self.genes, &self.proteins, &self.cds, &self.scores]
            .iter()
            .filter(|p| p.is_some())
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scans `dir` and classifies its files with `tool`'s suffix table.
///
/// Entries are visited in name order, so scanning an unchanged directory
/// twice yields the same mapping. Unrecognized files and subdirectories are
/// skipped.
///
/// # Errors
///
/// - [`BactoolsError::MissingDirectory`] if `dir` is not a directory
/// - [`BactoolsError::AmbiguousOutput`] if two files match the same role
/// - [`BactoolsError::IoError`] if the directory cannot be read
pub fn classify_output_dir<P: AsRef<Path>>(
    tool: Tool,
    dir: P,
) -> Result<PredictionOutput, BactoolsError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(BactoolsError::MissingDirectory(dir.to_path_buf()));
    }

    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    let mut output = PredictionOutput::empty(tool, dir);
    for path in entries {
        if !path.is_file() {
            continue;
        }
        let role = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| classify_file_name(tool, name));
        match role {
            Some(role) => output.assign(role, path)?,
            None => debug!(
                "{} is not a {} output file, ignoring it",
                path.display(),
                tool
            ),
        }
    }

    Ok(output)
}
