use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// External gene predictors whose output an [`Assembly`](crate::assembly::Assembly) can hold.
///
/// # Examples
///
/// ```rust
/// use bactools_core::types::Tool;
///
/// assert_eq!(Tool::Prodigal.name(), "prodigal");
/// assert_eq!("prokka".parse::<Tool>().unwrap(), Tool::Prokka);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tool {
    /// Prodigal gene finder
    Prodigal,
    /// Prokka annotation pipeline
    Prokka,
}

impl Tool {
    /// Lowercase name, used for directory suffixes and log messages
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Prodigal => "prodigal",
            Self::Prokka => "prokka",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prodigal => write!(f, "Prodigal"),
            Self::Prokka => write!(f, "Prokka"),
        }
    }
}

impl FromStr for Tool {
    type Err = BactoolsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prodigal" => Ok(Self::Prodigal),
            "prokka" => Ok(Self::Prokka),
            other => Err(BactoolsError::ParseError(format!("unknown tool '{other}'"))),
        }
    }
}

/// Kind of records held by a [`RecordSet`](crate::results::RecordSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetKind {
    /// Nucleotide gene sequences
    Gene,
    /// Translated protein sequences
    Protein,
}

impl SetKind {
    /// The output role a set of this kind is loaded from
    #[must_use]
    pub const fn role(self) -> OutputRole {
        match self {
            Self::Gene => OutputRole::Genes,
            Self::Protein => OutputRole::Proteins,
        }
    }
}

impl fmt::Display for SetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gene => write!(f, "gene"),
            Self::Protein => write!(f, "protein"),
        }
    }
}

/// Semantic role of a file found in a prediction output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputRole {
    /// Predicted gene nucleotide sequences (FASTA)
    Genes,
    /// Predicted protein sequences (FASTA)
    Proteins,
    /// Coding sequence annotation (GenBank-like)
    Cds,
    /// Per-start score table
    Scores,
}

impl fmt::Display for OutputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Genes => write!(f, "genes"),
            Self::Proteins => write!(f, "proteins"),
            Self::Cds => write!(f, "cds"),
            Self::Scores => write!(f, "scores"),
        }
    }
}

/// Gene start types reported in Prodigal headers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartType {
    /// ATG start codon
    Atg,
    /// GTG start codon
    Gtg,
    /// TTG start codon
    Ttg,
    /// Gene extends to sequence edge
    Edge,
    /// Unknown or unrecognized start
    #[default]
    Unknown,
}

impl fmt::Display for StartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atg => write!(f, "ATG"),
            Self::Gtg => write!(f, "GTG"),
            Self::Ttg => write!(f, "TTG"),
            Self::Edge => write!(f, "Edge"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

impl From<&str> for StartType {
    fn from(value: &str) -> Self {
        match value {
            "ATG" => Self::Atg,
            "GTG" => Self::Gtg,
            "TTG" => Self::Ttg,
            "Edge" => Self::Edge,
            _ => Self::Unknown,
        }
    }
}

/// Error types returned by assembly, loading and tool operations
#[derive(Error, Debug)]
pub enum BactoolsError {
    /// File does not contain a parseable FASTA record
    #[error("{} is not a valid FASTA file", .0.display())]
    InvalidFasta(PathBuf),
    /// An operation needed contigs but none were loaded
    #[error("no contigs file loaded; call load_contigs first")]
    NoContigs,
    /// Expected directory is absent
    #[error("directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),
    /// No prediction output attached for the tool
    #[error("no {0} output attached to this assembly")]
    NoOutput(Tool),
    /// The attached output lacks the requested file
    #[error("{tool} output has no {role} file")]
    MissingRole {
        /// Tool whose output was inspected
        tool: Tool,
        /// Role that was requested
        role: OutputRole,
    },
    /// Two files in one output directory claim the same role
    #[error("both {} and {} match the {role} role", .first.display(), .second.display())]
    AmbiguousOutput {
        /// Role claimed twice
        role: OutputRole,
        /// File assigned first
        first: PathBuf,
        /// Conflicting file
        second: PathBuf,
    },
    /// External binary could not be found on the execution path
    #[error("{tool} binary '{binary}' not found")]
    ToolNotFound {
        /// Tool that was invoked
        tool: String,
        /// Binary name or path that failed to spawn
        binary: String,
    },
    /// External binary exited with a non-zero status
    #[error("{tool} failed (exit code: {code:?}): {stderr}")]
    ToolFailed {
        /// Tool that was invoked
        tool: String,
        /// Exit code, `None` when killed by a signal
        code: Option<i32>,
        /// Captured standard error, trimmed
        stderr: String,
    },
    /// File I/O operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing tool output
    #[error("Parse error: {0}")]
    ParseError(String),
}

