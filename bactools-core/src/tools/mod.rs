//! Invocation of external command-line tools.
//!
//! Each predictor implements [`ExternalTool`], which only knows how to build
//! its command line. [`run_tool`] resolves the output directory, runs the
//! command to completion and maps spawn and exit failures onto
//! [`BactoolsError`]. Output discovery is left to
//! [`classify_output_dir`](crate::output::classify_output_dir).
//!
//! ## Output layout
//!
//! For `data/x.fasta` run through Prodigal with no explicit output:
//!
//! ```text
//! data/x_prodigal/
//!     x_prodigal_genes.fna
//!     x_prodigal_proteins.faa
//!     x_prodigal_cds.gbk
//!     x_prodigal_scores.txt
//! ```

use crate::types::{BactoolsError, Tool};
use log::{debug, info};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub mod prodigal;
pub mod prokka;
pub mod seqstats;

pub use prodigal::Prodigal;
pub use prokka::Prokka;
pub use seqstats::{Seqstats, parse_seqstats};

/// A gene predictor driven through its command line.
pub trait ExternalTool {
    /// Which predictor this is
    fn tool(&self) -> Tool;

    /// Executable name or path
    fn binary(&self) -> &str;

    /// Full command writing every artifact for `contigs` into `out_dir`.
    fn command(&self, contigs: &Path, out_dir: &Path) -> Command;
}

/// Directory a run writes into: `<parent>/<contigs stem>_<tool>`.
///
/// `parent` is `output` when given, otherwise the directory holding the
/// contigs file.
pub fn default_output_dir(
    tool: Tool,
    contigs: &Path,
    output: Option<&Path>,
) -> Result<PathBuf, BactoolsError> {
    let stem = contigs
        .file_stem()
        .ok_or_else(|| BactoolsError::InvalidFasta(contigs.to_path_buf()))?;
    let mut name = OsString::from(stem);
    name.push("_");
    name.push(tool.name());

    let parent = match output {
        Some(dir) => dir,
        None => contigs
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new(".")),
    };
    Ok(parent.join(name))
}

/// File name prefix inside an output directory: the directory's own name.
pub fn output_prefix(out_dir: &Path) -> OsString {
    out_dir
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"))
}

/// Runs `cmd` to completion, capturing its output.
///
/// # Errors
///
/// - [`BactoolsError::ToolNotFound`] if the binary cannot be spawned
/// - [`BactoolsError::ToolFailed`] on a non-zero exit status
pub fn execute(cmd: &mut Command, tool_name: &str) -> Result<Output, BactoolsError> {
    debug!("Executing {cmd:?}");
    let output = cmd.output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            BactoolsError::ToolNotFound {
                tool: tool_name.to_string(),
                binary: cmd.get_program().to_string_lossy().into_owned(),
            }
        } else {
            BactoolsError::IoError(e)
        }
    })?;

    if !output.status.success() {
        return Err(BactoolsError::ToolFailed {
            tool: tool_name.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}

/// Runs `tool` on `contigs` and returns the output directory.
///
/// The directory is created when absent and reused when it already exists.
pub fn run_tool<T: ExternalTool + ?Sized>(
    tool: &T,
    contigs: &Path,
    output: Option<&Path>,
) -> Result<PathBuf, BactoolsError> {
    let out_dir = default_output_dir(tool.tool(), contigs, output)?;
    if !out_dir.is_dir() {
        fs::create_dir_all(&out_dir)?;
    }

    info!(
        "Starting {}. Input file is {}, output directory is {}",
        tool.tool(),
        contigs.display(),
        out_dir.display()
    );
    let mut cmd = tool.command(contigs, &out_dir);
    let result = execute(&mut cmd, tool.tool().name())?;

    let stdout = String::from_utf8_lossy(&result.stdout);
    if !stdout.trim().is_empty() {
        debug!("{} stdout:\n{}", tool.tool(), stdout.trim_end());
    }
    Ok(out_dir)
}
