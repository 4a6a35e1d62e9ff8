use std::path::Path;
use std::process::Command;

use crate::config::BactoolsConfig;
use crate::tools::{ExternalTool, output_prefix};
use crate::types::Tool;

/// Prokka invocation with passthrough options.
///
/// Prokka names its files `<prefix>.<ext>`; the prefix is the output
/// directory's name, as for Prodigal.
#[derive(Debug, Clone)]
pub struct Prokka {
    pub binary: String,
    pub quiet: bool,
    /// Rendered as `--key value`, or `--key` for flags
    pub options: Vec<(String, Option<String>)>,
}

impl Prokka {
    pub fn from_config(config: &BactoolsConfig) -> Self {
        Self {
            binary: config.prokka_binary.clone(),
            quiet: config.quiet,
            options: config.prokka_options.clone(),
        }
    }
}

impl ExternalTool for Prokka {
    fn tool(&self) -> Tool {
        Tool::Prokka
    }

    fn binary(&self) -> &str {
        &self.binary
    }

    fn command(&self, contigs: &Path, out_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        // The directory may already exist (reused runs), which Prokka refuses without --force.
        cmd.arg("--outdir")
            .arg(out_dir)
            .arg("--prefix")
            .arg(output_prefix(out_dir))
            .arg("--force");
        if self.quiet {
            cmd.arg("--quiet");
        }
        for (key, value) in &self.options {
            cmd.arg(format!("--{}", key.trim_start_matches('-')));
            if let Some(value) = value {
                cmd.arg(value);
            }
        }
        cmd.arg(contigs);
        cmd
    }
}
