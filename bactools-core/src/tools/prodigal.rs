use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use crate::config::BactoolsConfig;
use crate::tools::{ExternalTool, output_prefix};
use crate::types::Tool;

/// Prodigal invocation writing proteins, genes, annotation and scores.
#[derive(Debug, Clone)]
pub struct Prodigal {
    pub binary: String,
    pub quiet: bool,
}

impl Prodigal {
    pub fn from_config(config: &BactoolsConfig) -> Self {
        Self {
            binary: config.prodigal_binary.clone(),
            quiet: config.quiet,
        }
    }
}

fn artifact(out_dir: &Path, suffix: &str) -> OsString {
    let mut name = output_prefix(out_dir);
    name.push(suffix);
    out_dir.join(name).into_os_string()
}

impl ExternalTool for Prodigal {
    fn tool(&self) -> Tool {
        Tool::Prodigal
    }

    fn binary(&self) -> &str {
        &self.binary
    }

    fn command(&self, contigs: &Path, out_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-i")
            .arg(contigs)
            .arg("-a")
            .arg(artifact(out_dir, "_proteins.faa"))
            .arg("-d")
            .arg(artifact(out_dir, "_genes.fna"))
            .arg("-o")
            .arg(artifact(out_dir, "_cds.gbk"))
            .arg("-s")
            .arg(artifact(out_dir, "_scores.txt"));
        if self.quiet {
            cmd.arg("-q");
        }
        cmd
    }
}
