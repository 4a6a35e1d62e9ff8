use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use log::warn;

use crate::config::BactoolsConfig;
use crate::tools::execute;
use crate::types::BactoolsError;

/// Assembly summary statistics keyed by seqstats label (`"Total seq"`, `"N 50"`, ...).
pub type Metadata = BTreeMap<String, f64>;

/// seqstats invocation over a contigs file.
#[derive(Debug, Clone)]
pub struct Seqstats {
    pub binary: String,
}

impl Seqstats {
    pub fn from_config(config: &BactoolsConfig) -> Self {
        Self {
            binary: config.seqstats_binary.clone(),
        }
    }

    /// Runs seqstats and parses its report.
    pub fn run(&self, contigs: &Path) -> Result<Metadata, BactoolsError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(contigs);
        let output = execute(&mut cmd, "seqstats")?;
        Ok(parse_seqstats(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parses `key: value[unit]` lines into numbers.
///
/// A trailing unit such as `bp` is dropped. Lines that do not fit the
/// pattern are logged and skipped.
pub fn parse_seqstats(report: &str) -> Metadata {
    let mut metadata = Metadata::new();
    for line in report.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            warn!("Skipping seqstats line without a key: {line:?}");
            continue;
        };
        let number = value
            .trim()
            .trim_end_matches(|c: char| c.is_ascii_alphabetic())
            .trim();
        match number.parse::<f64>() {
            Ok(v) => {
                metadata.insert(key.trim().to_string(), v);
            }
            Err(e) => warn!("Skipping seqstats line {line:?}: {e}"),
        }
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "Total n:\t2\n\
                          Total seq:\t4641652 bp\n\
                          Avg. seq:\t2320826.00 bp\n\
                          Median seq:\t2320826.00 bp\n\
                          N 50:\t4600000 bp\n\
                          Min seq:\t41652 bp\n\
                          Max seq:\t4600000 bp\n";

    #[test]
    fn test_parse_seqstats_report() {
        let metadata = parse_seqstats(REPORT);
        assert_eq!(metadata.len(), 7);
        assert_eq!(metadata["Total n"], 2.0);
        assert_eq!(metadata["Total seq"], 4_641_652.0);
        assert_eq!(metadata["Avg. seq"], 2_320_826.0);
        assert_eq!(metadata["N 50"], 4_600_000.0);
    }

    #[test]
    fn test_parse_seqstats_skips_bad_lines() {
        let metadata = parse_seqstats("Total n:\t3\nno colon here\nGC:\tunknown\n\nMax seq:\t12bp\n");
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata["Total n"], 3.0);
        assert_eq!(metadata["Max seq"], 12.0);
        assert!(!metadata.contains_key("GC"));
    }

    #[test]
    fn test_parse_seqstats_empty() {
        assert!(parse_seqstats("").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_seqstats_run_with_fake_binary() {
        let dir = tempfile::TempDir::new().unwrap();
        let bin = crate::tools::testing::fake_binary(
            dir.path(),
            "seqstats",
            r#"printf 'Total n:\t1\nTotal seq:\t9 bp\n'"#,
        );
        let contigs = dir.path().join("x.fasta");
        std::fs::write(&contigs, ">c1\nATGAAATAA\n").unwrap();

        let seqstats = Seqstats {
            binary: bin.to_string_lossy().into_owned(),
        };
        let metadata = seqstats.run(&contigs).unwrap();
        assert_eq!(metadata["Total seq"], 9.0);
    }
}
