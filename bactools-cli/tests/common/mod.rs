#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONTIGS: &str = ">contig_1\nATGAAACGCATTAGCACCACCATTACCACCACCATCACCATTACCACAGGTAACGG\n>contig_2\nGCGGATAACGCCATCGGTTAATTGCATAGCAAAGCTTCGCG\n";

/// Writes an executable shell script named `name` into `dir`.
#[cfg(unix)]
pub fn fake_binary(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// A Prodigal stand-in that writes two genes per run into the `-a/-d/-o/-s` paths.
#[cfg(unix)]
pub fn fake_prodigal(dir: &Path) -> PathBuf {
    fake_binary(
        dir,
        "prodigal",
        r#"while [ $# -gt 0 ]; do
  case "$1" in
    -a) faa="$2"; shift 2 ;;
    -d) fna="$2"; shift 2 ;;
    -o) gbk="$2"; shift 2 ;;
    -s) scores="$2"; shift 2 ;;
    *) shift ;;
  esac
done
printf '>contig_1_1 # 1 # 57 # 1 # ID=1_1;partial=01;start_type=ATG;rbs_motif=None;rbs_spacer=None;gc_cont=0.421\nATGAAACGC\n>contig_2_1 # 3 # 41 # -1 # ID=2_1;partial=10;start_type=Edge;rbs_motif=None;rbs_spacer=None;gc_cont=0.487\nGCGGATAAC\n' > "$fna"
printf '>contig_1_1\nMKR\n>contig_2_1\nADN\n' > "$faa"
printf 'DEFINITION  seqnum=1;seqlen=57;\n' > "$gbk"
printf '# Sequence Data: seqnum=1;seqlen=57;\n' > "$scores""#,
    )
}

/// Writes `content` to `dir/name` and returns the path.
pub fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// The bactools binary with `prodigal` resolved to `prodigal_bin`.
pub fn bactools(prodigal_bin: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bactools").unwrap();
    cmd.env("BACTOOLS_PRODIGAL", prodigal_bin)
        .env_remove("BACTOOLS_QUIET");
    cmd
}

/// Last stdout line with the elapsed time masked.
pub fn summary_line(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    let last = text.lines().last().unwrap_or_default();
    match last.split_once(" Took ") {
        Some((head, _)) => format!("{head} Took <elapsed>."),
        None => last.to_string(),
    }
}

/// Sorted file names inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
