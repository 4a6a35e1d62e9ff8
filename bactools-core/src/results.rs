use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bio::bio_types::strand::Strand;
use bio::io::fasta;
use serde::{Serialize, Serializer};

use crate::config::RecordMode;
use crate::sequence::{Records, load_records};
use crate::types::{BactoolsError, SetKind, StartType, Tool};

/// Gene or protein records produced by one tool.
///
/// # Fields
///
/// - `tool`: predictor that produced the file
/// - `kind`: genes or proteins
/// - `origin`: file the records were read from
/// - `records`: materialized or lazy records
///
/// # Examples
///
/// ```rust,no_run
/// use bactools_core::config::RecordMode;
/// use bactools_core::results::RecordSet;
/// use bactools_core::types::{SetKind, Tool};
///
/// let genes = RecordSet::load(
///     Tool::Prodigal,
///     SetKind::Gene,
///     "x_prodigal/x_prodigal_genes.fna",
///     RecordMode::List,
/// )?;
/// println!("{} genes from {}", genes.count()?, genes.origin.display());
/// # Ok::<(), bactools_core::types::BactoolsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RecordSet {
    pub tool: Tool,
    pub kind: SetKind,
    pub origin: PathBuf,
    pub records: Records,
}

impl RecordSet {
    /// Reads `origin` in the requested representation.
    pub fn load<P: AsRef<Path>>(
        tool: Tool,
        kind: SetKind,
        origin: P,
        mode: RecordMode,
    ) -> Result<Self, BactoolsError> {
        let origin = origin.as_ref();
        Ok(Self {
            tool,
            kind,
            origin: origin.to_path_buf(),
            records: load_records(origin, mode)?,
        })
    }

    /// Number of records; lazy sets are scanned.
    pub fn count(&self) -> Result<usize, BactoolsError> {
        self.records.count()
    }
}

/// Partial-gene flags from Prodigal's `partial=` field.
///
/// `left` is set when the gene runs off the left edge of the contig,
/// `right` when it runs off the right edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Partial {
    pub left: bool,
    pub right: bool,
}

impl fmt::Display for Partial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", u8::from(self.left), u8::from(self.right))
    }
}

impl std::str::FromStr for Partial {
    type Err = BactoolsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let flag = |c: u8| match c {
            b'0' => Ok(false),
            b'1' => Ok(true),
            _ => Err(BactoolsError::ParseError(format!("invalid partial flag '{s}'"))),
        };
        match s.as_bytes() {
            [l, r] => Ok(Self {
                left: flag(*l)?,
                right: flag(*r)?,
            }),
            _ => Err(BactoolsError::ParseError(format!("invalid partial flag '{s}'"))),
        }
    }
}

fn serialize_display<T: fmt::Display, S: Serializer>(value: &T, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}

fn serialize_strand<S: Serializer>(strand: &Strand, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(strand.strand_symbol())
}

/// One row of the Prodigal gene table, parsed from a gene record header.
///
/// Prodigal writes headers of the form
///
/// ```text
/// >contig_1_1 # 2 # 1021 # 1 # ID=1_1;partial=10;start_type=Edge;rbs_motif=None;rbs_spacer=None;gc_cont=0.540
/// ```
///
/// where the numeric fields are the 1-based start, end and strand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProdigalGene {
    pub id: String,
    pub start: u64,
    pub end: u64,
    #[serde(serialize_with = "serialize_strand")]
    pub strand: Strand,
    pub gene_id: String,
    #[serde(serialize_with = "serialize_display")]
    pub partial: Partial,
    #[serde(serialize_with = "serialize_display")]
    pub start_type: StartType,
    pub rbs_motif: Option<String>,
    pub rbs_spacer: Option<String>,
    pub gc_cont: Option<f64>,
}

fn none_as_absent(value: &str) -> Option<String> {
    match value {
        "None" | "" => None,
        v => Some(v.to_string()),
    }
}

impl ProdigalGene {
    /// Splits a Prodigal header into its fields.
    pub fn from_record(record: &fasta::Record) -> Result<Self, BactoolsError> {
        let bad = |why: &str| {
            BactoolsError::ParseError(format!(
                "record {}: {why} in Prodigal header '{}'",
                record.id(),
                record.desc().unwrap_or_default()
            ))
        };

        let desc = record.desc().ok_or_else(|| bad("missing description"))?;
        let fields: Vec<&str> = desc
            .split('#')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();
        let [start, end, strand, attributes] = fields[..] else {
            return Err(bad("expected 4 '#'-separated fields"));
        };

        let start = start.parse::<u64>().map_err(|_| bad("invalid start"))?;
        let end = end.parse::<u64>().map_err(|_| bad("invalid end"))?;
        let strand = match strand {
            "1" => Strand::Forward,
            "-1" => Strand::Reverse,
            _ => return Err(bad("invalid strand")),
        };

        let mut gene = Self {
            id: record.id().to_string(),
            start,
            end,
            strand,
            gene_id: String::new(),
            partial: Partial::default(),
            start_type: StartType::Unknown,
            rbs_motif: None,
            rbs_spacer: None,
            gc_cont: None,
        };
        let mut seen_partial = false;
        for pair in attributes.split(';').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| bad("malformed attribute"))?;
            match key {
                "ID" => gene.gene_id = value.to_string(),
                "partial" => {
                    gene.partial = value.parse()?;
                    seen_partial = true;
                }
                "start_type" => gene.start_type = StartType::from(value),
                "rbs_motif" => gene.rbs_motif = none_as_absent(value),
                "rbs_spacer" => gene.rbs_spacer = none_as_absent(value),
                "gc_cont" => {
                    gene.gc_cont = Some(value.parse().map_err(|_| bad("invalid gc_cont"))?)
                }
                _ => {}
            }
        }
        if gene.gene_id.is_empty() || !seen_partial {
            return Err(bad("missing ID or partial attribute"));
        }
        Ok(gene)
    }

    /// Gene length in nucleotides, stop codon included.
    #[must_use]
    pub fn length(&self) -> u64 {
        self.end.saturating_sub(self.start) + 1
    }
}

/// Parses every record of a Prodigal gene set into table rows.
pub fn gene_table(records: &Records) -> Result<Vec<ProdigalGene>, BactoolsError> {
    records
        .iter()?
        .map(|record| ProdigalGene::from_record(&record?))
        .collect()
}

/// Writes rows as tab-separated values with a header line.
pub fn write_gene_table<W: Write>(writer: W, rows: &[ProdigalGene]) -> Result<(), BactoolsError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);
    for row in rows {
        wtr.serialize(row).map_err(io::Error::from)?;
    }
    wtr.flush()?;
    Ok(())
}

const SIZE_UNITS: [&str; 4] = ["kB", "MB", "GB", "TB"];

/// Formats a byte count with binary (1024) steps.
///
/// Below 1024 the exact count is printed in bytes; above, the value is
/// rounded to two decimals and keeps at least one fractional digit.
#[must_use]
pub fn human_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < SIZE_UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    let mut text = format!("{rounded:.2}");
    if text.ends_with('0') {
        text.pop();
    }
    format!("{text} {}", SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prodigal_record(id: &str, desc: &str) -> fasta::Record {
        fasta::Record::with_attrs(id, Some(desc), b"ATGAAATAA")
    }

    #[test]
    fn test_human_size_table() {
        let rendered = [
            0u64,
            1023,
            1024,
            1536,
            2048,
            1_000_000,
            123_456_789,
            1 << 30,
            5 << 40,
            1 << 50,
        ]
        .iter()
        .map(|&b| format!("{b} -> {}", human_size(b)))
        .collect::<Vec<_>>()
        .join("\n");

        insta::assert_snapshot!(rendered, @r"
        0 -> 0 B
        1023 -> 1023 B
        1024 -> 1.0 kB
        1536 -> 1.5 kB
        2048 -> 2.0 kB
        1000000 -> 976.56 kB
        123456789 -> 117.74 MB
        1073741824 -> 1.0 GB
        5497558138880 -> 5.0 TB
        1125899906842624 -> 1024.0 TB
        ");
    }

    #[test]
    fn test_prodigal_gene_edge_start() {
        let record = prodigal_record(
            "contig_1_1",
            "# 2 # 1021 # 1 # ID=1_1;partial=10;start_type=Edge;rbs_motif=None;rbs_spacer=None;gc_cont=0.540",
        );
        let gene = ProdigalGene::from_record(&record).unwrap();
        assert_eq!(gene.id, "contig_1_1");
        assert_eq!(gene.start, 2);
        assert_eq!(gene.end, 1021);
        assert_eq!(gene.length(), 1020);
        assert_eq!(gene.strand, Strand::Forward);
        assert_eq!(gene.gene_id, "1_1");
        assert_eq!(
            gene.partial,
            Partial {
                left: true,
                right: false
            }
        );
        assert_eq!(gene.start_type, StartType::Edge);
        assert_eq!(gene.rbs_motif, None);
        assert_eq!(gene.rbs_spacer, None);
        assert_eq!(gene.gc_cont, Some(0.54));
    }

    #[test]
    fn test_prodigal_gene_reverse_with_rbs() {
        let record = prodigal_record(
            "NODE_3_length_5000_cov_12.5_7",
            "# 3312 # 4115 # -1 # ID=3_7;partial=00;start_type=GTG;rbs_motif=GGA/GAG/AGG;rbs_spacer=5-10bp;gc_cont=0.612",
        );
        let gene = ProdigalGene::from_record(&record).unwrap();
        assert_eq!(gene.strand, Strand::Reverse);
        assert_eq!(gene.start_type, StartType::Gtg);
        assert_eq!(gene.rbs_motif.as_deref(), Some("GGA/GAG/AGG"));
        assert_eq!(gene.rbs_spacer.as_deref(), Some("5-10bp"));
        assert_eq!(gene.partial.to_string(), "00");
    }

    #[test]
    fn test_prodigal_gene_malformed_headers() {
        for desc in [
            "no hashes here",
            "# 2 # 1021 # 1",
            "# x # 1021 # 1 # ID=1_1;partial=00",
            "# 2 # 1021 # 0 # ID=1_1;partial=00",
            "# 2 # 1021 # 1 # ID=1_1;partial=2",
            "# 2 # 1021 # 1 # partial=00",
            "# 2 # 1021 # 1 # ID=1_1;partial=00;gc_cont=high",
        ] {
            let record = prodigal_record("g", desc);
            assert!(
                matches!(
                    ProdigalGene::from_record(&record),
                    Err(BactoolsError::ParseError(_))
                ),
                "accepted {desc:?}"
            );
        }
        let bare = fasta::Record::with_attrs("g", None, b"ATG");
        assert!(ProdigalGene::from_record(&bare).is_err());
    }

    #[test]
    fn test_write_gene_table_tsv() {
        let records = Records::List(vec![
            prodigal_record(
                "contig_1_1",
                "# 2 # 1021 # 1 # ID=1_1;partial=10;start_type=Edge;rbs_motif=None;rbs_spacer=None;gc_cont=0.540",
            ),
            prodigal_record(
                "contig_1_2",
                "# 1100 # 1400 # -1 # ID=1_2;partial=00;start_type=ATG;rbs_motif=AGGAG;rbs_spacer=5-10bp;gc_cont=0.498",
            ),
        ]);
        let rows = gene_table(&records).unwrap();

        let mut buffer = Vec::new();
        write_gene_table(&mut buffer, &rows).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines,
            vec![
                "id\tstart\tend\tstrand\tgene_id\tpartial\tstart_type\trbs_motif\trbs_spacer\tgc_cont",
                "contig_1_1\t2\t1021\t+\t1_1\t10\tEdge\t\t\t0.54",
                "contig_1_2\t1100\t1400\t-\t1_2\t00\tATG\tAGGAG\t5-10bp\t0.498",
            ]
        );
    }

    #[test]
    fn test_record_set_load_counts() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("x_genes.fna");
        std::fs::write(&path, ">g1\nATG\n>g2\nATG\n>g3\nATG\n").unwrap();

        for mode in [RecordMode::List, RecordMode::Lazy] {
            let set = RecordSet::load(Tool::Prodigal, SetKind::Gene, &path, mode).unwrap();
            assert_eq!(set.origin, path);
            assert_eq!(set.count().unwrap(), 3);
            assert_eq!(set.records.mode(), mode);
        }
    }
}
