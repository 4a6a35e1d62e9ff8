use crate::config::RecordMode;
use crate::types::*;
use bio::io::fasta;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

/// File contents from the first `>` line onwards
pub type FastaSource = io::Chain<Cursor<Vec<u8>>, BufReader<File>>;

/// Streaming iterator over the records of one FASTA file
pub type FastaRecords = fasta::Records<BufReader<FastaSource>>;

/// Boxed iterator shared by both record representations
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<fasta::Record, BactoolsError>> + 'a>;

/// rust-bio reports a missing `>` as `Other` and non-UTF-8 text as `InvalidData`;
/// every other kind is a real I/O failure.
fn record_error(path: &Path, err: io::Error) -> BactoolsError {
    if matches!(err.kind(), io::ErrorKind::InvalidData | io::ErrorKind::Other) {
        BactoolsError::ParseError(format!("{}: {err}", path.display()))
    } else {
        BactoolsError::IoError(err)
    }
}

/// Skips blank lines, comments and any other text before the first header.
fn skip_to_first_header<R: BufRead>(mut reader: R) -> io::Result<io::Chain<Cursor<Vec<u8>>, R>> {
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 || line.starts_with(b">") {
            return Ok(Cursor::new(line).chain(reader));
        }
    }
}

fn open_records(path: &Path) -> Result<FastaRecords, BactoolsError> {
    let source = skip_to_first_header(BufReader::new(File::open(path)?))?;
    Ok(fasta::Reader::new(source).records())
}

/// Checks whether `path` holds at least one parseable FASTA record.
///
/// Text before the first `>` line is ignored.
/// Returns `Ok(false)` for empty, non-FASTA or non-UTF-8 files and an
/// [`BactoolsError::IoError`] when the file cannot be opened or read.
pub fn is_fasta<P: AsRef<Path>>(path: P) -> Result<bool, BactoolsError> {
    let mut records = open_records(path.as_ref())?;
    match records.next() {
        Some(Ok(_)) => Ok(true),
        None => Ok(false),
        Some(Err(e)) => match record_error(path.as_ref(), e) {
            BactoolsError::ParseError(_) => Ok(false),
            other => Err(other),
        },
    }
}

/// Precondition form of [`is_fasta`] for public entry points.
pub fn ensure_fasta<P: AsRef<Path>>(path: P) -> Result<(), BactoolsError> {
    let path = path.as_ref();
    if is_fasta(path)? {
        Ok(())
    } else {
        Err(BactoolsError::InvalidFasta(path.to_path_buf()))
    }
}

/// Reads every record of a FASTA file, in file order.
pub fn read_fasta_records<P: AsRef<Path>>(path: P) -> Result<Vec<fasta::Record>, BactoolsError> {
    let path = path.as_ref();
    open_records(path)?
        .map(|r| r.map_err(|e| record_error(path, e)))
        .collect()
}

/// FASTA file handle that re-opens the file on every traversal.
///
/// Holds no file descriptor between traversals, so it can be iterated any
/// number of times and cloned freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyRecords {
    path: PathBuf,
}

impl LazyRecords {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Starts a fresh pass over the file.
    pub fn iter(&self) -> Result<FastaRecords, BactoolsError> {
        open_records(&self.path)
    }

    /// Counts records with a full scan.
    pub fn count(&self) -> Result<usize, BactoolsError> {
        let mut n = 0;
        for record in self.iter()? {
            record.map_err(|e| record_error(&self.path, e))?;
            n += 1;
        }
        Ok(n)
    }
}

/// Loaded records in either representation.
#[derive(Debug, Clone)]
pub enum Records {
    /// Materialized, ordered records
    List(Vec<fasta::Record>),
    /// Re-iterable lazy handle
    Lazy(LazyRecords),
}

impl Records {
    #[must_use]
    pub fn mode(&self) -> RecordMode {
        match self {
            Self::List(_) => RecordMode::List,
            Self::Lazy(_) => RecordMode::Lazy,
        }
    }

    /// Borrow the records when they are materialized.
    #[must_use]
    pub fn as_slice(&self) -> Option<&[fasta::Record]> {
        match self {
            Self::List(records) => Some(records),
            Self::Lazy(_) => None,
        }
    }

    /// Number of records; lazy sets are scanned.
    pub fn count(&self) -> Result<usize, BactoolsError> {
        match self {
            Self::List(records) => Ok(records.len()),
            Self::Lazy(lazy) => lazy.count(),
        }
    }

    /// Iterate records regardless of representation.
    pub fn iter(&self) -> Result<RecordIter<'_>, BactoolsError> {
        match self {
            Self::List(records) => Ok(Box::new(records.iter().cloned().map(Ok))),
            Self::Lazy(lazy) => Ok(Box::new(
                lazy.iter()?.map(move |r| r.map_err(|e| record_error(lazy.path(), e))),
            )),
        }
    }
}

/// Loads a FASTA gene or protein file in the requested representation.
///
/// An empty file gives an empty set. In [`RecordMode::Lazy`] the file is
/// opened once to surface a missing path immediately.
pub fn load_records<P: AsRef<Path>>(path: P, mode: RecordMode) -> Result<Records, BactoolsError> {
    let path = path.as_ref();
    match mode {
        RecordMode::List => Ok(Records::List(read_fasta_records(path)?)),
        RecordMode::Lazy => {
            File::open(path)?;
            Ok(Records::Lazy(LazyRecords::new(path)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_is_fasta_with_records() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "contigs.fasta", b">seq1\nATCG\nGCTA\n>seq2\nTTAA\n");
        assert!(is_fasta(&path).unwrap());
        assert!(ensure_fasta(&path).is_ok());
    }

    #[test]
    fn test_is_fasta_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.fasta", b"");
        assert!(!is_fasta(&path).unwrap());
        match ensure_fasta(&path) {
            Err(BactoolsError::InvalidFasta(p)) => assert_eq!(p, path),
            other => panic!("Expected InvalidFasta, got {other:?}"),
        }
    }

    #[test]
    fn test_is_fasta_plain_text() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "notes.txt", b"this is not a sequence\nATCG\n");
        assert!(!is_fasta(&path).unwrap());
    }

    #[test]
    fn test_is_fasta_binary_data() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "blob.bin", &[0x00, 0xFF, 0x80]);
        assert!(!is_fasta(&path).unwrap());
    }

    #[test]
    fn test_is_fasta_file_not_found() {
        match is_fasta("nonexistent_file.fa") {
            Err(BactoolsError::IoError(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("Expected IoError for missing file, got {other:?}"),
        }
    }

    #[test]
    fn test_read_fasta_records_with_description() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "genes.fna",
            b">seq1 This is a test sequence\nATCG\nGCTA\n>seq2\nGCTA\n",
        );

        let records = read_fasta_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id(), "seq1");
        assert_eq!(records[0].desc(), Some("This is a test sequence"));
        assert_eq!(records[0].seq(), b"ATCGGCTA");
        assert_eq!(records[1].desc(), None);
    }

    #[test]
    fn test_read_fasta_records_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "bad.faa", b">p1 \xFF\xFE\nMKV\n");
        match read_fasta_records(&path) {
            Err(BactoolsError::ParseError(msg)) => {
                assert!(msg.contains("bad.faa"), "message does not name the file: {msg}")
            }
            other => panic!("Expected ParseError, got {other:?}"),
        }
        assert!(!is_fasta(&path).unwrap());
    }

    #[test]
    fn test_text_before_first_header_is_skipped() {
        let dir = TempDir::new().unwrap();
        for (name, content) in [
            ("blank.fasta", &b"\n>seq1\nACGT\n"[..]),
            ("comment.fasta", &b"; comment\n>seq1\nACGT\n"[..]),
            ("preamble.faa", &b"MKV\n\n>seq1\nACGT\n"[..]),
        ] {
            let path = write_file(&dir, name, content);
            assert!(is_fasta(&path).unwrap(), "{name} rejected");

            let records = read_fasta_records(&path).unwrap();
            assert_eq!(records.len(), 1, "{name}");
            assert_eq!(records[0].id(), "seq1");
            assert_eq!(records[0].seq(), b"ACGT");
            assert_eq!(LazyRecords::new(&path).count().unwrap(), 1);
        }
    }

    #[test]
    fn test_load_records_list_and_lazy_agree() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "proteins.faa", b">p1\nMKV*\n>p2\nMST*\n>p3\nMAA*\n");

        let list = load_records(&path, RecordMode::List).unwrap();
        let lazy = load_records(&path, RecordMode::Lazy).unwrap();

        assert_eq!(list.mode(), RecordMode::List);
        assert_eq!(lazy.mode(), RecordMode::Lazy);
        assert_eq!(list.count().unwrap(), 3);
        assert_eq!(lazy.count().unwrap(), 3);
        assert!(lazy.as_slice().is_none());

        let list_ids: Vec<String> = list
            .iter()
            .unwrap()
            .map(|r| r.unwrap().id().to_string())
            .collect();
        let lazy_ids: Vec<String> = lazy
            .iter()
            .unwrap()
            .map(|r| r.unwrap().id().to_string())
            .collect();
        assert_eq!(list_ids, vec!["p1", "p2", "p3"]);
        assert_eq!(list_ids, lazy_ids);
    }

    #[test]
    fn test_lazy_records_reiterable() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "genes.fna", b">g1\nATG\n>g2\nTTG\n");
        let lazy = LazyRecords::new(&path);

        assert_eq!(lazy.count().unwrap(), 2);
        assert_eq!(lazy.count().unwrap(), 2);

        // A rewrite between traversals is picked up by the next pass.
        fs::write(&path, b">g1\nATG\n").unwrap();
        assert_eq!(lazy.iter().unwrap().count(), 1);
    }

    #[test]
    fn test_load_records_lazy_missing_file() {
        assert!(matches!(
            load_records("missing.faa", RecordMode::Lazy),
            Err(BactoolsError::IoError(_))
        ));
    }

    #[test]
    fn test_load_records_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "none_genes.fna", b"");
        let records = load_records(&path, RecordMode::List).unwrap();
        assert_eq!(records.count().unwrap(), 0);
    }
}
