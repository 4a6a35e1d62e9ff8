//! FASTA validation and record loading.
//!
//! Parsing is delegated to rust-bio's [`bio::io::fasta`] reader; this module
//! only decides how records are held and how failures are reported.
//!
//! ## Representations
//!
//! - [`RecordMode::List`](crate::config::RecordMode::List): every record read
//!   into memory at load time
//! - [`RecordMode::Lazy`](crate::config::RecordMode::Lazy): a [`LazyRecords`]
//!   handle that re-opens the file on each traversal
//!
//! ## Examples
//!
//! ### Validate a contigs file
//!
//! ```rust,no_run
//! use bactools_core::sequence::is_fasta;
//!
//! if !is_fasta("contigs.fasta")? {
//!     eprintln!("not a FASTA file");
//! }
//! # Ok::<(), bactools_core::types::BactoolsError>(())
//! ```
//!
//! ### Load a protein file lazily
//!
//! ```rust,no_run
//! use bactools_core::config::RecordMode;
//! use bactools_core::sequence::load_records;
//!
//! let proteins = load_records("x_prodigal/x_prodigal_proteins.faa", RecordMode::Lazy)?;
//! for record in proteins.iter()? {
//!     let record = record?;
//!     println!("{}\t{}", record.id(), record.seq().len());
//! }
//! # Ok::<(), bactools_core::types::BactoolsError>(())
//! ```

pub mod io;

pub use io::*;
