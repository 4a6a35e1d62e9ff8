use std::env;

/// How loaded FASTA records are held in memory.
///
/// # Examples
///
/// ```rust
/// use bactools_core::config::{BactoolsConfig, RecordMode};
///
/// let config = BactoolsConfig {
///     record_mode: RecordMode::Lazy,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordMode {
    /// Read every record into a `Vec` up front.
    #[default]
    List,

    /// Keep only the path and re-open the file on each traversal.
    ///
    /// Suited to large gene sets that are only scanned once or twice.
    Lazy,
}

/// Configuration settings for an [`Assembly`](crate::assembly::Assembly)
/// and the external tools it drives.
///
/// Nothing here is process-wide: each assembly carries its own copy.
///
/// # Examples
///
/// ## Default configuration
///
/// ```rust
/// use bactools_core::config::BactoolsConfig;
///
/// let config = BactoolsConfig::default();
/// assert_eq!(config.prodigal_binary, "prodigal");
/// ```
///
/// ## Prokka with passthrough options
///
/// ```rust
/// use bactools_core::config::BactoolsConfig;
///
/// let config = BactoolsConfig {
///     prokka_options: vec![
///         ("kingdom".to_string(), Some("Bacteria".to_string())),
///         ("compliant".to_string(), None),
///     ],
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct BactoolsConfig {
    /// Prodigal executable, looked up on `PATH` unless it contains a separator.
    ///
    /// **Default**: `"prodigal"`
    pub prodigal_binary: String,

    /// Prokka executable.
    ///
    /// **Default**: `"prokka"`
    pub prokka_binary: String,

    /// seqstats executable used to fill assembly metadata.
    ///
    /// **Default**: `"seqstats"`
    pub seqstats_binary: String,

    /// Suppress the external tools' own progress output.
    ///
    /// Passes `-q` to Prodigal and `--quiet` to Prokka.
    ///
    /// **Default**: `true`
    pub quiet: bool,

    /// Load gene and protein sets right after a successful tool run.
    ///
    /// **Default**: `true`
    pub autoload_sets: bool,

    /// Representation used when sets are loaded automatically.
    ///
    /// **Default**: [`RecordMode::List`]
    pub record_mode: RecordMode,

    /// Extra Prokka options, rendered as `--key value` or `--key` when the
    /// value is `None`.
    ///
    /// **Default**: empty
    pub prokka_options: Vec<(String, Option<String>)>,
}

impl Default for BactoolsConfig {
    fn default() -> Self {
        Self {
            prodigal_binary: "prodigal".to_string(),
            prokka_binary: "prokka".to_string(),
            seqstats_binary: "seqstats".to_string(),
            quiet: true,
            autoload_sets: true,
            record_mode: RecordMode::List,
            prokka_options: Vec::new(),
        }
    }
}

/// Truth value of a boolean environment variable.
///
/// `0`, `false`, `no` and the empty string are false; anything else is true.
#[must_use]
pub fn env_flag(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "")
}

impl BactoolsConfig {
    /// Defaults overridden by `BACTOOLS_PRODIGAL`, `BACTOOLS_PROKKA`,
    /// `BACTOOLS_SEQSTATS` and `BACTOOLS_QUIET` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with variables read through `lookup`.
    ///
    /// `BACTOOLS_QUIET` of `0`, `false`, `no` or empty turns quiet off.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut config = Self::default();
        if let Some(binary) = lookup("BACTOOLS_PRODIGAL") {
            config.prodigal_binary = binary;
        }
        if let Some(binary) = lookup("BACTOOLS_PROKKA") {
            config.prokka_binary = binary;
        }
        if let Some(binary) = lookup("BACTOOLS_SEQSTATS") {
            config.seqstats_binary = binary;
        }
        if let Some(quiet) = lookup("BACTOOLS_QUIET") {
            config.quiet = env_flag(&quiet);
        }
        config
    }
}
