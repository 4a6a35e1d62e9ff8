use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{info, warn};

use crate::config::{BactoolsConfig, RecordMode};
use crate::output::{PredictionOutput, classify_output_dir};
use crate::results::{ProdigalGene, RecordSet, gene_table, human_size};
use crate::sequence::{LazyRecords, Records, ensure_fasta};
use crate::tools::seqstats::Metadata;
use crate::tools::{self, ExternalTool, Prodigal, Prokka, Seqstats};
use crate::types::{BactoolsError, OutputRole, SetKind, Tool};

/// Lifecycle phase of an [`Assembly`], derived from what it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing loaded yet
    Uninitialized,
    /// A validated contigs file is set
    ContigsLoaded,
    /// At least one tool output is attached
    PredictionsLoaded,
}

/// Absolute path to a FASTA file holding at least one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContigsFile {
    path: PathBuf,
}

impl ContigsFile {
    /// Validates `path` and stores it as an absolute path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BactoolsError> {
        let path = std::path::absolute(path.as_ref())?;
        ensure_fasta(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Everything one tool contributed to an assembly.
#[derive(Debug, Clone)]
pub struct ToolRun {
    pub output: PredictionOutput,
    pub geneset: Option<RecordSet>,
    pub protset: Option<RecordSet>,
}

impl ToolRun {
    fn new(output: PredictionOutput) -> Self {
        Self {
            output,
            geneset: None,
            protset: None,
        }
    }

    fn set(&self, kind: SetKind) -> Option<&RecordSet> {
        match kind {
            SetKind::Gene => self.geneset.as_ref(),
            SetKind::Protein => self.protset.as_ref(),
        }
    }

    fn set_mut(&mut self, kind: SetKind) -> &mut Option<RecordSet> {
        match kind {
            SetKind::Gene => &mut self.geneset,
            SetKind::Protein => &mut self.protset,
        }
    }

    /// Loads one set from the output, replacing the previous one only on success.
    fn load(&mut self, kind: SetKind, mode: RecordMode) -> Result<&RecordSet, BactoolsError> {
        let tool = self.output.tool;
        let origin = self.output.require(kind.role())?.to_path_buf();
        let set = RecordSet::load(tool, kind, origin, mode)?;

        match set.records.as_slice() {
            Some(records) => info!(
                "Loaded {kind} set from {tool} data. It has {} records.",
                records.len()
            ),
            None => info!("Loaded {kind} set from {tool} data."),
        }
        Ok(self.set_mut(kind).insert(set))
    }
}

/// A bacterial assembly and the gene predictions made on it.
///
/// Holds one contigs file, at most one [`ToolRun`] per [`Tool`] and optional
/// seqstats metadata. Operations that need contigs check for them first and
/// fail with [`BactoolsError::NoContigs`]; reads of tool data return
/// `Option`/`Result` rather than panicking on absent keys.
///
/// # Examples
///
/// ```rust,no_run
/// use bactools_core::assembly::Assembly;
/// use bactools_core::config::BactoolsConfig;
/// use bactools_core::types::{SetKind, Tool};
///
/// let mut assembly = Assembly::from_contigs("contigs.fasta", BactoolsConfig::default())?;
/// assembly.run_prodigal()?;
/// println!("{} genes", assembly.sequence_count(Tool::Prodigal, SetKind::Gene)?);
/// # Ok::<(), bactools_core::types::BactoolsError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    config: BactoolsConfig,
    contigs: Option<ContigsFile>,
    prodigal: Option<ToolRun>,
    prokka: Option<ToolRun>,
    metadata: Option<Metadata>,
}

impl Assembly {
    /// An empty assembly; call [`load_contigs`](Self::load_contigs) next.
    pub fn new(config: BactoolsConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// An assembly with `contigs` already validated and loaded.
    pub fn from_contigs<P: AsRef<Path>>(
        contigs: P,
        config: BactoolsConfig,
    ) -> Result<Self, BactoolsError> {
        let mut assembly = Self::new(config);
        assembly.load_contigs(contigs)?;
        Ok(assembly)
    }

    pub fn config(&self) -> &BactoolsConfig {
        &self.config
    }

    pub fn contigs(&self) -> Option<&ContigsFile> {
        self.contigs.as_ref()
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn phase(&self) -> Phase {
        if self.prodigal.is_some() || self.prokka.is_some() {
            Phase::PredictionsLoaded
        } else if self.contigs.is_some() {
            Phase::ContigsLoaded
        } else {
            Phase::Uninitialized
        }
    }

    /// Sets the contigs file after validating it.
    ///
    /// Loading a different file drops predictions and metadata that belonged
    /// to the previous one.
    pub fn load_contigs<P: AsRef<Path>>(&mut self, contigs: P) -> Result<(), BactoolsError> {
        let contigs = ContigsFile::open(contigs)?;
        if self.contigs.as_ref().is_some_and(|c| c != &contigs) {
            info!("Contigs changed, dropping previous predictions and metadata");
            self.prodigal = None;
            self.prokka = None;
            self.metadata = None;
        }
        info!("Contigs file set as {}", contigs.path().display());
        self.contigs = Some(contigs);
        Ok(())
    }

    /// Precondition for every operation that needs contigs.
    pub fn valid_contigs(&self) -> Result<&ContigsFile, BactoolsError> {
        self.contigs.as_ref().ok_or(BactoolsError::NoContigs)
    }

    fn run(&self, tool: Tool) -> Option<&ToolRun> {
        match tool {
            Tool::Prodigal => self.prodigal.as_ref(),
            Tool::Prokka => self.prokka.as_ref(),
        }
    }

    fn run_mut(&mut self, tool: Tool) -> Result<&mut ToolRun, BactoolsError> {
        match tool {
            Tool::Prodigal => self.prodigal.as_mut(),
            Tool::Prokka => self.prokka.as_mut(),
        }
        .ok_or(BactoolsError::NoOutput(tool))
    }

    pub fn output(&self, tool: Tool) -> Option<&PredictionOutput> {
        self.run(tool).map(|r| &r.output)
    }

    pub fn geneset(&self, tool: Tool) -> Option<&RecordSet> {
        self.run(tool).and_then(|r| r.geneset.as_ref())
    }

    pub fn protset(&self, tool: Tool) -> Option<&RecordSet> {
        self.run(tool).and_then(|r| r.protset.as_ref())
    }

    /// Runs Prodigal next to the contigs file.
    pub fn run_prodigal(&mut self) -> Result<&PredictionOutput, BactoolsError> {
        let prodigal = Prodigal::from_config(&self.config);
        self.run_with(&prodigal, None)
    }

    /// Runs Prokka next to the contigs file.
    pub fn run_prokka(&mut self) -> Result<&PredictionOutput, BactoolsError> {
        let prokka = Prokka::from_config(&self.config);
        self.run_with(&prokka, None)
    }

    /// Runs `tool` on the contigs, attaches its output and, when
    /// `autoload_sets` is on, loads its gene and protein sets.
    ///
    /// `output` is the parent of the per-run directory; `None` places it
    /// beside the contigs file. The assembly only changes once the run and
    /// the set loading have both succeeded.
    pub fn run_with(
        &mut self,
        tool: &dyn ExternalTool,
        output: Option<&Path>,
    ) -> Result<&PredictionOutput, BactoolsError> {
        let contigs = self.valid_contigs()?.path().to_path_buf();
        let start = Instant::now();

        let out_dir = tools::run_tool(tool, &contigs, output)?;
        let mut run = ToolRun::new(classify(tool.tool(), &out_dir)?);

        if self.config.autoload_sets {
            let mode = self.config.record_mode;
            for kind in [SetKind::Gene, SetKind::Protein] {
                match run.load(kind, mode) {
                    Ok(_) => {}
                    Err(e @ BactoolsError::MissingRole { .. }) => {
                        warn!("{e} in {}, skipping {kind} set", out_dir.display())
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        info!("{} took {:.3?}", tool.tool(), start.elapsed());
        Ok(&self.slot_mut(tool.tool()).insert(run).output)
    }

    fn slot_mut(&mut self, tool: Tool) -> &mut Option<ToolRun> {
        match tool {
            Tool::Prodigal => &mut self.prodigal,
            Tool::Prokka => &mut self.prokka,
        }
    }

    /// Classifies an existing output directory and attaches it for `tool`.
    ///
    /// Replaces any earlier output and sets for that tool.
    pub fn attach_output<P: AsRef<Path>>(
        &mut self,
        tool: Tool,
        dir: P,
    ) -> Result<&PredictionOutput, BactoolsError> {
        let output = classify(tool, dir.as_ref())?;
        Ok(&self.slot_mut(tool).insert(ToolRun::new(output)).output)
    }

    /// Attaches `<contigs stem>_<tool>` from beside the contigs file.
    pub fn attach_default_output(&mut self, tool: Tool) -> Result<&PredictionOutput, BactoolsError> {
        let contigs = self.valid_contigs()?.path().to_path_buf();
        let dir = tools::default_output_dir(tool, &contigs, None)?;
        if !dir.is_dir() {
            return Err(BactoolsError::MissingDirectory(dir));
        }
        self.attach_output(tool, dir)
    }

    fn load_set(
        &mut self,
        tool: Tool,
        kind: SetKind,
        mode: RecordMode,
    ) -> Result<&RecordSet, BactoolsError> {
        self.run_mut(tool)?.load(kind, mode)
    }

    /// Loads (or reloads) `tool`'s gene set from its attached output.
    ///
    /// # Errors
    ///
    /// - [`BactoolsError::NoOutput`] if nothing is attached for `tool`
    /// - [`BactoolsError::MissingRole`] if the output has no genes file
    pub fn load_geneset(&mut self, tool: Tool, mode: RecordMode) -> Result<&RecordSet, BactoolsError> {
        self.load_set(tool, SetKind::Gene, mode)
    }

    /// Loads (or reloads) `tool`'s protein set from its attached output.
    pub fn load_protset(&mut self, tool: Tool, mode: RecordMode) -> Result<&RecordSet, BactoolsError> {
        self.load_set(tool, SetKind::Protein, mode)
    }

    /// Counts records of one set with a full scan.
    ///
    /// Uses the loaded set when there is one, otherwise reads the file
    /// recorded in the attached output.
    pub fn sequence_count(&self, tool: Tool, kind: SetKind) -> Result<usize, BactoolsError> {
        let run = self.run(tool).ok_or(BactoolsError::NoOutput(tool))?;
        match run.set(kind) {
            Some(set) => set.count(),
            None => LazyRecords::new(run.output.require(kind.role())?).count(),
        }
    }

    /// Human-readable size of one of `tool`'s output files.
    pub fn file_size(&self, tool: Tool, role: OutputRole) -> Result<String, BactoolsError> {
        let output = self.output(tool).ok_or(BactoolsError::NoOutput(tool))?;
        let bytes = fs::metadata(output.require(role)?)?.len();
        Ok(human_size(bytes))
    }

    /// Prodigal genes as table rows, one per record.
    pub fn prodigal_gene_table(&self) -> Result<Vec<ProdigalGene>, BactoolsError> {
        let run = self
            .run(Tool::Prodigal)
            .ok_or(BactoolsError::NoOutput(Tool::Prodigal))?;
        match &run.geneset {
            Some(set) => gene_table(&set.records),
            None => {
                let genes = run.output.require(OutputRole::Genes)?;
                gene_table(&Records::Lazy(LazyRecords::new(genes)))
            }
        }
    }

    /// Runs seqstats on the contigs and stores the result as metadata.
    pub fn run_seqstats(&mut self) -> Result<&Metadata, BactoolsError> {
        let contigs = self.valid_contigs()?.path().to_path_buf();
        let metadata = Seqstats::from_config(&self.config).run(&contigs)?;
        Ok(self.metadata.insert(metadata))
    }
}

fn classify(tool: Tool, dir: &Path) -> Result<PredictionOutput, BactoolsError> {
    let output = classify_output_dir(tool, std::path::absolute(dir)?)?;
    info!(
        "{tool} folder set as {} ({} files recognized)",
        output.dir.display(),
        output.len()
    );
    Ok(output)
}

/// Loads `contigs` and runs Prodigal on it.
pub fn load_from_fasta<P: AsRef<Path>>(
    contigs: P,
    config: BactoolsConfig,
) -> Result<Assembly, BactoolsError> {
    let contigs = contigs.as_ref();
    ensure_fasta(contigs)?;
    info!("Loading contigs file from {}", contigs.display());
    let mut assembly = Assembly::from_contigs(contigs, config)?;
    assembly.run_prodigal()?;
    Ok(assembly)
}
