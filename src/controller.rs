//! Batch processing of target binaries.
//!
//! [`Controller`] drives one [`AnalyzerConfig`] end to end. It loads each target through a
//! [`Frontend`] and collects diagnostics from an [`AnalysisEngine`]. Each diagnostic is then
//! filtered by the merged rule sets and resolved to original source. Finally a SARIF report
//! is written per binary.
//!
//! A target that fails is logged and skipped; the batch goes on with the next one.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use crate::{
    config::AnalyzerConfig,
    decompilation::{Decompilation, Decompiler, SyntaxUnit},
    diagnostics::Diagnostic,
    report::ResultWriter,
    ruleset::MergedRuleSet,
    symbols::SymbolProvider,
    Error, Result,
};

/// A binary loaded by a [`Frontend`].
pub struct LoadedBinary<D: Decompiler> {
    /// Decompiler over the binary.
    pub decompiler: D,
    /// Debug symbols, if the binary has usable ones.
    pub symbols: Option<Box<dyn SymbolProvider>>,
}

/// Factory of decompiler sessions.
pub trait Frontend {
    /// Decompiler produced for each binary.
    type Decompiler: Decompiler;

    /// Loads and decompiles the binary at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] if `path` is not a managed binary, any other
    /// error if loading fails.
    fn load(&self, path: &Path, config: &AnalyzerConfig)
        -> Result<LoadedBinary<Self::Decompiler>>;
}

/// Runs analyzers over reconstructed source.
pub trait AnalysisEngine {
    /// Diagnostics reported by the analyzer assemblies at `analyzers`.
    ///
    /// # Errors
    /// Returns an error if the analyzers cannot be run.
    fn analyzer_diagnostics(
        &self,
        units: &[SyntaxUnit],
        analyzers: &[PathBuf],
    ) -> Result<Vec<Diagnostic>>;

    /// Diagnostics reported by the compiler itself.
    ///
    /// # Errors
    /// Returns an error if the units cannot be compiled.
    fn compiler_diagnostics(&self, units: &[SyntaxUnit]) -> Result<Vec<Diagnostic>>;
}

/// Outcome of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessSummary {
    /// Number of reports written.
    pub processed: usize,
    /// Targets that failed.
    pub skipped: Vec<PathBuf>,
    /// Wall time of the batch.
    pub elapsed: Duration,
}

/// Processes a batch of binaries.
pub struct Controller<F, E> {
    frontend: F,
    engine: E,
}

impl<F: Frontend, E: AnalysisEngine> Controller<F, E> {
    /// Creates a controller.
    pub fn new(frontend: F, engine: E) -> Self {
        Controller { frontend, engine }
    }

    /// Processes every target of `config`.
    ///
    /// Applies the configured log level to the [`log`] facade first.
    ///
    /// # Errors
    /// Fails before any target is processed if the configuration is invalid, if no
    /// analyzer is found, if the output directory cannot be created or if a rule set
    /// cannot be read. Failures of single targets are recorded in the summary instead.
    pub fn process(&self, config: &AnalyzerConfig) -> Result<ProcessSummary> {
        let started = Instant::now();
        log::set_max_level(config.log_level);

        config.validate()?;
        let analyzers = config.analyzer_paths()?;
        fs::create_dir_all(&config.output)?;
        let rules = MergedRuleSet::from_files(config.rulesets.as_slice())?;

        let mut summary = ProcessSummary::default();
        for target in &config.targets {
            match self.process_target(target, config, &analyzers, &rules) {
                Ok(report) => {
                    log::info!("Report written to {}", report.display());
                    summary.processed += 1;
                }
                Err(Error::NotSupported) => {
                    log::info!("Binary {} is not a .NET assembly.", target.display());
                }
                Err(error) => {
                    log::error!("Failed to process {}: {}", target.display(), error);
                    summary.skipped.push(target.clone());
                }
            }
        }

        summary.elapsed = started.elapsed();
        log::info!("Processing took {:.3}s.", summary.elapsed.as_secs_f64());
        if !summary.skipped.is_empty() {
            let skipped: Vec<String> = summary
                .skipped
                .iter()
                .map(|path| path.display().to_string())
                .collect();
            log::error!("Skipped binaries: {}", skipped.join(", "));
        }

        Ok(summary)
    }

    fn process_target(
        &self,
        target: &Path,
        config: &AnalyzerConfig,
        analyzers: &[PathBuf],
        rules: &MergedRuleSet,
    ) -> Result<PathBuf> {
        log::info!("Processing {}", target.display());

        let loaded = self.frontend.load(target, config)?;
        let mut decompilation = Decompilation::new(
            target,
            loaded.decompiler,
            loaded.symbols,
            config.dump_source.clone(),
        );
        if !decompilation.has_symbols() {
            log::debug!("No debug symbols for {}", target.display());
        }
        decompilation.dump_units()?;

        let units = decompilation.units();
        let mut diagnostics = self.engine.analyzer_diagnostics(units, analyzers)?;
        if config.include_compiler_diagnostics {
            diagnostics.extend(self.engine.compiler_diagnostics(units)?);
        }

        let diagnostics: Vec<Diagnostic> = diagnostics
            .into_iter()
            .filter_map(|diagnostic| rules.apply(diagnostic))
            .collect();
        for diagnostic in &diagnostics {
            log::info!("{}", decompilation.describe_diagnostic(diagnostic));
        }

        let sarif = ResultWriter::process(&mut decompilation, &diagnostics);
        log::info!(
            "{} diagnostic(s) reported for {}",
            diagnostics.len(),
            target.display()
        );
        let report = report_path(&config.output, target)?;
        ResultWriter::write(&sarif, &report, config.pretty_print)?;

        Ok(report)
    }
}

fn report_path(output: &Path, target: &Path) -> Result<PathBuf> {
    let Some(file_name) = target.file_name() else {
        return Err(Error::Config(format!(
            "target has no file name - {}",
            target.display()
        )));
    };

    let mut name = file_name.to_os_string();
    name.push(".sarif");
    Ok(output.join(name))
}
