//! Configuration of an analysis run.
//!
//! [`AnalyzerConfig`] describes one batch: the binaries to analyze, the rule sets filtering
//! the results, where the analyzer plugins live and where reports go.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::LevelFilter;

use crate::{Error, Result};

/// Directory below an analyzer package that holds the C# analyzer assemblies.
const ANALYZER_SUBDIRECTORY: [&str; 3] = ["analyzers", "dotnet", "cs"];

/// Configuration of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Binaries to analyze.
    pub targets: Vec<PathBuf>,

    /// Rule set files filtering the reported diagnostics, later files override earlier ones.
    pub rulesets: Vec<PathBuf>,

    /// Analyzer assemblies to load.
    pub analyzers: Vec<PathBuf>,

    /// Analyzer package directories; assemblies are looked up in `analyzers/dotnet/cs`.
    pub analyzers_from_dirs: Vec<PathBuf>,

    /// Directory reports are written to (default: `PeekerResults`).
    pub output: PathBuf,

    /// Also report diagnostics of the compiler itself (default: false).
    pub include_compiler_diagnostics: bool,

    /// Logging verbosity (default: `Info`).
    pub log_level: LevelFilter,

    /// Indent written reports (default: false).
    pub pretty_print: bool,

    /// Directory reconstructed source is dumped to. When set, diagnostics that cannot be
    /// mapped back to original source point into the dumped files instead.
    pub dump_source: Option<PathBuf>,

    /// Emit one reconstructed unit per type instead of one per binary (default: false).
    pub one_file_per_type: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            rulesets: Vec::new(),
            analyzers: Vec::new(),
            analyzers_from_dirs: Vec::new(),
            output: PathBuf::from("PeekerResults"),
            include_compiler_diagnostics: false,
            log_level: LevelFilter::Info,
            pretty_print: false,
            dump_source: None,
            one_file_per_type: false,
        }
    }
}

impl AnalyzerConfig {
    /// Creates a configuration with default settings and no targets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binary to analyze.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.targets.push(target.into());
        self
    }

    /// Adds a rule set file.
    #[must_use]
    pub fn with_ruleset(mut self, ruleset: impl Into<PathBuf>) -> Self {
        self.rulesets.push(ruleset.into());
        self
    }

    /// Adds an analyzer assembly.
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: impl Into<PathBuf>) -> Self {
        self.analyzers.push(analyzer.into());
        self
    }

    /// Adds an analyzer package directory.
    #[must_use]
    pub fn with_analyzers_from_dir(mut self, directory: impl Into<PathBuf>) -> Self {
        self.analyzers_from_dirs.push(directory.into());
        self
    }

    /// Sets the report directory.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Enables or disables compiler diagnostics.
    #[must_use]
    pub fn with_compiler_diagnostics(mut self, enabled: bool) -> Self {
        self.include_compiler_diagnostics = enabled;
        self
    }

    /// Sets the log level from its name (`trace`, `debug`, `info`/`information`, `warn`/
    /// `warning`, `error`, `off`/`none`), case-insensitively.
    ///
    /// # Errors
    /// Returns [`crate::Error::Config`] for an unknown level name.
    pub fn with_log_level(mut self, level: &str) -> Result<Self> {
        self.log_level = parse_log_level(level)?;
        Ok(self)
    }

    /// Enables or disables indented reports.
    #[must_use]
    pub fn with_pretty_print(mut self, enabled: bool) -> Self {
        self.pretty_print = enabled;
        self
    }

    /// Enables dumping reconstructed source to `directory`.
    #[must_use]
    pub fn with_dump_source(mut self, directory: impl Into<PathBuf>) -> Self {
        self.dump_source = Some(directory.into());
        self
    }

    /// Enables or disables one reconstructed unit per type.
    #[must_use]
    pub fn with_one_file_per_type(mut self, enabled: bool) -> Self {
        self.one_file_per_type = enabled;
        self
    }

    /// Checks that the configuration describes a runnable batch.
    ///
    /// # Errors
    /// Returns [`crate::Error::Config`] if no target is configured.
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(Error::Config("no target binaries provided".to_string()));
        }
        Ok(())
    }

    /// Collects the analyzer assemblies to load: the explicit ones followed by every
    /// `*.dll` in `analyzers/dotnet/cs` of each analyzer directory.
    ///
    /// Directories without that layout contribute nothing.
    ///
    /// # Errors
    /// Returns [`crate::Error::Config`] if no analyzer is found or if explicit analyzer
    /// files do not exist, and [`crate::Error::FileError`] if a directory cannot be read.
    pub fn analyzer_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = self.analyzers.clone();
        for directory in &self.analyzers_from_dirs {
            paths.extend(search_analyzer_directory(directory)?);
        }

        if paths.is_empty() {
            return Err(Error::Config("no code analyzers provided".to_string()));
        }

        let missing: Vec<String> = paths
            .iter()
            .filter(|path| !path.is_file())
            .map(|path| path.display().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "analyzer files not found: {}",
                missing.join(", ")
            )));
        }

        Ok(paths)
    }
}

/// Parses a log level name.
///
/// # Errors
/// Returns [`crate::Error::Config`] for an unknown level name.
pub fn parse_log_level(level: &str) -> Result<LevelFilter> {
    match level.to_ascii_lowercase().as_str() {
        "information" => Ok(LevelFilter::Info),
        "warning" => Ok(LevelFilter::Warn),
        "none" => Ok(LevelFilter::Off),
        "critical" => Ok(LevelFilter::Error),
        other => LevelFilter::from_str(other)
            .map_err(|_| Error::Config(format!("unknown log level - {}", level))),
    }
}

fn search_analyzer_directory(directory: &Path) -> Result<Vec<PathBuf>> {
    let search_path: PathBuf = ANALYZER_SUBDIRECTORY
        .iter()
        .fold(directory.to_path_buf(), |path, part| path.join(part));
    if !search_path.is_dir() {
        log::debug!("No analyzers found below {}", directory.display());
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in fs::read_dir(&search_path)? {
        let path = entry?.path();
        let is_dll = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("dll"));
        if is_dll && path.is_file() {
            found.push(path);
        }
    }
    found.sort();

    Ok(found)
}
