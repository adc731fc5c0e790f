//! SARIF reports.
//!
//! [`ResultWriter`] turns the diagnostics of one binary into a SARIF 2.1.0 log. Every
//! diagnostic whose location resolves to original source is reported against that file and
//! region; all others are reported against the binary itself, with the reconstructed
//! location kept as a logical location.
//!
//! # Example
//!
//! ```rust,no_run
//! use peeker::report::{ResultWriter, SarifLog};
//!
//! let log = SarifLog::new(Vec::new());
//! ResultWriter::write(&log, "PeekerResults/Sample.dll.sarif", true)?;
//! # Ok::<(), peeker::Error>(())
//! ```

mod rulebag;
mod sarif;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    decompilation::{Decompilation, Decompiler},
    diagnostics::Diagnostic,
    Result,
};

pub use rulebag::{failure_level, RuleBag};
pub use sarif::{
    ArtifactLocation, FailureLevel, LogicalLocation, Message, PhysicalLocation, PropertyBag,
    Region, ReportingConfiguration, ReportingDescriptor, Run, SarifLocation, SarifLog,
    SarifResult, Tool, ToolComponent, SARIF_SCHEMA, SARIF_VERSION,
};

/// Name of the tool in written reports.
pub const TOOL_NAME: &str = "peeker";

/// Builds and writes SARIF reports.
pub struct ResultWriter;

impl ResultWriter {
    /// Builds the report of one binary.
    ///
    /// Diagnostics without a rule descriptor cannot be referenced from a result and are
    /// dropped with an error log.
    pub fn process<D: Decompiler>(
        decompilation: &mut Decompilation<D>,
        diagnostics: &[Diagnostic],
    ) -> SarifLog {
        let mut rules = RuleBag::new();
        let mut results = Vec::with_capacity(diagnostics.len());

        for diagnostic in diagnostics {
            let Some((rule_index, rule)) = rules.register(diagnostic.descriptor.as_ref()) else {
                log::error!(
                    "Diagnostic {} has no rule descriptor and is not reported",
                    diagnostic.id
                );
                continue;
            };
            let rule_id = rule.id.clone();

            let location = Self::location(decompilation, diagnostic);
            let message = (!diagnostic.message.is_empty())
                .then(|| Message::new(diagnostic.message.clone()));

            results.push(SarifResult {
                rule_id,
                rule_index,
                level: failure_level(diagnostic.severity),
                message,
                locations: vec![location],
                properties: Self::properties(diagnostic),
            });
        }

        SarifLog::new(vec![Run {
            tool: Tool {
                driver: ToolComponent {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules: rules.into_rules(),
                },
            },
            results,
        }])
    }

    /// Writes `log` as JSON to `path`, indented if `pretty` is set.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be written and
    /// [`crate::Error::Json`] if encoding fails.
    pub fn write(log: &SarifLog, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        if pretty {
            serde_json::to_writer_pretty(&mut writer, log)?;
        } else {
            serde_json::to_writer(&mut writer, log)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn location<D: Decompiler>(
        decompilation: &mut Decompilation<D>,
        diagnostic: &Diagnostic,
    ) -> SarifLocation {
        match decompilation.resolve_original_location(diagnostic) {
            Some(resolved) => SarifLocation {
                physical_location: Some(PhysicalLocation {
                    artifact_location: ArtifactLocation { uri: resolved.path },
                    region: Some(Region {
                        start_line: resolved.start.line,
                        start_column: resolved.start.character,
                        end_line: resolved.end.line,
                        end_column: resolved.end.character,
                    }),
                }),
                logical_locations: Vec::new(),
            },
            None => SarifLocation {
                physical_location: Some(PhysicalLocation {
                    artifact_location: ArtifactLocation {
                        uri: decompilation.file_name().display().to_string(),
                    },
                    region: None,
                }),
                logical_locations: vec![LogicalLocation {
                    decorated_name: diagnostic.location.to_string(),
                    kind: "module".to_string(),
                }],
            },
        }
    }

    fn properties(diagnostic: &Diagnostic) -> PropertyBag {
        let mut properties = PropertyBag::new();
        if diagnostic.warning_level > 0 {
            properties.insert("warningLevel".to_string(), diagnostic.warning_level.into());
        }
        if !diagnostic.properties.is_empty() {
            let custom: serde_json::Map<String, serde_json::Value> = diagnostic
                .properties
                .iter()
                .map(|(key, value)| (key.clone(), value.clone().into()))
                .collect();
            properties.insert("customProperties".to_string(), custom.into());
        }
        properties
    }
}
