//! The subset of the SARIF 2.1.0 object model written by [`crate::report::ResultWriter`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// JSON schema of SARIF 2.1.0.
pub const SARIF_SCHEMA: &str = "https://json.schemastore.org/sarif-2.1.0.json";

/// SARIF version written.
pub const SARIF_VERSION: &str = "2.1.0";

/// Free-form properties.
pub type PropertyBag = BTreeMap<String, serde_json::Value>;

/// Top-level log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifLog {
    /// Schema URI.
    #[serde(rename = "$schema")]
    pub schema: String,
    /// Format version.
    pub version: String,
    /// Analysis runs, one per analyzed binary.
    pub runs: Vec<Run>,
}

impl SarifLog {
    /// Creates a log holding `runs`.
    #[must_use]
    pub fn new(runs: Vec<Run>) -> Self {
        SarifLog {
            schema: SARIF_SCHEMA.to_string(),
            version: SARIF_VERSION.to_string(),
            runs,
        }
    }
}

/// One analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// The analysis tool.
    pub tool: Tool,
    /// Reported results.
    pub results: Vec<SarifResult>,
}

/// The analysis tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Main tool component.
    pub driver: ToolComponent,
}

/// A tool component and the rules it reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolComponent {
    /// Tool name.
    pub name: String,
    /// Tool version.
    pub version: String,
    /// Rules referenced by results through their index.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<ReportingDescriptor>,
}

/// Severity level of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureLevel {
    /// No level.
    None,
    /// Informational.
    Note,
    /// Warning.
    Warning,
    /// Error.
    Error,
}

/// Plain text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message text.
    pub text: String,
}

impl Message {
    /// Creates a message.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Message { text: text.into() }
    }
}

/// Default configuration of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingConfiguration {
    /// Whether the rule runs by default.
    pub enabled: bool,
    /// Level the rule reports with by default.
    pub level: FailureLevel,
}

/// Description of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingDescriptor {
    /// Rule id.
    pub id: String,
    /// Rule title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<Message>,
    /// Rule description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_description: Option<Message>,
    /// Documentation link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_uri: Option<String>,
    /// Present only when the defaults differ from enabled warnings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_configuration: Option<ReportingConfiguration>,
    /// `category` and `tags`.
    #[serde(default, skip_serializing_if = "PropertyBag::is_empty")]
    pub properties: PropertyBag,
}

/// One reported result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    /// Rule id.
    pub rule_id: String,
    /// Index of the rule in the driver's rules.
    pub rule_index: usize,
    /// Severity level.
    pub level: FailureLevel,
    /// Result message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    /// Where the result was found.
    pub locations: Vec<SarifLocation>,
    /// `warningLevel` and `customProperties`.
    #[serde(default, skip_serializing_if = "PropertyBag::is_empty")]
    pub properties: PropertyBag,
}

/// Location of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    /// A file and region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_location: Option<PhysicalLocation>,
    /// Named locations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logical_locations: Vec<LogicalLocation>,
}

/// A file, optionally narrowed to a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalLocation {
    /// The file.
    pub artifact_location: ArtifactLocation,
    /// Region within the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
}

/// Reference to a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactLocation {
    /// File path or URI.
    pub uri: String,
}

/// A text region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Start line.
    pub start_line: u32,
    /// Start column.
    pub start_column: u32,
    /// End line.
    pub end_line: u32,
    /// End column.
    pub end_column: u32,
}

/// A named location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalLocation {
    /// Rendered location.
    pub decorated_name: String,
    /// Location kind, e.g. `module`.
    pub kind: String,
}
