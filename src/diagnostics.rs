//! Diagnostics reported by the source-analysis engine.
//!
//! Diagnostics are located in reconstructed source. The resolution pipeline turns their
//! locations into [`ResolvedLocation`]s expressed in original source coordinates.

use std::{collections::BTreeMap, fmt};

use strum::{Display, EnumIter, EnumString};

/// Severity of a diagnostic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Severity {
    /// Not surfaced to the user.
    Hidden,
    /// Informational.
    Info,
    /// Warning.
    #[default]
    Warning,
    /// Error.
    Error,
}

/// A 0-based line and character position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LinePosition {
    /// Line, 0-based.
    pub line: u32,
    /// Character within the line, 0-based.
    pub character: u32,
}

impl LinePosition {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: u32, character: u32) -> Self {
        LinePosition { line, character }
    }
}

impl fmt::Display for LinePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// A span between two positions of the same document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LineSpan {
    /// Inclusive start.
    pub start: LinePosition,
    /// End position.
    pub end: LinePosition,
}

impl LineSpan {
    /// Creates a new span.
    #[must_use]
    pub fn new(start: LinePosition, end: LinePosition) -> Self {
        LineSpan { start, end }
    }
}

impl fmt::Display for LineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Where a diagnostic was reported.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Location {
    /// Not attributed to any source text (for example a compilation-wide diagnostic).
    #[default]
    None,
    /// A span of a reconstructed source unit.
    Source {
        /// Name of the reconstructed unit.
        path: String,
        /// Span within the unit.
        span: LineSpan,
    },
}

impl Location {
    /// Creates a source location.
    #[must_use]
    pub fn source(path: impl Into<String>, span: LineSpan) -> Self {
        Location::Source {
            path: path.into(),
            span,
        }
    }

    /// Returns `true` if the location points into source text.
    #[must_use]
    pub fn is_in_source(&self) -> bool {
        matches!(self, Location::Source { .. })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::None => write!(f, "None"),
            Location::Source { path, span } => write!(f, "SourceFile({}[{}])", path, span),
        }
    }
}

/// Metadata of the rule that produced a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleDescriptor {
    /// Rule id, e.g. `CA2100`.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Longer description, may be empty.
    pub description: String,
    /// Link to the rule documentation.
    pub help_uri: Option<String>,
    /// Rule category, e.g. `Security`.
    pub category: String,
    /// Custom tags.
    pub tags: Vec<String>,
    /// Severity the rule reports with unless configured otherwise.
    pub default_severity: Severity,
    /// Whether the rule runs unless configured otherwise.
    pub enabled_by_default: bool,
}

/// A diagnostic located in reconstructed source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Diagnostic {
    /// Rule id.
    pub id: String,
    /// Effective severity.
    pub severity: Severity,
    /// Formatted message.
    pub message: String,
    /// Location in reconstructed source.
    pub location: Location,
    /// Set when a suppression applies to this diagnostic.
    pub is_suppressed: bool,
    /// Compiler warning level, `0` for errors.
    pub warning_level: u32,
    /// Free-form properties attached by the rule.
    pub properties: BTreeMap<String, String>,
    /// The producing rule, if known.
    pub descriptor: Option<RuleDescriptor>,
}

impl Diagnostic {
    /// Creates a diagnostic with the given id, severity, message and location.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Diagnostic {
            id: id.into(),
            severity,
            message: message.into(),
            location,
            ..Default::default()
        }
    }

    /// Attaches the producing rule.
    #[must_use]
    pub fn with_descriptor(mut self, descriptor: RuleDescriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }
}

/// A location in original source, as recovered from debug symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    /// Document path as recorded in the debug symbols, or the path of a dumped
    /// reconstructed source file.
    pub path: String,
    /// Start position.
    pub start: LinePosition,
    /// End position.
    pub end: LinePosition,
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}-{})", self.path, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn severity_names() {
        assert_eq!(Severity::from_str("warning").unwrap(), Severity::Warning);
        assert_eq!(Severity::from_str("Error").unwrap(), Severity::Error);
        assert!(Severity::from_str("fatal").is_err());
        assert_eq!(Severity::Info.to_string(), "Info");

        let all: Vec<Severity> = Severity::iter().collect();
        assert_eq!(all.len(), 4);
        assert!(Severity::Error > Severity::Warning);
    }

    #[test]
    fn location_display() {
        let location = Location::source(
            "Foo.cs",
            LineSpan::new(LinePosition::new(3, 4), LinePosition::new(3, 9)),
        );
        assert!(location.is_in_source());
        assert_eq!(location.to_string(), "SourceFile(Foo.cs[3:4-3:9])");
        assert!(!Location::None.is_in_source());
    }

    #[test]
    fn resolved_display() {
        let resolved = ResolvedLocation {
            path: "Program.cs".to_string(),
            start: LinePosition::new(10, 2),
            end: LinePosition::new(11, 7),
        };
        assert_eq!(resolved.to_string(), "Program.cs (10:2-11:7)");
    }
}
