//! Rule set files filtering and reclassifying diagnostics.
//!
//! Rule sets use the `.ruleset` XML format of the .NET analyzer tooling:
//!
//! ```xml
//! <RuleSet Name="Security" ToolsVersion="16.0">
//!   <IncludeAll Action="Warning" />
//!   <Rules AnalyzerId="Microsoft.CodeAnalysis.NetAnalyzers" RuleNamespace="Microsoft.CodeAnalysis.NetAnalyzers">
//!     <Rule Id="CA2100" Action="Error" />
//!     <Rule Id="CA1062" Action="None" />
//!   </Rules>
//! </RuleSet>
//! ```
//!
//! `IncludeAll` sets the general action, each `Rule` a rule-specific one. Several files
//! are combined into a [`MergedRuleSet`], later files overriding earlier ones.

use std::{collections::HashMap, fs, path::Path};

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use crate::{
    diagnostics::{Diagnostic, Severity},
    Error, Result,
};

/// What to do with the diagnostics of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReportAction {
    /// Keep the diagnostic's own severity.
    #[default]
    Default,
    /// Report as error.
    Error,
    /// Report as warning.
    Warn,
    /// Report as informational.
    Info,
    /// Report as hidden.
    Hidden,
    /// Do not report.
    Suppress,
}

impl ReportAction {
    /// Parses an `Action` attribute value, case-insensitively.
    ///
    /// # Errors
    /// Returns [`crate::Error::Xml`] for an unknown action.
    pub fn from_action(action: &str) -> Result<Self> {
        match action.to_ascii_lowercase().as_str() {
            "error" => Ok(ReportAction::Error),
            "warning" => Ok(ReportAction::Warn),
            "info" => Ok(ReportAction::Info),
            "hidden" => Ok(ReportAction::Hidden),
            "none" => Ok(ReportAction::Suppress),
            "default" => Ok(ReportAction::Default),
            _ => Err(Error::Xml(format!("unknown rule action - {}", action))),
        }
    }

    /// The severity this action assigns, `None` for `Default` and `Suppress`.
    #[must_use]
    pub fn severity(self) -> Option<Severity> {
        match self {
            ReportAction::Error => Some(Severity::Error),
            ReportAction::Warn => Some(Severity::Warning),
            ReportAction::Info => Some(Severity::Info),
            ReportAction::Hidden => Some(Severity::Hidden),
            ReportAction::Default | ReportAction::Suppress => None,
        }
    }
}

/// One parsed rule set file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleSet {
    /// Action from `IncludeAll`, `Default` if absent.
    pub general_option: ReportAction,
    /// Actions of individual rules by id.
    pub specific_options: HashMap<String, ReportAction>,
}

impl RuleSet {
    /// Parses rule set XML.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] for blank input, and [`crate::Error::Xml`] for
    /// malformed XML, a missing `RuleSet` root, a `Rule` without `Id` or `Action`, or an
    /// unknown action.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use peeker::ruleset::{ReportAction, RuleSet};
    ///
    /// let rules = RuleSet::parse(r#"<RuleSet><Rules><Rule Id="CA1000" Action="None"/></Rules></RuleSet>"#)?;
    /// assert_eq!(rules.specific_options["CA1000"], ReportAction::Suppress);
    /// # Ok::<(), peeker::Error>(())
    /// ```
    pub fn parse(xml: &str) -> Result<Self> {
        if xml.trim().is_empty() {
            return Err(Error::Empty);
        }

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut rule_set = RuleSet::default();
        let mut saw_root = false;

        loop {
            match reader.read_event()? {
                Event::Start(element) | Event::Empty(element) => {
                    match element.local_name().as_ref() {
                        b"RuleSet" => saw_root = true,
                        b"IncludeAll" if saw_root => {
                            let action = required_attribute(&element, b"Action")?;
                            rule_set.general_option = ReportAction::from_action(&action)?;
                        }
                        b"Rule" if saw_root => {
                            let id = required_attribute(&element, b"Id")?;
                            let action = required_attribute(&element, b"Action")?;
                            rule_set
                                .specific_options
                                .insert(id, ReportAction::from_action(&action)?);
                        }
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_root {
            return Err(Error::Xml("missing RuleSet element".to_string()));
        }

        Ok(rule_set)
    }

    /// Reads and parses a rule set file.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be read, otherwise the errors
    /// of [`RuleSet::parse`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let xml = fs::read_to_string(path)?;
        RuleSet::parse(&xml)
            .map_err(|error| Error::Xml(format!("{}: {}", path.display(), error)))
    }
}

fn required_attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<String> {
    for attribute in element.attributes() {
        let attribute = attribute?;
        if attribute.key.local_name().as_ref() == name {
            return Ok(attribute.unescape_value()?.into_owned());
        }
    }

    Err(Error::Xml(format!(
        "{} element without {} attribute",
        String::from_utf8_lossy(element.local_name().as_ref()),
        String::from_utf8_lossy(name)
    )))
}

/// Several rule sets combined, later ones overriding earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergedRuleSet {
    /// The general action of the last merged rule set.
    pub general_option: ReportAction,
    /// Rule-specific actions, the last rule set mentioning an id wins.
    pub specific_options: HashMap<String, ReportAction>,
}

impl MergedRuleSet {
    /// Merges `rule_sets` in order.
    #[must_use]
    pub fn merge<'a>(rule_sets: impl IntoIterator<Item = &'a RuleSet>) -> Self {
        let mut merged = MergedRuleSet::default();
        for rule_set in rule_sets {
            merged.general_option = rule_set.general_option;
            for (id, action) in &rule_set.specific_options {
                merged.specific_options.insert(id.clone(), *action);
            }
        }
        merged
    }

    /// Loads and merges the rule set files at `paths`.
    ///
    /// # Errors
    /// Fails on the first file that cannot be read or parsed.
    pub fn from_files(paths: &[impl AsRef<Path>]) -> Result<Self> {
        let rule_sets = paths
            .iter()
            .map(|path| RuleSet::from_file(path.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(MergedRuleSet::merge(&rule_sets))
    }

    /// The rule-specific action for `id`, or the general action.
    #[must_use]
    pub fn effective_action(&self, id: &str) -> ReportAction {
        self.specific_options
            .get(id)
            .copied()
            .unwrap_or(self.general_option)
    }

    /// Returns `true` if diagnostics of rule `id` are not reported.
    #[must_use]
    pub fn is_suppressed(&self, id: &str) -> bool {
        self.effective_action(id) == ReportAction::Suppress
    }

    /// Applies the rule set to `diagnostic`: `None` if it is suppressed, otherwise the
    /// diagnostic with its severity reassigned.
    ///
    /// A rule-specific action applies to any severity. The general action only applies to
    /// warnings, so it can neither hide errors nor promote informational diagnostics.
    #[must_use]
    pub fn apply(&self, mut diagnostic: Diagnostic) -> Option<Diagnostic> {
        let action = match self.specific_options.get(&diagnostic.id) {
            Some(action) => *action,
            None if diagnostic.severity == Severity::Warning => self.general_option,
            None => ReportAction::Default,
        };

        if action == ReportAction::Suppress {
            return None;
        }
        if let Some(severity) = action.severity() {
            diagnostic.severity = severity;
        }
        Some(diagnostic)
    }
}
