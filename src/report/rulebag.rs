//! Rule registry of a report.

use std::collections::HashMap;

use crate::{
    diagnostics::{RuleDescriptor, Severity},
    report::sarif::{
        FailureLevel, Message, PropertyBag, ReportingConfiguration, ReportingDescriptor,
    },
};

/// SARIF level of a diagnostic severity.
#[must_use]
pub fn failure_level(severity: Severity) -> FailureLevel {
    match severity {
        Severity::Info => FailureLevel::Note,
        Severity::Error => FailureLevel::Error,
        Severity::Warning | Severity::Hidden => FailureLevel::Warning,
    }
}

/// Collects every distinct rule referenced by a report, in first-seen order.
#[derive(Debug, Default)]
pub struct RuleBag {
    rules: Vec<ReportingDescriptor>,
    indices: HashMap<String, usize>,
}

impl RuleBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `descriptor` and returns its index and report entry. A rule id that
    /// is already known returns the existing entry. `None` cannot be registered.
    pub fn register(
        &mut self,
        descriptor: Option<&RuleDescriptor>,
    ) -> Option<(usize, &ReportingDescriptor)> {
        let descriptor = descriptor?;

        let index = match self.indices.get(&descriptor.id) {
            Some(index) => *index,
            None => {
                let index = self.rules.len();
                self.rules.push(convert(descriptor));
                self.indices.insert(descriptor.id.clone(), index);
                index
            }
        };

        Some((index, &self.rules[index]))
    }

    /// Registered rules, by index.
    #[must_use]
    pub fn rules(&self) -> &[ReportingDescriptor] {
        &self.rules
    }

    /// Consumes the bag, returning the registered rules.
    #[must_use]
    pub fn into_rules(self) -> Vec<ReportingDescriptor> {
        self.rules
    }
}

fn non_blank(text: &str) -> Option<&str> {
    Some(text).filter(|text| !text.trim().is_empty())
}

fn convert(descriptor: &RuleDescriptor) -> ReportingDescriptor {
    let mut properties = PropertyBag::new();
    if !descriptor.category.is_empty() {
        properties.insert("category".to_string(), descriptor.category.clone().into());
    }
    if !descriptor.tags.is_empty() {
        properties.insert("tags".to_string(), descriptor.tags.clone().into());
    }

    let level = failure_level(descriptor.default_severity);
    // defaults are enabled warnings
    let default_configuration = (level != FailureLevel::Warning
        || !descriptor.enabled_by_default)
        .then_some(ReportingConfiguration {
            enabled: descriptor.enabled_by_default,
            level,
        });

    ReportingDescriptor {
        id: descriptor.id.clone(),
        short_description: non_blank(&descriptor.title).map(Message::new),
        full_description: non_blank(&descriptor.description).map(Message::new),
        help_uri: descriptor
            .help_uri
            .as_deref()
            .and_then(non_blank)
            .map(str::to_string),
        default_configuration,
        properties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str) -> RuleDescriptor {
        RuleDescriptor {
            id: id.to_string(),
            title: id.to_string(),
            description: id.to_string(),
            category: "Category.fake".to_string(),
            default_severity: Severity::Error,
            enabled_by_default: true,
            ..Default::default()
        }
    }

    #[test]
    fn register_deduplicates() {
        let mut bag = RuleBag::new();

        let (index, rule) = bag.register(Some(&descriptor("FA0001"))).unwrap();
        assert_eq!(index, 0);
        assert_eq!(rule.id, "FA0001");

        let (index, rule) = bag.register(Some(&descriptor("FA0002"))).unwrap();
        assert_eq!(index, 1);
        assert_eq!(rule.id, "FA0002");

        let (index, rule) = bag.register(Some(&descriptor("FA0001"))).unwrap();
        assert_eq!(index, 0);
        assert_eq!(rule.id, "FA0001");

        assert_eq!(bag.rules().len(), 2);
    }

    #[test]
    fn register_none() {
        let mut bag = RuleBag::new();
        assert!(bag.register(None).is_none());
        assert!(bag.into_rules().is_empty());
    }

    #[test]
    fn conversion() {
        let mut bag = RuleBag::new();
        let rule = bag.register(Some(&descriptor("FA0001"))).unwrap().1.clone();

        assert_eq!(rule.short_description, Some(Message::new("FA0001")));
        assert_eq!(rule.properties["category"], "Category.fake");
        assert!(!rule.properties.contains_key("tags"));
        assert_eq!(
            rule.default_configuration,
            Some(ReportingConfiguration {
                enabled: true,
                level: FailureLevel::Error
            })
        );

        let mut plain = descriptor("FA0002");
        plain.default_severity = Severity::Warning;
        plain.description = "  ".to_string();
        plain.tags = vec!["Telemetry".to_string()];
        let rule = bag.register(Some(&plain)).unwrap().1;
        assert!(rule.default_configuration.is_none());
        assert!(rule.full_description.is_none());
        assert_eq!(rule.properties["tags"], serde_json::json!(["Telemetry"]));
    }

    #[test]
    fn levels() {
        assert_eq!(failure_level(Severity::Info), FailureLevel::Note);
        assert_eq!(failure_level(Severity::Error), FailureLevel::Error);
        assert_eq!(failure_level(Severity::Warning), FailureLevel::Warning);
        assert_eq!(failure_level(Severity::Hidden), FailureLevel::Warning);
    }
}
