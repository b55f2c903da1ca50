use std::collections::BTreeSet;

use crate::rules::catalog::RuleId;

/// Optional allow/deny lists for the list-driven rules.
///
/// Each list enables its rule iff it is `Some`. Empty input never produces
/// `Some`, so "configured but empty" and "not configured" behave the same.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleConfig {
    /// Exact image references accepted by CIS 4.2.
    pub trusted_base_images: Option<BTreeSet<String>>,
    /// Package names flagged by CIS 4.3; used as regex fragments.
    pub disallowed_packages: Option<BTreeSet<String>>,
    /// Raw regex patterns searched in `ENV`/`LABEL` by CIS 4.10.
    pub secret_patterns: Option<BTreeSet<String>>,
}

impl RuleConfig {
    pub fn from_lists(
        trusted_base_images: &[String],
        disallowed_packages: &[String],
        secret_patterns: &[String],
    ) -> Self {
        Self::default()
            .with_trusted_base_images(trusted_base_images)
            .with_disallowed_packages(disallowed_packages)
            .with_secret_patterns(secret_patterns)
    }

    pub fn with_trusted_base_images<I>(mut self, images: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.trusted_base_images = non_empty_set(images);
        self
    }

    pub fn with_disallowed_packages<I>(mut self, packages: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.disallowed_packages = non_empty_set(packages);
        self
    }

    pub fn with_secret_patterns<I>(mut self, patterns: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.secret_patterns = non_empty_set(patterns);
        self
    }

    /// The list driving `rule`, if the rule takes one and it is configured.
    pub fn list(&self, rule: RuleId) -> Option<&BTreeSet<String>> {
        match rule {
            RuleId::TrustedBaseImage => self.trusted_base_images.as_ref(),
            RuleId::DisallowedPackage => self.disallowed_packages.as_ref(),
            RuleId::NoSecrets => self.secret_patterns.as_ref(),
            _ => None,
        }
    }

    /// Unconditional rules always run; list-driven rules need their list.
    pub fn is_enabled(&self, rule: RuleId) -> bool {
        !rule.requires_configuration() || self.list(rule).is_some()
    }
}

fn non_empty_set<I>(items: I) -> Option<BTreeSet<String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let set: BTreeSet<String> = items
        .into_iter()
        .map(|item| item.as_ref().trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if set.is_empty() { None } else { Some(set) }
}
