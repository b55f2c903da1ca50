use tracing::debug;

use crate::report::model::{RuleViolation, ViolationReport};
use crate::rules::catalog::RuleId;
use crate::rules::checks::{self, FileSets};
use crate::rules::config::RuleConfig;

/// Run one rule; `None` means the rule is disabled by configuration.
pub fn evaluate_rule(rule: RuleId, files: &FileSets, config: &RuleConfig) -> Option<RuleViolation> {
    if !config.is_enabled(rule) {
        return None;
    }

    let violation = match rule {
        RuleId::NonRootUser => checks::non_root_user(files),
        RuleId::TrustedBaseImage => checks::trusted_base_images(files, config.list(rule)?),
        RuleId::DisallowedPackage => checks::disallowed_packages(files, config.list(rule)?),
        RuleId::Healthcheck => checks::healthcheck(files),
        RuleId::UpdateWithoutInstall => checks::update_without_install(files),
        RuleId::CopyNotAdd => checks::copy_not_add(files),
        RuleId::NoSecrets => checks::secrets(files, config.list(rule)?),
    };
    Some(violation)
}

/// Run every enabled rule in catalog order and collect the results.
pub fn evaluate_rules(files: &FileSets, config: &RuleConfig) -> ViolationReport {
    let mut report = ViolationReport::new();

    for rule in RuleId::ALL {
        match evaluate_rule(rule, files, config) {
            Some(violation) => {
                debug!(
                    rule = rule.as_str(),
                    violations = violation.items.len(),
                    "rule evaluated"
                );
                report.add_violation(violation);
            }
            None => debug!(rule = rule.as_str(), "rule disabled: no list configured"),
        }
    }

    report
}
