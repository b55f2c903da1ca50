use serde::{Deserialize, Serialize};

use crate::rules::catalog::RuleId;

/// Benchmark outcome for a set of dockerfiles.
///
/// One entry per executed rule, in evaluation order. Rules that were
/// disabled for lack of configuration have no entry at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationReport {
    #[serde(rename = "cis_docker_benchmark_violation_report")]
    pub violations: Vec<RuleViolation>,
}

/// Items flagged by one rule: bare file ids or `"<file>: <detail>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule: String,
    #[serde(rename = "violations")]
    pub items: Vec<String>,
}

impl RuleViolation {
    pub fn new(rule: RuleId, items: Vec<String>) -> Self {
        Self {
            rule: rule.title().to_string(),
            items,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.items.is_empty()
    }
}

impl ViolationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_violation(&mut self, violation: RuleViolation) {
        self.violations.push(violation);
    }

    /// Entry for `rule`, if that rule was executed.
    pub fn get(&self, rule: RuleId) -> Option<&RuleViolation> {
        self.violations.iter().find(|v| v.rule == rule.title())
    }

    pub fn has_violations(&self) -> bool {
        self.violations.iter().any(|v| !v.is_clean())
    }

    /// Total flagged items across all rules.
    pub fn violation_count(&self) -> usize {
        self.violations.iter().map(|v| v.items.len()).sum()
    }
}
