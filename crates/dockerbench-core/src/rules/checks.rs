//! CIS Docker Benchmark rule checks.
//!
//! Every check is a pure function over all registered files and produces one
//! `RuleViolation` covering every file. List-driven checks take their list
//! directly; whether they run at all is decided by `RuleConfig::is_enabled`.
//! Checks never look at each other's output.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use tracing::debug;

use crate::instructions::index::compile_pattern;
use crate::instructions::model::{
    ADD, ENV, HEALTHCHECK, Instruction, InstructionSet, LABEL, RUN, USER,
};
use crate::report::model::RuleViolation;
use crate::rules::catalog::RuleId;
use crate::util::deterministic::{push_file_details, unmatched_positions};

/// Registered files keyed by file id.
pub type FileSets = BTreeMap<String, InstructionSet>;

const ROOT_NAME: &str = "root";
const ROOT_ID: &str = "0";

/// Install idioms a disallowed package name is appended to.
/// The name is not escaped; regex metacharacters in it stay live.
const INSTALL_IDIOMS: [&str; 3] = [
    r"apt\s+install\s+[^;|&]+",
    r"apt-get\s+install\s+[^;|&]+",
    r"apk\s+add\s+[^;|&]+",
];

/// (update, install) pattern per package manager.
const UPDATE_INSTALL_PAIRS: [(&str, &str); 3] = [
    (r"apt\s+update", r"apt\s+install"),
    (r"apt-get\s+update", r"apt-get\s+install"),
    (r"apk\s+update", r"apk\s+add"),
];

/// CIS 4.1: some `USER` must name neither `root` nor uid/gid `0`.
pub fn non_root_user(files: &FileSets) -> RuleViolation {
    let items = files
        .iter()
        .filter(|(_, set)| !creates_non_root_user(set))
        .map(|(file, _)| file.clone())
        .collect();
    RuleViolation::new(RuleId::NonRootUser, items)
}

fn creates_non_root_user(set: &InstructionSet) -> bool {
    set.instructions()
        .iter()
        .filter(|i| i.is(USER))
        .any(sets_non_root_user)
}

fn sets_non_root_user(instruction: &Instruction) -> bool {
    let Some(spec) = instruction.content.first() else {
        return false;
    };
    spec.to_lowercase()
        .split(':')
        .all(|part| part != ROOT_NAME && part != ROOT_ID)
}

/// CIS 4.2: every `FROM` image must be in the trusted set.
pub fn trusted_base_images(files: &FileSets, trusted: &BTreeSet<String>) -> RuleViolation {
    let mut items = Vec::new();
    for (file, set) in files {
        let untrusted: BTreeSet<String> = set
            .base_images()
            .into_iter()
            .filter(|image| !trusted.contains(image))
            .collect();
        push_file_details(&mut items, file, &untrusted);
    }

    RuleViolation::new(RuleId::TrustedBaseImage, items)
}

/// CIS 4.3: `RUN` must not install a disallowed package.
pub fn disallowed_packages(files: &FileSets, packages: &BTreeSet<String>) -> RuleViolation {
    let matchers: Vec<(&String, Vec<Regex>)> = packages
        .iter()
        .map(|pkg| {
            let patterns = INSTALL_IDIOMS
                .iter()
                .filter_map(|idiom| compile_pattern(&format!("{idiom}{pkg}")))
                .collect();
            (pkg, patterns)
        })
        .collect();

    let mut items = Vec::new();
    for (file, set) in files {
        let installed: BTreeSet<String> = matchers
            .iter()
            .filter(|(_, patterns)| {
                patterns
                    .iter()
                    .any(|re| !set.find_by_directive_and_regex(RUN, re).is_empty())
            })
            .map(|(pkg, _)| (*pkg).clone())
            .collect();
        if !installed.is_empty() {
            debug!(file = %file, packages = ?installed, "disallowed packages installed");
        }
        push_file_details(&mut items, file, &installed);
    }

    RuleViolation::new(RuleId::DisallowedPackage, items)
}

/// CIS 4.6: a `HEALTHCHECK` instruction must be present.
pub fn healthcheck(files: &FileSets) -> RuleViolation {
    let items = files
        .iter()
        .filter(|(_, set)| !set.has_directive(HEALTHCHECK))
        .map(|(file, _)| file.clone())
        .collect();
    RuleViolation::new(RuleId::Healthcheck, items)
}

/// CIS 4.7: a `RUN` that updates package indexes must also install.
///
/// Per package manager, the positions of `RUN` instructions matching the
/// update pattern are compared with those matching the install pattern; any
/// update position without an install at the same position flags the file.
pub fn update_without_install(files: &FileSets) -> RuleViolation {
    let pairs: Vec<(Regex, Regex)> = UPDATE_INSTALL_PAIRS
        .iter()
        .filter_map(|(update, install)| Some((compile_pattern(update)?, compile_pattern(install)?)))
        .collect();

    let items = files
        .iter()
        .filter(|(_, set)| {
            pairs.iter().any(|(update, install)| {
                let updates = set.find_by_directive_and_regex(RUN, update);
                let installs = set.find_by_directive_and_regex(RUN, install);
                !unmatched_positions(&updates, &installs).is_empty()
            })
        })
        .map(|(file, _)| file.clone())
        .collect();

    RuleViolation::new(RuleId::UpdateWithoutInstall, items)
}

/// CIS 4.9: `ADD` must not be used.
pub fn copy_not_add(files: &FileSets) -> RuleViolation {
    let items = files
        .iter()
        .filter(|(_, set)| set.has_directive(ADD))
        .map(|(file, _)| file.clone())
        .collect();
    RuleViolation::new(RuleId::CopyNotAdd, items)
}

/// CIS 4.10: `ENV` and `LABEL` content must not match a secret pattern.
pub fn secrets(files: &FileSets, patterns: &BTreeSet<String>) -> RuleViolation {
    let compiled: Vec<(&String, Regex)> = patterns
        .iter()
        .filter_map(|pattern| compile_pattern(pattern).map(|re| (pattern, re)))
        .collect();

    let mut items = Vec::new();
    for (file, set) in files {
        let mut found = BTreeSet::new();
        for (pattern, re) in &compiled {
            if !set.find_by_directive_and_regex(ENV, re).is_empty() {
                found.insert(format!("ENV contains '{pattern}'"));
            }
            if !set.find_by_directive_and_regex(LABEL, re).is_empty() {
                found.insert(format!("LABEL contains '{pattern}'"));
            }
        }
        push_file_details(&mut items, file, &found);
    }

    RuleViolation::new(RuleId::NoSecrets, items)
}
