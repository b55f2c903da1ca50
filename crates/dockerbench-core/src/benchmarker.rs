use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::dockerfile::discover::read_dockerfile;
use crate::dockerfile::{Node, parse_dockerfile};
use crate::instructions::InstructionSet;
use crate::report::model::ViolationReport;
use crate::rules::checks::FileSets;
use crate::rules::config::RuleConfig;
use crate::rules::eval::evaluate_rules;

/// Owns the parsed files and runs the rule catalog over them.
///
/// Files are registered first (possibly over several calls), then
/// `evaluate` runs every enabled rule once across all of them.
#[derive(Debug, Default)]
pub struct Benchmarker {
    files: FileSets,
    config: RuleConfig,
    report: ViolationReport,
}

impl Benchmarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append parsed nodes to `file_id`, creating its instruction set on
    /// first reference. Repeated calls for the same id accumulate.
    pub fn register_parsed_file<'a, I>(&mut self, file_id: &str, nodes: I)
    where
        I: IntoIterator<Item = &'a Node>,
    {
        let set = self
            .files
            .entry(file_id.to_string())
            .or_insert_with(|| InstructionSet::new(file_id));

        let before = set.len();
        for node in nodes {
            set.append_node(node);
        }
        debug!(
            file = file_id,
            appended = set.len() - before,
            total = set.len(),
            "registered instructions"
        );
    }

    /// Read, parse and register one dockerfile from disk.
    ///
    /// Nothing is registered when reading or parsing fails.
    pub fn parse_file(&mut self, path: &Path) -> Result<()> {
        let text = read_dockerfile(path)?;
        let nodes = parse_dockerfile(&text)
            .with_context(|| format!("failed to parse dockerfile: {}", path.display()))?;

        self.register_parsed_file(&path.display().to_string(), &nodes);
        Ok(())
    }

    pub fn configure(&mut self, config: RuleConfig) {
        self.config = config;
    }

    /// Run every enabled rule in catalog order over all registered files.
    pub fn evaluate(&mut self) -> ViolationReport {
        let report = evaluate_rules(&self.files, &self.config);
        info!(
            files = self.files.len(),
            rules = report.violations.len(),
            violations = report.violation_count(),
            "benchmark complete"
        );
        self.report = report.clone();
        report
    }

    /// Report from the most recent `evaluate`; empty before the first run.
    pub fn report(&self) -> &ViolationReport {
        &self.report
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn instruction_set(&self, file_id: &str) -> Option<&InstructionSet> {
        self.files.get(file_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::RuleId;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn nodes() -> Vec<Node> {
        vec![
            Node::new("from", ["alpine"]),
            Node::new("run", ["apk update"]),
            Node::new("user", ["app"]),
        ]
    }

    #[test]
    fn report_is_empty_before_evaluation() {
        let bm = Benchmarker::new();
        assert!(bm.report().violations.is_empty());
        assert_eq!(bm.file_count(), 0);
    }

    #[test]
    fn registering_twice_equals_registering_concatenation() {
        let nodes = nodes();

        let mut twice = Benchmarker::new();
        twice.register_parsed_file("Dockerfile", &nodes);
        twice.register_parsed_file("Dockerfile", &nodes);

        let mut once = Benchmarker::new();
        once.register_parsed_file("Dockerfile", nodes.iter().chain(nodes.iter()));

        assert_eq!(
            twice.instruction_set("Dockerfile"),
            once.instruction_set("Dockerfile")
        );
        assert_eq!(twice.instruction_set("Dockerfile").unwrap().len(), 6);
        assert_eq!(twice.evaluate(), once.evaluate());
    }

    #[test]
    fn evaluate_stores_latest_report() {
        let mut bm = Benchmarker::new();
        bm.register_parsed_file("Dockerfile", &nodes());

        let report = bm.evaluate();

        assert_eq!(&report, bm.report());
        assert_eq!(
            report.get(RuleId::UpdateWithoutInstall).unwrap().items,
            vec!["Dockerfile"]
        );
    }

    #[test]
    fn configure_enables_list_rules() {
        let mut bm = Benchmarker::new();
        bm.register_parsed_file("Dockerfile", &nodes());
        bm.configure(RuleConfig::default().with_trusted_base_images(["ubuntu"]));

        let report = bm.evaluate();

        assert_eq!(
            report.get(RuleId::TrustedBaseImage).unwrap().items,
            vec!["Dockerfile: alpine"]
        );
        assert!(report.get(RuleId::DisallowedPackage).is_none());
        assert!(report.get(RuleId::NoSecrets).is_none());
    }

    #[test]
    fn parse_file_registers_under_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "FROM alpine\nUSER app\nHEALTHCHECK NONE").unwrap();
        file.flush().unwrap();

        let mut bm = Benchmarker::new();
        bm.parse_file(file.path()).expect("parse succeeds");

        let id = file.path().display().to_string();
        assert_eq!(bm.instruction_set(&id).unwrap().len(), 3);
    }

    #[test]
    fn parse_file_failure_registers_nothing() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "FROM alpine\nRUN").unwrap();
        file.flush().unwrap();

        let mut bm = Benchmarker::new();
        let err = bm.parse_file(file.path()).unwrap_err();

        assert!(format!("{err:#}").contains("requires at least one argument"));
        assert_eq!(bm.file_count(), 0);
    }
}
