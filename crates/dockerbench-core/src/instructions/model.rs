use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dockerfile::Node;

pub const ADD: &str = "add";
pub const ENV: &str = "env";
pub const FROM: &str = "from";
pub const HEALTHCHECK: &str = "healthcheck";
pub const LABEL: &str = "label";
pub const RUN: &str = "run";
pub const USER: &str = "user";

/// One normalized Dockerfile instruction.
///
/// Example: `RUN --network=none apt-get update` becomes
/// directive `run`, flags `["--network=none"]`, content `["apt-get update"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Lower-cased keyword; never empty.
    pub directive: String,
    pub flags: Vec<String>,
    /// Argument tokens in source order.
    pub content: Vec<String>,
}

impl Instruction {
    pub fn from_node(node: &Node) -> Self {
        Self {
            directive: node.directive.to_lowercase(),
            flags: node.flags.clone(),
            content: node.args.clone(),
        }
    }

    pub fn is(&self, directive: &str) -> bool {
        self.directive.eq_ignore_ascii_case(directive)
    }
}

/// All instructions known for one file, in append order.
///
/// Instructions are only ever appended; positions are stable and are used
/// as identities by the rule checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionSet {
    pub file_id: String,
    instructions: Vec<Instruction>,
}

impl InstructionSet {
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            instructions: Vec::new(),
        }
    }

    /// Convert one parsed node and append it.
    ///
    /// Nodes without a directive are dropped with a warning so the
    /// "directive is never empty" invariant holds for every stored entry.
    pub fn append_node(&mut self, node: &Node) {
        if node.directive.trim().is_empty() {
            warn!(file = %self.file_id, "dropping node without directive");
            return;
        }
        self.instructions.push(Instruction::from_node(node));
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_normalizes_directive_and_keeps_order() {
        let mut set = InstructionSet::new("Dockerfile");
        set.append_node(&Node::new("FROM", ["alpine:3.19"]));
        set.append_node(&Node::new("run", ["apk add curl"]).with_flags(["--network=none"]));

        let instructions = set.instructions();
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].directive, "from");
        assert_eq!(instructions[0].content, vec!["alpine:3.19"]);
        assert_eq!(instructions[1].directive, "run");
        assert_eq!(instructions[1].flags, vec!["--network=none"]);
    }

    #[test]
    fn empty_directive_is_never_stored() {
        let mut set = InstructionSet::new("Dockerfile");
        set.append_node(&Node::new("  ", ["ignored"]));

        assert!(set.is_empty());
    }

    #[test]
    fn repeated_appends_are_cumulative() {
        let nodes = vec![Node::new("from", ["alpine"]), Node::new("user", ["app"])];

        let mut twice = InstructionSet::new("a");
        for _ in 0..2 {
            for node in &nodes {
                twice.append_node(node);
            }
        }

        let mut concatenated = InstructionSet::new("a");
        for node in nodes.iter().chain(nodes.iter()) {
            concatenated.append_node(node);
        }

        assert_eq!(twice, concatenated);
        assert_eq!(twice.len(), 4);
    }

    #[test]
    fn directive_comparison_ignores_case() {
        let instruction = Instruction::from_node(&Node::new("USER", ["app"]));
        assert!(instruction.is("user"));
        assert!(instruction.is("USER"));
        assert!(!instruction.is("run"));
    }
}
