//! Read-only queries over an `InstructionSet`.
//!
//! Rule checks never touch instruction storage directly; they ask
//! "is there a directive X" or "which X instructions have a token matching
//! pattern P" and work with the returned positions.

use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::instructions::model::{FROM, InstructionSet};

/// Compile a content pattern for case-insensitive matching.
///
/// An invalid pattern is reported and yields `None`; callers treat that as
/// "matches nothing" so one bad input never aborts a run.
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(err) => {
            warn!(pattern, error = %err, "ignoring invalid content pattern");
            None
        }
    }
}

impl InstructionSet {
    /// True iff any instruction has the given directive.
    pub fn has_directive(&self, name: &str) -> bool {
        self.instructions().iter().any(|i| i.is(name))
    }

    /// Positions of `name` instructions with a content token matching `pattern`.
    ///
    /// One position is pushed per matching token, so an instruction can appear
    /// more than once. An invalid pattern yields an empty result.
    pub fn find_by_directive_and_pattern(&self, name: &str, pattern: &str) -> Vec<usize> {
        match compile_pattern(pattern) {
            Some(re) => self.find_by_directive_and_regex(name, &re),
            None => Vec::new(),
        }
    }

    /// Same as `find_by_directive_and_pattern` with a pre-compiled regex.
    pub fn find_by_directive_and_regex(&self, name: &str, re: &Regex) -> Vec<usize> {
        let mut positions = Vec::new();
        for (idx, instruction) in self.instructions().iter().enumerate() {
            if !instruction.is(name) {
                continue;
            }
            for token in &instruction.content {
                if re.is_match(token) {
                    positions.push(idx);
                }
            }
        }
        positions
    }

    /// Distinct image references named by `FROM`, in first-seen order.
    pub fn base_images(&self) -> Vec<String> {
        let mut images: Vec<String> = Vec::new();
        for instruction in self.instructions().iter().filter(|i| i.is(FROM)) {
            if let Some(image) = instruction.content.first() {
                if !images.contains(image) {
                    images.push(image.clone());
                }
            }
        }
        images
    }
}
