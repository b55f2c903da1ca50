pub mod benchmarker;
pub mod dockerfile;
pub mod instructions;
pub mod report;
pub mod rules;
pub mod util;

use std::path::PathBuf;

use tracing::error;

pub use benchmarker::Benchmarker;
pub use report::model::{RuleViolation, ViolationReport};
pub use rules::catalog::RuleId;
pub use rules::config::RuleConfig;

pub const TOOL_NAME: &str = "dockerbench";

/// Parse every path, skip the ones that fail, and evaluate the rest.
///
/// Read and parse failures are logged per file; they never abort the run.
pub fn benchmark_paths(paths: &[PathBuf], config: RuleConfig) -> ViolationReport {
    let mut bm = Benchmarker::new();
    bm.configure(config);

    for path in paths {
        if let Err(err) = bm.parse_file(path) {
            error!(file = %path.display(), error = %format!("{err:#}"), "skipping dockerfile");
        }
    }

    bm.evaluate()
}
