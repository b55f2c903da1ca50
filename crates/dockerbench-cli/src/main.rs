use anyhow::Result;
use clap::Parser;
use tracing::info;

use dockerbench_core::dockerfile::discover::discover_dockerfiles;
use dockerbench_core::report::render;
use dockerbench_core::{RuleConfig, benchmark_paths};

mod args;
mod logging;

use args::parse_list;

fn main() -> Result<()> {
    let args = args::Args::parse();
    logging::init_tracing(&args.level)?;

    let trusted_base_images = parse_list(&args.trusted_base_images);
    let disallowed_packages = parse_list(&args.disallowed_packages);
    let secret_patterns = parse_list(&args.secret_patterns);

    info!(images = ?trusted_base_images, "trusted base images");
    info!(packages = ?disallowed_packages, "disallowed packages");
    info!(patterns = ?secret_patterns, "secret patterns");

    let paths = discover_dockerfiles(&args.directory, &args.dockerfile_pattern);
    info!(
        directory = %args.directory.display(),
        count = paths.len(),
        "discovered dockerfiles"
    );

    let config = RuleConfig::from_lists(
        &trusted_base_images,
        &disallowed_packages,
        &secret_patterns,
    );
    let report = benchmark_paths(&paths, config);

    let output = match args.format {
        args::OutputFormat::Json => format!("{}\n", render::render_json(&report)?),
        args::OutputFormat::Text => render::render_text(&report, env!("CARGO_PKG_VERSION")),
    };

    match args.out {
        Some(path) => std::fs::write(path, &output)?,
        None => print!("{output}"),
    }

    if args.fail_on_violation && report.has_violations() {
        std::process::exit(1);
    }

    Ok(())
}
