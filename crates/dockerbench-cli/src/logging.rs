use anyhow::{Context, Result, bail};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding a per-target filter, e.g.
/// `DOCKERBENCH_LOG=dockerbench_core=debug`.
pub const LOG_ENV: &str = "DOCKERBENCH_LOG";

/// Install the global subscriber.
///
/// Logs go to stderr so stdout stays a clean report. `DOCKERBENCH_LOG`
/// wins over `--level` when set and valid.
pub fn init_tracing(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => {
            let directive = level_directive(level)?;
            EnvFilter::try_new(&directive)
                .with_context(|| format!("invalid log level: {level}"))?
        }
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init()
        .context("failed to install log subscriber")
}

/// Normalize `--level` into an `EnvFilter` directive.
///
/// Bare words must be a level; logrus names map to their closest tracing
/// level. Anything with `=` or `,` is passed through as a filter.
fn level_directive(level: &str) -> Result<String> {
    let level = level.trim();
    if level.contains(['=', ',']) {
        return Ok(level.to_string());
    }

    let normalized = match level.to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "fatal" | "panic" => "error".to_string(),
        other => other.to_string(),
    };

    if normalized.parse::<LevelFilter>().is_err() {
        bail!("invalid log level: {level}");
    }
    Ok(normalized)
}
