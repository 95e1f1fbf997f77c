use anyhow::Context;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive for the crate's own events
fn filter_directive(debug: bool, quiet: bool, level: &str) -> String {
    let level = if debug {
        "debug"
    } else if quiet {
        "error"
    } else {
        level
    };
    format!("campus_store={}", level)
}

/// Initialize logging based on output mode, debug flag and configured level
pub fn init_logging(
    debug: bool,
    quiet: bool,
    level: &str,
    log_file: Option<&Path>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_new(filter_directive(debug, quiet, level))
        .with_context(|| format!("invalid log level '{}'", level))?;

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_line_number(debug)
        .with_file(debug)
        .with_writer(std::io::stderr);

    if let Some(log_path) = log_file {
        let dir = log_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = log_path
            .file_name()
            .with_context(|| format!("log file '{}' has no file name", log_path.display()))?;

        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;

        let appender = tracing_appender::rolling::never(dir, name);
        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_writer(appender)
            .with_target(true)
            .with_line_number(true)
            .with_file(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_quiet_override_level() {
        assert_eq!(filter_directive(true, false, "warn"), "campus_store=debug");
        assert_eq!(filter_directive(false, true, "info"), "campus_store=error");
        assert_eq!(filter_directive(false, false, "warn"), "campus_store=warn");
    }

    #[test]
    fn test_filter_directive_parses() {
        assert!(EnvFilter::try_new(filter_directive(false, false, "trace")).is_ok());
    }
}
