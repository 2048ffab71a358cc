use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

/// Initialise logging. In debug mode the default level is `debug` and may be
/// overridden via the `RUST_LOG` environment variable; otherwise the level is
/// forced to `info`.
///
/// When `file` is given, log lines are appended to it instead of stderr.
pub fn init(debug: bool, file: Option<PathBuf>) {
    // Ignore `RUST_LOG` unless debug logging was asked for, so a stray
    // variable in the user's environment cannot make the overlay noisy.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match file.as_ref().and_then(|p| split_log_path(p)) {
        Some((dir, name)) => {
            let appender = tracing_appender::rolling::never(dir, name);
            let _ = builder.with_ansi(false).with_writer(appender).try_init();
        }
        None => {
            let _ = builder.try_init();
        }
    }
}

fn split_log_path(path: &Path) -> Option<(PathBuf, std::ffi::OsString)> {
    let name = path.file_name()?.to_os_string();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some((dir, name))
}
