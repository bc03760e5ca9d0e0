//! Tracing subscriber setup for the roster search binary.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Setting
/// `LOG_FORMAT=json` switches to JSON lines. Logs go to stderr so that
/// command output on stdout stays machine readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // A subscriber may already be installed, e.g. by a test harness
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
