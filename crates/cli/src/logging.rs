//! Diagnostic logging for the `raci` binary.
//!
//! Library crates log through the `log` facade; the subscriber installed here
//! also bridges those records. Output goes to stderr so stdout stays clean
//! for `show --json`.
//!
//! Filtering follows `RUST_LOG` (for example `RUST_LOG=raci_io=debug`).
//! Without it the level is `warn`, or `debug` with `--verbose`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .with_filter(filter);

    // A second init (tests, embedding) is harmless
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
