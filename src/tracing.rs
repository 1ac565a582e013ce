//! Tracing initialization.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize the global subscriber. Safe to call multiple times.
///
/// `RUST_LOG` overrides the default filter. Under a test runner the
/// subscriber raises the crate to debug level and writes through the
/// test writer, so output lands in the captured test log; otherwise it
/// writes to stderr so ranked results on stdout stay pipeable.
pub fn init() {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let default_directives = if is_test {
            "webdex=debug,warn"
        } else {
            "webdex=info,warn"
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directives));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact();

        let result = if is_test {
            builder.with_test_writer().try_init()
        } else {
            builder.with_writer(std::io::stderr).try_init()
        };
        if let Err(error) = result {
            eprintln!("failed to initialize tracing: {error}");
        }
    });
}
