//! Diagnostic logging
//!
//! Logs go to stderr so they never mix with output meant for piping. The
//! default level is `warn`; `--verbose` raises it to `debug` and `RUST_LOG`
//! overrides both:
//!
//! ```bash
//! RUST_LOG=tunnel_boot=trace tunnel-boot start-tunnel myapp 8080
//! ```

use std::sync::Once;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "tunnel_boot=debug,warn"
    } else {
        "warn"
    }
}

/// Initialize logging. Only the first call takes effect.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(default_filter(verbose))
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbose)
            .with_level(true)
            .with_filter(filter);

        // Another subscriber may already be installed when embedded in tests
        let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "warn");
        assert!(default_filter(true).contains("tunnel_boot=debug"));
    }

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
    }
}
