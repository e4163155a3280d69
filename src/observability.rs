//! Observability utilities.
//!
//! Delivery runs on caller threads and logs drop points at debug level;
//! embedding programs that want those logs call [`init_tracing`] once early.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Initialize the tracing subscriber once for the process.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Setting
/// `UEVENT_LOG_FORMAT=json` switches the plain text output to JSON lines.
pub fn init_tracing() {
    TRACING_INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let json = std::env::var("UEVENT_LOG_FORMAT")
            .is_ok_and(|v| v.eq_ignore_ascii_case("json"));

        let registry = tracing_subscriber::registry().with(filter);
        let result = if json {
            registry.with(fmt::layer().json()).try_init()
        } else {
            registry.with(fmt::layer().compact()).try_init()
        };

        // A subscriber installed by the embedding program wins.
        if let Err(err) = result {
            eprintln!("tracing init skipped: {err}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::init_tracing;

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
