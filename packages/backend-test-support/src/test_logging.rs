//! Unified logging initialization for tests.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: OnceCell<()> = OnceCell::new();

/// Initialize tracing once per test process. Quiet by default; set
/// `RUST_LOG` to see output from the code under test.
pub fn init() {
    INIT.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        let fmt_layer = fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_test_writer();

        // Another harness may already have installed a subscriber; that is
        // fine in tests.
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    });
}
