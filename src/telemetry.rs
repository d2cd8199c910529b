//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter, e.g. `IDIOM_QUIZ_LOG=idiom_quiz=debug`.
pub const LOG_ENV: &str = "IDIOM_QUIZ_LOG";

static INIT: Once = Once::new();

/// Install the global subscriber, writing to stderr.
///
/// Falls back to `idiom_quiz=info` (or `idiom_quiz=debug` when `verbose`) if `IDIOM_QUIZ_LOG`
/// is unset or invalid. Calling it again is a no-op.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose {
            "idiom_quiz=debug"
        } else {
            "idiom_quiz=info"
        };
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    });
}
