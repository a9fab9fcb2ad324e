//! Logging setup shared by the simulation core and its embedders.
//!
//! The core never logs to `stdout` directly; it takes a [`Logger`] at
//! [`crate::core::design::Design`] construction time and logs propagation
//! diagnostics (settle-round retries, reverse-stack trims) through it. This
//! follows the same `slog`-through-the-interpreter convention used
//! throughout this crate, rather than reaching for `println!`.

// re-export for convenience
pub use slog::Logger;
#[allow(unused_imports)]
pub use slog::{debug, error, info, o, trace, warn};

use slog::{Drain, Level};

/// Build a terminal logger. `verbose` lowers the filter level from `Info` to
/// `Trace`, which is useful when chasing down why a settle round failed to
/// converge.
pub fn initialize_logger(verbose: bool) -> Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build();
    let filter_level = if verbose { Level::Trace } else { Level::Info };
    let drain = drain.filter_level(filter_level).fuse();
    let drain = slog_async::Async::new(drain)
        .chan_size(1024)
        .overflow_strategy(slog_async::OverflowStrategy::Block)
        .build()
        .fuse();

    Logger::root(drain, o!())
}

/// A logger that discards everything, for tests and embedders that don't
/// want terminal output.
pub fn discard_logger() -> Logger {
    Logger::root(slog::Discard, o!())
}
