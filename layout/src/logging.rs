//! Reuses the simulation core's `slog` setup rather than wiring up a second
//! logging stack for this crate.

pub use slog::{debug, info, trace, warn};
pub use vsrtl::logging::{discard_logger, initialize_logger, Logger};
