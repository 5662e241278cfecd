//! Structured logging for the random user service.
//!
//! Every event carries the same set of fields (`service`, `process`,
//! `outcome`, `origin`) so that log collectors can group entries by the
//! pipeline stage that produced them. Events go through `tracing`, which is
//! configured in `main` with a JSON formatter and a non-blocking writer.

use tracing::Level;

/// Service name stamped on every event.
pub const SERVICE_NAME: &str = "random-user-service";

/// Main logging interface.
pub struct Log;

impl Log {
    /// Emits one structured event.
    ///
    /// `origin` is the source file of the call site; the `log_*!` macros fill
    /// it in with `file!()`.
    pub fn event(level: Level, process: &str, message: &str, outcome: &str, origin: &str) {
        // `tracing::event!` needs the level as a constant, hence the match.
        match level {
            Level::DEBUG => tracing::event!(
                Level::DEBUG,
                service = SERVICE_NAME,
                process = process,
                outcome = outcome,
                origin = origin,
                "{}",
                message
            ),
            Level::INFO => tracing::event!(
                Level::INFO,
                service = SERVICE_NAME,
                process = process,
                outcome = outcome,
                origin = origin,
                "{}",
                message
            ),
            Level::WARN => tracing::event!(
                Level::WARN,
                service = SERVICE_NAME,
                process = process,
                outcome = outcome,
                origin = origin,
                "{}",
                message
            ),
            Level::ERROR => tracing::event!(
                Level::ERROR,
                service = SERVICE_NAME,
                process = process,
                outcome = outcome,
                origin = origin,
                "{}",
                message
            ),
            _ => tracing::event!(
                Level::TRACE,
                service = SERVICE_NAME,
                process = process,
                outcome = outcome,
                origin = origin,
                "{}",
                message
            ),
        }
    }
}

#[macro_export]
macro_rules! log_debug {
    ($process:expr, $message:expr, $outcome:expr) => {
        $crate::utils::log::Log::event(
            ::tracing::Level::DEBUG,
            $process,
            $message,
            $outcome,
            file!(),
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($process:expr, $message:expr, $outcome:expr) => {
        $crate::utils::log::Log::event(
            ::tracing::Level::INFO,
            $process,
            $message,
            $outcome,
            file!(),
        )
    };
}

#[macro_export]
macro_rules! log_warn {
    ($process:expr, $message:expr, $outcome:expr) => {
        $crate::utils::log::Log::event(
            ::tracing::Level::WARN,
            $process,
            $message,
            $outcome,
            file!(),
        )
    };
}

#[macro_export]
macro_rules! log_error {
    ($process:expr, $message:expr, $outcome:expr) => {
        $crate::utils::log::Log::event(
            ::tracing::Level::ERROR,
            $process,
            $message,
            $outcome,
            file!(),
        )
    };
}
