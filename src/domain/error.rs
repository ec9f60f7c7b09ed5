use super::ServiceNames;
use std::time::Duration;
use thiserror::Error;

/// Failures raised by `exec` itself.
///
/// Errors coming from the compose project or the runtime are carried as
/// plain `anyhow::Error` and are never converted into this type.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("no containers found for {services}")]
    NoMatchingContainer { services: ServiceNames },

    #[error("multiple containers found for {services} ({count} running)")]
    AmbiguousTarget { services: ServiceNames, count: usize },

    #[error("exec requires a service and a command to run")]
    MissingCommand,

    #[error("operation cancelled")]
    Cancelled,

    #[error("runtime query timed out after {0:?}")]
    Timeout(Duration),

    #[error("command exited with status {code}")]
    CommandExited { code: i32 },
}
