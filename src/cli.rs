pub mod command;
pub mod exec;

use crate::domain::ExecError;

pub use command::{AppContext, CommandDescriptor, GlobalArgs, dispatch, root_command};

/// Every subcommand known to the CLI, in help order.
pub fn descriptors() -> Vec<CommandDescriptor> {
    vec![exec::descriptor()]
}

/// Process exit code for a failed command.
///
/// The inner command's own status is passed through, an interrupt maps to
/// 130 and every other failure to 1.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ExecError>() {
        Some(ExecError::CommandExited { code }) => *code,
        Some(ExecError::Cancelled) => 130,
        _ => 1,
    }
}

/// Message to print on stderr, if any. Failures of the inner command and
/// interrupts are silent.
pub fn error_report(err: &anyhow::Error) -> Option<String> {
    match err.downcast_ref::<ExecError>() {
        Some(ExecError::CommandExited { .. } | ExecError::Cancelled) => None,
        _ => Some(format!("Error: {err:#}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ServiceNames;
    use anyhow::anyhow;

    #[test]
    fn test_inner_exit_code_is_passed_through() {
        let err = anyhow::Error::from(ExecError::CommandExited { code: 3 });
        assert_eq!(exit_code(&err), 3);
        assert_eq!(error_report(&err), None);
    }

    #[test]
    fn test_cancelled_exits_130() {
        let err = anyhow::Error::from(ExecError::Cancelled);
        assert_eq!(exit_code(&err), 130);
        assert_eq!(error_report(&err), None);
    }

    #[test]
    fn test_resolution_failure_exits_1() {
        let services: ServiceNames = ["web"].into_iter().collect();
        let err = anyhow::Error::from(ExecError::NoMatchingContainer { services });

        assert_eq!(exit_code(&err), 1);
        assert_eq!(
            error_report(&err).as_deref(),
            Some("Error: no containers found for [web]")
        );
    }

    #[test]
    fn test_upstream_error_exits_1() {
        let err = anyhow!("no such service: api").context("resolving target");

        assert_eq!(exit_code(&err), 1);
        assert_eq!(
            error_report(&err).as_deref(),
            Some("Error: resolving target: no such service: api")
        );
    }
}
