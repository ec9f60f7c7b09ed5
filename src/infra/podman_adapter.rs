use crate::domain::{Container, ExecContext, ExecError, ExecExecutor, ExecOptions, Invocation};
use crate::infra::RuntimeClient;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tracing::{debug, info};

/// Runs `<runtime> exec ...` with the terminal attached.
#[derive(Debug, Default)]
pub struct PodmanExecutor;

impl PodmanExecutor {
    pub fn new() -> Self {
        Self
    }
}

/// Builds the arguments of the runtime's `exec` subcommand.
pub fn exec_args(options: &ExecOptions, container: &Container, command: &[String]) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["exec".into()];

    if options.interactive {
        args.push("-i".into());
    }
    if options.tty {
        args.push("-t".into());
    }
    if options.detach {
        args.push("-d".into());
    }
    if let Some(wd) = &options.workdir {
        args.push("-w".into());
        args.push(wd.into());
    }

    for env in &options.env {
        args.push("-e".into());
        args.push(env.into());
    }

    for file in &options.env_file {
        args.push("--env-file".into());
        args.push(expand_tilde(file).into());
    }

    if options.privileged {
        args.push("--privileged".into());
    }
    if let Some(user) = &options.user {
        args.push("-u".into());
        args.push(user.into());
    }

    args.push(container.id.as_str().into());
    args.extend(command.iter().map(OsString::from));
    args
}

fn expand_tilde(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.to_string_lossy().as_ref()).into_owned())
}

impl ExecExecutor for PodmanExecutor {
    fn run(
        &self,
        ctx: &ExecContext,
        invocation: &Invocation,
        container: &Container,
        client: &RuntimeClient,
    ) -> Result<()> {
        ctx.check()?;

        let args = exec_args(invocation.options(), container, invocation.command());
        info!(
            container = %container.name,
            service = %container.service,
            "exec {:?}",
            invocation.command()
        );

        let mut child = client
            .command()
            .args(&args)
            .spawn()
            .with_context(|| format!("running {} exec in {}", client.binary(), container.name))?;

        // interactive sessions have no deadline, only cancellation
        let status = client.wait(ctx, &mut child, None)?;
        debug!(%status, "exec finished");

        if !status.success() {
            return Err(ExecError::CommandExited {
                code: exit_code_of(status),
            }
            .into());
        }

        Ok(())
    }
}

/// Exit code as a shell would report it: `128 + signal` for a command
/// killed by a signal.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
