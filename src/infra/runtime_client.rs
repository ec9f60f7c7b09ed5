use crate::domain::{CancelToken, ExecContext, ExecError};
use anyhow::{Context, Result, bail};
use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Scoped handle on the container runtime binary.
///
/// Every process started through the client is tied to the invocation's
/// cancellation token and to the client's own scope. Dropping the client
/// cancels its scope, so nothing it started outlives it.
#[derive(Debug)]
pub struct RuntimeClient {
    binary: String,
    scope: CancelToken,
}

impl RuntimeClient {
    /// Creates a client without probing the binary.
    pub fn new(binary: impl Into<String>, ctx: &ExecContext) -> Self {
        Self {
            binary: binary.into(),
            scope: ctx.cancel_token().child(),
        }
    }

    /// Creates a client and checks that the runtime answers `--version`.
    pub fn connect(binary: &str, ctx: &ExecContext) -> Result<Self> {
        let client = Self::new(binary, ctx);

        match client.output(ctx, ["--version"]) {
            Ok(version) => {
                debug!(binary, version = version.trim(), "runtime client connected");
                Ok(client)
            }
            Err(err) if err.downcast_ref::<ExecError>().is_some() => Err(err),
            Err(err) => Err(err.context(format!("container runtime '{binary}' is not available"))),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn scope(&self) -> &CancelToken {
        &self.scope
    }

    /// Base command for the runtime binary, with no arguments yet.
    pub fn command(&self) -> Command {
        Command::new(&self.binary)
    }

    /// Runs the runtime with `args` and returns its stdout.
    ///
    /// Honors cancellation and the context's query timeout. A non-zero exit
    /// is an error carrying the runtime's stderr.
    pub fn output<I, S>(&self, ctx: &ExecContext, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args
            .into_iter()
            .map(|item| item.as_ref().to_os_string())
            .collect();
        let shown = display_command(&self.binary, &args);

        self.check(ctx)?;
        debug!(command = %shown, "runtime query");

        let mut child = self
            .command()
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("running {shown}"))?;

        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        let status = self.wait(ctx, &mut child, Some(ctx.query_timeout()))?;

        let stdout = join_reader(stdout);
        let stderr = join_reader(stderr);

        if !status.success() {
            bail!("{shown} returned {status}: {}", stderr.trim());
        }

        Ok(stdout)
    }

    /// Waits for `child`, killing it on cancellation or once `timeout` elapses.
    pub fn wait(
        &self,
        ctx: &ExecContext,
        child: &mut Child,
        timeout: Option<Duration>,
    ) -> Result<ExitStatus> {
        let started = Instant::now();

        loop {
            if let Some(status) = child.try_wait().context("waiting for runtime process")? {
                return Ok(status);
            }

            if let Err(err) = self.check(ctx) {
                kill(child);
                return Err(err.into());
            }

            if let Some(limit) = timeout {
                if started.elapsed() >= limit {
                    kill(child);
                    return Err(ExecError::Timeout(limit).into());
                }
            }

            thread::sleep(POLL_INTERVAL);
        }
    }

    fn check(&self, ctx: &ExecContext) -> Result<(), ExecError> {
        ctx.check()?;
        if self.scope.is_cancelled() {
            return Err(ExecError::Cancelled);
        }
        Ok(())
    }
}

impl Drop for RuntimeClient {
    fn drop(&mut self) {
        self.scope.cancel();
        debug!(binary = %self.binary, "runtime client released");
    }
}

fn kill(child: &mut Child) {
    // the process may already have exited between the poll and the kill
    let _ = child.kill();
    let _ = child.wait();
}

fn spawn_reader<R>(pipe: Option<R>) -> Option<JoinHandle<String>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

fn display_command(binary: &str, args: &[OsString]) -> String {
    let mut parts = vec![binary.to_string()];
    parts.extend(args.iter().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}
