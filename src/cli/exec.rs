use super::command::{AppContext, CommandDescriptor};
use crate::domain::invocation::parse_user_spec;
use crate::domain::{ExecContext, ExecError, ExecOptions, Invocation};
use crate::infra::compose_file::load_project;
use crate::infra::config::load_app_config;
use crate::infra::{PodmanComposer, PodmanExecutor, RuntimeClient};
use crate::services::ExecService;
use anyhow::Result;
use clap::{ArgAction, ArgMatches, Args, Command, FromArgMatches};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Args, Debug, Clone)]
pub struct ExecArgs {
    /// Allocate a pseudo-TTY (currently -t needs to correspond to -i)
    #[arg(short, long)]
    pub tty: bool,

    /// Keep STDIN open even if not attached
    #[arg(short, long)]
    pub interactive: bool,

    /// Detached mode: run command in the background
    #[arg(short, long)]
    pub detach: bool,

    /// Working directory inside the container
    #[arg(short, long)]
    pub workdir: Option<String>,

    /// Set environment variables (KEY=VALUE, never split on commas)
    #[arg(short, long, action = ArgAction::Append)]
    pub env: Vec<String>,

    /// Set environment variables from file (comma-separated list allowed)
    #[arg(long = "env-file", value_delimiter = ',')]
    pub env_file: Vec<PathBuf>,

    /// Give extended privileges to the command
    #[arg(long)]
    pub privileged: bool,

    /// Username or UID (format: <name|uid>[:<group|gid>])
    #[arg(short, long, value_parser = parse_user_spec)]
    pub user: Option<String>,

    /// Service name followed by the command and its arguments
    #[arg(value_name = "ARGS", num_args = 2.., required = true, trailing_var_arg = true)]
    pub args: Vec<String>,
}

impl ExecArgs {
    pub fn into_invocation(self) -> Result<Invocation, ExecError> {
        let options = ExecOptions {
            tty: self.tty,
            interactive: self.interactive,
            detach: self.detach,
            workdir: self.workdir,
            env: self.env,
            env_file: self.env_file,
            privileged: self.privileged,
            user: self.user,
        };
        Invocation::new(&self.args, options)
    }
}

/// Builds the `exec` subcommand.
pub fn descriptor() -> CommandDescriptor {
    let command = Command::new("exec")
        .about("Execute a command in a running container of a service")
        .override_usage("podcompose exec [OPTIONS] SERVICE COMMAND [ARG...]");

    CommandDescriptor {
        name: "exec",
        command: ExecArgs::augment_args(command),
        handler: handle,
    }
}

fn handle(matches: &ArgMatches, app: &AppContext) -> Result<()> {
    let args = ExecArgs::from_arg_matches(matches)?;
    run(args, app)
}

pub fn run(args: ExecArgs, app: &AppContext) -> Result<()> {
    let invocation = args.into_invocation()?;

    let mut config = load_app_config(&app.globals.config_dir, &app.work_dir)?;
    app.globals.overrides().apply(&mut config);

    let ctx = ExecContext::new(app.cancel.clone()).with_query_timeout(config.query_timeout());
    let client = Arc::new(RuntimeClient::connect(config.runtime_binary(), &ctx)?);

    let project = load_project(&app.work_dir, &config)?;
    debug!(project = %project.name, dir = ?project.dir(), "project loaded");

    let composer = Arc::new(PodmanComposer::new(project, Arc::clone(&client)));
    let service = ExecService::new(composer, Arc::new(PodmanExecutor::new()));

    service.run(&ctx, &invocation, &client)
}
