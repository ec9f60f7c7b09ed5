use crate::domain::CancelToken;
use crate::infra::config::{ConfigOverrides, default_config_dir};
use anyhow::{Context, Result};
use clap::{ArgMatches, Args, Command, FromArgMatches};
use std::path::PathBuf;

/// Entry point of a subcommand once its arguments are parsed.
pub type Handler = fn(&ArgMatches, &AppContext) -> Result<()>;

/// A subcommand: its name, flag schema and handler.
///
/// Descriptors are built by factory functions and composed into the root
/// command by [`root_command`].
pub struct CommandDescriptor {
    pub name: &'static str,
    pub command: Command,
    pub handler: Handler,
}

/// Flags accepted by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Configuration directory (default: ~/.config/podcompose)
    #[arg(long, global = true, env = "PODCOMPOSE_CONFIG_DIR", default_value_os_t = default_config_dir())]
    pub config_dir: PathBuf,

    /// Compose configuration files
    #[arg(short = 'f', long = "file", global = true, env = "COMPOSE_FILE", value_delimiter = ':')]
    pub files: Vec<PathBuf>,

    /// Project name
    #[arg(short = 'p', long, global = true, env = "COMPOSE_PROJECT_NAME")]
    pub project_name: Option<String>,

    /// Container runtime binary (default: podman)
    #[arg(long, global = true, env = "PODCOMPOSE_RUNTIME")]
    pub runtime: Option<String>,
}

impl GlobalArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            runtime: self.runtime.clone(),
            files: self.files.clone(),
            project_name: self.project_name.clone(),
        }
    }
}

/// Everything a handler needs beyond its own arguments.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub globals: GlobalArgs,
    pub cancel: CancelToken,
    pub work_dir: PathBuf,
}

pub fn root_command(descriptors: &[CommandDescriptor]) -> Command {
    let root = Command::new("podcompose")
        .about("Compose-style commands for Podman and other Docker-compatible runtimes")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true);

    descriptors
        .iter()
        .fold(GlobalArgs::augment_args(root), |cmd, descriptor| {
            cmd.subcommand(descriptor.command.clone())
        })
}

/// Routes parsed root matches to the matching descriptor's handler.
pub fn dispatch(
    descriptors: &[CommandDescriptor],
    matches: &ArgMatches,
    cancel: CancelToken,
) -> Result<()> {
    let globals = GlobalArgs::from_arg_matches(matches)?;
    let (name, sub_matches) = matches.subcommand().context("no command given")?;

    let descriptor = descriptors
        .iter()
        .find(|d| d.name == name)
        .with_context(|| format!("unknown command '{name}'"))?;

    let app = AppContext {
        globals,
        cancel,
        work_dir: std::env::current_dir().context("reading current directory")?,
    };

    (descriptor.handler)(sub_matches, &app)
}
