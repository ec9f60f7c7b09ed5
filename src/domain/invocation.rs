use super::ExecError;
use std::path::PathBuf;

pub const DOUBLE_DASH: &str = "--";

/// Rewrites `SERVICE -- COMMAND...` into `SERVICE COMMAND...`.
///
/// Flag parsers that stop at the first positional keep a standalone `--`
/// that follows it as a value. Dropping it here means the target is always
/// at index 0 and the inner command always starts at index 1. Any other
/// input is returned as an unchanged copy.
pub fn normalize_args(args: &[String]) -> Vec<String> {
    if args.len() >= 2 && args[1] == DOUBLE_DASH {
        let mut normalized = Vec::with_capacity(args.len() - 1);
        normalized.push(args[0].clone());
        normalized.extend_from_slice(&args[2..]);
        return normalized;
    }

    args.to_vec()
}

/// Options forwarded to the exec call. None of them affect resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOptions {
    pub tty: bool,
    pub interactive: bool,
    pub detach: bool,
    pub workdir: Option<String>,
    /// `KEY=VALUE` pairs, kept verbatim
    pub env: Vec<String>,
    pub env_file: Vec<PathBuf>,
    pub privileged: bool,
    /// `name|uid[:group|gid]`
    pub user: Option<String>,
}

/// A normalized `exec` invocation: target service plus inner command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    args: Vec<String>,
    options: ExecOptions,
}

impl Invocation {
    pub fn new(args: &[String], options: ExecOptions) -> Result<Self, ExecError> {
        let args = normalize_args(args);
        if args.len() < 2 {
            return Err(ExecError::MissingCommand);
        }
        Ok(Self { args, options })
    }

    /// Service specifier the user asked for.
    pub fn target(&self) -> &str {
        &self.args[0]
    }

    /// Command to run inside the container.
    pub fn command(&self) -> &[String] {
        &self.args[1..]
    }

    /// Full normalized argument list, target included.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn options(&self) -> &ExecOptions {
        &self.options
    }
}

/// Validates a `--user` value of the form `name|uid[:group|gid]`.
pub fn parse_user_spec(value: &str) -> Result<String, String> {
    let invalid = || format!("invalid user '{value}' (expected <name|uid>[:<group|gid>])");

    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let mut parts = value.split(':');
    let user = parts.next().unwrap_or_default();
    if user.is_empty() {
        return Err(invalid());
    }
    if let Some(group) = parts.next() {
        if group.is_empty() {
            return Err(invalid());
        }
    }
    if parts.next().is_some() {
        return Err(invalid());
    }

    Ok(value.to_string())
}
