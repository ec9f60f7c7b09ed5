use super::{Container, ExecContext, Invocation, ServiceNames};
use crate::infra::RuntimeClient;
use anyhow::Result;
use std::fmt::Debug;

/// Maps a compose project onto service names and live containers
pub trait Composer: Send + Sync + Debug {
    /// Service names matching a user-supplied specifier.
    ///
    /// The matching rule belongs to the implementation; callers treat the
    /// result as an opaque, possibly empty set.
    fn service_names(&self, ctx: &ExecContext, specifier: &str) -> Result<ServiceNames>;

    /// Running containers backing the given services
    fn containers(&self, ctx: &ExecContext, services: &ServiceNames) -> Result<Vec<Container>>;
}

/// Runs a command inside an already resolved container
pub trait ExecExecutor: Send + Sync + Debug {
    fn run(
        &self,
        ctx: &ExecContext,
        invocation: &Invocation,
        container: &Container,
        client: &RuntimeClient,
    ) -> Result<()>;
}
