use crate::domain::{Composer, Container, ExecContext, ExecError, ExecExecutor, Invocation};
use crate::infra::RuntimeClient;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves a compose service to a single running container and hands the
/// invocation over to the executor.
pub struct ExecService {
    composer: Arc<dyn Composer>,
    executor: Arc<dyn ExecExecutor>,
}

impl ExecService {
    pub fn new(composer: Arc<dyn Composer>, executor: Arc<dyn ExecExecutor>) -> Self {
        Self { composer, executor }
    }

    /// Resolves `target` to exactly one running container.
    ///
    /// Composer errors are returned untouched. An empty result fails with
    /// [`ExecError::NoMatchingContainer`], more than one container with
    /// [`ExecError::AmbiguousTarget`]; no instance is ever picked on the
    /// user's behalf.
    pub fn resolve(&self, ctx: &ExecContext, target: &str) -> Result<Container> {
        let services = self.composer.service_names(ctx, target)?;
        debug!(target, %services, "services resolved");

        let mut containers = self.composer.containers(ctx, &services)?;
        debug!(%services, count = containers.len(), "containers resolved");

        match containers.len() {
            0 => Err(ExecError::NoMatchingContainer { services }.into()),
            1 => Ok(containers.remove(0)),
            count => Err(ExecError::AmbiguousTarget { services, count }.into()),
        }
    }

    /// Resolves the invocation's target and runs its command there.
    ///
    /// Whatever the executor returns is passed back as is.
    pub fn run(
        &self,
        ctx: &ExecContext,
        invocation: &Invocation,
        client: &RuntimeClient,
    ) -> Result<()> {
        let container = self.resolve(ctx, invocation.target())?;
        info!("dispatching to {} ({})", container.name, container.id);

        self.executor.run(ctx, invocation, &container, client)
    }
}
