use crate::domain::{ComposeProject, Composer, Container, ExecContext, ServiceNames};
use crate::infra::RuntimeClient;
use anyhow::{Result, bail};
use std::sync::Arc;
use tracing::debug;

pub const PROJECT_LABEL: &str = "com.docker.compose.project";
pub const SERVICE_LABEL: &str = "com.docker.compose.service";

const PS_FORMAT: &str = "{{.ID}}\t{{.Names}}";

/// Composer backed by a loaded compose project and the runtime's `ps`.
#[derive(Debug)]
pub struct PodmanComposer {
    project: ComposeProject,
    client: Arc<RuntimeClient>,
}

impl PodmanComposer {
    pub fn new(project: ComposeProject, client: Arc<RuntimeClient>) -> Self {
        Self { project, client }
    }

    fn ps_args(&self, service: &str) -> Vec<String> {
        vec![
            "ps".into(),
            "--filter".into(),
            format!("label={PROJECT_LABEL}={}", self.project.name),
            "--filter".into(),
            format!("label={SERVICE_LABEL}={service}"),
            "--format".into(),
            PS_FORMAT.into(),
        ]
    }
}

impl Composer for PodmanComposer {
    fn service_names(&self, ctx: &ExecContext, specifier: &str) -> Result<ServiceNames> {
        ctx.check()?;

        if !self.project.has_service(specifier) {
            bail!("no such service: {specifier}");
        }

        Ok([specifier].into_iter().collect())
    }

    fn containers(&self, ctx: &ExecContext, services: &ServiceNames) -> Result<Vec<Container>> {
        let mut containers = Vec::new();

        for service in services.iter() {
            ctx.check()?;
            let output = self.client.output(ctx, self.ps_args(service))?;
            let found = parse_ps_output(&output, service);
            debug!(
                project = %self.project.name,
                service,
                count = found.len(),
                "running containers"
            );
            containers.extend(found);
        }

        Ok(containers)
    }
}

/// Parses `ID<TAB>NAMES` lines from `ps`. Blank lines are skipped.
fn parse_ps_output(output: &str, service: &str) -> Vec<Container> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once(char::is_whitespace) {
            Some((id, names)) => Container::new(id, names.trim(), service),
            None => Container::new(line, line, service),
        })
        .collect()
}
