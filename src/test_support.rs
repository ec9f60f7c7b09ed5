use crate::domain::{
    Composer, Container, ExecContext, ExecError, ExecExecutor, ExecOptions, Invocation,
    ServiceNames,
};
use crate::infra::RuntimeClient;
use anyhow::{Result, bail};
use std::sync::RwLock;

/// In-memory composer recording every call it receives.
#[derive(Debug)]
pub struct MockComposer {
    services: RwLock<Vec<String>>,
    containers: RwLock<Vec<Container>>,
    calls: RwLock<Vec<String>>,
    fail_on: RwLock<Option<String>>,
}

impl MockComposer {
    pub fn new() -> Self {
        Self {
            services: RwLock::new(Vec::new()),
            containers: RwLock::new(Vec::new()),
            calls: RwLock::new(Vec::new()),
            fail_on: RwLock::new(None),
        }
    }

    pub fn add_service(&self, name: &str) {
        self.services.write().unwrap().push(name.to_string());
    }

    /// Registers a running container for `service`, named `<service>-<n>`.
    pub fn add_container(&self, service: &str, id: &str) {
        let mut containers = self.containers.write().unwrap();
        let n = containers.iter().filter(|c| c.service == service).count() + 1;
        containers.push(Container::new(id, format!("{service}-{n}"), service));
    }

    pub fn set_fail_on(&self, operation: &str) {
        *self.fail_on.write().unwrap() = Some(operation.to_string());
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    fn record_call(&self, call: String) {
        self.calls.write().unwrap().push(call);
    }

    fn check_fail(&self, operation: &str) -> Result<()> {
        if let Some(ref fail_on) = *self.fail_on.read().unwrap() {
            if fail_on == operation {
                bail!("Mock failure on: {}", operation);
            }
        }
        Ok(())
    }
}

impl Default for MockComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer for MockComposer {
    fn service_names(&self, ctx: &ExecContext, specifier: &str) -> Result<ServiceNames> {
        self.record_call(format!("service_names:{}", specifier));
        ctx.check()?;
        self.check_fail("service_names")?;

        Ok(self
            .services
            .read()
            .unwrap()
            .iter()
            .filter(|name| *name == specifier)
            .cloned()
            .collect())
    }

    fn containers(&self, ctx: &ExecContext, services: &ServiceNames) -> Result<Vec<Container>> {
        self.record_call(format!("containers:{}", services));
        ctx.check()?;
        self.check_fail("containers")?;

        Ok(self
            .containers
            .read()
            .unwrap()
            .iter()
            .filter(|c| services.contains(&c.service))
            .cloned()
            .collect())
    }
}

/// One recorded executor call.
#[derive(Debug, Clone)]
pub struct ExecRun {
    pub container: Container,
    pub args: Vec<String>,
    pub options: ExecOptions,
}

/// Executor that records what it would have run.
#[derive(Debug)]
pub struct MockExecutor {
    runs: RwLock<Vec<ExecRun>>,
    exit_code: RwLock<Option<i32>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            runs: RwLock::new(Vec::new()),
            exit_code: RwLock::new(None),
        }
    }

    /// Makes every following run fail as if the command exited with `code`.
    pub fn set_exit_code(&self, code: i32) {
        *self.exit_code.write().unwrap() = Some(code);
    }

    pub fn get_runs(&self) -> Vec<ExecRun> {
        self.runs.read().unwrap().clone()
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecExecutor for MockExecutor {
    fn run(
        &self,
        _ctx: &ExecContext,
        invocation: &Invocation,
        container: &Container,
        _client: &RuntimeClient,
    ) -> Result<()> {
        self.runs.write().unwrap().push(ExecRun {
            container: container.clone(),
            args: invocation.args().to_vec(),
            options: invocation.options().clone(),
        });

        if let Some(code) = *self.exit_code.read().unwrap() {
            return Err(ExecError::CommandExited { code }.into());
        }
        Ok(())
    }
}
