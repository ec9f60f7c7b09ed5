pub mod cli;
pub mod domain;
pub mod infra;
pub mod services;

// Mocks shared by unit and integration tests
pub mod test_support;

pub use domain::{
    CancelToken, Composer, Container, ExecContext, ExecError, ExecExecutor, ExecOptions,
    Invocation, ServiceNames,
};
pub use infra::{PodmanComposer, PodmanExecutor, RuntimeClient};
pub use services::ExecService;
