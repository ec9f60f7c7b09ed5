mod container;
pub mod context;
mod error;
pub mod invocation;
pub mod project;
pub mod traits;

pub use container::{Container, ServiceNames};
pub use context::{CancelToken, ExecContext};
pub use error::ExecError;
pub use invocation::{ExecOptions, Invocation};
pub use project::ComposeProject;
pub use traits::{Composer, ExecExecutor};
