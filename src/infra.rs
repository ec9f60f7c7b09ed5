pub mod compose_file;
pub mod composer;
pub mod config;
pub mod podman_adapter;
pub mod runtime_client;

pub use composer::PodmanComposer;
pub use podman_adapter::PodmanExecutor;
pub use runtime_client::RuntimeClient;
