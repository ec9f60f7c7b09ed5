mod exec_service;

pub use exec_service::ExecService;
