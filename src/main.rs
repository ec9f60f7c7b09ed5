use podcompose::cli;
use podcompose::CancelToken;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || on_interrupt.cancel()) {
        warn!("failed to set Ctrl+C handler: {e}");
    }

    let descriptors = cli::descriptors();
    let matches = cli::root_command(&descriptors).get_matches();

    if let Err(e) = cli::dispatch(&descriptors, &matches, cancel) {
        if let Some(report) = cli::error_report(&e) {
            eprintln!("{report}");
        }
        let code = cli::exit_code(&e);
        debug!("exiting with {code}");
        std::process::exit(code);
    }
}
