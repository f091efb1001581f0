//! Tracing initialization for the shell binary.
//!
//! Diagnostics go to stderr; stdout is reserved for the notification and
//! reply protocol.

use tracing_subscriber::EnvFilter;

pub fn init(verbose: u8) {
    let default_directive = match verbose {
        0 => "warren=warn",
        1 => "warren=info",
        _ => "warren=debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
