//! Tracing subscriber wiring.
//!
//! `SCRIPTC_LOG=debug scriptc check file.lsc` enables compiler-internal
//! logging; silent by default.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_env("SCRIPTC_LOG")
        .unwrap_or_else(|_| EnvFilter::new("off"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
