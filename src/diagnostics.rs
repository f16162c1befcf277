//! Logging and panic reporting for the demo binaries.
//!
//! Both binaries log through the `log` facade to stderr.  The level is
//! fixed at `Info`; the programs take no environment configuration.

use log::LevelFilter;

/// Install the stderr logger.  Call once, first thing in `main`.
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp_millis()
        .format_target(false)
        .init();
}

/// Log panics through `log` before the default hook prints them.
///
/// The panic still unwinds, so any open output session is closed by its
/// `Drop` on the way out.
pub fn install_panic_handler() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log::error!("PANIC: {}", panic_reason(info.payload()));
        default_hook(info);
    }));
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}
