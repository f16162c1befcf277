//! User stop requests.
//!
//! The Ctrl-C / SIGTERM handler runs on its own thread and only flips an
//! atomic flag.  Everything else happens on the main thread: the next
//! timed wait sees the flag, returns [`Error::Interrupted`], and the
//! error unwinds to the scope that owns the output session.
//!
//! [`Error::Interrupted`]: crate::error::Error::Interrupted

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::info;

/// Shared "please stop" flag.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Install the process-wide Ctrl-C / SIGTERM handler.  Can only be called
/// once per process.
pub fn install_handler() -> Result<StopSignal, ctrlc::Error> {
    let signal = StopSignal::new();
    let handler_signal = signal.clone();
    ctrlc::set_handler(move || {
        if !handler_signal.is_requested() {
            info!("stop requested, shutting down outputs");
        }
        handler_signal.request();
    })?;
    Ok(signal)
}
