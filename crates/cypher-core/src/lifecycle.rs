//! Application lifecycle hook.
//!
//! The host application forwards its suspend/terminate notifications here;
//! there is no implicit global notification bus.

use tracing::debug;

use crate::error::Result;

/// Inbound lifecycle signal from the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// About to lose focus or move to the background
    WillSuspend,
    /// About to exit
    WillTerminate,
}

/// Something that must persist in-flight work before the process is suspended.
pub trait Suspendable {
    /// Synchronously save anything not yet durable.
    fn on_suspend(&mut self) -> Result<()>;
}

/// Route a lifecycle event to `target`.
pub fn dispatch<T: Suspendable + ?Sized>(event: AppEvent, target: &mut T) -> Result<()> {
    debug!(component = "lifecycle", op = "dispatch", event = ?event);
    match event {
        AppEvent::WillSuspend | AppEvent::WillTerminate => target.on_suspend(),
    }
}
