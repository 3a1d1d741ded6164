//! Device transports behind the controller.

use crate::command::Command;
use crate::error::DriverResult;

/// Opaque synchronous transport to a robot device.
///
/// Implementations turn commands into whatever the hardware speaks; every
/// `send` blocks until the device has accepted the instruction. The vendor
/// G-code/serial stack would sit behind this trait and is not modeled here.
pub trait Backend {
    /// Transport name for diagnostics.
    fn name(&self) -> &str;

    /// Deliver one command to the device.
    fn send(&mut self, cmd: &Command) -> DriverResult<()>;
}

/// Accepts every command and counts it. Stands in for a device in tests and
/// in simulated runs.
#[derive(Debug, Default)]
pub struct NullBackend {
    pub sent: usize,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for NullBackend {
    fn name(&self) -> &str {
        "null"
    }

    fn send(&mut self, _cmd: &Command) -> DriverResult<()> {
        self.sent += 1;
        Ok(())
    }
}

/// Emits each command through `tracing`. Used by the CLI as the "live"
/// device when no hardware is attached.
#[derive(Debug, Default)]
pub struct TraceBackend;

impl TraceBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for TraceBackend {
    fn name(&self) -> &str {
        "trace"
    }

    fn send(&mut self, cmd: &Command) -> DriverResult<()> {
        tracing::info!(command = cmd.name(), detail = ?cmd, "device command");
        Ok(())
    }
}
