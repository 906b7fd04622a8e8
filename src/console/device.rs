/*
 * Console Device Contract
 *
 * The capability interface every console device implements. A device
 * exposes at most two capabilities: an output sink and an input source.
 * Either may be absent (a write-only serial sink, a read-only button
 * pad); the dispatcher checks for presence before invoking.
 */

use bitflags::bitflags;

bitflags! {
    /// Default-role flags of a registered console device.
    ///
    /// A device carrying `STDOUT` receives every broadcast write; a
    /// device carrying `STDIN` is drained by aggregate reads. Devices
    /// with no flags are reachable through direct I/O only.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ConsoleFlags: u8 {
        const STDOUT = 1 << 0;
        const STDIN = 1 << 1;
    }
}

/// POSIX errno values
///
/// Subset of standard POSIX error codes used by the console layer.
/// The dispatcher itself only ever produces `EINVAL`; devices keep the
/// remaining codes available for their own transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Errno {
    EIO = 5,    // I/O error
    EAGAIN = 11, // Try again
    EINVAL = 22, // Invalid argument
    ENOTTY = 25, // Not a typewriter
}

/// Output capability of a console device.
pub trait ConsoleOutput {
    /// Write up to `buf.len()` bytes.
    ///
    /// Returns the number of bytes the device accepted. May block
    /// (spin) until the underlying transport is ready.
    fn write(&self, buf: &[u8]) -> Result<usize, Errno>;
}

/// Input capability of a console device.
pub trait ConsoleInput {
    /// Read up to `buf.len()` bytes without waiting for more to arrive.
    ///
    /// Returns the number of bytes that were pending, possibly zero.
    /// A short read signals a drained stream, not an error.
    fn read(&self, buf: &mut [u8]) -> Result<usize, Errno>;
}

/// A console device, as seen by the registry.
///
/// Implementors own their state and must live for the kernel lifetime;
/// the registry only keeps a reference. The two capability accessors
/// default to `None`, so a device implements zero, one or both.
pub trait ConsoleDevice: Send + Sync {
    /// Human-readable device label, e.g. `"com1"`.
    fn name(&self) -> &'static str;

    /// Output capability, if the device can transmit.
    fn output(&self) -> Option<&dyn ConsoleOutput> {
        None
    }

    /// Input capability, if the device can receive.
    fn input(&self) -> Option<&dyn ConsoleInput> {
        None
    }
}
