/*
 * Console Registry & Dispatcher
 *
 * Owns the ordered set of registered console devices and implements the
 * kernel's console policy on top of it:
 *
 * - broadcast write: every default-output device receives the full
 *   buffer, in registration order; one slow or short-writing sink never
 *   truncates delivery to the others
 * - aggregate read: default-input devices are drained in registration
 *   order into a single buffer, first registered wins
 * - direct I/O: a specific device is addressed by id, bypassing the
 *   default set (e.g. a secondary diagnostic port)
 *
 * Registration is one-way; there is no deregistration. The first
 * registration decides the default stdin/stdout set: a device that asks
 * for flags keeps them, and a flagless first device is promoted to both
 * roles so the kernel never boots without a standard console.
 *
 * The dispatcher assumes the kernel's single-threaded bring-up model:
 * the registry mutex serializes calls but nothing here is re-entrant,
 * and registration is expected to finish before steady-state I/O.
 */

pub mod device;

use device::{ConsoleDevice, ConsoleFlags, Errno};
use spin::Mutex;

/// Upper bound on registered console devices. Real sets are single
/// digits; exceeding this at boot is a configuration error.
pub const MAX_CONSOLE_DEVICES: usize = 16;

/// Stable ordinal assigned to a device at registration.
pub type DeviceId = u16;

/// Registry record of one registered device.
///
/// Ids count up from 0 in registration order. The flags are the
/// resolved default roles, i.e. after first-device promotion.
#[derive(Clone, Copy)]
pub struct RegisteredDevice {
    id: DeviceId,
    name: &'static str,
    flags: ConsoleFlags,
    dev: &'static dyn ConsoleDevice,
}

impl RegisteredDevice {
    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn flags(&self) -> ConsoleFlags {
        self.flags
    }

    pub fn device(&self) -> &'static dyn ConsoleDevice {
        self.dev
    }
}

/// The console device table plus id/flag bookkeeping.
pub struct ConsoleRegistry {
    devices: heapless::Vec<RegisteredDevice, MAX_CONSOLE_DEVICES>,
    standard_assigned: bool,
}

impl ConsoleRegistry {
    pub const fn new() -> Self {
        Self {
            devices: heapless::Vec::new(),
            standard_assigned: false,
        }
    }

    /// Register a device and mint its id.
    ///
    /// `flags` are the roles the driver asks for. If no device with any
    /// flags has been registered before and `flags` is empty, the
    /// device is promoted to STDIN|STDOUT; once any flagged device
    /// exists, later flagless devices stay flagless.
    ///
    /// Registering the same device twice is a programming error,
    /// asserted against in debug builds.
    pub fn register(
        &mut self,
        dev: &'static dyn ConsoleDevice,
        flags: ConsoleFlags,
    ) -> RegisteredDevice {
        debug_assert!(
            !self.devices.iter().any(|d| core::ptr::addr_eq(d.dev, dev)),
            "console device registered twice"
        );

        let mut flags = flags;
        if !flags.is_empty() {
            self.standard_assigned = true;
        } else if !self.standard_assigned {
            // First device ever and nobody claimed the standard roles:
            // promote it so the kernel always has a default console.
            self.standard_assigned = true;
            flags = ConsoleFlags::STDIN | ConsoleFlags::STDOUT;
        }

        let entry = RegisteredDevice {
            id: self.devices.len() as DeviceId,
            name: dev.name(),
            flags,
            dev,
        };
        if self.devices.push(entry).is_err() {
            panic!("console device table full ({MAX_CONSOLE_DEVICES} devices)");
        }
        entry
    }

    /// Look up a registered device by id.
    ///
    /// Linear scan; device counts are small and this is not hot path.
    pub fn get(&self, id: DeviceId) -> Option<RegisteredDevice> {
        self.devices.iter().find(|d| d.id == id).copied()
    }

    /// Number of registered devices. Also the next id to be minted.
    pub fn count(&self) -> usize {
        self.devices.len()
    }

    /// Broadcast `buf` to every default-output device.
    ///
    /// Fire and forget: each sink gets the full buffer and its own
    /// accepted count is discarded, so the return value reports
    /// attempted delivery (`buf.len()`), not per-device completion.
    pub fn write(&self, buf: &[u8]) -> Result<usize, Errno> {
        if buf.is_empty() {
            return Ok(0);
        }

        for entry in self.devices.iter() {
            if !entry.flags.contains(ConsoleFlags::STDOUT) {
                continue;
            }
            if let Some(out) = entry.dev.output() {
                let _ = out.write(buf);
            }
        }

        Ok(buf.len())
    }

    /// Fill `buf` from the default-input devices, in registration
    /// order.
    ///
    /// Each device fills the remaining suffix; aggregation stops when
    /// the buffer is full, when every source is drained, or when a
    /// device reports an error (the bytes gathered so far are returned
    /// as a normal short read either way).
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, Errno> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut filled = 0;
        for entry in self.devices.iter() {
            if !entry.flags.contains(ConsoleFlags::STDIN) {
                continue;
            }
            let Some(input) = entry.dev.input() else {
                continue;
            };
            match input.read(&mut buf[filled..]) {
                // Clamp: a device must not report more than it was given.
                Ok(n) => filled += n.min(buf.len() - filled),
                Err(_) => break,
            }
            if filled == buf.len() {
                break;
            }
        }

        Ok(filled)
    }

    /// Write to one specific device, bypassing the default set.
    pub fn write_direct(&self, id: DeviceId, buf: &[u8]) -> Result<usize, Errno> {
        if buf.is_empty() {
            return Ok(0);
        }

        let entry = self.get(id).ok_or(Errno::EINVAL)?;
        let out = entry.dev.output().ok_or(Errno::EINVAL)?;
        out.write(buf)
    }

    /// Read from one specific device, bypassing the default set.
    pub fn read_direct(&self, id: DeviceId, buf: &mut [u8]) -> Result<usize, Errno> {
        if buf.is_empty() {
            return Ok(0);
        }

        let entry = self.get(id).ok_or(Errno::EINVAL)?;
        let input = entry.dev.input().ok_or(Errno::EINVAL)?;
        input.read(buf)
    }
}

impl Default for ConsoleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The kernel-wide console registry. Lives for the process lifetime;
/// reachable only through the accessor functions below.
static CONSOLE: Mutex<ConsoleRegistry> = Mutex::new(ConsoleRegistry::new());

/// Register a device with the kernel console.
///
/// The device must be initialized and ready for I/O before this call;
/// afterwards it takes part in every matching broadcast/aggregate
/// operation. Returns the registry record carrying the minted id and
/// the resolved flags.
pub fn register(dev: &'static dyn ConsoleDevice, flags: ConsoleFlags) -> RegisteredDevice {
    let entry = CONSOLE.lock().register(dev, flags);
    // Logged after the registry lock is dropped: the logger itself may
    // write back through the console.
    log::info!(
        "registered console {}: {:p} ({}), flags: {}{}",
        entry.id,
        dev,
        entry.name,
        if entry.flags.contains(ConsoleFlags::STDIN) { 'I' } else { '-' },
        if entry.flags.contains(ConsoleFlags::STDOUT) { 'O' } else { '-' },
    );
    entry
}

/// Write `buf` to all default-output devices. See
/// [`ConsoleRegistry::write`].
pub fn write(buf: &[u8]) -> Result<usize, Errno> {
    CONSOLE.lock().write(buf)
}

/// Read pending input from the default-input devices. See
/// [`ConsoleRegistry::read`].
pub fn read(buf: &mut [u8]) -> Result<usize, Errno> {
    CONSOLE.lock().read(buf)
}

/// Write to the device with the given id.
pub fn write_direct(id: DeviceId, buf: &[u8]) -> Result<usize, Errno> {
    CONSOLE.lock().write_direct(id, buf)
}

/// Read from the device with the given id.
pub fn read_direct(id: DeviceId, buf: &mut [u8]) -> Result<usize, Errno> {
    CONSOLE.lock().read_direct(id, buf)
}

/// Look up a registered device by id.
pub fn get(id: DeviceId) -> Option<RegisteredDevice> {
    CONSOLE.lock().get(id)
}

/// Number of devices registered with the kernel console.
pub fn count() -> usize {
    CONSOLE.lock().count()
}
