/*
 * Serial Console Devices
 *
 * Fixed COM port instances and their boot-time registration. COM1 is
 * the standard console; COM2 is kept off the default set and serves as
 * a secondary diagnostic channel reached via direct I/O.
 */

pub mod uart_16550;

pub use uart_16550::{SerialConsole, SerialPort};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::console::{self, device::ConsoleFlags};
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::io::Pio;

/// Primary serial port, the kernel's standard console.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub static COM1: SerialConsole<Pio<u8>> = SerialConsole::new("com1", 0x3F8);

/// Secondary serial port, diagnostic channel.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub static COM2: SerialConsole<Pio<u8>> = SerialConsole::new("com2", 0x2F8);

/// Programs both COM ports and registers them with the console.
///
/// Call once during early boot, before any console output is expected.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub fn init() {
    COM1.init();
    console::register(&COM1, ConsoleFlags::STDIN | ConsoleFlags::STDOUT);

    COM2.init();
    console::register(&COM2, ConsoleFlags::empty());
}
