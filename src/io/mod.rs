/*
 * Input/Output Primitives
 *
 * Low-level register access used by the hardware console drivers.
 * Devices are programmed through the `Io` trait so the drivers stay
 * independent of the access mechanism (x86 port I/O here, mock
 * registers in tests).
 */

pub mod pio;

pub use pio::{Io, ReadOnly};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub use pio::Pio;
