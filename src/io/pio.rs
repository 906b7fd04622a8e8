/*
 * Port I/O (PIO)
 *
 * Safe wrapper around the x86 IN/OUT instructions, plus the generic
 * `Io` trait the UART driver is written against. The serial driver
 * only ever touches byte-wide registers, so only `Pio<u8>` is
 * implemented.
 */

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use core::arch::asm;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use core::marker::PhantomData;

/// I/O interface trait
pub trait Io {
    /// The value type used for I/O operations.
    type Value: Copy
        + PartialEq
        + core::ops::BitAnd<Output = Self::Value>
        + core::ops::BitOr<Output = Self::Value>
        + core::ops::Not<Output = Self::Value>;

    /// Reads the value from the I/O interface.
    fn read(&self) -> Self::Value;

    /// Writes the value to the I/O interface.
    fn write(&mut self, value: Self::Value);

    /// Reads the value and checks whether all of `flags` are set.
    fn readf(&self, flags: Self::Value) -> bool {
        (self.read() & flags) == flags
    }
}

/// Wrapper for an I/O interface providing read-only access.
pub struct ReadOnly<I> {
    inner: I,
}

impl<I> ReadOnly<I> {
    /// Creates a new `ReadOnly` wrapper instance.
    pub const fn new(inner: I) -> ReadOnly<I> {
        ReadOnly { inner }
    }
}

impl<I: Io> ReadOnly<I> {
    /// Reads the value from the I/O interface.
    #[inline(always)]
    pub fn read(&self) -> I::Value {
        self.inner.read()
    }

    /// Reads the value and checks whether all of `flags` are set.
    #[allow(dead_code)]
    #[inline(always)]
    pub fn readf(&self, flags: I::Value) -> bool {
        self.inner.readf(flags)
    }
}

/// Generic PIO
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[derive(Copy, Clone)]
pub struct Pio<T> {
    port: u16,
    value: PhantomData<T>,
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
impl<T> Pio<T> {
    /// Create a new PIO instance for the specified port.
    pub const fn new(port: u16) -> Self {
        Pio::<T> {
            port,
            value: PhantomData,
        }
    }
}

/// Read/Write for byte PIO
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
impl Io for Pio<u8> {
    type Value = u8;

    /// Read a byte from the port.
    #[inline(always)]
    fn read(&self) -> u8 {
        let value: u8;
        unsafe {
            asm!("in al, dx", in("dx") self.port, out("al") value, options(nostack, nomem, preserves_flags));
        }
        value
    }

    /// Write a byte to the port.
    #[inline(always)]
    fn write(&mut self, value: u8) {
        unsafe {
            asm!("out dx, al", in("dx") self.port, in("al") value, options(nostack, nomem, preserves_flags));
        }
    }
}
