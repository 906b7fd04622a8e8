/*
 * Kernel Console Subsystem
 *
 * This crate implements the console layer of the kernel: a registry of
 * byte-oriented I/O devices and the dispatch policy that routes the
 * kernel's standard output to every default output device and fills the
 * kernel's standard input from every default input device.
 *
 * Why this is important:
 * - Decouples the generic print/read paths from concrete hardware
 * - Lets several sinks mirror kernel output (serial + virtual console)
 * - Gives drivers one registration call to join the console set
 * - Keeps all console policy (ordering, truncation) in a single place
 *
 * Layering:
 * - console: device contract, registry and dispatcher (the core)
 * - drivers: concrete devices (16550 UART, loopback)
 * - io:      port I/O primitives used by the serial driver
 * - utils:   logger and print macros built on top of the dispatcher
 */

#![cfg_attr(not(test), no_std)]

pub mod console;
pub mod drivers;
pub mod io;
pub mod utils;

pub use console::device::{ConsoleDevice, ConsoleFlags, ConsoleInput, ConsoleOutput, Errno};
pub use console::{DeviceId, RegisteredDevice};
