/*
 * Console Device Drivers
 *
 * Concrete devices that implement the console device contract and
 * register themselves with the dispatcher:
 *
 * - serial: 16550 UART ports (hardware)
 * - loopback: in-memory virtual console
 */

pub mod loopback;
pub mod serial;
