/*
 * 16550 UART Driver
 *
 * Register-level driver for the classic 16550 serial port plus the
 * `SerialConsole` wrapper that plugs it into the console registry.
 *
 * Transmit blocks until the holding register drains; receive is a
 * non-blocking poll of the line status register. Newline and rub-out
 * translation happen here, at the transport level - the dispatcher
 * never sees them.
 */

use bitflags::bitflags;
use spin::Mutex;

use crate::console::device::{ConsoleDevice, ConsoleInput, ConsoleOutput, Errno};
use crate::io::{Io, ReadOnly};
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::io::Pio;

bitflags! {
    /// Line status flags
    struct LineStsFlags: u8 {
        const INPUT_FULL = 1;
        // 1 to 4 unknown
        const OUTPUT_EMPTY = 1 << 5;
        // 6 and 7 unknown
    }
}

/// Serial port register file.
pub struct SerialPort<T: Io> {
    data: T,       // Data register, read to receive, write to send
    int_en: T,     // Interrupt enable
    fifo_ctrl: T,  // FIFO control
    line_ctrl: T,  // Line control
    modem_ctrl: T, // Modem control
    line_sts: ReadOnly<T>, // Line status
    #[allow(dead_code)]
    modem_sts: ReadOnly<T>, // Modem status, not used right now
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
impl SerialPort<Pio<u8>> {
    /// Creates a serial port instance at the given base port address.
    pub const fn new(base: u16) -> SerialPort<Pio<u8>> {
        SerialPort {
            data: Pio::new(base),
            int_en: Pio::new(base + 1),
            fifo_ctrl: Pio::new(base + 2),
            line_ctrl: Pio::new(base + 3),
            modem_ctrl: Pio::new(base + 4),
            line_sts: ReadOnly::new(Pio::new(base + 5)),
            modem_sts: ReadOnly::new(Pio::new(base + 6)),
        }
    }
}

impl<T: Io> SerialPort<T>
where
    T::Value: From<u8> + TryInto<u8>,
{
    /// Programs the port: 115200 baud, 8n1 framing, FIFOs enabled.
    pub fn init(&mut self) {
        self.int_en.write(0x00.into()); // Interrupts off while programming
        self.line_ctrl.write(0x80.into()); // DLAB on to reach the divisor
        self.data.write(0x01.into()); // Divisor low: 115200
        self.int_en.write(0x00.into()); // Divisor high
        self.line_ctrl.write(0x03.into()); // DLAB off, 8n1
        self.fifo_ctrl.write(0xC7.into()); // FIFOs on, cleared, 14-byte threshold
        self.modem_ctrl.write(0x0B.into()); // DTR + RTS + OUT2
        self.int_en.write(0x01.into());
    }

    /// Retrieves the line status flags.
    fn line_sts(&self) -> LineStsFlags {
        LineStsFlags::from_bits_truncate(
            (self.line_sts.read() & 0xFF.into()).try_into().unwrap_or(0),
        )
    }

    /// Fetches a pending byte, if any. Never waits.
    pub fn receive(&mut self) -> Option<u8> {
        if self.line_sts().contains(LineStsFlags::INPUT_FULL) {
            Some((self.data.read() & 0xFF.into()).try_into().unwrap_or(0))
        } else {
            None
        }
    }

    /// Sends a byte, spinning until the holding register is free.
    pub fn send(&mut self, data: u8) {
        while !self.line_sts().contains(LineStsFlags::OUTPUT_EMPTY) {}
        self.data.write(data.into())
    }

    /// Writes a byte with terminal translation applied.
    ///
    /// Line feeds are preceded by a carriage return; backspace/delete
    /// become the rub-out sequence.
    pub fn write(&mut self, b: u8) {
        match b {
            8 | 0x7F => {
                self.send(8);
                self.send(b' ');
                self.send(8);
            }
            b'\n' => {
                self.send(b'\r');
                self.send(b'\n');
            }
            _ => {
                self.send(b);
            }
        }
    }
}

/// A 16550 port as a registrable console device.
///
/// Owns the register file behind a mutex so the `&self` device contract
/// can drive it. `init` must run before the device is registered.
pub struct SerialConsole<T: Io> {
    name: &'static str,
    port: Mutex<SerialPort<T>>,
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
impl SerialConsole<Pio<u8>> {
    pub const fn new(name: &'static str, base: u16) -> Self {
        Self {
            name,
            port: Mutex::new(SerialPort::<Pio<u8>>::new(base)),
        }
    }
}

impl<T: Io + Send> SerialConsole<T>
where
    T::Value: From<u8> + TryInto<u8>,
{
    /// Brings the port to its known configuration.
    pub fn init(&self) {
        self.port.lock().init();
    }
}

impl<T: Io + Send> ConsoleDevice for SerialConsole<T>
where
    T::Value: From<u8> + TryInto<u8>,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn output(&self) -> Option<&dyn ConsoleOutput> {
        Some(self)
    }

    fn input(&self) -> Option<&dyn ConsoleInput> {
        Some(self)
    }
}

impl<T: Io + Send> ConsoleOutput for SerialConsole<T>
where
    T::Value: From<u8> + TryInto<u8>,
{
    fn write(&self, buf: &[u8]) -> Result<usize, Errno> {
        let mut port = self.port.lock();
        for &b in buf {
            port.write(b);
        }
        Ok(buf.len())
    }
}

impl<T: Io + Send> ConsoleInput for SerialConsole<T>
where
    T::Value: From<u8> + TryInto<u8>,
{
    fn read(&self, buf: &mut [u8]) -> Result<usize, Errno> {
        let mut port = self.port.lock();
        let mut n = 0;
        while n < buf.len() {
            match port.receive() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex as StdMutex};

    /// Behavioral model of the 16550 register file shared by all the
    /// per-register handles.
    #[derive(Default)]
    struct UartModel {
        dlab: bool,
        divisor_lo: u8,
        tx: Vec<u8>,
        rx: VecDeque<u8>,
    }

    #[derive(Clone)]
    struct Reg {
        model: Arc<StdMutex<UartModel>>,
        offset: u8,
    }

    impl Io for Reg {
        type Value = u8;

        fn read(&self) -> u8 {
            let mut m = self.model.lock().unwrap();
            match self.offset {
                0 => m.rx.pop_front().unwrap_or(0),
                5 => {
                    // Transmitter is always ready in the model.
                    let mut lsr = 1 << 5;
                    if !m.rx.is_empty() {
                        lsr |= 1;
                    }
                    lsr
                }
                _ => 0,
            }
        }

        fn write(&mut self, value: u8) {
            let mut m = self.model.lock().unwrap();
            match self.offset {
                0 if m.dlab => m.divisor_lo = value,
                0 => m.tx.push(value),
                3 => m.dlab = value & 0x80 != 0,
                _ => {}
            }
        }
    }

    fn mock_port() -> (SerialPort<Reg>, Arc<StdMutex<UartModel>>) {
        let model = Arc::new(StdMutex::new(UartModel::default()));
        let reg = |offset| Reg {
            model: model.clone(),
            offset,
        };
        let port = SerialPort {
            data: reg(0),
            int_en: reg(1),
            fifo_ctrl: reg(2),
            line_ctrl: reg(3),
            modem_ctrl: reg(4),
            line_sts: ReadOnly::new(reg(5)),
            modem_sts: ReadOnly::new(reg(6)),
        };
        (port, model)
    }

    #[test]
    fn init_programs_divisor_without_leaking_into_tx() {
        let (mut port, model) = mock_port();
        port.init();

        let m = model.lock().unwrap();
        assert_eq!(m.divisor_lo, 1); // 115200
        assert!(!m.dlab);
        assert!(m.tx.is_empty());
    }

    #[test]
    fn newline_becomes_crlf() {
        let (mut port, model) = mock_port();
        port.write(b'h');
        port.write(b'\n');
        assert_eq!(model.lock().unwrap().tx, b"h\r\n");
    }

    #[test]
    fn backspace_becomes_rubout_sequence() {
        let (mut port, model) = mock_port();
        port.write(0x7F);
        assert_eq!(model.lock().unwrap().tx, &[8, b' ', 8]);
    }

    #[test]
    fn receive_never_blocks() {
        let (mut port, model) = mock_port();
        assert_eq!(port.receive(), None);

        model.lock().unwrap().rx.extend(b"ab");
        assert_eq!(port.receive(), Some(b'a'));
        assert_eq!(port.receive(), Some(b'b'));
        assert_eq!(port.receive(), None);
    }

    #[test]
    fn serial_console_implements_the_device_contract() {
        let (port, model) = mock_port();
        let dev = SerialConsole {
            name: "mock",
            port: Mutex::new(port),
        };

        assert_eq!(dev.name, "mock");
        let out = ConsoleDevice::output(&dev).unwrap();
        assert_eq!(out.write(b"ok\n"), Ok(3));
        assert_eq!(model.lock().unwrap().tx, b"ok\r\n");

        model.lock().unwrap().rx.extend(b"abc");
        let input = ConsoleDevice::input(&dev).unwrap();
        let mut buf = [0u8; 2];
        assert_eq!(input.read(&mut buf), Ok(2));
        assert_eq!(&buf, b"ab");
        // Drained stream: short read, then zero. Never an error.
        assert_eq!(input.read(&mut buf), Ok(1));
        assert_eq!(buf[0], b'c');
        assert_eq!(input.read(&mut buf), Ok(0));
    }
}
