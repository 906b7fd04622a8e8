/*
 * Loopback Console Device
 *
 * Virtual console: bytes written to it become its own pending input.
 * Used as an in-memory console during bring-up and as the reference
 * device for exercising the dispatcher without hardware.
 */

use heapless::Deque;
use spin::Mutex;

use crate::console::device::{ConsoleDevice, ConsoleInput, ConsoleOutput, Errno};

/// Bytes the loopback buffers before writes start getting cut short.
pub const LOOPBACK_CAPACITY: usize = 256;

pub struct LoopbackConsole {
    name: &'static str,
    buf: Mutex<Deque<u8, LOOPBACK_CAPACITY>>,
}

impl LoopbackConsole {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            buf: Mutex::new(Deque::new()),
        }
    }

    /// Bytes currently buffered and readable.
    pub fn pending(&self) -> usize {
        self.buf.lock().len()
    }
}

impl ConsoleDevice for LoopbackConsole {
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

impl ConsoleOutput for LoopbackConsole {
    /// Buffers as much of `buf` as fits and reports that count; a full
    /// ring yields a short write, not an error.
    fn write(&self, buf: &[u8]) -> Result<usize, Errno> {
        let mut q = self.buf.lock();
        let mut n = 0;
        for &b in buf {
            if q.push_back(b).is_err() {
                break;
            }
            n += 1;
        }
        Ok(n)
    }
}

impl ConsoleInput for LoopbackConsole {
    fn read(&self, buf: &mut [u8]) -> Result<usize, Errno> {
        let mut q = self.buf.lock();
        let mut n = 0;
        while n < buf.len() {
            match q.pop_front() {
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

    #[test]
    fn written_bytes_come_back_in_order() {
        let lo = LoopbackConsole::new("lo");
        assert_eq!(lo.output().unwrap().write(b"abc"), Ok(3));
        assert_eq!(lo.pending(), 3);

        let mut buf = [0u8; 2];
        assert_eq!(lo.input().unwrap().read(&mut buf), Ok(2));
        assert_eq!(&buf, b"ab");
        assert_eq!(lo.input().unwrap().read(&mut buf), Ok(1));
        assert_eq!(buf[0], b'c');
    }

    #[test]
    fn empty_loopback_reads_zero() {
        let lo = LoopbackConsole::new("lo");
        let mut buf = [0u8; 8];
        assert_eq!(lo.input().unwrap().read(&mut buf), Ok(0));
    }

    #[test]
    fn overflow_yields_a_short_write() {
        let lo = LoopbackConsole::new("lo");
        let big = [b'x'; LOOPBACK_CAPACITY + 10];
        assert_eq!(lo.output().unwrap().write(&big), Ok(LOOPBACK_CAPACITY));
        assert_eq!(lo.pending(), LOOPBACK_CAPACITY);
    }
}
