/*
 * Console Writer
 *
 * fmt::Write adapter over the console broadcast path. This is what the
 * print macros and the logger format into; every default output device
 * receives the text.
 */

use core::fmt;

use crate::console;

/// A writer that broadcasts to all default console output devices.
pub struct Writer;

impl fmt::Write for Writer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // Broadcast never fails on valid input; with no registered
        // output device the text is simply dropped.
        let _ = console::write(s.as_bytes());
        Ok(())
    }
}
