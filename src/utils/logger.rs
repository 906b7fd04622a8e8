/*
 * Kernel Logging
 *
 * Hooks the `log` facade up to the console: records are formatted and
 * broadcast to every default output device. Registration diagnostics
 * from the console core itself arrive here too, which is why the
 * registry never logs while holding its own lock.
 */

use log::{Level, LevelFilter, Metadata, Record};

/// Logger implementation forwarding to the console broadcast path.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            crate::console_println!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Installs the console logger.
///
/// Call once during boot, after the first console device is usable.
///
/// # Panics
///
/// Panics if a logger is already installed.
pub fn init() {
    let result = log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Info));

    match result {
        Ok(_) => crate::console_println!("logger: console logger installed"),
        Err(err) => panic!("logger: initialization failed: {}", err),
    }
}
