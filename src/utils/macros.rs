/*
 * Console Print Macros
 *
 * Kernel-side replacements for print!/println!, formatting through the
 * console dispatcher so the text reaches every default output device.
 */

/// Prints formatted text to the kernel console.
///
/// # Examples
///
/// ```rust
/// kcon::console_print!("the answer is {}", 42);
/// ```
#[macro_export]
macro_rules! console_print {
    ($($arg:tt)*) => ({
        use core::fmt::Write;
        let _ = $crate::utils::writer::Writer.write_fmt(format_args!($($arg)*));
    });
}

/// Prints formatted text followed by a newline to the kernel console.
#[macro_export]
macro_rules! console_println {
    () => ($crate::console_print!("\n"));
    ($fmt:expr) => ($crate::console_print!(concat!($fmt, "\n")));
    ($fmt:expr, $($arg:tt)*) => ($crate::console_print!(concat!($fmt, "\n"), $($arg)*));
}
