/*
 * Kernel Utilities
 *
 * Formatting and logging glue built on top of the console dispatcher.
 */

pub mod logger;
pub mod macros;
pub mod writer;
