//! Process-level helpers shared by the binary and tests.

pub mod signals;

pub use signals::shutdown_signal;
