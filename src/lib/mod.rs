//! Shared library modules providing error types, file utilities, console output and telemetry initialization.

pub mod browser;
pub mod console;
pub mod errors;
pub mod fs;
pub mod gradle;
pub mod paths;
#[cfg(test)]
pub mod stub_http;
pub mod telemetry;
