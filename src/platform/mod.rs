//! Platform-specific integration helpers.

#[cfg(target_os = "macos")]
pub mod macos;
