//! Application configuration and constants
//!
//! Central naming constants shared by the firmware and the developer tools.

/// The application name
pub const APP_NAME: &str = "ES8311 Audio";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Development mode banner
pub const fn dev_banner() -> &'static str {
    "ES8311 Audio - Development Mode"
}
