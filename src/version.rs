// Version information module for the checkpoint engine
//
// Provides version constants for the crate

/// Version string for the checkpoint engine crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
