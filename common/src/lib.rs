#[cfg(feature = "config")]
pub mod config;
#[cfg(feature = "io")]
pub mod io;
#[cfg(feature = "logging")]
pub mod logging;
