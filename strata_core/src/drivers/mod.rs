#[cfg(feature = "rusqlite")]
pub mod rusqlite;

#[cfg(feature = "mysql")]
pub mod mysql;

#[cfg(feature = "config")]
mod config;
