//! Utilities shared by the Kibitz server and client binaries.

pub mod logger;
pub mod time;
