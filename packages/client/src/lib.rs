//! Kibitz CLI client.

mod command;
mod domain;
mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use runner::{ClientOptions, run_client};
