pub mod classifier;
pub mod config;
pub mod error;
pub mod intake;
pub mod server;
pub mod session;

pub use error::{ClassifyError, Error, IntakeError, Result};
