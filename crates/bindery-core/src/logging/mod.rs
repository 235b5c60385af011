//! Logging setup.
//!
//! The binding core only talks to the `log` facade. Applications that do not
//! bring their own logger can install `env_logger` through [`init_logging`].

mod init;

pub use init::{init_logging, LoggingConfig};
