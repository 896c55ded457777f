//! # dixid-log
//!
//! Process-wide `tracing` setup for applications that log to stderr and
//! a rotating file, with sensitive values (tokens, passwords) masked
//! before they reach either output.
//!
//! ## Example
//!
//! ```no_run
//! use dixid_log::{LogConfig, LogLevel, setup_logging};
//!
//! setup_logging(&LogConfig {
//!     level: LogLevel::Debug,
//!     dir: "/var/log/myapp".into(),
//!     app_name: "my_application".into(),
//!     script_name: Some("main_script".into()),
//! })
//! .expect("logging setup");
//!
//! // Creates /var/log/myapp/my_application_main_script.log
//! tracing::info!("application started");
//! ```

mod level;
mod redact;
mod rotate;
mod setup;

pub use crate::level::*;
pub use crate::redact::*;
pub use crate::rotate::*;
pub use crate::setup::*;
