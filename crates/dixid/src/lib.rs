//! # dixid
//!
//! 18-digit, time-prefixed numeric identifiers backed by a single
//! process-local counter.
//!
//! An id is composed as `timestamp_fraction * 1_000_000 + increment`,
//! where `timestamp_fraction` is the Unix time in hundredths of a second
//! (modulo `10^12`) and `increment` is a rolling counter in
//! `[0, 999_999]`. Both blocking threads and async tasks draw from the
//! same counter through one async-aware lock, so ids are strictly
//! increasing across both calling conventions as long as the wall clock
//! does not step backward.
//!
//! ## Example
//!
//! ```
//! use dixid::IdGenerator;
//!
//! let id = IdGenerator::global().generate_blocking();
//! assert!(id.increment() <= dixid::DixId::MAX_INCREMENT);
//! ```
//!
//! From async code, use the cooperative entry point instead:
//!
//! ```
//! use dixid::IdGenerator;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let id = IdGenerator::global().generate_async().await;
//! # });
//! ```

mod generator;
mod id;
mod perf;
mod sleep;
mod time;

pub use crate::generator::*;
pub use crate::id::*;
pub use crate::perf::*;
pub use crate::sleep::*;
pub use crate::time::*;
