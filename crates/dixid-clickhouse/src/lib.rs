//! # dixid-clickhouse
//!
//! An async connector for ClickHouse over its HTTP interface.
//!
//! Every request is an HTTP POST with credentials carried in
//! `X-ClickHouse-User` / `X-ClickHouse-Key` headers, never in the URL.
//! Remote and local failures are folded into a structured
//! [`QueryOutcome`] instead of surfacing as `Err`, so callers branch on
//! [`QueryStatus`] rather than unwinding through error types.
//!
//! ## Example
//!
//! ```no_run
//! use dixid_clickhouse::{ClickHouseClient, ClickHouseConfig, QueryStatus};
//!
//! # async fn demo() {
//! let client = ClickHouseClient::new(
//!     ClickHouseConfig::new("http://clickhouse:8123").with_user("default"),
//! );
//!
//! let outcome = client.execute_query("SELECT 1").await;
//! if outcome.status == QueryStatus::Success {
//!     println!("rows: {:?}", outcome.data);
//! }
//! # }
//! ```

mod client;
mod encode;
mod outcome;

pub use crate::client::*;
pub use crate::encode::*;
pub use crate::outcome::*;
