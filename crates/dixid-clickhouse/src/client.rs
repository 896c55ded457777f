use crate::encode::encode_rows;
use crate::{InsertFormat, QueryOutcome};
use core::fmt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_HEADER: &str = "X-ClickHouse-User";
const KEY_HEADER: &str = "X-ClickHouse-Key";
/// How much of an undecodable response to quote back in error messages.
const SNIPPET_LEN: usize = 200;

/// Connection settings for a ClickHouse HTTP endpoint.
///
/// ```
/// use dixid_clickhouse::ClickHouseConfig;
///
/// let config = ClickHouseConfig::new("http://clickhouse:8123/")
///     .with_user("ingest")
///     .with_password("hunter2");
/// assert_eq!(config.url, "http://clickhouse:8123/");
/// ```
#[derive(Clone)]
pub struct ClickHouseConfig {
    /// Endpoint URL, normalized to end with a single `/`.
    pub url: String,
    /// User name; `default` when not set.
    pub user: String,
    /// Password; empty when not set. Sent only in the key header.
    pub password: String,
}

impl ClickHouseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        let mut url = url.into().trim_end_matches('/').to_owned();
        url.push('/');
        Self {
            url,
            user: "default".to_owned(),
            password: String::new(),
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }
}

// Hand-written so the password never reaches log output.
impl fmt::Debug for ClickHouseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickHouseConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"secret")
            .finish()
    }
}

/// Async ClickHouse client over the HTTP interface.
///
/// All operations are HTTP POST requests with credentials in headers.
/// Methods never return `Err`: every failure mode is folded into the
/// returned [`QueryOutcome`].
#[derive(Debug)]
pub struct ClickHouseClient {
    http: reqwest::Client,
    config: ClickHouseConfig,
}

impl ClickHouseClient {
    pub fn new(config: ClickHouseConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("clickhouse http client");
        Self { http, config }
    }

    /// Inserts a pre-serialized payload into `table`.
    ///
    /// On success the outcome's `rows` carries the payload's line count.
    pub async fn insert_data(
        &self,
        table: &str,
        data: &str,
        format: InsertFormat,
    ) -> QueryOutcome {
        let sql = format!("INSERT INTO {table} FORMAT {format}");
        let mut outcome = self.run(&sql, Some(data.to_owned()), false).await;
        if outcome.is_success() {
            outcome.rows = Some(data.trim().lines().count() as u64);
        }
        outcome
    }

    /// Serializes `rows` (JSON objects) and inserts them into `table`,
    /// optionally truncating the table first.
    ///
    /// For [`InsertFormat::Csv`] the column order of the first row is
    /// used for every row, so it must match the table definition;
    /// [`InsertFormat::JsonEachRow`] is self-describing and safer.
    pub async fn insert_rows(
        &self,
        table: &str,
        rows: &[Value],
        truncate_first: bool,
        format: InsertFormat,
    ) -> QueryOutcome {
        if rows.is_empty() {
            return QueryOutcome::error("no rows to insert");
        }

        if truncate_first {
            let truncated = self.truncate_table(table).await;
            if !truncated.is_success() {
                return QueryOutcome::error(format!(
                    "truncate before insert failed: {}",
                    truncated.message
                ));
            }
        }

        match encode_rows(rows, format) {
            Ok(body) => self.insert_data(table, &body, format).await,
            Err(message) => QueryOutcome::error(message),
        }
    }

    /// Empties `table` with `TRUNCATE TABLE`.
    pub async fn truncate_table(&self, table: &str) -> QueryOutcome {
        self.run(&format!("TRUNCATE TABLE {table}"), None, false).await
    }

    /// Runs a query; `SELECT`s are fetched as `FORMAT JSON` and the
    /// decoded `data` array lands in the outcome.
    pub async fn execute_query(&self, sql: &str) -> QueryOutcome {
        self.run(sql, None, true).await
    }

    /// Runs a DDL or other command; status only.
    pub async fn execute_command(&self, sql: &str) -> QueryOutcome {
        self.run(sql, None, false).await
    }

    async fn run(&self, sql: &str, body: Option<String>, decode_json: bool) -> QueryOutcome {
        let as_json = decode_json && body.is_none() && is_select(sql);
        let query = if as_json {
            format!("{sql} FORMAT JSON")
        } else {
            sql.to_owned()
        };
        debug!(sql = %query, has_body = body.is_some(), "clickhouse request");

        let mut request = self
            .http
            .post(&self.config.url)
            .query(&[("query", query.as_str())])
            .header(USER_HEADER, &self.config.user)
            .header(KEY_HEADER, &self.config.password);
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(body);
        } else if as_json {
            request = request.header(ACCEPT, "application/json; charset=utf-8");
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return QueryOutcome::fail(format!("request failed: {e}")),
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return QueryOutcome::fail(format!("failed to read response: {e}")),
        };
        // ClickHouse errors are not guaranteed to be valid UTF-8.
        let text = String::from_utf8_lossy(&bytes);

        if !status.is_success() {
            return QueryOutcome::fail(format!("HTTP {status}: {text}"));
        }

        if as_json {
            return match serde_json::from_str::<Value>(&text) {
                Ok(mut parsed) => {
                    let data = match parsed.get_mut("data").map(Value::take) {
                        Some(Value::Array(rows)) => rows,
                        _ => Vec::new(),
                    };
                    let mut outcome = QueryOutcome::success();
                    outcome.data = Some(data);
                    outcome
                }
                Err(e) => {
                    let snippet: String = text.chars().take(SNIPPET_LEN).collect();
                    QueryOutcome::error(format!(
                        "JSON decode failed: {e}, response starts with: {snippet}"
                    ))
                }
            };
        }

        QueryOutcome::success()
    }
}

/// True when the statement reads as a `SELECT`, which is when responses
/// are fetched as JSON.
fn is_select(sql: &str) -> bool {
    sql.trim()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("select"))
}
