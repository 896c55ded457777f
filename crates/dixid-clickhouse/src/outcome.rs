use core::fmt;
use serde::{Deserialize, Serialize};

/// Discriminator for a [`QueryOutcome`].
///
/// The three-way split follows the connector's lifecycle: `Fail` means
/// the request never completed an HTTP round trip (transport error or a
/// non-200 response), `Error` means the server answered but the response
/// or input data could not be processed, `Success` means a clean 200.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryStatus {
    Success,
    Error,
    Fail,
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
            Self::Fail => "FAIL",
        };
        f.write_str(s)
    }
}

/// Structured result of one connector operation.
///
/// Local failures (transport, decoding, malformed input) are captured
/// here rather than propagated: the connector's methods are infallible
/// at the type level and always hand back an outcome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// How the operation ended.
    pub status: QueryStatus,
    /// Human-readable detail; empty on success.
    pub message: String,
    /// Row count for insert operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u64>,
    /// Decoded `data` array for `FORMAT JSON` query responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<serde_json::Value>>,
}

impl QueryOutcome {
    pub(crate) fn success() -> Self {
        Self {
            status: QueryStatus::Success,
            message: String::new(),
            rows: None,
            data: None,
        }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self {
            status: QueryStatus::Error,
            message: message.into(),
            rows: None,
            data: None,
        }
    }

    pub(crate) fn fail(message: impl Into<String>) -> Self {
        Self {
            status: QueryStatus::Fail,
            message: message.into(),
            rows: None,
            data: None,
        }
    }

    /// Returns `true` when the operation completed cleanly.
    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_the_discriminator() {
        assert!(QueryOutcome::success().is_success());
        assert_eq!(QueryOutcome::error("boom").status, QueryStatus::Error);
        assert_eq!(QueryOutcome::fail("down").status, QueryStatus::Fail);
    }

    #[test]
    fn status_serializes_uppercase() {
        let json = serde_json::to_string(&QueryStatus::Success).unwrap();
        assert_eq!(json, "\"SUCCESS\"");
    }

    #[test]
    fn empty_fields_are_omitted_from_json() {
        let json = serde_json::to_string(&QueryOutcome::success()).unwrap();
        assert!(!json.contains("rows"));
        assert!(!json.contains("data"));
    }
}
