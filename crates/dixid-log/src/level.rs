use core::fmt;
use core::str::FromStr;
use tracing::level_filters::LevelFilter;

/// Verbosity for [`setup_logging`](crate::setup_logging).
///
/// Unknown inputs parse to the most conservative level, `Error`, rather
/// than failing: a typo in a deployment's log-level setting must not
/// flood its logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    #[default]
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.trim() {
            s if s.eq_ignore_ascii_case("debug") => Self::Debug,
            s if s.eq_ignore_ascii_case("info") => Self::Info,
            s if s.eq_ignore_ascii_case("warning") => Self::Warning,
            _ => Self::Error,
        };
        Ok(level)
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warning => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels_case_insensitively() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("Warning".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("error".parse::<LogLevel>().unwrap(), LogLevel::Error);
    }

    #[test]
    fn unknown_input_falls_back_to_error() {
        assert_eq!("TRACE".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert_eq!("loud".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert_eq!("".parse::<LogLevel>().unwrap(), LogLevel::Error);
    }

    #[test]
    fn maps_onto_tracing_filters() {
        assert_eq!(LevelFilter::from(LogLevel::Debug), LevelFilter::DEBUG);
        assert_eq!(LevelFilter::from(LogLevel::Warning), LevelFilter::WARN);
    }
}
