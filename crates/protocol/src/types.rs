use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating system family a probe was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Windows,
    Linux,
    Unsupported,
}

impl OsFamily {
    /// Maps a `std::env::consts::OS` value to a family.
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            _ => Self::Unsupported,
        }
    }

    /// Family of the running process.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated battery time remaining.
///
/// Serialized as a plain number of seconds, or the strings `"unknown"` /
/// `"unlimited"` (the latter while running on external power).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TimeLeftRepr", into = "TimeLeftRepr")]
pub enum TimeLeft {
    Seconds(u64),
    Unknown,
    Unlimited,
}

impl TimeLeft {
    pub fn seconds(&self) -> Option<u64> {
        match self {
            Self::Seconds(s) => Some(*s),
            _ => None,
        }
    }
}

/// Formats as `H:MM:SS` for a known duration.
impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds(secs) => {
                let hours = secs / 3600;
                let minutes = (secs % 3600) / 60;
                let seconds = secs % 60;
                write!(f, "{hours}:{minutes:02}:{seconds:02}")
            }
            Self::Unknown => f.write_str("unknown"),
            Self::Unlimited => f.write_str("unlimited"),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum TimeLeftRepr {
    Seconds(u64),
    Marker(TimeLeftMarker),
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TimeLeftMarker {
    Unknown,
    Unlimited,
}

impl From<TimeLeftRepr> for TimeLeft {
    fn from(repr: TimeLeftRepr) -> Self {
        match repr {
            TimeLeftRepr::Seconds(s) => Self::Seconds(s),
            TimeLeftRepr::Marker(TimeLeftMarker::Unknown) => Self::Unknown,
            TimeLeftRepr::Marker(TimeLeftMarker::Unlimited) => Self::Unlimited,
        }
    }
}

impl From<TimeLeft> for TimeLeftRepr {
    fn from(value: TimeLeft) -> Self {
        match value {
            TimeLeft::Seconds(s) => Self::Seconds(s),
            TimeLeft::Unknown => Self::Marker(TimeLeftMarker::Unknown),
            TimeLeft::Unlimited => Self::Marker(TimeLeftMarker::Unlimited),
        }
    }
}
