//! Format version stamped on exported status reports.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use crate::REPORT_FORMAT;

/// Version of the [`StatusReport`](crate::StatusReport) layout, written as
/// `"major.minor"`.
///
/// Readers accept any minor version of the major they were built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub struct ReportVersion {
    pub major: u32,
    pub minor: u32,
}

impl ReportVersion {
    /// The layout written by this build.
    pub const CURRENT: ReportVersion = ReportVersion {
        major: REPORT_FORMAT,
        minor: 0,
    };

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Whether a report of this version can be read by this build.
    pub const fn is_readable(&self) -> bool {
        self.major == REPORT_FORMAT
    }
}

impl Default for ReportVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Error for a version string that is not `"major.minor"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVersion(pub String);

impl fmt::Display for InvalidVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid report version `{}`, expected major.minor", self.0)
    }
}

impl std::error::Error for InvalidVersion {}

impl FromStr for ReportVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s
            .trim()
            .split_once('.')
            .ok_or_else(|| InvalidVersion(s.to_string()))?;

        match (major.parse(), minor.parse()) {
            (Ok(major), Ok(minor)) => Ok(Self { major, minor }),
            _ => Err(InvalidVersion(s.to_string())),
        }
    }
}

impl From<ReportVersion> for String {
    fn from(version: ReportVersion) -> Self {
        version.to_string()
    }
}

impl TryFrom<String> for ReportVersion {
    type Error = InvalidVersion;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
