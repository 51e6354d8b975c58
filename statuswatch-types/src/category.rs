//! Status categories reported by monitors and the per-category tallies
//! derived from them.

use core::fmt;
use core::str::FromStr;

/// Health category attached to a single monitor event.
///
/// `Success` is the healthy baseline. It never appears inside a downtime
/// interval; it only closes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StatusCategory {
    #[default]
    Success,
    Warning,
    Degraded,
    Error,
}

impl StatusCategory {
    /// The problem category this status represents, if any.
    pub const fn issue(self) -> Option<IssueCategory> {
        match self {
            StatusCategory::Success => None,
            StatusCategory::Warning => Some(IssueCategory::Warning),
            StatusCategory::Degraded => Some(IssueCategory::Degraded),
            StatusCategory::Error => Some(IssueCategory::Error),
        }
    }

    /// Returns true for every category except `Success`.
    pub const fn is_problem(self) -> bool {
        !matches!(self, StatusCategory::Success)
    }

    /// Wire name of the category.
    pub const fn as_str(self) -> &'static str {
        match self {
            StatusCategory::Success => "success",
            StatusCategory::Warning => "warning",
            StatusCategory::Degraded => "degraded",
            StatusCategory::Error => "error",
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the four status categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for StatusCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(StatusCategory::Success),
            "warning" => Ok(StatusCategory::Warning),
            "degraded" => Ok(StatusCategory::Degraded),
            "error" => Ok(StatusCategory::Error),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// One of the three problem categories a downtime interval can carry.
///
/// Variants are declared in ascending severity so `Ord` ranks
/// `Error` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IssueCategory {
    Warning,
    Degraded,
    Error,
}

impl IssueCategory {
    /// All issue categories, most severe first.
    ///
    /// This is also the stacking order of a heatmap cell.
    pub const ALL: [IssueCategory; 3] = [
        IssueCategory::Error,
        IssueCategory::Degraded,
        IssueCategory::Warning,
    ];

    /// Minimum rendered height (percent of a cell) for a category that
    /// occurred at least once on a day, so short blips stay visible.
    pub const fn display_floor(self) -> f64 {
        match self {
            IssueCategory::Error => 10.0,
            IssueCategory::Degraded => 8.0,
            IssueCategory::Warning => 6.0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            IssueCategory::Warning => "warning",
            IssueCategory::Degraded => "degraded",
            IssueCategory::Error => "error",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<IssueCategory> for StatusCategory {
    fn from(c: IssueCategory) -> Self {
        match c {
            IssueCategory::Warning => StatusCategory::Warning,
            IssueCategory::Degraded => StatusCategory::Degraded,
            IssueCategory::Error => StatusCategory::Error,
        }
    }
}

/// A value per issue category.
///
/// Used for day bucket counts, durations and percentages. The three slots
/// are independent: they are not a partition of anything.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryTally<T> {
    pub error: T,
    pub warning: T,
    pub degraded: T,
}

impl<T> CategoryTally<T> {
    /// Build a tally by evaluating `f` for every category.
    pub fn from_fn(mut f: impl FnMut(IssueCategory) -> T) -> Self {
        Self {
            error: f(IssueCategory::Error),
            warning: f(IssueCategory::Warning),
            degraded: f(IssueCategory::Degraded),
        }
    }

    pub fn get(&self, category: IssueCategory) -> &T {
        match category {
            IssueCategory::Error => &self.error,
            IssueCategory::Warning => &self.warning,
            IssueCategory::Degraded => &self.degraded,
        }
    }

    pub fn get_mut(&mut self, category: IssueCategory) -> &mut T {
        match category {
            IssueCategory::Error => &mut self.error,
            IssueCategory::Warning => &mut self.warning,
            IssueCategory::Degraded => &mut self.degraded,
        }
    }

    /// Iterate `(category, value)` pairs, most severe first.
    pub fn iter(&self) -> impl Iterator<Item = (IssueCategory, &T)> {
        IssueCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Current status of a monitor as shown on the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MonitorStatus {
    #[default]
    Online,
    Degraded,
    Offline,
}

impl MonitorStatus {
    /// Badge status for an interval of the given category.
    pub const fn from_issue(category: IssueCategory) -> Self {
        match category {
            IssueCategory::Error => MonitorStatus::Offline,
            IssueCategory::Warning | IssueCategory::Degraded => MonitorStatus::Degraded,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            MonitorStatus::Online => "Online",
            MonitorStatus::Degraded => "Degraded",
            MonitorStatus::Offline => "Offline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories() {
        assert_eq!("success".parse::<StatusCategory>(), Ok(StatusCategory::Success));
        assert_eq!("warning".parse::<StatusCategory>(), Ok(StatusCategory::Warning));
        assert_eq!("degraded".parse::<StatusCategory>(), Ok(StatusCategory::Degraded));
        assert_eq!("error".parse::<StatusCategory>(), Ok(StatusCategory::Error));
        assert!("failure".parse::<StatusCategory>().is_err());
        assert!("Error".parse::<StatusCategory>().is_err());
    }

    #[test]
    fn test_issue_conversion() {
        assert_eq!(StatusCategory::Success.issue(), None);
        assert_eq!(StatusCategory::Error.issue(), Some(IssueCategory::Error));
        assert!(!StatusCategory::Success.is_problem());
        assert!(StatusCategory::Warning.is_problem());

        for c in IssueCategory::ALL {
            assert_eq!(StatusCategory::from(c).issue(), Some(c));
        }
    }

    #[test]
    fn test_severity_order() {
        assert!(IssueCategory::Error > IssueCategory::Degraded);
        assert!(IssueCategory::Degraded > IssueCategory::Warning);
    }

    #[test]
    fn test_display_floors() {
        assert_eq!(IssueCategory::Error.display_floor(), 10.0);
        assert_eq!(IssueCategory::Degraded.display_floor(), 8.0);
        assert_eq!(IssueCategory::Warning.display_floor(), 6.0);
    }

    #[test]
    fn test_tally_indexing() {
        let mut tally = CategoryTally::<u32>::default();
        *tally.get_mut(IssueCategory::Degraded) += 2;
        *tally.get_mut(IssueCategory::Error) += 1;

        assert_eq!(tally.degraded, 2);
        assert_eq!(tally.error, 1);
        assert_eq!(*tally.get(IssueCategory::Warning), 0);

        let order: Vec<_> = tally.iter().map(|(c, v)| (c, *v)).collect();
        assert_eq!(
            order,
            vec![
                (IssueCategory::Error, 1),
                (IssueCategory::Degraded, 2),
                (IssueCategory::Warning, 0),
            ]
        );
    }

    #[test]
    fn test_monitor_status_from_issue() {
        assert_eq!(MonitorStatus::from_issue(IssueCategory::Error), MonitorStatus::Offline);
        assert_eq!(MonitorStatus::from_issue(IssueCategory::Warning), MonitorStatus::Degraded);
        assert_eq!(MonitorStatus::from_issue(IssueCategory::Degraded), MonitorStatus::Degraded);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&StatusCategory::Degraded).unwrap(), "\"degraded\"");
        assert_eq!(serde_json::to_string(&MonitorStatus::Offline).unwrap(), "\"offline\"");
        let c: IssueCategory = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(c, IssueCategory::Warning);
    }
}
