//! # statuswatch-types
//!
//! Core types for status page reconstruction. This crate defines the shared
//! vocabulary between the upstream adapters, the timeline engine and
//! anything rendering a status page: health categories, monitor events,
//! downtime intervals, per-day heatmap buckets, incidents and scheduled
//! downtimes.
//!
//! ## Features
//!
//! - `serde`: JSON serialization of every type via serde
//!
//! ## Example
//!
//! ```rust
//! use statuswatch_types::{DowntimeInterval, IssueCategory, Millis};
//! use chrono::{TimeZone, Utc};
//!
//! let outage = DowntimeInterval {
//!     name: "api health check".into(),
//!     start: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
//!     end: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
//!     status: IssueCategory::Error,
//!     ongoing: false,
//! };
//!
//! assert_eq!(outage.duration(), Millis::from_hours(12));
//! assert_eq!(outage.duration().percent_of_day(), 50.0);
//! ```
//!
//! ## Report format
//!
//! Exported [`StatusReport`]s carry a [`ReportVersion`], currently `1.0`.
//! Readers should reject reports whose major version they do not know.

extern crate alloc;

mod category;
mod duration;
mod incident;
mod report;
mod timeline;
mod version;

pub use category::*;
pub use duration::*;
pub use incident::*;
pub use report::*;
pub use timeline::*;
pub use version::*;

/// Major version of the report layout. Bump on breaking changes.
pub const REPORT_FORMAT: u32 = 1;

/// Number of days covered by a status page heatmap, today included.
pub const WINDOW_DAYS: usize = 90;
