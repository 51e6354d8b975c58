//! Timeline engine and status page model.
//!
//! This module turns raw monitor events into downtime intervals, per-day
//! heatmap buckets and a current status, and assembles those into a
//! displayable status page.
//!
//! ## Submodules
//!
//! - [`normalize`]: Coercion of loosely typed upstream events into sorted [`MonitorEvent`]s
//! - [`interval`]: Folding events into [`DowntimeInterval`]s
//! - [`status`]: The current badge status at "now"
//! - [`daily`]: The 90-day window and per-day aggregation
//! - [`timeline`]: The facade tying the above together for one monitor
//! - [`monitor`]: The [`StatusPage`] model built from a whole feed
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "30s", "12h 30m")
//!
//! ## Data Flow
//!
//! ```text
//! events payload (raw JSON)
//!        │
//!        ▼
//! normalize_payload() ──▶ Vec<MonitorEvent> (sorted)
//!        │
//!        ▼
//! build_intervals(now) ──▶ Vec<DowntimeInterval>
//!        │
//!        ├──▶ aggregate_days(window) ──▶ Vec<DayBucket> (90, oldest first)
//!        │
//!        └──▶ resolve_status(now) ──▶ MonitorStatus
//! ```
//!
//! [`MonitorEvent`]: statuswatch_types::MonitorEvent
//! [`DowntimeInterval`]: statuswatch_types::DowntimeInterval

pub mod daily;
pub mod duration;
mod error;
pub mod interval;
pub mod monitor;
pub mod normalize;
pub mod status;
pub mod timeline;

pub use daily::{aggregate_days, availability, DaySpan, DayWindow};
pub use error::TimelineError;
pub use interval::build_intervals;
pub use monitor::{MonitorState, MonitorView, StatusPage};
pub use normalize::{normalize_events, normalize_payload, RawEvent};
pub use status::resolve_status;
pub use timeline::{compute_timeline, Timeline};
