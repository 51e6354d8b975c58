//! Data source abstraction for receiving status feeds.
//!
//! This module provides a trait-based abstraction for receiving the raw
//! inputs of the status page from various sources (a live Datadog poller,
//! a captured feed file, or an in-memory channel).

mod channel;
#[cfg(feature = "datadog")]
mod datadog;
mod feed;
mod file;

pub use channel::ChannelSource;
#[cfg(feature = "datadog")]
pub use datadog::DatadogPoller;
pub use feed::{MonitorFeed, StatusFeed};
pub use file::FileSource;

use std::fmt::Debug;

/// Trait for receiving status feeds from various sources.
///
/// # Example
///
/// ```
/// use statuswatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("feed.json");
/// if let Some(feed) = source.poll() {
///     println!("Got {} monitors", feed.monitors.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest feed.
    ///
    /// Returns `Some(feed)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<StatusFeed>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Check if the source has encountered an error.
    ///
    /// Returns the error message if an error occurred during the last poll.
    fn error(&self) -> Option<&str>;
}
