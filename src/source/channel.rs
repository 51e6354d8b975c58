//! Channel-based data source.
//!
//! Receives status feeds via a tokio watch channel. Used by the Datadog
//! poller, which pushes a fresh feed after every fetch round.

use tokio::sync::watch;

use super::{DataSource, StatusFeed};

/// A data source that receives status feeds via a channel.
///
/// # Example
///
/// ```
/// use statuswatch::{ChannelSource, DataSource, StatusFeed};
///
/// let (tx, mut source) = ChannelSource::create("datadoghq.com");
/// tx.send(StatusFeed::default()).unwrap();
/// assert!(source.poll().is_some());
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<StatusFeed>,
    description: String,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// The initial value of the channel is treated as "nothing fetched
    /// yet": only values sent afterwards are returned by `poll`.
    pub fn new(receiver: watch::Receiver<StatusFeed>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
        }
    }

    /// Create a channel pair for sending feeds to a ChannelSource.
    pub fn create(source_description: &str) -> (watch::Sender<StatusFeed>, Self) {
        let (tx, rx) = watch::channel(StatusFeed::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<StatusFeed> {
        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        // Fetch failures travel inside the feed
        None
    }
}
