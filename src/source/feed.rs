//! The raw inputs of a status page.
//!
//! A feed is what the fetch layer produces and what `--capture` writes to
//! disk: monitor event payloads exactly as received, plus incidents and
//! scheduled downtimes. Timelines are computed from it later, against the
//! current time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use statuswatch_types::{Incident, ScheduledDowntime};

/// Everything fetched in one refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusFeed {
    /// One entry per configured monitor, in display order.
    #[serde(default)]
    pub monitors: Vec<MonitorFeed>,

    /// Recent incidents in any state.
    #[serde(default)]
    pub incidents: Vec<Incident>,

    /// Incidents still active or stable, searched separately so an old open
    /// incident is not pushed out of the recent list.
    #[serde(default)]
    pub current_incidents: Vec<Incident>,

    #[serde(default)]
    pub downtimes: Vec<ScheduledDowntime>,

    /// When the feed was fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,

    /// Fetch problems that did not belong to a single monitor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
}

impl StatusFeed {
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
            && self.incidents.is_empty()
            && self.current_incidents.is_empty()
            && self.downtimes.is_empty()
    }
}

/// The events payload of one monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorFeed {
    pub id: String,
    pub title: String,

    /// Events response body, unvalidated.
    #[serde(default)]
    pub payload: Value,

    /// Set when the payload could not be fetched at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

impl MonitorFeed {
    pub fn new(id: impl Into<String>, title: impl Into<String>, payload: Value) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            payload,
            fetch_error: None,
        }
    }

    pub fn failed(id: impl Into<String>, title: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            payload: Value::Null,
            fetch_error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_feed() {
        let json = r#"{
            "monitors": [
                {
                    "id": "3741790",
                    "title": "Public API",
                    "payload": {
                        "data": [
                            {
                                "attributes": {
                                    "attributes": {
                                        "title": "[Triggered] API health",
                                        "timestamp": 1735689600000,
                                        "status": "error"
                                    }
                                }
                            }
                        ]
                    }
                },
                { "id": "42", "title": "Web", "fetch_error": "Request timed out" }
            ],
            "downtimes": [
                { "id": "dt-1", "status": "scheduled", "scope": ["env:prod"] }
            ]
        }"#;

        let feed: StatusFeed = serde_json::from_str(json).unwrap();
        assert_eq!(feed.monitors.len(), 2);
        assert!(feed.monitors[0].payload["data"].is_array());
        assert!(feed.monitors[0].fetch_error.is_none());
        assert!(feed.monitors[1].payload.is_null());
        assert_eq!(feed.monitors[1].fetch_error.as_deref(), Some("Request timed out"));
        assert!(feed.incidents.is_empty());
        assert!(feed.current_incidents.is_empty());
        assert_eq!(feed.downtimes.len(), 1);
        assert!(feed.fetched_at.is_none());
    }

    #[test]
    fn test_empty_feed() {
        let feed: StatusFeed = serde_json::from_str("{}").unwrap();
        assert!(feed.is_empty());
        assert_eq!(feed, StatusFeed::default());
    }
}
