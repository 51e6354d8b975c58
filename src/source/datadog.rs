//! Background polling of Datadog.
//!
//! A [`DatadogPoller`] fetches every configured monitor's events plus the
//! incident and downtime lists once per refresh interval and publishes the
//! result on a [`ChannelSource`]. Monitors are fetched concurrently; one
//! failing monitor only marks that monitor as failed.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

use statuswatch_adapters::datadog::{DatadogAdapter, DowntimeQuery, IncidentQuery};

use super::{ChannelSource, MonitorFeed, StatusFeed};
use crate::config::MonitorConfig;

/// Periodically fetches a [`StatusFeed`] from Datadog.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use statuswatch::{DataSource, DatadogPoller, MonitorConfig};
/// use statuswatch_adapters::datadog::DatadogAdapter;
///
/// # tokio_test::block_on(async {
/// let adapter = DatadogAdapter::builder()
///     .credentials("api-key", "app-key")
///     .build();
/// let monitors = vec![MonitorConfig::new("3741790", "Public API")];
///
/// let (mut source, handle) = DatadogPoller::new(adapter, monitors, Duration::from_secs(60)).spawn();
/// tokio::time::sleep(Duration::from_secs(5)).await;
/// if let Some(feed) = source.poll() {
///     println!("fetched {} monitors", feed.monitors.len());
/// }
/// handle.abort();
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct DatadogPoller {
    adapter: DatadogAdapter,
    monitors: Vec<MonitorConfig>,
    interval: Duration,
}

impl DatadogPoller {
    pub fn new(adapter: DatadogAdapter, monitors: Vec<MonitorConfig>, interval: Duration) -> Self {
        Self {
            adapter,
            monitors,
            interval,
        }
    }

    /// Fetch one complete feed.
    pub async fn fetch(&self) -> StatusFeed {
        let recent_query = IncidentQuery::default();
        let current_query = IncidentQuery::current();
        let downtime_query = DowntimeQuery::default();

        let (monitors, incidents, current_incidents, downtimes) = tokio::join!(
            self.fetch_monitors(),
            self.adapter.search_incidents(&recent_query),
            self.adapter.search_incidents(&current_query),
            self.adapter.downtimes(&downtime_query),
        );

        let mut notices = Vec::new();
        let incidents = incidents.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to fetch incidents");
            notices.push(format!("Incidents unavailable: {}", e));
            Vec::new()
        });
        let current_incidents = current_incidents.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to fetch current incidents");
            notices.push(format!("Current incidents unavailable: {}", e));
            Vec::new()
        });
        let downtimes = downtimes.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to fetch downtimes");
            notices.push(format!("Downtimes unavailable: {}", e));
            Vec::new()
        });

        StatusFeed {
            monitors,
            incidents,
            current_incidents,
            downtimes,
            fetched_at: Some(Utc::now()),
            notices,
        }
    }

    /// Fetch all monitors concurrently, returning them in configuration
    /// order.
    async fn fetch_monitors(&self) -> Vec<MonitorFeed> {
        let mut set = JoinSet::new();

        for (index, monitor) in self.monitors.iter().cloned().enumerate() {
            let adapter = self.adapter.clone();
            set.spawn(async move {
                let title = monitor.display_title();
                let feed = match adapter.monitor_events(&monitor.id).await {
                    Ok(payload) => MonitorFeed::new(monitor.id, title, payload),
                    Err(e) => {
                        tracing::warn!(monitor = %monitor.id, error = %e, "failed to fetch events");
                        MonitorFeed::failed(monitor.id, title, e.to_string())
                    }
                };
                (index, feed)
            });
        }

        let mut slots: Vec<Option<MonitorFeed>> = vec![None; self.monitors.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, feed)) => slots[index] = Some(feed),
                Err(e) => tracing::warn!(error = %e, "monitor fetch task failed"),
            }
        }

        // A panicked task leaves its slot empty
        slots
            .into_iter()
            .zip(&self.monitors)
            .map(|(slot, monitor)| {
                slot.unwrap_or_else(|| {
                    MonitorFeed::failed(&monitor.id, monitor.display_title(), "fetch task failed")
                })
            })
            .collect()
    }

    /// Run the polling loop until every receiver is gone.
    pub async fn run(self, tx: watch::Sender<StatusFeed>) {
        loop {
            tracing::debug!(monitors = self.monitors.len(), "polling datadog");
            let feed = self.fetch().await;

            if tx.send(feed).is_err() {
                tracing::debug!("status feed receiver dropped, stopping poller");
                break;
            }

            tokio::time::sleep(self.interval).await;
        }
    }

    /// Spawn the polling loop on the current runtime.
    ///
    /// Returns the source for the TUI and the handle of the polling task.
    pub fn spawn(self) -> (ChannelSource, JoinHandle<()>) {
        let (tx, source) = ChannelSource::create(self.adapter.site());
        let handle = tokio::spawn(self.run(tx));
        (source, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DataSource;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_datadog() -> MockServer {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/events"))
            .and(query_param(
                "filter[query]",
                statuswatch_adapters::datadog::events_query("1").as_str(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "attributes": { "attributes": {
                        "title": "API down", "timestamp": 1_735_689_600_000i64, "status": "error"
                    } } }
                ]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v2/events"))
            .and(query_param(
                "filter[query]",
                statuswatch_adapters::datadog::events_query("2").as_str(),
            ))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v2/incidents/search"))
            .and(query_param("query", "state:(stable OR active OR resolved)"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "attributes": { "incidents": [] } }
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v2/incidents/search"))
            .and(query_param("query", "state:(active OR stable)"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "attributes": { "incidents": [
                    { "data": {
                        "id": "00000000-aaaa-bbbb-cccc-000000000001",
                        "attributes": {
                            "title": "Checkout errors",
                            "created": "2024-11-02T08:00:00Z",
                            "modified": "2024-11-02T09:00:00Z",
                            "state": "active",
                            "public_id": 7
                        }
                    } }
                ] } }
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v2/downtime"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        server
    }

    fn poller(server: &MockServer) -> DatadogPoller {
        let adapter = DatadogAdapter::builder()
            .endpoint(server.uri())
            .credentials("k", "a")
            .build();
        DatadogPoller::new(
            adapter,
            vec![MonitorConfig::new("1", "API"), MonitorConfig::new("2", "Web")],
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    async fn test_fetch_keeps_order_and_isolates_failures() {
        let server = mock_datadog().await;
        let feed = poller(&server).fetch().await;

        assert_eq!(feed.monitors.len(), 2);
        assert_eq!(feed.monitors[0].id, "1");
        assert!(feed.monitors[0].fetch_error.is_none());
        assert_eq!(feed.monitors[0].payload["data"].as_array().unwrap().len(), 1);

        assert_eq!(feed.monitors[1].title, "Web");
        assert!(feed.monitors[1].fetch_error.is_some());

        // The open incident comes from its own search, not the recent list
        assert!(feed.incidents.is_empty());
        assert_eq!(feed.current_incidents.len(), 1);
        assert_eq!(feed.current_incidents[0].id, "7");
        assert_eq!(feed.notices.len(), 1);
        assert!(feed.notices[0].starts_with("Downtimes unavailable"));
        assert!(feed.fetched_at.is_some());
    }

    #[tokio::test]
    async fn test_spawned_poller_publishes() {
        let server = mock_datadog().await;
        let (mut source, handle) = poller(&server).spawn();

        let mut feed = None;
        for _ in 0..100 {
            if let Some(f) = source.poll() {
                feed = Some(f);
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        handle.abort();
        assert_eq!(feed.unwrap().monitors.len(), 2);
    }
}
