//! Datadog adapter using the v2 REST API.
//!
//! Three resources feed a status page:
//!
//! - **Events**: alert and downtime events for a monitor over the last 90
//!   days. Returned as the raw JSON payload; the timeline engine validates
//!   and normalizes it.
//! - **Incidents**: declared incidents, searched by state, newest first.
//! - **Downtimes**: scheduled maintenance windows, newest first.
//!
//! ## Example
//!
//! ```rust,no_run
//! use statuswatch_adapters::datadog::{DatadogAdapter, IncidentQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = DatadogAdapter::builder()
//!         .site("datadoghq.eu")
//!         .credentials("api-key", "app-key")
//!         .build();
//!
//!     for incident in adapter.search_incidents(&IncidentQuery::current()).await? {
//!         println!("{} [{}] {}", incident.id, incident.severity, incident.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use statuswatch_types::{
    CustomerImpact, DowntimeStatus, Incident, IncidentState, ScheduledDowntime,
};

use crate::AdapterError;

/// Default Datadog site.
pub const DEFAULT_SITE: &str = "datadoghq.com";

const EVENTS_PAGE_LIMIT: u32 = 1000;

/// Datadog adapter for monitor events, incidents and downtimes.
#[derive(Debug, Clone)]
pub struct DatadogAdapter {
    client: Client,
    site: String,
    api_base: String,
    api_key: String,
    app_key: String,
    max_event_pages: usize,
}

impl DatadogAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> DatadogAdapterBuilder {
        DatadogAdapterBuilder::default()
    }

    /// The Datadog site this adapter talks to.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Fetch the alert and downtime events of one monitor over the last 90
    /// days.
    ///
    /// Cursor pages are followed up to the configured page cap and their
    /// `data` arrays merged into the first page. The payload is otherwise
    /// returned untouched.
    pub async fn monitor_events(&self, monitor_id: &str) -> Result<Value, AdapterError> {
        let filter = events_query(monitor_id);
        let mut cursor: Option<String> = None;
        let mut merged: Option<Value> = None;
        let mut events: Vec<Value> = Vec::new();

        for page in 0..self.max_event_pages.max(1) {
            let mut query = vec![
                ("filter[query]", filter.clone()),
                ("filter[from]", "now-90d".to_string()),
                ("filter[to]", "now".to_string()),
                ("page[limit]", EVENTS_PAGE_LIMIT.to_string()),
            ];
            if let Some(after) = cursor.take() {
                query.push(("page[cursor]", after));
            }

            let body = self
                .get_json("/api/v2/events", &query, || {
                    format!("Events for monitor {}", monitor_id)
                })
                .await?;

            let next = body
                .pointer("/meta/page/after")
                .and_then(Value::as_str)
                .map(str::to_string);

            match body.get("data").and_then(Value::as_array) {
                Some(data) => events.extend(data.iter().cloned()),
                // Malformed payloads are handed back as is.
                None if merged.is_none() => return Ok(body),
                None => break,
            }

            if merged.is_none() {
                merged = Some(body);
            }

            match next {
                Some(after) if !after.is_empty() => {
                    tracing::debug!(monitor_id, page, "following events cursor");
                    cursor = Some(after);
                }
                _ => break,
            }
        }

        let mut payload = merged.unwrap_or_else(|| Value::Object(Default::default()));
        if let Some(obj) = payload.as_object_mut() {
            obj.insert("data".to_string(), Value::Array(events));
        }
        Ok(payload)
    }

    /// Search incidents, newest first.
    pub async fn search_incidents(
        &self,
        query: &IncidentQuery,
    ) -> Result<Vec<Incident>, AdapterError> {
        let params = [
            ("query", query.query_string()),
            ("sort", "-created".to_string()),
            ("page[size]", query.page_size.to_string()),
        ];

        let body = self
            .get_json("/api/v2/incidents/search", &params, || {
                "Incident search".to_string()
            })
            .await?;

        let response: IncidentSearchResponse =
            serde_json::from_value(body).map_err(|e| AdapterError::Parse(e.to_string()))?;

        let attributes = response
            .data
            .attributes
            .ok_or_else(invalid_incident_format)?;

        attributes
            .incidents
            .into_iter()
            .map(|envelope| {
                envelope
                    .data
                    .ok_or_else(invalid_incident_format)
                    .and_then(|record| record.into_incident(&self.site))
            })
            .collect()
    }

    /// Fetch a single incident by its internal id.
    pub async fn incident(&self, id: &str) -> Result<Incident, AdapterError> {
        let path = format!("/api/v2/incidents/{}", urlencoded(id));
        let body = self
            .get_json(&path, &[], || format!("Incident {}", id))
            .await?;

        let response: SingleResponse<IncidentRecord> =
            serde_json::from_value(body).map_err(|e| AdapterError::Parse(e.to_string()))?;

        response.data.into_incident(&self.site)
    }

    /// List scheduled downtimes, newest first.
    ///
    /// Datadog pages downtimes oldest first. To make `page` 0 the newest
    /// page, a first request reads the total count and the offset is
    /// computed from the end.
    pub async fn downtimes(
        &self,
        query: &DowntimeQuery,
    ) -> Result<Vec<ScheduledDowntime>, AdapterError> {
        let first = self.downtime_page(query, 0).await?;
        let count = first
            .meta
            .as_ref()
            .and_then(|m| m.page.as_ref())
            .and_then(|p| p.total_filtered_count)
            .unwrap_or(0);

        let offset = inverted_offset(count, query.page_limit, query.page);
        tracing::debug!(count, offset, "fetching downtime page");

        let page = if offset == 0 {
            first
        } else {
            self.downtime_page(query, offset).await?
        };

        let mut downtimes: Vec<ScheduledDowntime> = page
            .data
            .into_iter()
            .map(DowntimeRecord::into_downtime)
            .collect();
        downtimes.sort_by(|a, b| b.created.cmp(&a.created));

        Ok(downtimes)
    }

    /// Fetch a single downtime by id.
    pub async fn downtime(&self, id: &str) -> Result<ScheduledDowntime, AdapterError> {
        let path = format!("/api/v2/downtime/{}", urlencoded(id));
        let body = self
            .get_json(&path, &[], || format!("Downtime {}", id))
            .await?;

        let response: SingleResponse<DowntimeRecord> =
            serde_json::from_value(body).map_err(|e| AdapterError::Parse(e.to_string()))?;

        Ok(response.data.into_downtime())
    }

    async fn downtime_page(
        &self,
        query: &DowntimeQuery,
        offset: u64,
    ) -> Result<DowntimeListResponse, AdapterError> {
        let mut params = vec![
            ("current_only", query.current_only.to_string()),
            ("page[limit]", query.page_limit.to_string()),
            ("page[offset]", offset.to_string()),
        ];
        if let Some(include) = &query.include {
            params.push(("include", include.clone()));
        }

        let body = self
            .get_json("/api/v2/downtime", &params, || "Downtimes".to_string())
            .await?;

        serde_json::from_value(body).map_err(|e| AdapterError::Parse(e.to_string()))
    }

    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: impl FnOnce() -> String,
    ) -> Result<Value, AdapterError> {
        let url = format!("{}{}", self.api_base, path);
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .header("DD-API-KEY", &self.api_key)
            .header("DD-APPLICATION-KEY", &self.app_key)
            .query(query)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AdapterError::Auth(
                    "Invalid API or application key".to_string(),
                ));
            }
            StatusCode::NOT_FOUND => return Err(AdapterError::NotFound(what())),
            status if !status.is_success() => {
                return Err(AdapterError::Http(format!("API returned status {}", status)));
            }
            _ => {}
        }

        response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))
    }
}

/// Builder for DatadogAdapter.
#[derive(Debug, Default)]
pub struct DatadogAdapterBuilder {
    site: Option<String>,
    endpoint: Option<String>,
    api_key: Option<String>,
    app_key: Option<String>,
    timeout: Option<Duration>,
    max_event_pages: Option<usize>,
}

impl DatadogAdapterBuilder {
    /// Set the Datadog site (default: "datadoghq.com").
    pub fn site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    /// Override the API base URL. Defaults to `https://api.{site}`.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the API key and application key.
    pub fn credentials(mut self, api_key: impl Into<String>, app_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self.app_key = Some(app_key.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Cap on event cursor pages followed per monitor (default: 10).
    pub fn max_event_pages(mut self, pages: usize) -> Self {
        self.max_event_pages = Some(pages);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> DatadogAdapter {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        let site = self.site.unwrap_or_else(|| DEFAULT_SITE.to_string());
        let api_base = self
            .endpoint
            .unwrap_or_else(|| format!("https://api.{}", site))
            .trim_end_matches('/')
            .to_string();

        DatadogAdapter {
            client,
            api_base,
            site,
            api_key: self.api_key.unwrap_or_default(),
            app_key: self.app_key.unwrap_or_default(),
            max_event_pages: self.max_event_pages.unwrap_or(10),
        }
    }
}

/// Parameters for an incident search.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentQuery {
    pub states: Vec<IncidentState>,
    pub page_size: u32,
}

impl IncidentQuery {
    /// Open incidents only.
    pub fn current() -> Self {
        Self {
            states: vec![IncidentState::Active, IncidentState::Stable],
            ..Self::default()
        }
    }

    fn query_string(&self) -> String {
        let states: Vec<&str> = self
            .states
            .iter()
            .filter_map(|s| match s {
                IncidentState::Active => Some("active"),
                IncidentState::Stable => Some("stable"),
                IncidentState::Resolved => Some("resolved"),
                IncidentState::Unknown => None,
            })
            .collect();
        format!("state:({})", states.join(" OR "))
    }
}

impl Default for IncidentQuery {
    fn default() -> Self {
        Self {
            states: vec![
                IncidentState::Stable,
                IncidentState::Active,
                IncidentState::Resolved,
            ],
            page_size: 25,
        }
    }
}

/// Parameters for a downtime listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DowntimeQuery {
    /// Only downtimes that are active or scheduled.
    pub current_only: bool,
    /// Related resources to include, e.g. `monitor`.
    pub include: Option<String>,
    pub page_limit: u32,
    /// Zero-based page, counted from the newest downtimes.
    pub page: u32,
}

impl Default for DowntimeQuery {
    fn default() -> Self {
        Self {
            current_only: false,
            include: None,
            page_limit: 5,
            page: 0,
        }
    }
}

/// Events search query for one monitor: its alert transitions plus the
/// downtime events that silenced it.
pub fn events_query(monitor_id: &str) -> String {
    format!(
        "(source:alert (@monitor_id:{id} OR monitor_id:{id})) OR (source:datadog monitor_id:{id} tags:downtime)",
        id = monitor_id
    )
}

/// Offset of `page` when counting pages back from the newest entry of an
/// oldest-first listing of `count` entries.
pub fn inverted_offset(count: u64, limit: u32, page: u32) -> u64 {
    if count == 0 {
        return 0;
    }
    let consumed = u64::from(limit) * (u64::from(page) + 1);
    count.saturating_sub(consumed)
}

fn invalid_incident_format() -> AdapterError {
    AdapterError::InvalidFormat("Invalid incident data format".to_string())
}

// Path segments come from ids; only the characters that would break the
// path need escaping.
fn urlencoded(s: &str) -> String {
    s.replace('%', "%25").replace('/', "%2F").replace('?', "%3F").replace('#', "%23")
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[derive(Debug, Deserialize)]
struct SingleResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct IncidentSearchResponse {
    data: IncidentSearchData,
}

#[derive(Debug, Deserialize)]
struct IncidentSearchData {
    attributes: Option<IncidentSearchAttributes>,
}

#[derive(Debug, Deserialize)]
struct IncidentSearchAttributes {
    #[serde(default)]
    incidents: Vec<IncidentEnvelope>,
}

#[derive(Debug, Deserialize)]
struct IncidentEnvelope {
    data: Option<IncidentRecord>,
}

#[derive(Debug, Deserialize)]
struct IncidentRecord {
    id: String,
    attributes: Option<IncidentAttributes>,
}

#[derive(Debug, Default, Deserialize)]
struct IncidentAttributes {
    title: Option<String>,
    created: Option<DateTime<Utc>>,
    modified: Option<DateTime<Utc>>,
    resolved: Option<DateTime<Utc>>,
    state: Option<String>,
    severity: Option<String>,
    public_id: Option<u64>,
    customer_impacted: Option<bool>,
    customer_impact_scope: Option<String>,
    customer_impact_start: Option<DateTime<Utc>>,
    customer_impact_end: Option<DateTime<Utc>>,
    customer_impact_duration: Option<i64>,
    time_to_detect: Option<i64>,
    time_to_repair: Option<i64>,
    time_to_resolve: Option<i64>,
}

impl IncidentRecord {
    fn into_incident(self, site: &str) -> Result<Incident, AdapterError> {
        let attrs = self.attributes.ok_or_else(invalid_incident_format)?;
        let (Some(created), Some(modified)) = (attrs.created, attrs.modified) else {
            return Err(invalid_incident_format());
        };

        let id = attrs
            .public_id
            .map(|n| n.to_string())
            .unwrap_or_else(|| self.id.clone());

        Ok(Incident {
            url: format!("https://app.{}/incidents/{}", site, self.id),
            id,
            incident_id: self.id,
            title: attrs.title.unwrap_or_default(),
            state: attrs
                .state
                .as_deref()
                .map(IncidentState::parse)
                .unwrap_or_default(),
            severity: attrs.severity.unwrap_or_else(|| "UNKNOWN".to_string()),
            created,
            modified,
            resolved: attrs.resolved,
            customer_impact: CustomerImpact {
                impacted: attrs.customer_impacted.unwrap_or(false),
                scope: attrs.customer_impact_scope,
                start: attrs.customer_impact_start,
                end: attrs.customer_impact_end,
                duration: attrs.customer_impact_duration,
            },
            time_to_detect: attrs.time_to_detect,
            time_to_repair: attrs.time_to_repair,
            time_to_resolve: attrs.time_to_resolve,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DowntimeListResponse {
    #[serde(default)]
    data: Vec<DowntimeRecord>,
    meta: Option<ListMeta>,
}

#[derive(Debug, Deserialize)]
struct ListMeta {
    page: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    total_filtered_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct DowntimeRecord {
    id: String,
    #[serde(default)]
    attributes: DowntimeAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct DowntimeAttributes {
    message: Option<String>,
    status: Option<String>,
    created: Option<String>,
    // One-time schedules carry start/end directly, recurring ones nest them
    // under current_downtime.
    schedule: Option<Value>,
    // Either a single query string or a list of them.
    scope: Option<Value>,
}

impl DowntimeRecord {
    fn into_downtime(self) -> ScheduledDowntime {
        let attrs = self.attributes;

        let schedule = attrs
            .schedule
            .as_ref()
            .map(|s| s.get("current_downtime").unwrap_or(s));
        let bound = |key: &str| {
            schedule
                .and_then(|s| s.get(key))
                .and_then(Value::as_str)
                .and_then(parse_instant)
        };

        let scope = match attrs.scope {
            Some(Value::String(s)) => vec![s],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        ScheduledDowntime {
            id: self.id,
            message: attrs.message.filter(|m| !m.trim().is_empty()),
            status: attrs
                .status
                .as_deref()
                .map(DowntimeStatus::parse)
                .unwrap_or_default(),
            created: attrs.created.as_deref().and_then(parse_instant),
            start: bound("start"),
            end: bound("end"),
            scope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter_for(server: &MockServer) -> DatadogAdapter {
        DatadogAdapter::builder()
            .endpoint(server.uri())
            .credentials("api-key", "app-key")
            .build()
    }

    fn incident_json(id: &str, public_id: u64, created: &str) -> Value {
        json!({
            "data": {
                "id": id,
                "type": "incidents",
                "attributes": {
                    "title": "Checkout latency",
                    "created": created,
                    "modified": created,
                    "resolved": null,
                    "state": "active",
                    "severity": "SEV-2",
                    "public_id": public_id,
                    "customer_impacted": true,
                    "customer_impact_scope": "[1] Checkout [2] Cart",
                    "time_to_detect": 120
                }
            }
        })
    }

    #[test]
    fn test_builder_defaults() {
        let adapter = DatadogAdapter::builder().build();
        assert_eq!(adapter.site, "datadoghq.com");
        assert_eq!(adapter.api_base, "https://api.datadoghq.com");
        assert_eq!(adapter.max_event_pages, 10);
        assert!(adapter.api_key.is_empty());
    }

    #[test]
    fn test_builder_custom() {
        let adapter = DatadogAdapter::builder()
            .site("datadoghq.eu")
            .credentials("k", "a")
            .max_event_pages(3)
            .build();

        assert_eq!(adapter.site(), "datadoghq.eu");
        assert_eq!(adapter.api_base, "https://api.datadoghq.eu");
        assert_eq!(adapter.api_key, "k");
        assert_eq!(adapter.app_key, "a");
        assert_eq!(adapter.max_event_pages, 3);

        let adapter = DatadogAdapter::builder()
            .endpoint("http://localhost:8080/")
            .build();
        assert_eq!(adapter.api_base, "http://localhost:8080");
    }

    #[test]
    fn test_events_query() {
        assert_eq!(
            events_query("42"),
            "(source:alert (@monitor_id:42 OR monitor_id:42)) OR (source:datadog monitor_id:42 tags:downtime)"
        );
    }

    #[test]
    fn test_inverted_offset() {
        assert_eq!(inverted_offset(0, 20, 0), 0);
        assert_eq!(inverted_offset(45, 20, 0), 25);
        assert_eq!(inverted_offset(45, 20, 1), 5);
        assert_eq!(inverted_offset(45, 20, 2), 0);
        assert_eq!(inverted_offset(10, 20, 0), 0);
    }

    #[test]
    fn test_incident_query_string() {
        assert_eq!(
            IncidentQuery::default().query_string(),
            "state:(stable OR active OR resolved)"
        );
        assert_eq!(
            IncidentQuery::current().query_string(),
            "state:(active OR stable)"
        );
    }

    #[test]
    fn test_urlencoded() {
        assert_eq!(urlencoded("abc-123"), "abc-123");
        assert_eq!(urlencoded("a/b"), "a%2Fb");
    }

    #[test]
    fn test_incident_record_conversion() {
        let record: SingleResponse<IncidentRecord> =
            serde_json::from_value(incident_json("uuid-1", 17, "2025-01-01T10:00:00+00:00"))
                .unwrap();
        let incident = record.data.into_incident("datadoghq.com").unwrap();

        assert_eq!(incident.id, "17");
        assert_eq!(incident.incident_id, "uuid-1");
        assert_eq!(incident.url, "https://app.datadoghq.com/incidents/uuid-1");
        assert_eq!(incident.state, IncidentState::Active);
        assert_eq!(incident.severity, "SEV-2");
        assert!(incident.customer_impact.impacted);
        assert_eq!(
            incident.customer_impact.scope.as_deref(),
            Some("[1] Checkout [2] Cart")
        );
        assert_eq!(incident.time_to_detect, Some(120));
        assert_eq!(
            incident.created,
            Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_incident_missing_timestamps_is_invalid() {
        let record: IncidentRecord = serde_json::from_value(json!({
            "id": "uuid-2",
            "attributes": { "title": "No dates", "state": "active" }
        }))
        .unwrap();

        let err = record.into_incident("datadoghq.com").unwrap_err();
        assert!(matches!(err, AdapterError::InvalidFormat(ref m) if m == "Invalid incident data format"));
    }

    #[test]
    fn test_incident_defaults() {
        let record: IncidentRecord = serde_json::from_value(json!({
            "id": "uuid-3",
            "attributes": {
                "created": "2025-01-01T00:00:00Z",
                "modified": "2025-01-02T00:00:00Z"
            }
        }))
        .unwrap();

        let incident = record.into_incident("datadoghq.eu").unwrap();
        assert_eq!(incident.id, "uuid-3");
        assert_eq!(incident.url, "https://app.datadoghq.eu/incidents/uuid-3");
        assert_eq!(incident.severity, "UNKNOWN");
        assert_eq!(incident.state, IncidentState::Unknown);
        assert!(!incident.customer_impact.impacted);
    }

    #[test]
    fn test_downtime_record_conversion() {
        let record: DowntimeRecord = serde_json::from_value(json!({
            "id": "dt-1",
            "attributes": {
                "message": "Database upgrade",
                "status": "scheduled",
                "created": "2025-01-01T00:00:00+00:00",
                "schedule": {
                    "start": "2025-01-05T02:00:00+00:00",
                    "end": "2025-01-05T04:00:00+00:00"
                },
                "scope": "env:prod"
            }
        }))
        .unwrap();

        let downtime = record.into_downtime();
        assert_eq!(downtime.id, "dt-1");
        assert_eq!(downtime.message.as_deref(), Some("Database upgrade"));
        assert_eq!(downtime.status, DowntimeStatus::Scheduled);
        assert_eq!(
            downtime.start,
            Some(Utc.with_ymd_and_hms(2025, 1, 5, 2, 0, 0).unwrap())
        );
        assert_eq!(
            downtime.end,
            Some(Utc.with_ymd_and_hms(2025, 1, 5, 4, 0, 0).unwrap())
        );
        assert_eq!(downtime.scope, vec!["env:prod"]);
    }

    #[test]
    fn test_downtime_recurring_and_unparseable() {
        let record: DowntimeRecord = serde_json::from_value(json!({
            "id": "dt-2",
            "attributes": {
                "message": "  ",
                "status": "active",
                "schedule": {
                    "current_downtime": {
                        "start": "2025-02-01T00:00:00Z",
                        "end": "not a date"
                    },
                    "recurrences": []
                },
                "scope": ["service:api", "service:web"]
            }
        }))
        .unwrap();

        let downtime = record.into_downtime();
        assert_eq!(downtime.message, None);
        assert_eq!(downtime.status, DowntimeStatus::Active);
        assert_eq!(downtime.created, None);
        assert!(downtime.start.is_some());
        assert_eq!(downtime.end, None);
        assert_eq!(downtime.scope, vec!["service:api", "service:web"]);
    }

    #[tokio::test]
    async fn test_monitor_events_follows_cursor() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/events"))
            .and(query_param("page[cursor]", "next-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": "e2" }],
                "meta": { "page": {} }
            })))
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v2/events"))
            .and(header("DD-API-KEY", "api-key"))
            .and(header("DD-APPLICATION-KEY", "app-key"))
            .and(query_param("filter[from]", "now-90d"))
            .and(query_param("filter[query]", events_query("77").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": "e1" }],
                "meta": { "page": { "after": "next-1" } }
            })))
            .mount(&server)
            .await;

        let payload = adapter_for(&server).monitor_events("77").await.unwrap();
        let ids: Vec<&str> = payload["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["e1", "e2"]);
    }

    #[tokio::test]
    async fn test_monitor_events_malformed_payload_passthrough() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": "oops" })))
            .mount(&server)
            .await;

        let payload = adapter_for(&server).monitor_events("1").await.unwrap();
        assert_eq!(payload, json!({ "data": "oops" }));
    }

    #[tokio::test]
    async fn test_auth_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = adapter_for(&server).monitor_events("1").await.unwrap_err();
        assert!(matches!(err, AdapterError::Auth(_)));
    }

    #[tokio::test]
    async fn test_search_incidents() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/incidents/search"))
            .and(query_param("sort", "-created"))
            .and(query_param("page[size]", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "type": "incidents_search_results",
                    "attributes": {
                        "incidents": [
                            incident_json("uuid-b", 2, "2025-01-02T00:00:00Z"),
                            incident_json("uuid-a", 1, "2025-01-01T00:00:00Z")
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;

        let incidents = adapter_for(&server)
            .search_incidents(&IncidentQuery::default())
            .await
            .unwrap();

        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].id, "2");
        assert_eq!(incidents[1].incident_id, "uuid-a");
    }

    #[tokio::test]
    async fn test_search_incidents_missing_attributes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/incidents/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "type": "x" } })),
            )
            .mount(&server)
            .await;

        let err = adapter_for(&server)
            .search_incidents(&IncidentQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::InvalidFormat(_)));
    }

    #[tokio::test]
    async fn test_incident_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/incidents/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = adapter_for(&server).incident("missing").await.unwrap_err();
        assert!(matches!(err, AdapterError::NotFound(ref what) if what == "Incident missing"));
    }

    #[tokio::test]
    async fn test_downtimes_newest_page_first() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/downtime"))
            .and(query_param("page[offset]", "40"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "id": "old", "attributes": { "created": "2025-01-01T00:00:00Z" } },
                    { "id": "new", "attributes": { "created": "2025-03-01T00:00:00Z" } }
                ],
                "meta": { "page": { "total_filtered_count": 45 } }
            })))
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v2/downtime"))
            .and(query_param("page[offset]", "0"))
            .and(query_param("page[limit]", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [],
                "meta": { "page": { "total_filtered_count": 45 } }
            })))
            .mount(&server)
            .await;

        let downtimes = adapter_for(&server)
            .downtimes(&DowntimeQuery::default())
            .await
            .unwrap();

        let ids: Vec<&str> = downtimes.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_downtime_by_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/downtime/dt-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "id": "dt-9",
                    "attributes": { "message": "Patching", "status": "ended" }
                }
            })))
            .mount(&server)
            .await;

        let downtime = adapter_for(&server).downtime("dt-9").await.unwrap();
        assert_eq!(downtime.message.as_deref(), Some("Patching"));
        assert_eq!(downtime.status, DowntimeStatus::Ended);
    }
}
