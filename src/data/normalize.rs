//! Normalization of upstream event payloads.
//!
//! The events feed is loosely typed: titles, timestamps and statuses may be
//! missing or malformed. Everything is coerced into a [`MonitorEvent`] here
//! so the rest of the engine only sees explicit values. The only hard
//! failure is a payload without a `data` array.

use chrono::{DateTime, Utc};
use serde_json::Value;

use statuswatch_types::{MonitorEvent, StatusCategory, UNKNOWN_EVENT_NAME};

use super::TimelineError;

/// The fields of one upstream event, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEvent {
    pub title: Option<String>,
    pub timestamp: Option<Value>,
    pub status: Option<String>,
}

impl RawEvent {
    /// Pick the event fields out of one element of the payload's `data`
    /// array (`attributes.attributes.{title, timestamp, status}`).
    ///
    /// Elements of any other shape yield an empty event.
    pub fn from_value(element: &Value) -> Self {
        let attrs = element.pointer("/attributes/attributes");
        let field = |key: &str| {
            attrs
                .and_then(|a| a.get(key))
                .filter(|v| !v.is_null())
        };

        Self {
            title: field("title")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            timestamp: field("timestamp").cloned(),
            status: field("status").map(|v| match v.as_str() {
                Some(s) => s.to_string(),
                None => v.to_string(),
            }),
        }
    }
}

/// Validate the payload envelope and normalize every event in it.
///
/// Fails only when the payload is not an object with a `data` array. An
/// empty array is valid and yields no events.
pub fn normalize_payload(payload: &Value) -> Result<Vec<MonitorEvent>, TimelineError> {
    let data = payload.get("data").ok_or_else(|| {
        TimelineError::InvalidUpstreamFormat("payload has no `data` field".to_string())
    })?;

    let elements = data.as_array().ok_or_else(|| {
        TimelineError::InvalidUpstreamFormat(format!(
            "`data` is {}, expected an array",
            json_kind(data)
        ))
    })?;

    Ok(normalize_events(
        elements.iter().map(RawEvent::from_value).collect(),
    ))
}

/// Apply defaults to raw events and sort them chronologically.
///
/// No event is dropped. The sort is stable, so events sharing a timestamp
/// keep their upstream order.
pub fn normalize_events(raw: Vec<RawEvent>) -> Vec<MonitorEvent> {
    let mut events: Vec<MonitorEvent> = raw.into_iter().map(normalize_event).collect();
    events.sort_by_key(|e| e.time);
    events
}

fn normalize_event(raw: RawEvent) -> MonitorEvent {
    MonitorEvent {
        name: raw.title.unwrap_or_else(|| UNKNOWN_EVENT_NAME.to_string()),
        time: raw
            .timestamp
            .as_ref()
            .map(coerce_time)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        status: raw
            .status
            .as_deref()
            .map(coerce_status)
            .unwrap_or_default(),
    }
}

/// Integers are epoch milliseconds; strings are RFC 3339 or integer
/// milliseconds. Anything else maps to the epoch.
fn coerce_time(raw: &Value) -> DateTime<Utc> {
    let parsed = match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|t| t.with_timezone(&Utc))
                .ok()
                .or_else(|| s.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis))
        }
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        tracing::warn!(timestamp = %raw, "unparseable event timestamp, using epoch");
        DateTime::<Utc>::UNIX_EPOCH
    })
}

fn coerce_status(raw: &str) -> StatusCategory {
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!(status = raw, "unknown event status, treating as success");
        StatusCategory::Success
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn event(title: &str, timestamp: Value, status: &str) -> Value {
        json!({
            "id": "evt",
            "type": "event",
            "attributes": {
                "attributes": {
                    "title": title,
                    "timestamp": timestamp,
                    "status": status
                }
            }
        })
    }

    #[test]
    fn test_rejects_missing_data() {
        let err = normalize_payload(&json!({ "meta": {} })).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidUpstreamFormat(_)));

        let err = normalize_payload(&json!("nope")).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidUpstreamFormat(_)));
    }

    #[test]
    fn test_rejects_non_array_data() {
        let err = normalize_payload(&json!({ "data": { "0": {} } })).unwrap_err();
        assert_eq!(
            err,
            TimelineError::InvalidUpstreamFormat("`data` is an object, expected an array".into())
        );
    }

    #[test]
    fn test_empty_data_is_valid() {
        assert!(normalize_payload(&json!({ "data": [] })).unwrap().is_empty());
    }

    #[test]
    fn test_sorts_ascending() {
        let payload = json!({
            "data": [
                event("recovered", json!(7_200_000), "success"),
                event("down", json!(3_600_000), "error"),
            ]
        });

        let events = normalize_payload(&payload).unwrap();
        assert_eq!(events[0].name, "down");
        assert_eq!(events[0].status, StatusCategory::Error);
        assert_eq!(events[1].name, "recovered");
        assert_eq!(
            events[0].time,
            Utc.with_ymd_and_hms(1970, 1, 1, 1, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_sort_is_stable() {
        let events = normalize_events(vec![
            RawEvent {
                title: Some("first".into()),
                timestamp: Some(json!(1000)),
                status: Some("error".into()),
            },
            RawEvent {
                title: Some("second".into()),
                timestamp: Some(json!(1000)),
                status: Some("success".into()),
            },
        ]);
        assert_eq!(events[0].name, "first");
        assert_eq!(events[1].name, "second");
    }

    #[test]
    fn test_defaults() {
        let payload = json!({ "data": [ {}, 42, { "attributes": { "attributes": { "title": "" } } } ] });
        let events = normalize_payload(&payload).unwrap();

        assert_eq!(events.len(), 3);
        for e in &events {
            assert_eq!(e, &MonitorEvent::default());
        }
    }

    #[test]
    fn test_timestamp_forms() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let ms = expected.timestamp_millis();

        for ts in [
            json!(ms),
            json!(ms.to_string()),
            json!("2025-01-01T12:00:00Z"),
            json!("2025-01-01T13:00:00+01:00"),
        ] {
            assert_eq!(coerce_time(&ts), expected, "timestamp {}", ts);
        }
    }

    #[test]
    fn test_bad_timestamp_is_epoch() {
        assert_eq!(coerce_time(&json!("yesterday")), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(coerce_time(&json!([1, 2])), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_status_coercion() {
        assert_eq!(coerce_status("warning"), StatusCategory::Warning);
        assert_eq!(coerce_status("degraded"), StatusCategory::Degraded);
        assert_eq!(coerce_status("error"), StatusCategory::Error);
        assert_eq!(coerce_status("info"), StatusCategory::Success);

        let raw = RawEvent::from_value(&event("x", json!(0), "error"));
        assert_eq!(raw.status.as_deref(), Some("error"));

        // Non-string statuses are kept as text and fall back to success
        let raw = RawEvent::from_value(&json!({ "attributes": { "attributes": { "status": 3 } } }));
        assert_eq!(normalize_events(vec![raw])[0].status, StatusCategory::Success);
    }
}
