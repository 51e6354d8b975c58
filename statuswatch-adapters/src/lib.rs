//! # statuswatch-adapters
//!
//! Adapters that pull status page inputs from monitoring platforms.
//!
//! The adapters only fetch and reshape: monitor event feeds are returned as
//! raw JSON so that validation and timeline reconstruction stay in one
//! place (the `statuswatch` timeline engine). Incidents and scheduled
//! downtimes are converted to `statuswatch-types` records.
//!
//! ## Supported Systems
//!
//! - **Datadog** (`datadog` feature) - monitor events, incident search and
//!   scheduled downtimes via the v2 REST API
//!
//! ## Quick Start (Datadog)
//!
//! ```rust,no_run
//! use statuswatch_adapters::datadog::{DatadogAdapter, DowntimeQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = DatadogAdapter::builder()
//!         .site("datadoghq.com")
//!         .credentials("api-key", "app-key")
//!         .build();
//!
//!     let events = adapter.monitor_events("3741790").await?;
//!     let downtimes = adapter.downtimes(&DowntimeQuery::default()).await?;
//!
//!     println!("{} downtimes scheduled", downtimes.len());
//!     Ok(())
//! }
//! ```

pub mod error;

#[cfg(feature = "datadog")]
pub mod datadog;

pub use error::AdapterError;

// Re-export types for convenience
pub use statuswatch_types::{Incident, IncidentState, ScheduledDowntime};
