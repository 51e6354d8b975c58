//! File-based data source.
//!
//! Polls a JSON file holding a captured status feed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{DataSource, StatusFeed};

/// A data source that reads status feeds from a JSON file.
///
/// Typically the file was written by `statuswatch --capture`, or by any
/// other process that produces the same format. The source tracks the
/// file's modification time and only returns new data when the file has
/// been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file once, without change tracking.
    pub fn load(path: &Path) -> anyhow::Result<StatusFeed> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<StatusFeed> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(feed) => {
                    self.last_error = None;
                    Some(feed)
                }
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "unreadable feed file");
                    self.last_error = Some(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<StatusFeed> {
        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, keep what we have
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(feed) = self.read_file() {
                self.last_modified = current_modified;
                return Some(feed);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "monitors": [
                { "id": "1", "title": "API", "payload": { "data": [] } }
            ],
            "incidents": [],
            "downtimes": []
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/feed.json");
        assert_eq!(source.path(), Path::new("/tmp/feed.json"));
        assert_eq!(source.description(), "file: /tmp/feed.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        let feed = source.poll().unwrap();
        assert_eq!(feed.monitors[0].title, "API");

        // Unchanged file yields nothing new
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_detects_changes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        let _ = source.poll();

        std::thread::sleep(std::time::Duration::from_millis(10));
        file.rewind().unwrap();
        writeln!(
            file,
            r#"{{ "monitors": [ {{ "id": "2", "title": "Web", "payload": {{ "data": [] }} }} ] }}"#
        )
        .unwrap();
        file.flush().unwrap();

        // Filesystems with coarse mtime resolution may not see the change
        if let Some(feed) = source.poll() {
            assert_eq!(feed.monitors[0].id, "2");
        }
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/feed.json");

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[test]
    fn test_load() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let feed = FileSource::load(file.path()).unwrap();
        assert_eq!(feed.monitors.len(), 1);
        assert!(FileSource::load(Path::new("/nonexistent/feed.json")).is_err());
    }
}
