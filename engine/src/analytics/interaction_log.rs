use anyhow::Context;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEntry {
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub session_id: String,
    pub action: String,
    /// JSON-encoded details object.
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionCount {
    pub action: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_interactions: usize,
    pub unique_sessions: usize,
    /// At most five actions, most frequent first.
    pub top_actions: Vec<ActionCount>,
    pub daily_usage: BTreeMap<NaiveDate, usize>,
}

/// Append-only CSV log of user actions, capped to the most recent entries.
#[derive(Debug, Clone)]
pub struct InteractionLog {
    path: PathBuf,
    cap: usize,
    session_id: String,
}

impl InteractionLog {
    pub fn new(path: impl Into<PathBuf>, cap: usize) -> Self {
        let mut session_id = Uuid::new_v4().simple().to_string();
        session_id.truncate(8);
        Self {
            path: path.into(),
            cap: cap.max(1),
            session_id,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Records an action. Never fails: problems are logged and dropped.
    pub fn record(&self, action: &str, details: serde_json::Value) {
        if let Err(e) = self.try_record(action, &details, Utc::now()) {
            tracing::warn!(
                path = %self.path.display(),
                action,
                error = %e,
                "Failed to write interaction log entry"
            );
        }
    }

    fn try_record(
        &self,
        action: &str,
        details: &serde_json::Value,
        at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut entries = if self.path.exists() {
            self.read_entries().unwrap_or_else(|e| {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Interaction log unreadable, starting a new one"
                );
                Vec::new()
            })
        } else {
            Vec::new()
        };

        entries.push(InteractionEntry {
            timestamp: at.to_rfc3339(),
            session_id: self.session_id.clone(),
            action: action.to_string(),
            details: serde_json::to_string(details)?,
        });
        if entries.len() > self.cap {
            let excess = entries.len() - self.cap;
            entries.drain(..excess);
        }

        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Error opening {}", self.path.display()))?;
        for entry in &entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read_entries(&self) -> anyhow::Result<Vec<InteractionEntry>> {
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Error opening {}", self.path.display()))?;
        reader
            .deserialize::<InteractionEntry>()
            .enumerate()
            .map(|(i, row)| row.with_context(|| format!("Error reading log entry at line {}", i + 2)))
            .collect()
    }

    /// Summarizes entries newer than `window_days` before `now`. `None` when
    /// the log is missing or cannot be read.
    pub fn summary(&self, now: DateTime<Utc>, window_days: i64) -> Option<AnalyticsSummary> {
        if !self.path.exists() {
            return None;
        }
        match self.try_summary(now, window_days) {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Unreadable interaction log");
                None
            }
        }
    }

    fn try_summary(&self, now: DateTime<Utc>, window_days: i64) -> anyhow::Result<AnalyticsSummary> {
        let cutoff = now - Duration::days(window_days);

        let mut recent = Vec::new();
        for entry in self.read_entries()? {
            let at = DateTime::parse_from_rfc3339(&entry.timestamp)
                .with_context(|| format!("Invalid timestamp '{}'", entry.timestamp))?
                .with_timezone(&Utc);
            if at >= cutoff {
                recent.push((at, entry));
            }
        }

        let sessions: HashSet<&str> = recent.iter().map(|(_, e)| e.session_id.as_str()).collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut daily_usage: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for (at, entry) in &recent {
            *counts.entry(entry.action.as_str()).or_default() += 1;
            *daily_usage.entry(at.date_naive()).or_default() += 1;
        }
        let mut top_actions: Vec<ActionCount> = counts
            .into_iter()
            .map(|(action, count)| ActionCount {
                action: action.to_string(),
                count,
            })
            .collect();
        top_actions.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.action.cmp(&b.action)));
        top_actions.truncate(5);

        Ok(AnalyticsSummary {
            total_interactions: recent.len(),
            unique_sessions: sessions.len(),
            top_actions,
            daily_usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_session_id_is_short_hex() {
        let log = InteractionLog::new("unused.csv", 10);
        assert_eq!(log.session_id().len(), 8);
        assert!(log.session_id().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_record_appends_and_caps() {
        let dir = tempdir().unwrap();
        let log = InteractionLog::new(dir.path().join("log.csv"), 3);
        for i in 0..5 {
            log.record(&format!("action_{}", i), json!({ "i": i }));
        }
        let entries = log.read_entries().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].action, "action_2");
        assert_eq!(entries[2].action, "action_4");
        assert_eq!(entries[2].details, r#"{"i":4}"#);
        assert!(entries.iter().all(|e| e.session_id == log.session_id()));
    }

    #[test]
    fn test_record_into_missing_directory_is_swallowed() {
        let dir = tempdir().unwrap();
        let log = InteractionLog::new(dir.path().join("missing").join("log.csv"), 3);
        log.record("page_view", json!({}));
        assert!(!log.path().exists());
    }

    #[test]
    fn test_record_replaces_unreadable_log() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        std::fs::write(&path, "timestamp,session_id\n\"unterminated,x,y\n").unwrap();

        let log = InteractionLog::new(&path, 10);
        log.record("overview", json!({}));
        log.record("search", json!({ "term": "pilar" }));

        let entries = log.read_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "overview");
        assert_eq!(entries[1].action, "search");
    }

    #[test]
    fn test_summary_window_and_counts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "timestamp,session_id,action,details").unwrap();
        writeln!(file, "2024-05-01T10:00:00+00:00,aaaa1111,page_view,{{}}").unwrap();
        writeln!(file, "2024-05-09T10:00:00+00:00,aaaa1111,page_view,{{}}").unwrap();
        writeln!(file, "2024-05-09T11:00:00+00:00,bbbb2222,recommend,{{}}").unwrap();
        writeln!(file, "2024-05-10T09:00:00+00:00,bbbb2222,page_view,{{}}").unwrap();
        drop(file);

        let now = DateTime::parse_from_rfc3339("2024-05-10T12:00:00+00:00")
            .unwrap()
            .with_timezone(&Utc);
        let summary = InteractionLog::new(&path, 10).summary(now, 7).unwrap();

        assert_eq!(summary.total_interactions, 3);
        assert_eq!(summary.unique_sessions, 2);
        assert_eq!(
            summary.top_actions,
            vec![
                ActionCount { action: "page_view".to_string(), count: 2 },
                ActionCount { action: "recommend".to_string(), count: 1 },
            ]
        );
        let may_9 = NaiveDate::from_ymd_opt(2024, 5, 9).unwrap();
        assert_eq!(summary.daily_usage.get(&may_9), Some(&2));
        assert_eq!(summary.daily_usage.len(), 2);
    }

    #[test]
    fn test_summary_missing_or_corrupt_log() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        assert!(InteractionLog::new(&path, 10).summary(Utc::now(), 7).is_none());

        std::fs::write(&path, "timestamp,session_id,action,details\nyesterday,x,y,{}\n").unwrap();
        assert!(InteractionLog::new(&path, 10).summary(Utc::now(), 7).is_none());
    }
}
