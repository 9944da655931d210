// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Check-in sources the engine can fetch a user's history from

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::models::{CheckIn, CheckInHistory};

#[async_trait]
pub trait CheckInRepository: Send + Sync {
    /// Up to `limit` check-ins of `user_id`, most recent first
    async fn recent_checkins(&self, user_id: &str, limit: usize) -> Result<Vec<CheckIn>>;

    fn repository_name(&self) -> &'static str;
}

/// Most recent `limit` check-ins of `user_id` from an unordered set
fn select_recent<'a>(
    checkins: impl IntoIterator<Item = &'a CheckIn>,
    user_id: &str,
    limit: usize,
) -> Vec<CheckIn> {
    let owned: Vec<CheckIn> = checkins
        .into_iter()
        .filter(|c| c.user_id == user_id)
        .cloned()
        .collect();
    CheckInHistory::new(owned).truncated(limit).into_inner()
}

/// Check-ins held in memory, keyed by user
#[derive(Default)]
pub struct InMemoryRepository {
    checkins: RwLock<HashMap<String, Vec<CheckIn>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_checkins(checkins: Vec<CheckIn>) -> Self {
        let mut by_user: HashMap<String, Vec<CheckIn>> = HashMap::new();
        for checkin in checkins {
            by_user.entry(checkin.user_id.clone()).or_default().push(checkin);
        }
        Self {
            checkins: RwLock::new(by_user),
        }
    }

    pub async fn insert(&self, checkin: CheckIn) {
        self.checkins
            .write()
            .await
            .entry(checkin.user_id.clone())
            .or_default()
            .push(checkin);
    }
}

#[async_trait]
impl CheckInRepository for InMemoryRepository {
    async fn recent_checkins(&self, user_id: &str, limit: usize) -> Result<Vec<CheckIn>> {
        let checkins = self.checkins.read().await;
        Ok(checkins
            .get(user_id)
            .map(|list| select_recent(list, user_id, limit))
            .unwrap_or_default())
    }

    fn repository_name(&self) -> &'static str {
        "memory"
    }
}

/// Check-ins stored as a JSON array in a file.
///
/// The file is re-read on every fetch. Records that do not deserialize are
/// skipped with a warning.
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_all(&self) -> Result<Vec<CheckIn>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read check-in file: {}", self.path.display()))?;

        let records: Vec<serde_json::Value> = serde_json::from_str(&content)
            .with_context(|| format!("Check-in file is not a JSON array: {}", self.path.display()))?;

        let total = records.len();
        let checkins: Vec<CheckIn> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<CheckIn>(record) {
                Ok(checkin) => {
                    if let Err(e) = checkin.validate() {
                        warn!("{}", e);
                    }
                    Some(checkin)
                }
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed check-in record");
                    None
                }
            })
            .collect();

        debug!(total, parsed = checkins.len(), path = %self.path.display(), "Check-in file loaded");
        Ok(checkins)
    }
}

#[async_trait]
impl CheckInRepository for JsonFileRepository {
    async fn recent_checkins(&self, user_id: &str, limit: usize) -> Result<Vec<CheckIn>> {
        let checkins = self.load_all().await?;
        Ok(select_recent(&checkins, user_id, limit))
    }

    fn repository_name(&self) -> &'static str {
        "json_file"
    }
}

pub fn create_repository(kind: &str, path: Option<&str>) -> Result<Box<dyn CheckInRepository>> {
    match kind.to_lowercase().as_str() {
        "memory" => Ok(Box::new(InMemoryRepository::new())),
        "json_file" | "json" => {
            let path = path.context("json_file repository requires a path")?;
            Ok(Box::new(JsonFileRepository::new(path)))
        }
        _ => Err(anyhow::anyhow!(
            "Unknown repository: {}. Currently supported: json_file, memory",
            kind
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn checkin(id: &str, user_id: &str, ts: &str) -> CheckIn {
        CheckIn {
            id: id.to_string(),
            user_id: user_id.to_string(),
            date: None,
            created_at: DateTime::parse_from_rfc3339(ts).unwrap(),
            mood: Some(3),
            energy: Some(3),
            stress: None,
            wins: None,
        }
    }

    #[tokio::test]
    async fn test_memory_repository_filters_sorts_and_limits() {
        let repo = InMemoryRepository::with_checkins(vec![
            checkin("a", "u1", "2025-01-01T09:00:00Z"),
            checkin("b", "u2", "2025-01-02T09:00:00Z"),
            checkin("c", "u1", "2025-01-03T09:00:00Z"),
        ]);
        repo.insert(checkin("d", "u1", "2025-01-02T09:00:00Z")).await;

        let recent = repo.recent_checkins("u1", 2).await.unwrap();
        let ids: Vec<&str> = recent.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d"]);

        assert!(repo.recent_checkins("nobody", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_file_skips_malformed_records() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id":"a","user_id":"u1","created_at":"2025-01-01T09:00:00Z","mood":4}},
                {{"id":"b","user_id":"u1","created_at":"not a date"}},
                {{"id":"c","user_id":"u1","created_at":"2025-01-02T09:00:00+02:00","mood":9}},
                {{"id":"d","user_id":"u2","created_at":"2025-01-03T09:00:00Z"}}
            ]"#
        )
        .unwrap();

        let repo = JsonFileRepository::new(file.path());
        let recent = repo.recent_checkins("u1", 30).await.unwrap();

        let ids: Vec<&str> = recent.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[tokio::test]
    async fn test_json_file_loads_date_only_records() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"a","user_id":"u1","date":"2025-01-05","created_at":"2025-01-06T08:00:00Z","mood":4,"energy":3}}]"#
        )
        .unwrap();

        let recent = JsonFileRepository::new(file.path())
            .recent_checkins("u1", 30)
            .await
            .unwrap();

        assert_eq!(recent.len(), 1);
        assert_eq!(
            recent[0].timestamp(),
            DateTime::parse_from_rfc3339("2025-01-05T08:00:00Z").unwrap()
        );
        assert_eq!(recent[0].mood, Some(4));
    }

    #[tokio::test]
    async fn test_json_file_keeps_records_with_malformed_metrics() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id":"a","user_id":"u1","created_at":"2025-01-01T09:00:00Z","mood":"high","energy":2}},
                {{"id":"b","user_id":"u1","created_at":"2025-01-02T09:00:00Z","mood":4.5,"energy":4}}
            ]"#
        )
        .unwrap();

        let recent = JsonFileRepository::new(file.path())
            .recent_checkins("u1", 30)
            .await
            .unwrap();

        let history = CheckInHistory::new(recent);
        assert_eq!(history.len(), 2);
        assert!(history.values(crate::models::Metric::Mood).is_empty());
        assert_eq!(history.values(crate::models::Metric::Energy), vec![4.0, 2.0]);
    }

    #[tokio::test]
    async fn test_json_file_errors() {
        let missing = JsonFileRepository::new("/definitely/not/here.json");
        assert!(missing.recent_checkins("u1", 30).await.is_err());

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"id":"a"}}"#).unwrap();
        let not_array = JsonFileRepository::new(file.path());
        let err = not_array.recent_checkins("u1", 30).await.unwrap_err();
        assert!(err.to_string().contains("not a JSON array"));
    }

    #[test]
    fn test_create_repository() {
        assert_eq!(create_repository("memory", None).unwrap().repository_name(), "memory");
        assert_eq!(
            create_repository("JSON_FILE", Some("x.json")).unwrap().repository_name(),
            "json_file"
        );
        assert!(create_repository("json_file", None).is_err());
        assert!(create_repository("postgres", None).is_err());
    }
}
