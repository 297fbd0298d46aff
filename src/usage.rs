use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Launch statistics for one application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub app_name: String,
    pub exec_path: String,
    pub last_used: DateTime<Utc>,
    pub usage_count: u32,
}

/// Launch history, keyed by display name
#[derive(Debug, Clone, Default)]
pub struct UsageStore {
    path: PathBuf,
    records: HashMap<String, UsageRecord>,
}

impl UsageStore {
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("org", "frostlaunch", "frostlaunch")
            .map(|dirs| dirs.data_local_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("usage.json")
    }

    /// Load the store. A missing or unreadable file yields an empty store.
    pub fn load(path: &Path) -> Self {
        let records = match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str::<Vec<UsageRecord>>(&data) {
                Ok(list) => list.into_iter().map(|r| (r.app_name.clone(), r)).collect(),
                Err(e) => {
                    warn!("Ignoring corrupt usage data in {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        debug!("Loaded usage data for {} apps", records.len());
        Self {
            path: path.to_path_buf(),
            records,
        }
    }

    pub fn get(&self, app_name: &str) -> Option<&UsageRecord> {
        self.records.get(app_name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Count one launch of `app_name` at `now`
    pub fn record(&mut self, app_name: &str, exec_path: &str, now: DateTime<Utc>) {
        self.records
            .entry(app_name.to_string())
            .and_modify(|r| {
                r.last_used = now;
                r.usage_count += 1;
                r.exec_path = exec_path.to_string();
            })
            .or_insert_with(|| UsageRecord {
                app_name: app_name.to_string(),
                exec_path: exec_path.to_string(),
                last_used: now,
                usage_count: 1,
            });
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut list: Vec<&UsageRecord> = self.records.values().collect();
        list.sort_by(|a, b| a.app_name.cmp(&b.app_name));

        let data = serde_json::to_string_pretty(&list)?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}
