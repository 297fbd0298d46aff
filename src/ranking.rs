use crate::item::SelectableItem;
use crate::usage::{UsageRecord, UsageStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How to order entries before they reach the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Ranking {
    /// Case-insensitive name order
    Alphabetical,
    /// Frequently and recently launched entries first
    #[default]
    Smart,
}

impl Ranking {
    pub fn apply(&self, items: &mut [SelectableItem], usage: &UsageStore, now: DateTime<Utc>) {
        match self {
            Ranking::Alphabetical => sort_alphabetical(items),
            Ranking::Smart => sort_smart(items, usage, now),
        }
    }
}

pub fn sort_alphabetical(items: &mut [SelectableItem]) {
    items.sort_by_key(|item| item.name.to_lowercase());
}

/// Score from launch count (40%) and recency (60%). Never used scores 0.
pub fn smart_score(record: Option<&UsageRecord>, now: DateTime<Utc>) -> f64 {
    let Some(record) = record else {
        return 0.0;
    };
    if record.usage_count == 0 {
        return 0.0;
    }

    let frequency = record.usage_count as f64 * 0.4;

    let hours = (now - record.last_used).num_minutes() as f64 / 60.0;
    let recency = if hours < 1.0 {
        10.0
    } else if hours < 24.0 {
        5.0
    } else if hours < 24.0 * 7.0 {
        2.0
    } else if hours < 24.0 * 30.0 {
        1.0
    } else {
        0.1
    };

    frequency + recency * 0.6
}

pub fn sort_smart(items: &mut [SelectableItem], usage: &UsageStore, now: DateTime<Utc>) {
    items.sort_by_cached_key(|item| {
        (
            Score(smart_score(usage.get(&item.name), now)),
            item.name.to_lowercase(),
        )
    });
}

/// Descending order wrapper for scores
#[derive(Debug, PartialEq)]
struct Score(f64);

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.total_cmp(&self.0)
    }
}
