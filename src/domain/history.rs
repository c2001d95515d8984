//! Item-name history used for autocomplete suggestions.

use serde::{Deserialize, Serialize};

use super::entity::{DomainResult, Entity};
use super::validation::{require_id, require_name, MAX_ITEM_NAME_LENGTH};

pub const DEFAULT_HISTORY_LIMIT: i64 = 20;
pub const MAX_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub name: String,
    /// Section the name was first used in
    pub section_id: i64,
    pub usage_count: i64,
    pub last_used_at: i64,
    pub created_at: i64,
}

impl Entity for HistoryEntry {
    type Id = i64;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistorySort {
    #[default]
    Recent,
    Frequent,
}

/// Read-side filter for suggestions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub section_id: Option<i64>,
    /// Case-insensitive name prefix
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub sort: HistorySort,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl HistoryQuery {
    pub fn for_section(section_id: i64) -> Self {
        Self {
            section_id: Some(section_id),
            ..Default::default()
        }
    }

    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}

/// Manual history entry
#[derive(Debug, Clone, Deserialize)]
pub struct NewHistoryEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub section_id: i64,
}

impl NewHistoryEntry {
    pub fn validate(&self) -> DomainResult<()> {
        require_id("section_id", self.section_id)?;
        require_name("Item name", &self.name, MAX_ITEM_NAME_LENGTH)
    }
}
