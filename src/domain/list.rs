//! List Entity
//!
//! Top-level shopping list. Lists are ordered among themselves and own sections.

use serde::{Deserialize, Serialize};

use super::entity::{DomainResult, Entity};
use super::icon::normalize_icon;
use super::section::Section;
use super::validation::{check_length, require_name, MAX_ICON_LENGTH, MAX_LIST_NAME_LENGTH};

/// Derived counters attached on read paths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStats {
    pub section_count: i64,
    pub item_count: i64,
    pub completed_count: i64,
    pub uncertain_count: i64,
}

/// A shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: i64,
    pub name: String,
    /// Emoji, or the raw string when it isn't a known alias
    pub icon: String,
    /// Position among all lists
    pub sort_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stats: Option<ListStats>,
    /// Only populated for the web-view snapshot
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sections: Option<Vec<Section>>,
}

impl Entity for List {
    type Id = i64;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Input for creating a list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewList {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl NewList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
        }
    }

    pub fn with_icon(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: Some(icon.into()),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_name("List name", &self.name, MAX_LIST_NAME_LENGTH)?;
        if let Some(icon) = &self.icon {
            check_length("Icon", icon, MAX_ICON_LENGTH)?;
        }
        Ok(())
    }

    /// Icon as stored: alias resolved, empty when absent
    pub fn stored_icon(&self) -> String {
        self.icon.as_deref().map(normalize_icon).unwrap_or_default()
    }
}

/// Partial update for a list; empty strings keep the current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl ListPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            check_length("List name", name.trim(), MAX_LIST_NAME_LENGTH)?;
        }
        if let Some(icon) = &self.icon {
            check_length("Icon", icon, MAX_ICON_LENGTH)?;
        }
        Ok(())
    }

    /// Resolve the patch against the stored row, returning (name, icon)
    pub fn apply(&self, current: &List) -> (String, String) {
        let name = match self.name.as_deref() {
            Some(n) if !n.trim().is_empty() => n.to_string(),
            _ => current.name.clone(),
        };
        let icon = match self.icon.as_deref() {
            Some(i) if !i.is_empty() => normalize_icon(i),
            _ => current.icon.clone(),
        };
        (name, icon)
    }
}
