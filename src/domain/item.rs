//! Item Entity
//!
//! A single thing to buy, owned by one section.

use serde::{Deserialize, Serialize};

use super::entity::{DomainResult, Entity};
use super::validation::{
    check_length, require_id, require_name, MAX_DESCRIPTION_LENGTH, MAX_ITEM_NAME_LENGTH,
};

/// A shopping item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier
    pub id: i64,
    /// Owning section
    pub section_id: i64,
    pub name: String,
    /// Free-form note, empty when unset
    pub description: String,
    /// Already in the basket
    pub completed: bool,
    /// Flagged as "maybe" / not sure it's needed
    pub uncertain: bool,
    /// Position among the items of `section_id`
    pub sort_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Entity for Item {
    type Id = i64;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Input for creating an item
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewItem {
    #[serde(default)]
    pub section_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl NewItem {
    pub fn new(section_id: i64, name: impl Into<String>) -> Self {
        Self {
            section_id,
            name: name.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_id("section_id", self.section_id)?;
        validate_item_fields(&self.name, &self.description)
    }
}

/// Name/description checks shared with batch input
pub fn validate_item_fields(name: &str, description: &str) -> DomainResult<()> {
    require_name("Item name", name, MAX_ITEM_NAME_LENGTH)?;
    check_length("Item description", description, MAX_DESCRIPTION_LENGTH)
}

/// Partial update for an item
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub uncertain: Option<bool>,
}

impl ItemPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            check_length("Item name", name.trim(), MAX_ITEM_NAME_LENGTH)?;
        }
        if let Some(description) = &self.description {
            check_length("Item description", description, MAX_DESCRIPTION_LENGTH)?;
        }
        Ok(())
    }

    /// Produce the updated item; `sort_order` and `section_id` are untouched
    pub fn apply(&self, current: &Item) -> Item {
        let mut item = current.clone();
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            item.name = name.to_string();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(completed) = self.completed {
            item.completed = completed;
        }
        if let Some(uncertain) = self.uncertain {
            item.uncertain = uncertain;
        }
        item
    }
}

/// Which boolean flag a toggle operation flips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFlag {
    Completed,
    Uncertain,
}

impl ItemFlag {
    pub fn column(self) -> &'static str {
        match self {
            ItemFlag::Completed => "completed",
            ItemFlag::Uncertain => "uncertain",
        }
    }
}
