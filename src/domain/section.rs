//! Section Entity
//!
//! A named group of items inside one list (e.g. "Dairy", "Produce").

use serde::{Deserialize, Serialize};

use super::entity::{DomainResult, Entity};
use super::item::Item;
use super::validation::{check_length, require_id, require_name, MAX_SECTION_NAME_LENGTH};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub list_id: i64,
    pub name: String,
    /// Position among the sections of `list_id`
    pub sort_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub items: Option<Vec<Item>>,
}

impl Entity for Section {
    type Id = i64;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSection {
    #[serde(default)]
    pub list_id: i64,
    #[serde(default)]
    pub name: String,
}

impl NewSection {
    pub fn new(list_id: i64, name: impl Into<String>) -> Self {
        Self {
            list_id,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_id("list_id", self.list_id)?;
        require_name("Section name", &self.name, MAX_SECTION_NAME_LENGTH)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionPatch {
    #[serde(default)]
    pub name: Option<String>,
}

impl SectionPatch {
    pub fn validate(&self) -> DomainResult<()> {
        match &self.name {
            Some(name) => check_length("Section name", name.trim(), MAX_SECTION_NAME_LENGTH),
            None => Ok(()),
        }
    }

    pub fn apply(&self, current: &Section) -> String {
        match self.name.as_deref() {
            Some(n) if !n.trim().is_empty() => n.to_string(),
            _ => current.name.clone(),
        }
    }
}
