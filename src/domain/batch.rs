//! Batch creation request shapes.
//!
//! A request populates exactly one of three shapes:
//! - `list`: a new list with nested sections and items
//! - `list_id` + `sections`: sections appended to an existing list
//! - `section_id` + `items`: items appended to an existing section

use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult};
use super::item::{validate_item_fields, Item};
use super::list::{List, NewList};
use super::section::Section;
use super::validation::{require_name, MAX_SECTION_NAME_LENGTH};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub list: Option<BatchList>,
    #[serde(default)]
    pub list_id: Option<i64>,
    #[serde(default)]
    pub sections: Vec<BatchSection>,
    #[serde(default)]
    pub section_id: Option<i64>,
    #[serde(default)]
    pub items: Vec<BatchItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchList {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub sections: Vec<BatchSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchSection {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<BatchItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl BatchItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }
}

impl BatchSection {
    pub fn new(name: impl Into<String>, items: Vec<BatchItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

/// The selected mode, borrowed from the request
#[derive(Debug, Clone, Copy)]
pub enum BatchMode<'a> {
    NewList(&'a BatchList),
    AddSections {
        list_id: i64,
        sections: &'a [BatchSection],
    },
    AddItems {
        section_id: i64,
        items: &'a [BatchItem],
    },
}

impl BatchRequest {
    pub fn new_list(list: BatchList) -> Self {
        Self {
            list: Some(list),
            ..Default::default()
        }
    }

    pub fn add_sections(list_id: i64, sections: Vec<BatchSection>) -> Self {
        Self {
            list_id: Some(list_id),
            sections,
            ..Default::default()
        }
    }

    pub fn add_items(section_id: i64, items: Vec<BatchItem>) -> Self {
        Self {
            section_id: Some(section_id),
            items,
            ..Default::default()
        }
    }

    /// Pick the mode and validate every nested name before any store access
    pub fn mode(&self) -> DomainResult<BatchMode<'_>> {
        let wants_list = self.list.is_some();
        let wants_sections = self.list_id.is_some() || !self.sections.is_empty();
        let wants_items = self.section_id.is_some() || !self.items.is_empty();

        let mode = match (wants_list, wants_sections, wants_items) {
            (true, false, false) => self.list.as_ref().map(BatchMode::NewList),
            (false, true, false) => match self.list_id {
                Some(list_id) if list_id > 0 && !self.sections.is_empty() => {
                    Some(BatchMode::AddSections {
                        list_id,
                        sections: &self.sections,
                    })
                }
                _ => None,
            },
            (false, false, true) => match self.section_id {
                Some(section_id) if section_id > 0 && !self.items.is_empty() => {
                    Some(BatchMode::AddItems {
                        section_id,
                        items: &self.items,
                    })
                }
                _ => None,
            },
            _ => None,
        };

        let mode = mode.ok_or_else(|| {
            DomainError::InvalidInput(
                "Request must contain either: list (new list), list_id + sections (add to existing list), or section_id + items (add to existing section)"
                    .to_string(),
            )
        })?;
        mode.validate()?;
        Ok(mode)
    }
}

impl BatchMode<'_> {
    fn validate(&self) -> DomainResult<()> {
        match self {
            BatchMode::NewList(list) => {
                NewList {
                    name: list.name.clone(),
                    icon: list.icon.clone(),
                }
                .validate()?;
                validate_sections(&list.sections)
            }
            BatchMode::AddSections { sections, .. } => validate_sections(sections),
            BatchMode::AddItems { items, .. } => validate_items(items),
        }
    }
}

fn validate_sections(sections: &[BatchSection]) -> DomainResult<()> {
    for section in sections {
        require_name("Section name", &section.name, MAX_SECTION_NAME_LENGTH)?;
        validate_items(&section.items)?;
    }
    Ok(())
}

fn validate_items(items: &[BatchItem]) -> DomainResult<()> {
    items
        .iter()
        .try_for_each(|item| validate_item_fields(&item.name, &item.description))
}

/// Everything one batch call created
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<List>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
}

impl BatchOutcome {
    pub fn item_ids(&self) -> Vec<i64> {
        self.items.iter().map(|i| i.id).collect()
    }
}
