//! Change events pushed to web viewers.

use serde::Serialize;

use crate::domain::{BatchOutcome, Item, List, Section};

/// One committed change, serialized as `{"type": "...", "data": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ChangeEvent {
    ListCreated(List),
    ListUpdated(List),
    ListDeleted { id: i64 },
    ListsReordered { ids: Vec<i64> },

    SectionCreated(Section),
    SectionUpdated(Section),
    SectionDeleted { id: i64, list_id: i64 },
    SectionsReordered { list_id: i64, ids: Vec<i64> },

    ItemCreated(Item),
    ItemUpdated(Item),
    ItemToggled(Item),
    ItemMoved { item: Item, from_section_id: i64 },
    ItemDeleted { id: i64, section_id: i64 },
    ItemsReordered { section_id: i64, ids: Vec<i64> },

    BatchCreated {
        #[serde(skip_serializing_if = "Option::is_none")]
        list_id: Option<i64>,
        section_ids: Vec<i64>,
        item_ids: Vec<i64>,
    },

    /// Suggestions changed; `section_id` is absent when several sections may be affected
    HistoryChanged {
        #[serde(skip_serializing_if = "Option::is_none")]
        section_id: Option<i64>,
    },

    Pong,
}

impl ChangeEvent {
    pub fn batch_created(outcome: &BatchOutcome) -> Self {
        ChangeEvent::BatchCreated {
            list_id: outcome.list.as_ref().map(|l| l.id),
            section_ids: outcome.sections.iter().map(|s| s.id).collect(),
            item_ids: outcome.item_ids(),
        }
    }

    /// Wire form sent to viewers
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Messages a viewer may send us
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewerMessage {
    Ping,
}
