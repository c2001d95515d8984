//! Batch Creation
//!
//! Creates a list, sections and items in one transaction. The request is
//! validated in full before the transaction opens; any later failure rolls
//! back every row this call inserted, history included.

use rusqlite::Transaction;

use super::db::DbState;
use super::item_repo::ItemRepository;
use super::list_repo::{self, ListRepository};
use super::section_repo::{self, SectionRepository};
use crate::domain::{
    BatchItem, BatchMode, BatchOutcome, BatchRequest, BatchSection, DomainResult, Item, NewList,
    Section,
};

#[derive(Clone)]
pub struct BatchRepository {
    db: DbState,
}

impl BatchRepository {
    pub fn new(db: DbState) -> Self {
        Self { db }
    }

    pub async fn create(&self, request: BatchRequest) -> DomainResult<BatchOutcome> {
        // Mode selection validates every nested field
        request.mode()?;

        self.db
            .transaction(move |tx| match request.mode()? {
                BatchMode::NewList(input) => {
                    let new_list = NewList {
                        name: input.name.clone(),
                        icon: input.icon.clone(),
                    };
                    let mut list = ListRepository::create_tx(tx, &new_list)?;
                    let (sections, items) = create_sections(tx, list.id, &input.sections)?;
                    list.stats = Some(list_repo::stats(tx, list.id)?);
                    Ok(BatchOutcome {
                        list: Some(list),
                        sections,
                        items,
                    })
                }
                BatchMode::AddSections { list_id, sections } => {
                    list_repo::require(tx, list_id)?;
                    let (sections, items) = create_sections(tx, list_id, sections)?;
                    Ok(BatchOutcome {
                        list: None,
                        sections,
                        items,
                    })
                }
                BatchMode::AddItems { section_id, items } => {
                    section_repo::require(tx, section_id)?;
                    let items = create_items(tx, section_id, items)?;
                    Ok(BatchOutcome {
                        list: None,
                        sections: Vec::new(),
                        items,
                    })
                }
            })
            .await
    }
}

/// Sections append after the list's last one; for a fresh list that makes
/// each section's order equal to its input index.
fn create_sections(
    tx: &Transaction<'_>,
    list_id: i64,
    inputs: &[BatchSection],
) -> DomainResult<(Vec<Section>, Vec<Item>)> {
    let mut sections = Vec::with_capacity(inputs.len());
    let mut all_items = Vec::new();
    for input in inputs {
        let mut section = SectionRepository::create_tx(tx, list_id, &input.name)?;
        let items = create_items(tx, section.id, &input.items)?;
        all_items.extend(items.iter().cloned());
        section.items = Some(items);
        sections.push(section);
    }
    Ok((sections, all_items))
}

fn create_items(tx: &Transaction<'_>, section_id: i64, inputs: &[BatchItem]) -> DomainResult<Vec<Item>> {
    inputs
        .iter()
        .map(|input| ItemRepository::create_tx(tx, section_id, &input.name, &input.description))
        .collect()
}
