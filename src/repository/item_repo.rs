//! Item Repository Implementation
//!
//! CRUD plus the item-only operations: flag toggles and moving an item into
//! another section. Item creation records the name in the history table in
//! the same transaction.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use super::db::DbState;
use super::history_repo;
use super::ordering::{self, Collection, Scope};
use super::section_repo;
use super::traits::{OrderingOperations, Repository, ScopedRepository};
use crate::domain::validation::require_id;
use crate::domain::{now_millis, DomainError, DomainResult, Item, ItemFlag, ItemPatch, NewItem};

const ITEM_COLUMNS: &str =
    "id, section_id, name, description, completed, uncertain, sort_order, created_at, updated_at";

/// Result of moving an item between sections
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRelocation {
    pub item: Item,
    pub from_section_id: i64,
}

impl ItemRelocation {
    pub fn moved(&self) -> bool {
        self.item.section_id != self.from_section_id
    }
}

#[derive(Clone)]
pub struct ItemRepository {
    db: DbState,
}

impl ItemRepository {
    pub fn new(db: DbState) -> Self {
        Self { db }
    }

    /// Insert an item inside the caller's transaction, appended after the
    /// section's last item, and record its name for suggestions.
    pub fn create_tx(
        tx: &Transaction<'_>,
        section_id: i64,
        name: &str,
        description: &str,
    ) -> DomainResult<Item> {
        let order = ordering::next_order(tx, Scope::Section(section_id))?;
        let now = now_millis();
        let name = name.trim();
        tx.execute(
            "INSERT INTO items (section_id, name, description, completed, uncertain, sort_order, created_at, updated_at)
             VALUES (?1, ?2, ?3, 0, 0, ?4, ?5, ?5)",
            params![section_id, name, description, order, now],
        )?;
        let id = tx.last_insert_rowid();
        history_repo::record(tx, name, section_id)?;
        require(tx, id)
    }

    /// Flip `completed` or `uncertain`
    pub async fn toggle(&self, id: i64, flag: ItemFlag) -> DomainResult<Item> {
        self.db
            .transaction(move |tx| {
                let sql = format!(
                    "UPDATE items SET {col} = NOT {col}, updated_at = ?1 WHERE id = ?2",
                    col = flag.column()
                );
                let changed = tx.execute(&sql, params![now_millis(), id])?;
                if changed == 0 {
                    return Err(DomainError::not_found("Item", id));
                }
                require(tx, id)
            })
            .await
    }

    /// Append the item to the end of another section and close the gap it
    /// leaves behind. Moving to its current section changes nothing.
    pub async fn move_to_section(&self, id: i64, section_id: i64) -> DomainResult<ItemRelocation> {
        require_id("section_id", section_id)?;
        self.db
            .transaction(move |tx| {
                let item = require(tx, id)?;
                section_repo::require(tx, section_id)?;
                let from_section_id = item.section_id;
                if from_section_id == section_id {
                    return Ok(ItemRelocation {
                        item,
                        from_section_id,
                    });
                }

                let order = ordering::next_order(tx, Scope::Section(section_id))?;
                tx.execute(
                    "UPDATE items SET section_id = ?1, sort_order = ?2, updated_at = ?3 WHERE id = ?4",
                    params![section_id, order, now_millis(), id],
                )?;
                ordering::compact(tx, Scope::Section(from_section_id))?;

                Ok(ItemRelocation {
                    item: require(tx, id)?,
                    from_section_id,
                })
            })
            .await
    }
}

#[async_trait]
impl Repository<Item> for ItemRepository {
    type NewEntity = NewItem;
    type Patch = ItemPatch;

    async fn create(&self, input: NewItem) -> DomainResult<Item> {
        input.validate()?;
        self.db
            .transaction(move |tx| {
                section_repo::require(tx, input.section_id)?;
                Self::create_tx(tx, input.section_id, &input.name, &input.description)
            })
            .await
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Item>> {
        self.db.with_conn(move |conn| load(conn, id)).await
    }

    async fn update(&self, id: i64, patch: ItemPatch) -> DomainResult<Item> {
        patch.validate()?;
        self.db
            .transaction(move |tx| {
                let current = require(tx, id)?;
                let item = patch.apply(&current);
                tx.execute(
                    "UPDATE items SET name = ?1, description = ?2, completed = ?3, uncertain = ?4, updated_at = ?5 WHERE id = ?6",
                    params![
                        item.name.trim(),
                        item.description,
                        item.completed,
                        item.uncertain,
                        now_millis(),
                        id
                    ],
                )?;
                require(tx, id)
            })
            .await
    }

    async fn delete(&self, id: i64) -> DomainResult<Item> {
        self.db
            .transaction(move |tx| {
                let item = require(tx, id)?;
                tx.execute("DELETE FROM items WHERE id = ?1", params![id])?;
                ordering::compact(tx, Scope::Section(item.section_id))?;
                Ok(item)
            })
            .await
    }
}

#[async_trait]
impl ScopedRepository<Item> for ItemRepository {
    type ScopeId = i64;

    async fn list_in_scope(&self, section_id: i64) -> DomainResult<Vec<Item>> {
        self.db
            .with_conn(move |conn| {
                section_repo::require(conn, section_id)?;
                items_in(conn, section_id)
            })
            .await
    }
}

impl OrderingOperations for ItemRepository {
    type Entity = Item;

    const COLLECTION: Collection = Collection::Items;

    fn db(&self) -> &DbState {
        &self.db
    }

    fn fetch(conn: &Connection, id: i64) -> DomainResult<Option<Item>> {
        load(conn, id)
    }
}

/// Convert a database row to Item
fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        section_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        completed: row.get(4)?,
        uncertain: row.get(5)?,
        sort_order: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub(crate) fn load(conn: &Connection, id: i64) -> DomainResult<Option<Item>> {
    let sql = format!("SELECT {} FROM items WHERE id = ?1", ITEM_COLUMNS);
    Ok(conn.query_row(&sql, params![id], row_to_item).optional()?)
}

pub(crate) fn require(conn: &Connection, id: i64) -> DomainResult<Item> {
    load(conn, id)?.ok_or_else(|| DomainError::not_found("Item", id))
}

pub(crate) fn items_in(conn: &Connection, section_id: i64) -> DomainResult<Vec<Item>> {
    let sql = format!(
        "SELECT {} FROM items WHERE section_id = ?1 ORDER BY sort_order, id",
        ITEM_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![section_id], row_to_item)?;
    let items = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}
