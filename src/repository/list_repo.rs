//! List Repository Implementation
//!
//! SQLite-backed implementation of Repository<List> and OrderingOperations.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use super::db::DbState;
use super::ordering::{self, Collection, Scope};
use super::section_repo;
use super::traits::{OrderingOperations, Repository, ScopedRepository};
use crate::domain::{now_millis, DomainError, DomainResult, List, ListPatch, ListStats, NewList};

const LIST_COLUMNS: &str = "id, name, icon, sort_order, created_at, updated_at";

/// SQLite implementation of List repository
#[derive(Clone)]
pub struct ListRepository {
    db: DbState,
}

impl ListRepository {
    pub fn new(db: DbState) -> Self {
        Self { db }
    }

    /// Insert a list inside the caller's transaction, appended after the last list
    pub fn create_tx(tx: &Transaction<'_>, input: &NewList) -> DomainResult<List> {
        let order = ordering::next_order(tx, Scope::AllLists)?;
        let now = now_millis();
        tx.execute(
            "INSERT INTO lists (name, icon, sort_order, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
            params![input.name.trim(), input.stored_icon(), order, now],
        )?;
        let id = tx.last_insert_rowid();
        load(tx, id)?.ok_or_else(|| DomainError::not_found("List", id))
    }

    /// Every list with its sections and their items, for the web-view snapshot
    pub async fn snapshot(&self) -> DomainResult<Vec<List>> {
        self.db
            .with_conn(|conn| {
                let mut lists = load_all(conn)?;
                for list in &mut lists {
                    list.stats = Some(stats(conn, list.id)?);
                    list.sections = Some(section_repo::sections_in(conn, list.id, true)?);
                }
                Ok(lists)
            })
            .await
    }
}

#[async_trait]
impl Repository<List> for ListRepository {
    type NewEntity = NewList;
    type Patch = ListPatch;

    async fn create(&self, input: NewList) -> DomainResult<List> {
        input.validate()?;
        self.db
            .transaction(move |tx| Self::create_tx(tx, &input))
            .await
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<List>> {
        self.db
            .with_conn(move |conn| {
                let Some(mut list) = load(conn, id)? else {
                    return Ok(None);
                };
                list.stats = Some(stats(conn, id)?);
                Ok(Some(list))
            })
            .await
    }

    async fn update(&self, id: i64, patch: ListPatch) -> DomainResult<List> {
        patch.validate()?;
        self.db
            .transaction(move |tx| {
                let current = require(tx, id)?;
                let (name, icon) = patch.apply(&current);
                tx.execute(
                    "UPDATE lists SET name = ?1, icon = ?2, updated_at = ?3 WHERE id = ?4",
                    params![name.trim(), icon, now_millis(), id],
                )?;
                let mut list = require(tx, id)?;
                list.stats = Some(stats(tx, id)?);
                Ok(list)
            })
            .await
    }

    async fn delete(&self, id: i64) -> DomainResult<List> {
        self.db
            .transaction(move |tx| {
                let list = require(tx, id)?;
                // Sections, items and history go with it via ON DELETE CASCADE
                tx.execute("DELETE FROM lists WHERE id = ?1", params![id])?;
                ordering::compact(tx, Scope::AllLists)?;
                Ok(list)
            })
            .await
    }
}

#[async_trait]
impl ScopedRepository<List> for ListRepository {
    type ScopeId = ();

    async fn list_in_scope(&self, _scope: ()) -> DomainResult<Vec<List>> {
        self.db
            .with_conn(|conn| {
                let mut lists = load_all(conn)?;
                for list in &mut lists {
                    list.stats = Some(stats(conn, list.id)?);
                }
                Ok(lists)
            })
            .await
    }
}

impl OrderingOperations for ListRepository {
    type Entity = List;

    const COLLECTION: Collection = Collection::Lists;

    fn db(&self) -> &DbState {
        &self.db
    }

    fn fetch(conn: &Connection, id: i64) -> DomainResult<Option<List>> {
        load(conn, id)
    }
}

/// Convert a database row to List
fn row_to_list(row: &rusqlite::Row<'_>) -> rusqlite::Result<List> {
    Ok(List {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        sort_order: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
        stats: None,
        sections: None,
    })
}

pub(crate) fn load(conn: &Connection, id: i64) -> DomainResult<Option<List>> {
    let sql = format!("SELECT {} FROM lists WHERE id = ?1", LIST_COLUMNS);
    Ok(conn.query_row(&sql, params![id], row_to_list).optional()?)
}

pub(crate) fn require(conn: &Connection, id: i64) -> DomainResult<List> {
    load(conn, id)?.ok_or_else(|| DomainError::not_found("List", id))
}

fn load_all(conn: &Connection) -> DomainResult<Vec<List>> {
    let sql = format!("SELECT {} FROM lists ORDER BY sort_order, id", LIST_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_list)?;
    let lists = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(lists)
}

pub(crate) fn stats(conn: &Connection, list_id: i64) -> DomainResult<ListStats> {
    let stats = conn.query_row(
        "SELECT
            (SELECT COUNT(*) FROM sections WHERE list_id = ?1),
            COUNT(i.id),
            COALESCE(SUM(i.completed), 0),
            COALESCE(SUM(i.uncertain), 0)
         FROM items i JOIN sections s ON s.id = i.section_id
         WHERE s.list_id = ?1",
        params![list_id],
        |row| {
            Ok(ListStats {
                section_count: row.get(0)?,
                item_count: row.get(1)?,
                completed_count: row.get(2)?,
                uncertain_count: row.get(3)?,
            })
        },
    )?;
    Ok(stats)
}
