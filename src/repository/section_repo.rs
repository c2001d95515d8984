//! Section Repository Implementation

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use super::db::DbState;
use super::item_repo;
use super::list_repo;
use super::ordering::{self, Collection, Scope};
use super::traits::{OrderingOperations, Repository, ScopedRepository};
use crate::domain::{now_millis, DomainError, DomainResult, NewSection, Section, SectionPatch};

const SECTION_COLUMNS: &str = "id, list_id, name, sort_order, created_at, updated_at";

#[derive(Clone)]
pub struct SectionRepository {
    db: DbState,
}

impl SectionRepository {
    pub fn new(db: DbState) -> Self {
        Self { db }
    }

    /// Insert a section inside the caller's transaction, appended after the
    /// list's last section. The list must exist.
    pub fn create_tx(tx: &Transaction<'_>, list_id: i64, name: &str) -> DomainResult<Section> {
        let order = ordering::next_order(tx, Scope::List(list_id))?;
        let now = now_millis();
        tx.execute(
            "INSERT INTO sections (list_id, name, sort_order, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
            params![list_id, name.trim(), order, now],
        )?;
        require(tx, tx.last_insert_rowid())
    }

    /// Section with its items attached
    pub async fn find_with_items(&self, id: i64) -> DomainResult<Option<Section>> {
        self.db
            .with_conn(move |conn| {
                let Some(mut section) = load(conn, id)? else {
                    return Ok(None);
                };
                section.items = Some(item_repo::items_in(conn, id)?);
                Ok(Some(section))
            })
            .await
    }
}

#[async_trait]
impl Repository<Section> for SectionRepository {
    type NewEntity = NewSection;
    type Patch = SectionPatch;

    async fn create(&self, input: NewSection) -> DomainResult<Section> {
        input.validate()?;
        self.db
            .transaction(move |tx| {
                list_repo::require(tx, input.list_id)?;
                Self::create_tx(tx, input.list_id, &input.name)
            })
            .await
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Section>> {
        self.db.with_conn(move |conn| load(conn, id)).await
    }

    async fn update(&self, id: i64, patch: SectionPatch) -> DomainResult<Section> {
        patch.validate()?;
        self.db
            .transaction(move |tx| {
                let current = require(tx, id)?;
                let name = patch.apply(&current);
                tx.execute(
                    "UPDATE sections SET name = ?1, updated_at = ?2 WHERE id = ?3",
                    params![name.trim(), now_millis(), id],
                )?;
                require(tx, id)
            })
            .await
    }

    async fn delete(&self, id: i64) -> DomainResult<Section> {
        self.db
            .transaction(move |tx| {
                let section = require(tx, id)?;
                tx.execute("DELETE FROM sections WHERE id = ?1", params![id])?;
                ordering::compact(tx, Scope::List(section.list_id))?;
                Ok(section)
            })
            .await
    }
}

#[async_trait]
impl ScopedRepository<Section> for SectionRepository {
    type ScopeId = i64;

    /// Sections of a list, each with its items
    async fn list_in_scope(&self, list_id: i64) -> DomainResult<Vec<Section>> {
        self.db
            .with_conn(move |conn| {
                list_repo::require(conn, list_id)?;
                sections_in(conn, list_id, true)
            })
            .await
    }
}

impl OrderingOperations for SectionRepository {
    type Entity = Section;

    const COLLECTION: Collection = Collection::Sections;

    fn db(&self) -> &DbState {
        &self.db
    }

    fn fetch(conn: &Connection, id: i64) -> DomainResult<Option<Section>> {
        load(conn, id)
    }
}

fn row_to_section(row: &rusqlite::Row<'_>) -> rusqlite::Result<Section> {
    Ok(Section {
        id: row.get(0)?,
        list_id: row.get(1)?,
        name: row.get(2)?,
        sort_order: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
        items: None,
    })
}

pub(crate) fn load(conn: &Connection, id: i64) -> DomainResult<Option<Section>> {
    let sql = format!("SELECT {} FROM sections WHERE id = ?1", SECTION_COLUMNS);
    Ok(conn.query_row(&sql, params![id], row_to_section).optional()?)
}

pub(crate) fn require(conn: &Connection, id: i64) -> DomainResult<Section> {
    load(conn, id)?.ok_or_else(|| DomainError::not_found("Section", id))
}

/// Sections of one list in order, optionally with their items
pub(crate) fn sections_in(conn: &Connection, list_id: i64, with_items: bool) -> DomainResult<Vec<Section>> {
    let sql = format!(
        "SELECT {} FROM sections WHERE list_id = ?1 ORDER BY sort_order, id",
        SECTION_COLUMNS
    );
    let mut sections = {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![list_id], row_to_section)?;
        rows.collect::<Result<Vec<_>, _>>()?
    };
    if with_items {
        for section in &mut sections {
            section.items = Some(item_repo::items_in(conn, section.id)?);
        }
    }
    Ok(sections)
}
