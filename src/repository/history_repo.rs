//! Item History Repository
//!
//! One row per (name, section). Recording an existing pair bumps its usage
//! count and moves it to the front of the recency order. `last_used_seq`
//! gives recency a total order even when timestamps collide.

use rusqlite::{params, Connection, OptionalExtension};

use super::db::DbState;
use super::section_repo;
use crate::domain::{
    now_millis, DomainError, DomainResult, HistoryEntry, HistoryQuery, HistorySort,
    NewHistoryEntry,
};

const HISTORY_COLUMNS: &str = "id, name, section_id, usage_count, last_used_at, created_at";

#[derive(Clone)]
pub struct HistoryRepository {
    db: DbState,
}

impl HistoryRepository {
    pub fn new(db: DbState) -> Self {
        Self { db }
    }

    /// Record a name by hand (outside item creation)
    pub async fn record(&self, input: NewHistoryEntry) -> DomainResult<HistoryEntry> {
        input.validate()?;
        self.db
            .transaction(move |tx| {
                section_repo::require(tx, input.section_id)?;
                let name = input.name.trim();
                record(tx, name, input.section_id)?;
                find_pair(tx, name, input.section_id)?
                    .ok_or_else(|| DomainError::Internal("History entry vanished after write".to_string()))
            })
            .await
    }

    /// Suggestions for a scope, best first
    pub async fn query(&self, query: HistoryQuery) -> DomainResult<Vec<HistoryEntry>> {
        self.db
            .with_conn(move |conn| {
                let order_by = match query.sort {
                    HistorySort::Recent => "last_used_seq DESC, id ASC",
                    HistorySort::Frequent => "usage_count DESC, id ASC",
                };
                let sql = format!(
                    "SELECT {} FROM item_history
                     WHERE (?1 IS NULL OR section_id = ?1)
                       AND (?2 IS NULL OR name_folded LIKE ?2 ESCAPE '\\')
                     ORDER BY {}
                     LIMIT ?3",
                    HISTORY_COLUMNS, order_by
                );
                let pattern = query
                    .q
                    .as_deref()
                    .map(str::trim)
                    .filter(|q| !q.is_empty())
                    .map(|q| format!("{}%", escape_like(&q.to_lowercase())));

                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(
                    params![query.section_id, pattern, query.effective_limit()],
                    row_to_entry,
                )?;
                let entries = rows.collect::<Result<Vec<_>, _>>()?;
                Ok(entries)
            })
            .await
    }

    #[cfg(test)]
    pub async fn find_by_id(&self, id: i64) -> DomainResult<Option<HistoryEntry>> {
        self.db.with_conn(move |conn| load(conn, id)).await
    }

    /// Remove one entry, returning it
    pub async fn delete(&self, id: i64) -> DomainResult<HistoryEntry> {
        self.db
            .transaction(move |tx| {
                let entry = load(tx, id)?.ok_or_else(|| DomainError::not_found("History entry", id))?;
                tx.execute("DELETE FROM item_history WHERE id = ?1", params![id])?;
                Ok(entry)
            })
            .await
    }

    /// Remove every listed id that exists; returns how many went
    pub async fn delete_many(&self, ids: Vec<i64>) -> DomainResult<usize> {
        if ids.is_empty() {
            return Err(DomainError::InvalidInput("ids must not be empty".to_string()));
        }
        self.db
            .transaction(move |tx| {
                let mut stmt = tx.prepare("DELETE FROM item_history WHERE id = ?1")?;
                let mut removed = 0;
                for id in ids {
                    removed += stmt.execute(params![id])?;
                }
                Ok(removed)
            })
            .await
    }
}

/// Upsert a (name, section) pair on the caller's connection
pub fn record(conn: &Connection, name: &str, section_id: i64) -> DomainResult<()> {
    conn.execute(
        "INSERT INTO item_history (name, section_id, usage_count, last_used_at, created_at, last_used_seq, name_folded)
         VALUES (?1, ?2, 1, ?3, ?3, (SELECT COALESCE(MAX(last_used_seq), 0) + 1 FROM item_history), ?4)
         ON CONFLICT (name, section_id) DO UPDATE SET
            usage_count = usage_count + 1,
            last_used_at = excluded.last_used_at,
            last_used_seq = excluded.last_used_seq",
        params![name, section_id, now_millis(), name.to_lowercase()],
    )?;
    Ok(())
}

fn load(conn: &Connection, id: i64) -> DomainResult<Option<HistoryEntry>> {
    let sql = format!("SELECT {} FROM item_history WHERE id = ?1", HISTORY_COLUMNS);
    Ok(conn.query_row(&sql, params![id], row_to_entry).optional()?)
}

fn find_pair(conn: &Connection, name: &str, section_id: i64) -> DomainResult<Option<HistoryEntry>> {
    let sql = format!(
        "SELECT {} FROM item_history WHERE name = ?1 AND section_id = ?2",
        HISTORY_COLUMNS
    );
    Ok(conn
        .query_row(&sql, params![name, section_id], row_to_entry)
        .optional()?)
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        name: row.get(1)?,
        section_id: row.get(2)?,
        usage_count: row.get(3)?,
        last_used_at: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("milk"), "milk");
    }
}
