//! Sibling Ordering
//!
//! `sort_order` bookkeeping shared by lists, sections and items. Every
//! function takes a plain `&Connection` so it composes inside a caller's
//! transaction; none of them opens one itself.
//!
//! Within a scope the orders are kept at exactly `0..n`. New rows append at
//! `max + 1`, removals are followed by [`compact`], and moves swap with the
//! adjacent sibling using conditional updates.

use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{now_millis, DomainError, DomainResult};

/// Table holding one kind of ordered row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Lists,
    Sections,
    Items,
}

impl Collection {
    fn table(self) -> &'static str {
        match self {
            Collection::Lists => "lists",
            Collection::Sections => "sections",
            Collection::Items => "items",
        }
    }

    fn parent_column(self) -> Option<&'static str> {
        match self {
            Collection::Lists => None,
            Collection::Sections => Some("list_id"),
            Collection::Items => Some("section_id"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Collection::Lists => "List",
            Collection::Sections => "Section",
            Collection::Items => "Item",
        }
    }

    fn scope(self, parent_id: Option<i64>) -> DomainResult<Scope> {
        match (self, parent_id) {
            (Collection::Lists, _) => Ok(Scope::AllLists),
            (Collection::Sections, Some(id)) => Ok(Scope::List(id)),
            (Collection::Items, Some(id)) => Ok(Scope::Section(id)),
            _ => Err(DomainError::Internal(format!("{} row without parent", self.label()))),
        }
    }
}

/// A set of siblings sharing one dense ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    AllLists,
    /// Sections of one list
    List(i64),
    /// Items of one section
    Section(i64),
}

impl Scope {
    pub fn collection(self) -> Collection {
        match self {
            Scope::AllLists => Collection::Lists,
            Scope::List(_) => Collection::Sections,
            Scope::Section(_) => Collection::Items,
        }
    }

    fn predicate(self) -> String {
        match self {
            Scope::AllLists => "1 = 1".to_string(),
            Scope::List(id) => format!("list_id = {}", id),
            Scope::Section(id) => format!("section_id = {}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Outcome of a single move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub scope: Scope,
    /// The sibling that traded places, `None` when already at the edge
    pub swapped_with: Option<i64>,
}

/// Highest `sort_order` in the scope, `-1` when empty
pub fn max_order(conn: &Connection, scope: Scope) -> DomainResult<i64> {
    let sql = format!(
        "SELECT COALESCE(MAX(sort_order), -1) FROM {} WHERE {}",
        scope.collection().table(),
        scope.predicate()
    );
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}

/// Order value for a row appended to the scope
pub fn next_order(conn: &Connection, scope: Scope) -> DomainResult<i64> {
    Ok(max_order(conn, scope)? + 1)
}

/// Find which scope a row lives in and its current order
pub fn locate(conn: &Connection, collection: Collection, id: i64) -> DomainResult<(Scope, i64)> {
    let parent = collection.parent_column().unwrap_or("NULL");
    let sql = format!(
        "SELECT {}, sort_order FROM {} WHERE id = ?1",
        parent,
        collection.table()
    );
    let found: Option<(Option<i64>, i64)> = conn
        .query_row(&sql, params![id], |row| Ok((row.get(0)?, row.get(1)?)))
        .optional()?;

    let (parent_id, order) = found.ok_or_else(|| DomainError::not_found(collection.label(), id))?;
    Ok((collection.scope(parent_id)?, order))
}

/// Ids in the scope, in display order
#[cfg(test)]
pub fn ordered_ids(conn: &Connection, scope: Scope) -> DomainResult<Vec<i64>> {
    let sql = format!(
        "SELECT id FROM {} WHERE {} ORDER BY sort_order, id",
        scope.collection().table(),
        scope.predicate()
    );
    let mut stmt = conn.prepare(&sql)?;
    let ids = stmt.query_map([], |row| row.get(0))?;
    ids.collect::<Result<Vec<i64>, _>>().map_err(DomainError::from)
}

/// Rewrite the scope to `0..n`, keeping relative order (ties by id).
/// Returns how many rows changed.
pub fn compact(conn: &Connection, scope: Scope) -> DomainResult<usize> {
    let table = scope.collection().table();
    let sql = format!(
        "SELECT id, sort_order FROM {} WHERE {} ORDER BY sort_order, id",
        table,
        scope.predicate()
    );
    let rows: Vec<(i64, i64)> = {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<_, _>>()?
    };

    let update = format!("UPDATE {} SET sort_order = ?1, updated_at = ?2 WHERE id = ?3", table);
    let now = now_millis();
    let mut changed = 0;
    for (position, (id, order)) in rows.into_iter().enumerate() {
        let position = position as i64;
        if order != position {
            conn.execute(&update, params![position, now, id])?;
            changed += 1;
        }
    }
    if changed > 0 {
        tracing::debug!(?scope, changed, "Compacted sort order");
    }
    Ok(changed)
}

/// Swap a row with its neighbour in `direction`.
///
/// At the edge of the scope this is a no-op. Each half of the swap only
/// applies if the row still holds the order value read a moment earlier;
/// if either misses, the caller's transaction must be abandoned.
pub fn shift(
    conn: &Connection,
    collection: Collection,
    id: i64,
    direction: Direction,
) -> DomainResult<Shift> {
    let (scope, _) = locate(conn, collection, id)?;
    compact(conn, scope)?;
    let (_, order) = locate(conn, collection, id)?;

    let table = collection.table();
    let neighbour_sql = match direction {
        Direction::Up => format!(
            "SELECT id, sort_order FROM {} WHERE {} AND sort_order < ?1 ORDER BY sort_order DESC, id DESC LIMIT 1",
            table,
            scope.predicate()
        ),
        Direction::Down => format!(
            "SELECT id, sort_order FROM {} WHERE {} AND sort_order > ?1 ORDER BY sort_order ASC, id ASC LIMIT 1",
            table,
            scope.predicate()
        ),
    };
    let neighbour: Option<(i64, i64)> = conn
        .query_row(&neighbour_sql, params![order], |row| Ok((row.get(0)?, row.get(1)?)))
        .optional()?;

    let Some((other_id, other_order)) = neighbour else {
        return Ok(Shift {
            scope,
            swapped_with: None,
        });
    };

    let swap = format!(
        "UPDATE {} SET sort_order = ?1, updated_at = ?2 WHERE id = ?3 AND sort_order = ?4",
        table
    );
    let now = now_millis();
    let moved = conn.execute(&swap, params![other_order, now, id, order])?;
    let displaced = conn.execute(&swap, params![order, now, other_id, other_order])?;
    if moved != 1 || displaced != 1 {
        return Err(DomainError::Conflict(format!(
            "{} {} changed position during move",
            collection.label(),
            id
        )));
    }

    Ok(Shift {
        scope,
        swapped_with: Some(other_id),
    })
}
