//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.

use async_trait::async_trait;
use rusqlite::Connection;

use super::db::DbState;
use super::ordering::{self, Collection, Direction, Scope};
use crate::domain::{DomainError, DomainResult, Entity};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Validated creation input
    type NewEntity: Send + 'static;
    /// Partial update; unset fields keep their stored value
    type Patch: Send + 'static;

    /// Create a new entity
    async fn create(&self, input: Self::NewEntity) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// Update an existing entity
    async fn update(&self, id: T::Id, patch: Self::Patch) -> DomainResult<T>;

    /// Delete entity by ID, returning the removed row
    async fn delete(&self, id: T::Id) -> DomainResult<T>;
}

/// Extension for repositories whose rows belong to a parent scope
#[async_trait]
pub trait ScopedRepository<T: Entity>: Repository<T> {
    /// Parent key; `()` for top-level rows
    type ScopeId: Send + 'static;

    /// All rows in the scope, in display order
    async fn list_in_scope(&self, scope: Self::ScopeId) -> DomainResult<Vec<T>>;
}

/// Result of a move-up / move-down
#[derive(Debug, Clone, PartialEq)]
pub struct Reordered<T> {
    /// The moved row after the move
    pub entity: T,
    /// The sibling it traded places with, if any
    pub swapped_with: Option<i64>,
}

impl<T> Reordered<T> {
    /// Ids whose order changed (or would have)
    pub fn affected_ids(&self, id: i64) -> Vec<i64> {
        std::iter::once(id).chain(self.swapped_with).collect()
    }
}

/// Move-up / move-down / max-order for a sibling-ordered entity
#[async_trait]
pub trait OrderingOperations: Send + Sync {
    type Entity: Entity<Id = i64> + 'static;

    const COLLECTION: Collection;

    fn db(&self) -> &DbState;

    /// Load one row on the given connection
    fn fetch(conn: &Connection, id: i64) -> DomainResult<Option<Self::Entity>>;

    /// Swap with the previous sibling; no-op when already first
    async fn move_up(&self, id: i64) -> DomainResult<Reordered<Self::Entity>> {
        self.shift(id, Direction::Up).await
    }

    /// Swap with the next sibling; no-op when already last
    async fn move_down(&self, id: i64) -> DomainResult<Reordered<Self::Entity>> {
        self.shift(id, Direction::Down).await
    }

    async fn shift(&self, id: i64, direction: Direction) -> DomainResult<Reordered<Self::Entity>> {
        self.db()
            .transaction(move |tx| {
                let shift = ordering::shift(tx, Self::COLLECTION, id, direction)?;
                let entity = Self::fetch(tx, id)?
                    .ok_or_else(|| DomainError::not_found(Self::COLLECTION.label(), id))?;
                Ok(Reordered {
                    entity,
                    swapped_with: shift.swapped_with,
                })
            })
            .await
    }

    /// Highest order in `scope`, `-1` when empty
    async fn max_order(&self, scope: Scope) -> DomainResult<i64> {
        self.db().with_conn(move |conn| ordering::max_order(conn, scope)).await
    }
}
