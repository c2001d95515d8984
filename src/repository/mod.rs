//! Repository Layer
//!
//! Data access abstractions and implementations.

mod batch_repo;
mod db;
mod history_repo;
mod item_repo;
mod list_repo;
mod section_repo;
mod traits;
pub mod ordering;

#[cfg(test)]
mod tests;

pub use batch_repo::BatchRepository;
pub use db::{init_db, run_migrations, DbState, MEMORY_PATH};
pub use history_repo::HistoryRepository;
pub use item_repo::{ItemRelocation, ItemRepository};
pub use list_repo::ListRepository;
pub use section_repo::SectionRepository;
pub use traits::{OrderingOperations, Reordered, Repository, ScopedRepository};
