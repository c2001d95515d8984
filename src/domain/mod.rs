//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! No storage or transport concerns live here.

mod batch;
mod entity;
mod history;
mod icon;
mod item;
mod list;
mod section;
pub mod validation;

pub use batch::{BatchItem, BatchList, BatchMode, BatchOutcome, BatchRequest, BatchSection};
pub use entity::{now_millis, DomainError, DomainResult, Entity};
pub use history::{HistoryEntry, HistoryQuery, HistorySort, NewHistoryEntry};
pub use icon::normalize_icon;
pub use item::{Item, ItemFlag, ItemPatch, NewItem};
pub use list::{List, ListPatch, ListStats, NewList};
pub use section::{NewSection, Section, SectionPatch};
