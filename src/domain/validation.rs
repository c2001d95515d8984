//! Field limits shared by the single-entity and batch paths.

use super::entity::{DomainError, DomainResult};

pub const MAX_LIST_NAME_LENGTH: usize = 100;
pub const MAX_ICON_LENGTH: usize = 20;
pub const MAX_SECTION_NAME_LENGTH: usize = 100;
pub const MAX_ITEM_NAME_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Reject an empty or oversized name, measured after trimming. `field` is the user-facing label ("List name").
pub fn require_name(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidInput(format!("{} is required", field)));
    }
    check_length(field, value.trim(), max)
}

/// Reject a value longer than `max` characters.
pub fn check_length(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.chars().count() > max {
        return Err(DomainError::InvalidInput(format!(
            "{} exceeds maximum length of {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Ids arrive from paths and bodies; zero and negatives never name a row.
pub fn require_id(field: &str, id: i64) -> DomainResult<()> {
    if id <= 0 {
        return Err(DomainError::InvalidInput(format!("{} is required", field)));
    }
    Ok(())
}
