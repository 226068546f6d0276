//! Persisted records. The developer/language association is not stored on either
//! record; it lives only in the join table and is read through the repositories.

use sqlx::FromRow;

pub type DeveloperId = i64;
pub type LanguageId = i64;

#[derive(Clone, Debug, PartialEq, Eq, FromRow)]
pub struct Developer {
    pub id: DeveloperId,
    pub first_name: String,
    pub last_name: String,
}

/// Mutable columns of a developer row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeveloperFields {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, FromRow)]
pub struct ProgrammingLanguage {
    pub id: LanguageId,
    pub name: String,
    pub creators_name: String,
}

/// Mutable columns of a programming_language row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageFields {
    pub name: String,
    pub creators_name: String,
}

/// Language side of a link request: reuse a stored row or cascade-insert a new one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LanguageRef {
    Existing(LanguageId),
    New(LanguageFields),
}

impl Developer {
    pub fn with_fields(id: DeveloperId, fields: DeveloperFields) -> Self {
        Developer {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
        }
    }
}

impl ProgrammingLanguage {
    pub fn with_fields(id: LanguageId, fields: LanguageFields) -> Self {
        ProgrammingLanguage {
            id,
            name: fields.name,
            creators_name: fields.creators_name,
        }
    }
}

/// Zero-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u32 = 20;
    pub const MAX_SIZE: u32 = 100;

    /// Clamp size into 1..=MAX_SIZE.
    pub fn new(page: Option<u32>, size: Option<u32>) -> Self {
        let size = size.unwrap_or(Self::DEFAULT_SIZE).clamp(1, Self::MAX_SIZE);
        PageRequest {
            page: page.unwrap_or(0),
            size,
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// One page of results plus the total row count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub request: PageRequest,
    pub total: u64,
}

impl<T> Paged<T> {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.request.size))
    }
}
