//! Request extractors.

pub mod query;
pub mod validated;

pub use query::QueryParams;
pub use validated::ValidatedJson;
