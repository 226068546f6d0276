//! Business operations over the repositories, returning transfer shapes.

mod developer;
mod language;
mod validation;
pub use developer::DeveloperService;
pub use language::LanguageService;
pub use validation::{FieldErrors, Validate, CREATORS_NAME_MAX, LANGUAGE_NAME_MAX};
