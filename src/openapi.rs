//! OpenAPI document for the registry API.

use crate::dto::{
    DeveloperInput, DeveloperPage, DeveloperView, ProgrammingLanguageInput,
    ProgrammingLanguageView,
};
use crate::error::ErrorBody;
use crate::handlers::{developer, language};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Developer registry", description = "Developers and the programming languages they know."),
    paths(
        developer::list,
        developer::create,
        developer::read,
        developer::update,
        developer::delete,
        developer::add_language,
        developer::list_languages,
        language::list,
        language::create,
        language::read,
        language::update,
        language::delete,
        language::list_developers,
    ),
    components(schemas(
        DeveloperInput,
        DeveloperView,
        DeveloperPage,
        ProgrammingLanguageInput,
        ProgrammingLanguageView,
        ErrorBody,
    )),
    tags(
        (name = "developer", description = "Developer records and their languages"),
        (name = "programming_language", description = "Programming language records"),
    )
)]
pub struct ApiDoc;
