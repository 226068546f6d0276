//! Transfer shapes exchanged over HTTP and the explicit conversions to and from
//! the persisted records.

use crate::model::{
    Developer, DeveloperFields, LanguageFields, LanguageRef, Paged, ProgrammingLanguage,
};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Request body for creating or updating a developer. `id` is accepted and ignored.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperInput {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperView {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// Request body for a language. A positive `id` refers to an existing row when
/// linking a language to a developer.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgrammingLanguageInput {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub creators_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgrammingLanguageView {
    pub id: i64,
    pub name: String,
    pub creators_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperPage {
    pub content: Vec<DeveloperView>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

/// `null` text reaches validation as an empty string, the same as a missing field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl DeveloperInput {
    pub fn into_fields(self) -> DeveloperFields {
        DeveloperFields {
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

impl ProgrammingLanguageInput {
    pub fn into_fields(self) -> LanguageFields {
        LanguageFields {
            name: self.name,
            creators_name: self.creators_name,
        }
    }

    /// `0` and absent ids both mean "new language".
    pub fn into_ref(self) -> LanguageRef {
        match self.id {
            Some(id) if id > 0 => LanguageRef::Existing(id),
            _ => LanguageRef::New(self.into_fields()),
        }
    }
}

impl From<Developer> for DeveloperView {
    fn from(d: Developer) -> Self {
        DeveloperView {
            id: d.id,
            first_name: d.first_name,
            last_name: d.last_name,
        }
    }
}

impl From<ProgrammingLanguage> for ProgrammingLanguageView {
    fn from(l: ProgrammingLanguage) -> Self {
        ProgrammingLanguageView {
            id: l.id,
            name: l.name,
            creators_name: l.creators_name,
        }
    }
}

impl From<Paged<Developer>> for DeveloperPage {
    fn from(paged: Paged<Developer>) -> Self {
        let total_pages = paged.total_pages();
        DeveloperPage {
            content: paged.items.into_iter().map(DeveloperView::from).collect(),
            page: paged.request.page,
            size: paged.request.size,
            total_elements: paged.total,
            total_pages,
        }
    }
}
