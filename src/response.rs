//! Response helpers shared by the resource handlers.

use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 201 with a `Location` header pointing at the new resource.
pub struct Created<T> {
    pub location: String,
    pub body: T,
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (
            StatusCode::CREATED,
            [(header::LOCATION, self.location)],
            Json(self.body),
        )
            .into_response()
    }
}

/// `{collection path}/{id}` for the request that created the resource.
pub fn location_of(collection: &Uri, id: i64) -> String {
    format!("{}/{}", collection.path().trim_end_matches('/'), id)
}

pub fn created<T: Serialize>(collection: &Uri, id: i64, body: T) -> Created<T> {
    Created {
        location: location_of(collection, id),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_appends_id_to_request_path() {
        let uri: Uri = "/v1/developer/".parse().unwrap();
        assert_eq!(location_of(&uri, 7), "/v1/developer/7");
        let uri: Uri = "/v1/programming_language?x=1".parse().unwrap();
        assert_eq!(location_of(&uri, 2), "/v1/programming_language/2");
    }

    #[test]
    fn created_sets_status_and_header() {
        let uri: Uri = "/v1/developer".parse().unwrap();
        let response = created(&uri, 3, serde_json::json!({"id": 3})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/v1/developer/3"
        );
    }
}
