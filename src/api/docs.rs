//! OpenAPI description of the user routes.

use utoipa::OpenApi;

use super::handlers::{self, DataResponse};
use crate::store::{User, UserPayload};

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(title = "users-api", description = "In-memory user registry"),
    paths(
        handlers::list_users,
        handlers::get_user,
        handlers::create_user,
        handlers::upsert_user,
        handlers::delete_user
    ),
    components(schemas(User, UserPayload, DataResponse))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_user_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/users", "/users/{id}", "/user", "/user/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
