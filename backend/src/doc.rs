//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer (users and
//! health) together with the request/response bodies and the domain error
//! wrappers ([`ErrorSchema`], [`ErrorCodeSchema`]). The document is served by
//! Swagger UI in debug builds and exported via `cargo run --bin openapi-dump`.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    CreateUserRequest, EmailAvailabilityResponse, PokemonDetailResponse, UpdateUserRequest,
    UserResponse,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Trainer roster API",
        description = "Manage trainers and the Pokemon they own, enriched with PokeAPI details."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::email_availability,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateUserRequest,
        UpdateUserRequest,
        UserResponse,
        PokemonDetailResponse,
        EmailAvailabilityResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "Trainer records and their Pokemon"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure and path registration.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case(ERROR_SCHEMA_NAME, "traceId")]
    #[case(ERROR_SCHEMA_NAME, "code")]
    #[case("UserResponse", "pokemonIds")]
    #[case("UserResponse", "pokemonDetails")]
    #[case("PokemonDetailResponse", "imageUrl")]
    #[case("CreateUserRequest", "pokemonIds")]
    fn schemas_use_camel_case_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("schema registered");

        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    #[case("/api/v1/users")]
    #[case("/api/v1/users/{id}")]
    #[case("/api/v1/users/email-availability")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[test]
    fn update_is_documented_for_patch_and_put() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/api/v1/users/{id}").expect("path");

        assert!(item.patch.is_some());
        assert!(item.put.is_some());
        assert!(item.get.is_some());
        assert!(item.delete.is_some());
    }
}
