//! Users API handlers.
//!
//! ```text
//! GET    /api/v1/users
//! GET    /api/v1/users/email-availability?email=ash@pallet.town
//! GET    /api/v1/users/{id}
//! POST   /api/v1/users {"name":"Ash","email":"ash@pallet.town","password":"pikachu","pokemonIds":[25]}
//! PATCH  /api/v1/users/{id} {"name":"Red"}
//! PUT    /api/v1/users/{id} {"pokemonIds":[1,4,7]}
//! DELETE /api/v1/users/{id}
//! ```
//!
//! Read endpoints attach catalog details; a per-request cancellation token is
//! dropped with the handler future so a disconnecting client stops the
//! outstanding catalog lookups.

use actix_web::{HttpResponse, delete, get, http::header, post, route, web};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, NewUser, PokemonDetail, UserId, UserPatch, UserView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    EMAIL, NAME, PASSWORD, missing_field_error, parse_email, parse_name, parse_password,
    parse_pokemon_ids, parse_user_id,
};

/// Request body for `POST /api/v1/users`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "Nicolas", max_length = 100)]
    pub name: Option<String>,
    #[schema(example = "nicolarro20@gmail.com", max_length = 200)]
    pub email: Option<String>,
    #[schema(example = "default123", min_length = 6, max_length = 200)]
    pub password: Option<String>,
    #[schema(example = json!([1, 25, 150]))]
    pub pokemon_ids: Option<Vec<i64>>,
}

/// Request body for `PATCH`/`PUT /api/v1/users/{id}`.
///
/// Absent fields keep their stored value. `pokemonIds` replaces the whole
/// list when present.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "passWord")]
    pub password: Option<String>,
    pub pokemon_ids: Option<Vec<i64>>,
}

/// Catalog details of one Pokemon.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PokemonDetailResponse {
    #[schema(example = 25)]
    pub id: i32,
    #[schema(example = "pikachu")]
    pub name: String,
    pub image_url: Option<String>,
    #[schema(example = json!(["electric"]))]
    pub types: Option<Vec<String>>,
    /// Height in decimetres.
    pub height: Option<u32>,
    /// Weight in hectograms.
    pub weight: Option<u32>,
}

impl From<PokemonDetail> for PokemonDetailResponse {
    fn from(value: PokemonDetail) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            image_url: value.image_url,
            types: value.types,
            height: value.height,
            weight: value.weight,
        }
    }
}

/// Public representation of a user.
///
/// `pokemonDetails` is `null` on the create response and an array (possibly
/// shorter than `pokemonIds`) on reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Nicolas")]
    pub name: String,
    #[schema(example = "nicolarro20@gmail.com")]
    pub email: String,
    #[schema(example = json!([1, 25, 150]))]
    pub pokemon_ids: Vec<i32>,
    pub pokemon_details: Option<Vec<PokemonDetailResponse>>,
}

impl From<UserView> for UserResponse {
    fn from(value: UserView) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.to_string(),
            email: value.email.to_string(),
            pokemon_ids: value.pokemon_ids.iter().map(|id| id.get()).collect(),
            pokemon_details: value
                .pokemon_details
                .map(|details| details.into_iter().map(PokemonDetailResponse::from).collect()),
        }
    }
}

/// Query string for the email availability check.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailAvailabilityQuery {
    /// Address to check.
    pub email: Option<String>,
}

/// Response for the email availability check.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailAvailabilityResponse {
    pub email: String,
    pub available: bool,
}

fn parse_create_request(payload: CreateUserRequest) -> Result<NewUser, Error> {
    let name = payload.name.ok_or_else(|| missing_field_error(NAME))?;
    let email = payload.email.ok_or_else(|| missing_field_error(EMAIL))?;
    let password = payload.password.ok_or_else(|| missing_field_error(PASSWORD))?;

    Ok(NewUser {
        name: parse_name(&name)?,
        email: parse_email(&email)?,
        password: parse_password(password)?,
        pokemon_ids: parse_pokemon_ids(payload.pokemon_ids.unwrap_or_default())?,
    })
}

fn parse_update_request(payload: UpdateUserRequest) -> Result<UserPatch, Error> {
    Ok(UserPatch {
        name: payload.name.as_deref().map(parse_name).transpose()?,
        email: payload.email.as_deref().map(parse_email).transpose()?,
        password: payload.password.map(parse_password).transpose()?,
        pokemon_ids: payload.pokemon_ids.map(parse_pokemon_ids).transpose()?,
    })
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

/// List every user with catalog details attached.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users with resolved Pokemon details", body = [UserResponse]),
        (status = 503, description = "User store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let users = state.users.list_users(&cancel).await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Fetch one user with catalog details attached.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User with resolved Pokemon details", body = UserResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = parse_user_id(path.into_inner())?;
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let user = state
        .users
        .get_user(id, &cancel)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Report whether an email address is still free.
#[utoipa::path(
    get,
    path = "/api/v1/users/email-availability",
    params(EmailAvailabilityQuery),
    responses(
        (status = 200, description = "Availability of the address", body = EmailAvailabilityResponse),
        (status = 400, description = "Missing or invalid email", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "checkEmailAvailability"
)]
#[get("/users/email-availability")]
pub async fn email_availability(
    state: web::Data<HttpState>,
    query: web::Query<EmailAvailabilityQuery>,
) -> ApiResult<web::Json<EmailAvailabilityResponse>> {
    let raw = query
        .into_inner()
        .email
        .ok_or_else(|| missing_field_error(EMAIL))?;
    let email = parse_email(&raw)?;
    let available = state.users.is_email_unique(&email).await?;
    Ok(web::Json(EmailAvailabilityResponse {
        email: email.to_string(),
        available,
    }))
}

/// Register a user. The response is not enriched with catalog details.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (
            status = 201,
            description = "User created",
            headers(("Location" = String, description = "URL of the new user")),
            body = UserResponse
        ),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let new_user = parse_create_request(payload.into_inner())?;
    let created = state.users_command.create_user(new_user).await?;
    let location = format!("/api/v1/users/{}", created.id);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(UserResponse::from(created)))
}

/// Apply a partial update; `PUT` and `PATCH` behave identically.
#[utoipa::path(
    method(patch, put),
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[route("/users/{id}", method = "PATCH", method = "PUT")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(path.into_inner())?;
    let patch = parse_update_request(payload.into_inner())?;
    if !state.users_command.update_user(id, patch).await? {
        return Err(user_not_found(id));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(path.into_inner())?;
    if !state.users_command.delete_user(id).await? {
        return Err(user_not_found(id));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Register the user routes on a scope.
///
/// The availability check is registered ahead of `/users/{id}` so the literal
/// segment wins.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(email_availability)
        .service(list_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(delete_user);
}
