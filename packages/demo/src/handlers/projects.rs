//! Project handlers: list, create, show, update, delete.
//!
//! Input is a JSON object. `POST /v1/projects/{id}` carries the real verb in
//! a `_method` field, the `_method` query parameter, or the
//! `x-http-method-override` header.

use apishape::attr::{object, truthy};
use apishape::pagination::PAGE_PARAM;
use apishape::{ApiException, AttributeMap, LengthAwarePaginator, Resource};
use apishape_axum::{Api, Rule, Rules};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde_json::{json, Value};

use super::{AppError, AppState};
use crate::model::{NewProject, ProjectChanges};
use crate::transformers::ProjectTransformer;

/// Manager assigned to projects created through the API.
pub const DEFAULT_MANAGER_ID: u64 = 1;

/// Extra header set on the 201 from `POST /v1/projects`.
pub const CREATED_HEADER: (&str, &str) = ("x-additional-header", "value");

fn transformer(state: &AppState) -> ProjectTransformer {
    ProjectTransformer::new(state.config.api.timestamps)
}

fn listing_meta() -> AttributeMap {
    object(json!({"foo": "bar"}))
}

/// Rules for the request's effective method.
fn rules_for(api: &Api) -> Rules {
    if api.is_delete_request() {
        return Rules::new();
    }
    let rules = Rules::new()
        .field("title", [Rule::Required, Rule::Min(2)])
        .field("description", [Rule::Min(2)]);
    if api.is_update_request() {
        rules.field("deprecated", [Rule::Boolean])
    } else {
        rules
    }
}

fn optional_string(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

fn new_project(input: &AttributeMap) -> NewProject {
    NewProject {
        title: optional_string(input.get("title")).unwrap_or_default(),
        description: optional_string(input.get("description")).filter(|d| !d.is_empty()),
        deprecated: input.get("deprecated").is_some_and(truthy),
        manager_id: DEFAULT_MANAGER_ID,
    }
}

fn project_changes(input: &AttributeMap) -> ProjectChanges {
    ProjectChanges {
        title: optional_string(input.get("title")),
        description: input
            .get("description")
            .map(|v| optional_string(Some(v)).filter(|d| !d.is_empty())),
        deprecated: input.get("deprecated").map(truthy),
    }
}

/// Unwrap a JSON body, answering a malformed one with a 400 envelope.
fn read_input(
    api: &mut Api,
    payload: Result<Json<AttributeMap>, JsonRejection>,
) -> Result<AttributeMap, Response> {
    payload.map(|Json(input)| input).map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejecting request body");
        api.set_status_code(StatusCode::BAD_REQUEST.as_u16())
            .respond_with_error(rejection.body_text())
    })
}

// ---------------------------------------------------------------------------
// GET /v1/projects
// ---------------------------------------------------------------------------

/// `GET /v1/projects`: newest first, paginated, with `meta.foo`.
pub async fn index(State(state): State<AppState>, mut api: Api) -> Response {
    let outcome = list_page(&state, &mut api).await;
    api.finish(outcome)
}

async fn list_page(state: &AppState, api: &mut Api) -> Result<Response, AppError> {
    let page = api
        .request()
        .input(PAGE_PARAM)
        .and_then(|p| p.parse::<u64>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);
    let per_page = state.config.per_page;
    let (items, total) = state.store.list_projects(page, per_page).await?;
    let paginator =
        LengthAwarePaginator::new(items, total, per_page, page, state.config.url("/v1/projects"));

    api.set_meta(listing_meta());
    Ok(api.respond_with_pagination(paginator, transformer(state))?)
}

// ---------------------------------------------------------------------------
// POST /v1/projects
// ---------------------------------------------------------------------------

/// `POST /v1/projects`: create; 201 with the new item.
pub async fn store(
    State(state): State<AppState>,
    mut api: Api,
    payload: Result<Json<AttributeMap>, JsonRejection>,
) -> Response {
    let input = match read_input(&mut api, payload) {
        Ok(input) => input,
        Err(response) => return response,
    };
    let outcome = create(&state, &mut api, &input).await;
    api.finish(outcome)
}

async fn create(state: &AppState, api: &mut Api, input: &AttributeMap) -> Result<Response, AppError> {
    if let Err(errors) = rules_for(api).check(input) {
        return Ok(api.fail_validation(errors));
    }
    let fields = new_project(input);
    state.store.find_manager(fields.manager_id).await?;
    let project = state.store.create_project(fields).await?;
    tracing::info!(id = project.id, "project created");

    api.set_headers([CREATED_HEADER]);
    Ok(api.respond_created(Resource::item(project, transformer(state)))?)
}

// ---------------------------------------------------------------------------
// GET /v1/projects/{id}
// ---------------------------------------------------------------------------

/// `GET /v1/projects/{id}`
pub async fn show(State(state): State<AppState>, Path(id): Path<u64>, mut api: Api) -> Response {
    let outcome = find(&state, &mut api, id).await;
    api.finish(outcome)
}

async fn find(state: &AppState, api: &mut Api, id: u64) -> Result<Response, AppError> {
    let project = state.store.find_project(id).await?;
    api.set_meta(listing_meta());
    Ok(api.respond_item(project, transformer(state))?)
}

// ---------------------------------------------------------------------------
// PUT | PATCH | DELETE /v1/projects/{id}, and POST with an override
// ---------------------------------------------------------------------------

/// `PUT|PATCH /v1/projects/{id}`: 200 success "Updated".
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    mut api: Api,
    payload: Result<Json<AttributeMap>, JsonRejection>,
) -> Response {
    let input = match read_input(&mut api, payload) {
        Ok(input) => input,
        Err(response) => return response,
    };
    let outcome = apply_update(&state, &mut api, id, &input).await;
    api.finish(outcome)
}

async fn apply_update(
    state: &AppState,
    api: &mut Api,
    id: u64,
    input: &AttributeMap,
) -> Result<Response, AppError> {
    if let Err(errors) = rules_for(api).check(input) {
        return Ok(api.fail_validation(errors));
    }
    state.store.update_project(id, project_changes(input)).await?;
    Ok(api.respond_success("Updated"))
}

/// `DELETE /v1/projects/{id}`: 200 success "Deleted".
pub async fn destroy(State(state): State<AppState>, Path(id): Path<u64>, mut api: Api) -> Response {
    let outcome = remove(&state, &mut api, id).await;
    api.finish(outcome)
}

async fn remove(state: &AppState, api: &mut Api, id: u64) -> Result<Response, AppError> {
    state.store.delete_project(id).await?;
    Ok(api.respond_success("Deleted"))
}

/// `POST /v1/projects/{id}`: dispatch on the method override.
pub async fn overridden(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    mut api: Api,
    payload: Result<Json<AttributeMap>, JsonRejection>,
) -> Response {
    // A bodiless POST may still carry the override in the query or header.
    let input = match payload {
        Err(JsonRejection::MissingJsonContentType(_)) => AttributeMap::new(),
        other => match read_input(&mut api, other) {
            Ok(input) => input,
            Err(response) => return response,
        },
    };
    api.override_method_from(&input);

    let outcome = if api.is_update_request() {
        apply_update(&state, &mut api, id, &input).await
    } else if api.is_delete_request() {
        remove(&state, &mut api, id).await
    } else {
        return api
            .set_status_code(StatusCode::METHOD_NOT_ALLOWED.as_u16())
            .respond_with_error(ApiException::other("Method Not Allowed"));
    };
    api.finish(outcome)
}
