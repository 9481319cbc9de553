use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use application::{CreateEventRequest, EditEventRequest, EventDto, EventPageDto};

use crate::{error::ApiError, state::AppState, ws};

#[derive(Debug, Deserialize)]
struct CreateEventPayload {
    unique_code: String,
    title: String,
    description: String,
    date: String,
}

#[derive(Debug, Deserialize)]
struct EditEventPayload {
    title: Option<String>,
    description: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
struct EventsBody {
    events: Vec<EventDto>,
}

#[derive(Debug, Serialize)]
struct CreatedEventBody {
    message: &'static str,
    event: EventDto,
    full_name: String,
}

#[derive(Debug, Serialize)]
struct UpdatedEventBody {
    message: &'static str,
    event: EventDto,
}

#[derive(Debug, Serialize)]
struct DeletedBody {
    message: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/events", event_routes())
        .route("/ws", get(ws::websocket_upgrade))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events))
        .route("/family-group/{group_id}", get(list_group_events))
        .route("/create", post(create_event))
        .route("/edit/{event_id}", put(edit_event))
        .route("/delete/{event_id}", delete(delete_event))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn list_events(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<EventsBody>, ApiError> {
    // Unscoped listing, but still identity-gated.
    state.jwt_service.extract_identity(&headers)?;
    let events = state.event_service.list_all().await?;
    Ok(Json(EventsBody { events }))
}

async fn list_group_events(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Result<Json<EventPageDto>, ApiError> {
    let identity = state.jwt_service.extract_identity(&headers)?;
    let page = state
        .event_service
        .list_for_group(
            group_id,
            identity.user_id,
            query.page.unwrap_or(1),
            query.limit.unwrap_or(10),
        )
        .await?;
    Ok(Json(page))
}

async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateEventPayload>,
) -> Result<(StatusCode, Json<CreatedEventBody>), ApiError> {
    let identity = state.jwt_service.extract_identity(&headers)?;
    let event = state
        .event_service
        .create(CreateEventRequest {
            unique_code: payload.unique_code,
            user_id: identity.user_id,
            title: payload.title,
            description: payload.description,
            date: payload.date,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedEventBody {
            message: "Event created successfully",
            event,
            full_name: identity.full_name,
        }),
    ))
}

async fn edit_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<EditEventPayload>,
) -> Result<Json<UpdatedEventBody>, ApiError> {
    let identity = state.jwt_service.extract_identity(&headers)?;
    let event = state
        .event_service
        .edit(EditEventRequest {
            event_id,
            user_id: identity.user_id,
            title: payload.title,
            description: payload.description,
            date: payload.date,
        })
        .await?;
    Ok(Json(UpdatedEventBody {
        message: "Event updated successfully",
        event,
    }))
}

async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<DeletedBody>, ApiError> {
    let identity = state.jwt_service.extract_identity(&headers)?;
    state
        .event_service
        .delete(event_id, identity.user_id)
        .await?;
    Ok(Json(DeletedBody {
        message: "Event deleted successfully",
    }))
}
