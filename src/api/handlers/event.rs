use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthAccount, json::ApiJson, maybe_auth::MaybeAuthAccount};
use crate::api::dtos::requests::{EventDto, PageParams, EVENT_DTO};
use crate::api::hal::{EntityModel, Hal, LinkBuilder, PageLinks, PagedModel};
use crate::api::handlers::index::INDEX_PATH;
use crate::domain::models::{errors::Errors, event::{Event, EventDetails}};
use crate::domain::ports::SortOrder;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

pub const EVENTS_PATH: &str = "/api/events";
const EVENT_LIST_RELATION: &str = "eventList";

const PROFILE_CREATE: &str = "/docs/index.html#resources-events-create";
const PROFILE_LIST: &str = "/docs/index.html#resources-events-list";
const PROFILE_GET: &str = "/docs/index.html#resources-events-get";
const PROFILE_UPDATE: &str = "/docs/index.html#resources-events-update";

fn event_path(id: i64) -> String {
    format!("{}/{}", EVENTS_PATH, id)
}

/// Runs field constraints first and the cross-field validator only when
/// those pass, mirroring the two validation phases of the API.
fn validate(state: &AppState, links: &LinkBuilder, payload: EventDto) -> Result<EventDetails, AppError> {
    let mut errors = Errors::new(EVENT_DTO);

    let Some(details) = payload.into_details(&mut errors) else {
        return Err(AppError::Validation(errors, links.link(INDEX_PATH)));
    };

    state.event_validator.validate(&details, &mut errors);
    if errors.has_errors() {
        return Err(AppError::Validation(errors, links.link(INDEX_PATH)));
    }

    Ok(details)
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    links: LinkBuilder,
    AuthAccount(account): AuthAccount,
    ApiJson(payload): ApiJson<EventDto>,
) -> Result<impl IntoResponse, AppError> {
    let details = validate(&state, &links, payload)?;

    let event = Event::from_details(details, account.id);
    let created = state.event_repo.create(&event).await?;

    info!("Event created: {} by account {}", created.id, account.id);

    let self_link = links.link(&event_path(created.id));
    let location = self_link.href.clone();

    let model = EntityModel::new(created)
        .with("self", self_link.clone())
        .with("query-events", links.link(EVENTS_PATH))
        .with("update-event", self_link)
        .with("profile", links.link(PROFILE_CREATE));

    Ok(([(header::LOCATION, location)], Hal(StatusCode::CREATED, model)))
}

pub async fn query_events(
    State(state): State<Arc<AppState>>,
    links: LinkBuilder,
    MaybeAuthAccount(account): MaybeAuthAccount,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    let params = PageParams::parse(&query)?;
    let page = state.event_repo.find_page(&params.request).await?;

    let nav = PageLinks {
        base: links.href(EVENTS_PATH),
        size: params.request.size,
        sort: params.request.sort.iter().map(SortOrder::to_param).collect(),
    };

    let mut model = PagedModel::from_page(page, EVENT_LIST_RELATION, &nav, |event| {
        let self_link = links.link(&event_path(event.id));
        EntityModel::new(event).with("self", self_link)
    })
        .with("profile", links.link(PROFILE_LIST));

    if account.is_some() {
        model = model.with("create-event", links.link(EVENTS_PATH));
    }

    Ok(Hal(StatusCode::OK, model))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    links: LinkBuilder,
    MaybeAuthAccount(account): MaybeAuthAccount,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(id).await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))?;

    let is_manager = account.is_some_and(|a| event.is_managed_by(a.id));
    let self_link = links.link(&event_path(event.id));

    let mut model = EntityModel::new(event)
        .with("self", self_link.clone())
        .with("profile", links.link(PROFILE_GET));

    if is_manager {
        model = model.with("update-event", self_link);
    }

    Ok(Hal(StatusCode::OK, model))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    links: LinkBuilder,
    AuthAccount(account): AuthAccount,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<EventDto>,
) -> Result<impl IntoResponse, AppError> {
    let details = validate(&state, &links, payload)?;

    let mut event = state.event_repo.find_by_id(id).await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))?;

    if !event.is_managed_by(account.id) {
        warn!("Account {} tried to update event {} it does not manage", account.id, id);
        return Err(AppError::Unauthorized);
    }

    event.apply(details);
    let saved = state.event_repo.update(&event).await?;

    info!("Event updated: {}", saved.id);

    let self_link = links.link(&event_path(saved.id));
    let model = EntityModel::new(saved)
        .with("self", self_link)
        .with("profile", links.link(PROFILE_UPDATE));

    Ok(Hal(StatusCode::OK, model))
}
