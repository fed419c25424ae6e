use axum::{http::StatusCode, response::IntoResponse};
use crate::api::hal::{Hal, LinkBuilder, Links, RepresentationModel};
use crate::api::handlers::event::EVENTS_PATH;

pub const INDEX_PATH: &str = "/api";

/// Entry point for clients discovering the API.
pub async fn index(links: LinkBuilder) -> impl IntoResponse {
    Hal(StatusCode::OK, RepresentationModel {
        links: Links::new().with("events", links.link(EVENTS_PATH)),
    })
}
