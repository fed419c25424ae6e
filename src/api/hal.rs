//! HAL (`application/hal+json`) representations and absolute link building.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use crate::domain::ports::Page;

pub const HAL_JSON: &str = "application/hal+json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Links(BTreeMap<String, Link>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rel: &str, link: Link) -> Self {
        self.add(rel, link);
        self
    }

    pub fn add(&mut self, rel: &str, link: Link) {
        self.0.insert(rel.to_string(), link);
    }

    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.0.get(rel)
    }
}

/// A single resource with its links.
#[derive(Debug, Serialize)]
pub struct EntityModel<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl<T> EntityModel<T> {
    pub fn new(content: T) -> Self {
        Self { content, links: Links::new() }
    }

    pub fn with(mut self, rel: &str, link: Link) -> Self {
        self.links.add(rel, link);
        self
    }
}

/// Links-only representation, used by the API index.
#[derive(Debug, Serialize)]
pub struct RepresentationModel {
    #[serde(rename = "_links")]
    pub links: Links,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: i64,
    pub number: u32,
}

#[derive(Debug, Serialize)]
pub struct PagedModel<T> {
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<BTreeMap<&'static str, Vec<EntityModel<T>>>>,
    #[serde(rename = "_links")]
    pub links: Links,
    pub page: PageMetadata,
}

impl<T> PagedModel<T> {
    /// Embeds `page.content` under `relation` (omitted when empty) and adds
    /// the navigation links for the requested page.
    pub fn from_page<F>(page: Page<T>, relation: &'static str, nav: &PageLinks, to_model: F) -> Self
    where
        F: FnMut(T) -> EntityModel<T>,
    {
        let metadata = PageMetadata {
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages(),
            number: page.number,
        };

        let mut links = Links::new();
        let last_page = u32::try_from(page.total_pages().max(1) - 1).unwrap_or(u32::MAX);
        if page.total_pages() > 1 {
            links.add("first", nav.page_link(0));
            links.add("last", nav.page_link(last_page));
        }
        if page.has_previous() {
            links.add("prev", nav.page_link(page.number - 1));
        }
        links.add("self", nav.page_link(page.number));
        if page.has_next() {
            links.add("next", nav.page_link(page.number + 1));
        }

        let embedded = if page.content.is_empty() {
            None
        } else {
            let models = page.content.into_iter().map(to_model).collect();
            Some(BTreeMap::from([(relation, models)]))
        };

        Self { embedded, links, page: metadata }
    }

    pub fn with(mut self, rel: &str, link: Link) -> Self {
        self.links.add(rel, link);
        self
    }
}

/// Builds page links that keep the caller's size and sort parameters.
pub struct PageLinks {
    pub base: String,
    pub size: u32,
    pub sort: Vec<String>,
}

impl PageLinks {
    pub fn page_link(&self, page: u32) -> Link {
        let mut href = format!("{}?page={}&size={}", self.base, page, self.size);
        for sort in &self.sort {
            href.push_str("&sort=");
            href.push_str(sort);
        }
        Link { href }
    }
}

/// HAL body: JSON with the `application/hal+json` content type.
pub struct Hal<T>(pub StatusCode, pub T);

impl<T: Serialize> IntoResponse for Hal<T> {
    fn into_response(self) -> Response {
        (self.0, [(header::CONTENT_TYPE, HAL_JSON)], Json(self.1)).into_response()
    }
}

/// Absolute URL prefix of the current request, taken from `Host` and
/// `X-Forwarded-Proto`.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base: String,
}

impl LinkBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self { base: base.trim_end_matches('/').to_string() }
    }

    pub fn href(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn link(&self, path: &str) -> Link {
        Link { href: self.href(path) }
    }
}

impl<S> FromRequestParts<S> for LinkBuilder
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let host = parts.headers.get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());

        let scheme = parts.headers.get("X-Forwarded-Proto")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.scheme_str().map(str::to_string))
            .unwrap_or_else(|| "http".to_string());

        Ok(LinkBuilder::new(format!("{}://{}", scheme, host)))
    }
}
