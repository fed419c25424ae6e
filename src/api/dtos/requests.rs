use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::domain::models::{errors::Errors, event::EventDetails};
use crate::domain::ports::{EventSortKey, PageRequest, SortOrder};
use crate::error::AppError;

pub const EVENT_DTO: &str = "eventDto";

/// Request body for creating or replacing an event. Unknown properties such
/// as `id`, `free` or `eventStatus` are rejected.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub begin_enrollment_date_time: Option<NaiveDateTime>,
    pub close_enrollment_date_time: Option<NaiveDateTime>,
    pub begin_event_date_time: Option<NaiveDateTime>,
    pub end_event_date_time: Option<NaiveDateTime>,
    pub location: Option<String>,
    #[serde(default)]
    pub base_price: i32,
    #[serde(default)]
    pub max_price: i32,
    #[serde(default)]
    pub limit_of_enrollment: i32,
}

impl EventDto {
    /// Field-level checks. Returns the details only when every constraint
    /// holds; otherwise the violations are recorded in `errors`.
    pub fn into_details(self, errors: &mut Errors) -> Option<EventDetails> {
        let name = not_empty(errors, "name", self.name);
        let description = not_empty(errors, "description", self.description);
        let begin_enrollment_date_time = not_null(errors, "beginEnrollmentDateTime", self.begin_enrollment_date_time);
        let close_enrollment_date_time = not_null(errors, "closeEnrollmentDateTime", self.close_enrollment_date_time);
        let begin_event_date_time = not_null(errors, "beginEventDateTime", self.begin_event_date_time);
        let end_event_date_time = not_null(errors, "endEventDateTime", self.end_event_date_time);
        min_zero(errors, "basePrice", self.base_price);
        min_zero(errors, "maxPrice", self.max_price);
        min_zero(errors, "limitOfEnrollment", self.limit_of_enrollment);

        if errors.has_errors() {
            return None;
        }

        Some(EventDetails {
            name: name?,
            description: description?,
            begin_enrollment_date_time: begin_enrollment_date_time?,
            close_enrollment_date_time: close_enrollment_date_time?,
            begin_event_date_time: begin_event_date_time?,
            end_event_date_time: end_event_date_time?,
            location: self.location,
            base_price: self.base_price,
            max_price: self.max_price,
            limit_of_enrollment: self.limit_of_enrollment,
        })
    }
}

fn not_empty(errors: &mut Errors, field: &str, value: Option<String>) -> Option<String> {
    match value {
        Some(v) if !v.is_empty() => Some(v),
        other => {
            errors.reject_value(field, "NotEmpty", "must not be empty", other.map(Value::String));
            None
        }
    }
}

fn not_null<T>(errors: &mut Errors, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.reject_value(field, "NotNull", "must not be null", None);
    }
    value
}

fn min_zero(errors: &mut Errors, field: &str, value: i32) {
    if value < 0 {
        errors.reject_value(field, "Min", "must be greater than or equal to 0", Some(Value::from(value)));
    }
}

/// `grant_type`-dispatched token request (form encoded).
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub grant_type: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub refresh_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Parsed `page`, `size` and repeatable `sort=property[,asc|desc]` query
/// parameters.
#[derive(Debug)]
pub struct PageParams {
    pub request: PageRequest,
}

impl PageParams {
    pub fn parse(query: &[(String, String)]) -> Result<Self, AppError> {
        let mut page = 0;
        let mut size = DEFAULT_PAGE_SIZE;
        let mut sort = Vec::new();

        for (key, value) in query {
            match key.as_str() {
                "page" => page = value.parse().unwrap_or(0),
                "size" => {
                    size = match value.parse::<u32>() {
                        Ok(0) | Err(_) => DEFAULT_PAGE_SIZE,
                        Ok(s) => s.min(MAX_PAGE_SIZE),
                    }
                }
                "sort" => {
                    if let Some(order) = parse_sort(value)? {
                        sort.push(order);
                    }
                }
                _ => {}
            }
        }

        Ok(Self {
            request: PageRequest { page, size, sort },
        })
    }
}

fn parse_sort(value: &str) -> Result<Option<SortOrder>, AppError> {
    let mut parts = value.split(',').map(str::trim).filter(|p| !p.is_empty());
    let Some(property) = parts.next() else {
        return Ok(None);
    };

    let key = EventSortKey::from_property(property)
        .ok_or_else(|| AppError::BadRequest(format!("No property '{}' found for type 'Event'", property)))?;

    let descending = match parts.next() {
        None => false,
        Some(d) if d.eq_ignore_ascii_case("asc") => false,
        Some(d) if d.eq_ignore_ascii_case("desc") => true,
        Some(d) => return Err(AppError::BadRequest(format!("Invalid sort direction '{}'", d))),
    };

    Ok(Some(SortOrder { key, descending }))
}
