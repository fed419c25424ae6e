use serde::{Deserialize, Serialize, Serializer};
use chrono::NaiveDateTime;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Draft,
    Published,
    BeganEnrollment,
    ClosedEnrollment,
    Started,
    Ended,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "DRAFT",
            EventStatus::Published => "PUBLISHED",
            EventStatus::BeganEnrollment => "BEGAN_ENROLLMENT",
            EventStatus::ClosedEnrollment => "CLOSED_ENROLLMENT",
            EventStatus::Started => "STARTED",
            EventStatus::Ended => "ENDED",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown event status: {0}")]
pub struct UnknownEventStatus(String);

impl FromStr for EventStatus {
    type Err = UnknownEventStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(EventStatus::Draft),
            "PUBLISHED" => Ok(EventStatus::Published),
            "BEGAN_ENROLLMENT" => Ok(EventStatus::BeganEnrollment),
            "CLOSED_ENROLLMENT" => Ok(EventStatus::ClosedEnrollment),
            "STARTED" => Ok(EventStatus::Started),
            "ENDED" => Ok(EventStatus::Ended),
            other => Err(UnknownEventStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for EventStatus {
    type Error = UnknownEventStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub begin_enrollment_date_time: NaiveDateTime,
    pub close_enrollment_date_time: NaiveDateTime,
    pub begin_event_date_time: NaiveDateTime,
    pub end_event_date_time: NaiveDateTime,
    pub location: Option<String>, // online when absent
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
    pub offline: bool,
    pub free: bool,
    #[sqlx(try_from = "String")]
    pub event_status: EventStatus,
    #[serde(
        rename = "manager",
        serialize_with = "serialize_manager",
        skip_serializing_if = "Option::is_none",
        skip_deserializing
    )]
    pub manager_id: Option<i64>,
}

// Only the manager's id leaves the service; the account itself stays private.
fn serialize_manager<S: Serializer>(manager_id: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct ManagerRef {
        id: i64,
    }

    match manager_id {
        Some(id) => ManagerRef { id: *id }.serialize(serializer),
        None => serializer.serialize_none(),
    }
}

/// Validated, caller-supplied part of an event. Derived flags, status and
/// manager are owned by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetails {
    pub name: String,
    pub description: String,
    pub begin_enrollment_date_time: NaiveDateTime,
    pub close_enrollment_date_time: NaiveDateTime,
    pub begin_event_date_time: NaiveDateTime,
    pub end_event_date_time: NaiveDateTime,
    pub location: Option<String>,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
}

impl Event {
    /// Recomputes the derived `free` and `offline` flags.
    pub fn update(&mut self) {
        self.free = self.base_price == 0 && self.max_price == 0;
        self.offline = self.location.as_deref().is_some_and(|l| !l.trim().is_empty());
    }

    pub fn from_details(details: EventDetails, manager_id: i64) -> Self {
        let mut event = Event { manager_id: Some(manager_id), ..Default::default() };
        event.apply(details);
        event
    }

    /// Overwrites every caller-supplied field and recomputes derived flags.
    pub fn apply(&mut self, details: EventDetails) {
        self.name = details.name;
        self.description = details.description;
        self.begin_enrollment_date_time = details.begin_enrollment_date_time;
        self.close_enrollment_date_time = details.close_enrollment_date_time;
        self.begin_event_date_time = details.begin_event_date_time;
        self.end_event_date_time = details.end_event_date_time;
        self.location = details.location;
        self.base_price = details.base_price;
        self.max_price = details.max_price;
        self.limit_of_enrollment = details.limit_of_enrollment;
        self.update();
    }

    pub fn is_managed_by(&self, account_id: i64) -> bool {
        self.manager_id == Some(account_id)
    }
}
