use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::models::{
    account::Account,
    auth::RefreshTokenRecord,
    event::Event,
};
use crate::error::AppError;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persists the account and its roles. `account.id` is ignored.
    async fn create(&self, account: &Account) -> Result<Account, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, AppError>;
}

/// Column a page of events may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSortKey {
    Id,
    Name,
    BasePrice,
    MaxPrice,
    LimitOfEnrollment,
    BeginEnrollmentDateTime,
    CloseEnrollmentDateTime,
    BeginEventDateTime,
    EndEventDateTime,
    EventStatus,
}

impl EventSortKey {
    pub fn from_property(property: &str) -> Option<Self> {
        Some(match property {
            "id" => EventSortKey::Id,
            "name" => EventSortKey::Name,
            "basePrice" => EventSortKey::BasePrice,
            "maxPrice" => EventSortKey::MaxPrice,
            "limitOfEnrollment" => EventSortKey::LimitOfEnrollment,
            "beginEnrollmentDateTime" => EventSortKey::BeginEnrollmentDateTime,
            "closeEnrollmentDateTime" => EventSortKey::CloseEnrollmentDateTime,
            "beginEventDateTime" => EventSortKey::BeginEventDateTime,
            "endEventDateTime" => EventSortKey::EndEventDateTime,
            "eventStatus" => EventSortKey::EventStatus,
            _ => return None,
        })
    }

    pub fn property(&self) -> &'static str {
        match self {
            EventSortKey::Id => "id",
            EventSortKey::Name => "name",
            EventSortKey::BasePrice => "basePrice",
            EventSortKey::MaxPrice => "maxPrice",
            EventSortKey::LimitOfEnrollment => "limitOfEnrollment",
            EventSortKey::BeginEnrollmentDateTime => "beginEnrollmentDateTime",
            EventSortKey::CloseEnrollmentDateTime => "closeEnrollmentDateTime",
            EventSortKey::BeginEventDateTime => "beginEventDateTime",
            EventSortKey::EndEventDateTime => "endEventDateTime",
            EventSortKey::EventStatus => "eventStatus",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            EventSortKey::Id => "id",
            EventSortKey::Name => "name",
            EventSortKey::BasePrice => "base_price",
            EventSortKey::MaxPrice => "max_price",
            EventSortKey::LimitOfEnrollment => "limit_of_enrollment",
            EventSortKey::BeginEnrollmentDateTime => "begin_enrollment_date_time",
            EventSortKey::CloseEnrollmentDateTime => "close_enrollment_date_time",
            EventSortKey::BeginEventDateTime => "begin_event_date_time",
            EventSortKey::EndEventDateTime => "end_event_date_time",
            EventSortKey::EventStatus => "event_status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub key: EventSortKey,
    pub descending: bool,
}

impl SortOrder {
    fn direction(&self) -> &'static str {
        if self.descending { "DESC" } else { "ASC" }
    }

    /// Canonical `property,DIR` form, safe to put back into a query string.
    pub fn to_param(&self) -> String {
        format!("{},{}", self.key.property(), self.direction())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// `ORDER BY` clause built only from whitelisted columns, with `id` as
    /// the final tie breaker so paging is stable.
    pub fn order_by_clause(&self) -> String {
        let mut parts: Vec<String> = self.sort.iter()
            .map(|o| format!("{} {}", o.key.column(), o.direction()))
            .collect();
        if !self.sort.iter().any(|o| o.key == EventSortKey::Id) {
            parts.push("id ASC".to_string());
        }
        parts.join(", ")
    }
}

#[derive(Debug)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        if self.size == 0 {
            return 1;
        }
        let size = i64::from(self.size);
        (self.total_elements + size - 1) / size
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    pub fn has_next(&self) -> bool {
        i64::from(self.number) + 1 < self.total_pages()
    }
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError>;
    async fn find_page(&self, request: &PageRequest) -> Result<Page<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    /// Deletes the token and returns it. `None` when it was already gone,
    /// so at most one caller can redeem a given token.
    async fn consume_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}
