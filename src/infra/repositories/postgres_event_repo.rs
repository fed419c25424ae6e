use crate::domain::{
    models::event::Event,
    ports::{EventRepository, Page, PageRequest},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                name, description,
                begin_enrollment_date_time, close_enrollment_date_time,
                begin_event_date_time, end_event_date_time,
                location, base_price, max_price, limit_of_enrollment,
                offline, free, event_status, manager_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *"#
        )
            .bind(&event.name)
            .bind(&event.description)
            .bind(event.begin_enrollment_date_time)
            .bind(event.close_enrollment_date_time)
            .bind(event.begin_event_date_time)
            .bind(event.end_event_date_time)
            .bind(&event.location)
            .bind(event.base_price)
            .bind(event.max_price)
            .bind(event.limit_of_enrollment)
            .bind(event.offline)
            .bind(event.free)
            .bind(event.event_status.as_str())
            .bind(event.manager_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Event>, AppError> {
        let (total_elements,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let sql = format!("SELECT * FROM events ORDER BY {} LIMIT $1 OFFSET $2", request.order_by_clause());
        let content = sqlx::query_as::<_, Event>(&sql)
            .bind(i64::from(request.size))
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(Page {
            content,
            number: request.page,
            size: request.size,
            total_elements,
        })
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                name=$1, description=$2,
                begin_enrollment_date_time=$3, close_enrollment_date_time=$4,
                begin_event_date_time=$5, end_event_date_time=$6,
                location=$7, base_price=$8, max_price=$9, limit_of_enrollment=$10,
                offline=$11, free=$12, event_status=$13, manager_id=$14
               WHERE id=$15 RETURNING *"#
        )
            .bind(&event.name)
            .bind(&event.description)
            .bind(event.begin_enrollment_date_time)
            .bind(event.close_enrollment_date_time)
            .bind(event.begin_event_date_time)
            .bind(event.end_event_date_time)
            .bind(&event.location)
            .bind(event.base_price)
            .bind(event.max_price)
            .bind(event.limit_of_enrollment)
            .bind(event.offline)
            .bind(event.free)
            .bind(event.event_status.as_str())
            .bind(event.manager_id)
            .bind(event.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))
    }
}
