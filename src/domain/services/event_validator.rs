use serde_json::json;
use crate::domain::models::{errors::Errors, event::EventDetails};

pub const WRONG_VALUE: &str = "wrongValue";

/// Cross-field checks that only make sense once every field is present.
#[derive(Default)]
pub struct EventValidator;

impl EventValidator {
    pub fn validate(&self, event: &EventDetails, errors: &mut Errors) {
        if event.base_price > event.max_price && event.max_price > 0 {
            errors.reject_value("basePrice", WRONG_VALUE, "base price is wrong.", Some(json!(event.base_price)));
            errors.reject_value("maxPrice", WRONG_VALUE, "max price is wrong.", Some(json!(event.max_price)));
        }

        if event.close_enrollment_date_time < event.begin_enrollment_date_time
            || event.end_event_date_time < event.begin_event_date_time
        {
            errors.reject_value(
                "endEventDateTime",
                WRONG_VALUE,
                "end event date time is wrong.",
                Some(json!(event.end_event_date_time)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn details() -> EventDetails {
        let start = NaiveDate::from_ymd_opt(2024, 11, 23).unwrap().and_hms_opt(14, 21, 0).unwrap();
        EventDetails {
            name: "Spring".into(),
            description: "REST API development".into(),
            begin_enrollment_date_time: start,
            close_enrollment_date_time: start + Duration::days(1),
            begin_event_date_time: start + Duration::days(2),
            end_event_date_time: start + Duration::days(3),
            location: Some("Gangnam D2 startup factory".into()),
            base_price: 100,
            max_price: 200,
            limit_of_enrollment: 100,
        }
    }

    fn run(event: &EventDetails) -> Errors {
        let mut errors = Errors::new("eventDto");
        EventValidator.validate(event, &mut errors);
        errors
    }

    #[test]
    fn accepts_consistent_event() {
        assert!(!run(&details()).has_errors());
    }

    #[test]
    fn rejects_base_price_above_max_price() {
        let event = EventDetails { base_price: 300, max_price: 200, ..details() };
        let errors = run(&event);
        assert_eq!(errors.field_errors("basePrice").count(), 1);
        assert_eq!(errors.field_errors("maxPrice").count(), 1);
        assert_eq!(errors.errors()[0].object_name, "eventDto");
        assert_eq!(errors.errors()[0].code, WRONG_VALUE);
    }

    #[test]
    fn unlimited_max_price_allows_any_base_price() {
        let event = EventDetails { base_price: 300, max_price: 0, ..details() };
        assert!(!run(&event).has_errors());
    }

    #[test]
    fn rejects_enrollment_closing_before_it_begins() {
        let base = details();
        let event = EventDetails {
            close_enrollment_date_time: base.begin_enrollment_date_time - Duration::hours(1),
            ..base
        };
        let errors = run(&event);
        assert_eq!(errors.field_errors("endEventDateTime").count(), 1);
    }

    #[test]
    fn rejects_event_ending_before_it_begins() {
        let base = details();
        let event = EventDetails {
            end_event_date_time: base.begin_event_date_time - Duration::days(1),
            ..base
        };
        assert_eq!(run(&event).field_errors("endEventDateTime").count(), 1);
    }
}
