mod common;

use axum::http::{header, StatusCode};
use common::{event_payload, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_create_event() {
    let app = TestApp::new().await;
    let (account, token) = app.authenticated().await;

    let response = app.post_event(Some(&token), &event_payload()).await;

    assert_eq!(response.status, StatusCode::CREATED, "body: {}", response.body);
    let id = response.body["id"].as_i64().expect("id missing");

    let location = response.headers.get(header::LOCATION).unwrap().to_str().unwrap();
    assert_eq!(location, format!("http://localhost/api/events/{}", id));
    assert_eq!(response.headers.get(header::CONTENT_TYPE).unwrap(), "application/hal+json");

    let body = &response.body;
    assert_eq!(body["free"], false);
    assert_eq!(body["offline"], true);
    assert_eq!(body["eventStatus"], "DRAFT");
    assert_eq!(body["manager"]["id"], account.id);
    assert_eq!(body["_links"]["self"]["href"], location);
    assert_eq!(body["_links"]["query-events"]["href"], "http://localhost/api/events");
    assert_eq!(body["_links"]["update-event"]["href"], location);
    assert_eq!(body["_links"]["profile"]["href"], "http://localhost/docs/index.html#resources-events-create");
}

#[tokio::test]
async fn test_create_free_online_event() {
    let app = TestApp::new().await;
    let (_, token) = app.authenticated().await;

    let mut payload = event_payload();
    payload["basePrice"] = json!(0);
    payload["maxPrice"] = json!(0);
    payload.as_object_mut().unwrap().remove("location");

    let response = app.post_event(Some(&token), &payload).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["free"], true);
    assert_eq!(response.body["offline"], false);
}

#[tokio::test]
async fn test_create_event_with_unknown_properties() {
    let app = TestApp::new().await;
    let (_, token) = app.authenticated().await;

    let mut payload = event_payload();
    payload["id"] = json!(100);
    payload["free"] = json!(true);
    payload["offline"] = json!(false);
    payload["eventStatus"] = json!("PUBLISHED");

    let response = app.post_event(Some(&token), &payload).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_event_empty_input() {
    let app = TestApp::new().await;
    let (_, token) = app.authenticated().await;

    let response = app.post_event(Some(&token), &json!({})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let errors = response.body["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e["field"] == "name" && e["code"] == "NotEmpty"));
    assert!(errors.iter().any(|e| e["field"] == "beginEventDateTime" && e["code"] == "NotNull"));
    assert_eq!(response.body["_links"]["index"]["href"], "http://localhost/api");
}

#[tokio::test]
async fn test_create_event_wrong_input() {
    let app = TestApp::new().await;
    let (_, token) = app.authenticated().await;

    let mut payload = event_payload();
    payload["basePrice"] = json!(10000);
    payload["maxPrice"] = json!(200);
    payload["endEventDateTime"] = payload["beginEnrollmentDateTime"].clone();

    let response = app.post_event(Some(&token), &payload).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let first = &response.body["errors"][0];
    assert_eq!(first["objectName"], "eventDto");
    assert_eq!(first["code"], "wrongValue");
    assert!(first["defaultMessage"].is_string());
    assert_eq!(response.body["_links"]["index"]["href"], "http://localhost/api");

    let fields: Vec<_> = response.body["errors"].as_array().unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap_or_default().to_string())
        .collect();
    assert!(fields.contains(&"basePrice".to_string()));
    assert!(fields.contains(&"endEventDateTime".to_string()));
}

#[tokio::test]
async fn test_create_event_requires_authentication() {
    let app = TestApp::new().await;

    let response = app.post_event(None, &event_payload()).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.post_event(Some("not-a-token"), &event_payload()).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_query_events() {
    let app = TestApp::new().await;
    let (_, token) = app.authenticated().await;
    for i in 0..30 {
        app.generate_event(&token, i).await;
    }

    let response = app.get("/api/events?page=1&size=10&sort=name,DESC", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = &response.body;
    let list = body["_embedded"]["eventList"].as_array().unwrap();
    assert_eq!(list.len(), 10);
    assert!(list[0]["_links"]["self"]["href"].is_string());

    assert_eq!(body["page"]["size"], 10);
    assert_eq!(body["page"]["totalElements"], 30);
    assert_eq!(body["page"]["totalPages"], 3);
    assert_eq!(body["page"]["number"], 1);

    for rel in ["first", "prev", "self", "next", "last", "profile"] {
        assert!(body["_links"][rel]["href"].is_string(), "missing {}", rel);
    }
    assert_eq!(body["_links"]["next"]["href"], "http://localhost/api/events?page=2&size=10&sort=name,DESC");
    assert!(body["_links"].get("create-event").is_none());
}

#[tokio::test]
async fn test_query_events_sorted_by_name_desc() {
    let app = TestApp::new().await;
    let (_, token) = app.authenticated().await;
    for i in 0..3 {
        app.generate_event(&token, i).await;
    }

    let response = app.get("/api/events?sort=name,DESC", None).await;

    let names: Vec<_> = response.body["_embedded"]["eventList"].as_array().unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["event 2", "event 1", "event 0"]);
}

#[tokio::test]
async fn test_query_events_with_authentication() {
    let app = TestApp::new().await;
    let (_, token) = app.authenticated().await;
    for i in 0..30 {
        app.generate_event(&token, i).await;
    }

    let response = app.get("/api/events?page=1&size=10&sort=name,DESC", Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["_links"]["create-event"]["href"], "http://localhost/api/events");
}

#[tokio::test]
async fn test_query_events_empty() {
    let app = TestApp::new().await;

    let response = app.get("/api/events", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.get("_embedded").is_none());
    assert_eq!(response.body["page"]["totalElements"], 0);
    assert_eq!(response.body["page"]["size"], 20);
}

#[tokio::test]
async fn test_query_events_links_use_canonical_sort() {
    let app = TestApp::new().await;

    let response = app.get("/api/events?sort=name,%20desc&sort=basePrice", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["_links"]["self"]["href"],
        "http://localhost/api/events?page=0&size=20&sort=name,DESC&sort=basePrice,ASC"
    );
}

#[tokio::test]
async fn test_query_events_unknown_sort_property() {
    let app = TestApp::new().await;

    let response = app.get("/api/events?sort=password,asc", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_event() {
    let app = TestApp::new().await;
    let (_, token) = app.authenticated().await;
    let id = app.generate_event(&token, 100).await;

    let response = app.get(&format!("/api/events/{}", id), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "event 100");
    assert_eq!(response.body["id"], id);
    assert!(response.body["_links"]["self"]["href"].is_string());
    assert_eq!(response.body["_links"]["profile"]["href"], "http://localhost/docs/index.html#resources-events-get");
    assert!(response.body["_links"].get("update-event").is_none());
}

#[tokio::test]
async fn test_get_event_as_manager_has_update_link() {
    let app = TestApp::new().await;
    let (_, token) = app.authenticated().await;
    let (_, other_token) = app.authenticated().await;
    let id = app.generate_event(&token, 1).await;

    let response = app.get(&format!("/api/events/{}", id), Some(&token)).await;
    assert_eq!(response.body["_links"]["update-event"]["href"], format!("http://localhost/api/events/{}", id));

    let response = app.get(&format!("/api/events/{}", id), Some(&other_token)).await;
    assert!(response.body["_links"].get("update-event").is_none());
}

#[tokio::test]
async fn test_get_missing_event() {
    let app = TestApp::new().await;

    let response = app.get("/api/events/11883", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_event() {
    let app = TestApp::new().await;
    let (account, token) = app.authenticated().await;
    let id = app.generate_event(&token, 200).await;

    let mut payload = event_payload();
    payload["name"] = json!("Updated Event");
    payload["basePrice"] = json!(0);
    payload["maxPrice"] = json!(0);

    let response = app.put_event(Some(&token), id, &payload).await;

    assert_eq!(response.status, StatusCode::OK, "body: {}", response.body);
    assert_eq!(response.body["name"], "Updated Event");
    assert_eq!(response.body["free"], true);
    assert_eq!(response.body["manager"]["id"], account.id);
    assert!(response.body["_links"]["self"]["href"].is_string());
    assert_eq!(response.body["_links"]["profile"]["href"], "http://localhost/docs/index.html#resources-events-update");

    let fetched = app.get(&format!("/api/events/{}", id), None).await;
    assert_eq!(fetched.body["name"], "Updated Event");
}

#[tokio::test]
async fn test_update_event_empty_input() {
    let app = TestApp::new().await;
    let (_, token) = app.authenticated().await;
    let id = app.generate_event(&token, 200).await;

    let response = app.put_event(Some(&token), id, &json!({})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_event_wrong_input() {
    let app = TestApp::new().await;
    let (_, token) = app.authenticated().await;
    let id = app.generate_event(&token, 200).await;

    let mut payload = event_payload();
    payload["basePrice"] = json!(20000);
    payload["maxPrice"] = json!(1000);

    let response = app.put_event(Some(&token), id, &payload).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["code"], "wrongValue");
}

#[tokio::test]
async fn test_update_missing_event() {
    let app = TestApp::new().await;
    let (_, token) = app.authenticated().await;

    let response = app.put_event(Some(&token), 123345, &event_payload()).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_event_by_other_account() {
    let app = TestApp::new().await;
    let (_, token) = app.authenticated().await;
    let (_, other_token) = app.authenticated().await;
    let id = app.generate_event(&token, 1).await;

    let response = app.put_event(Some(&other_token), id, &event_payload()).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.put_event(None, id, &event_payload()).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let fetched = app.get(&format!("/api/events/{}", id), None).await;
    assert_eq!(fetched.body["name"], "event 1");
}
