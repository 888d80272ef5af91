//! HTTP contract tests for the REST backend

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use std::sync::Arc;
use std::time::Duration;
use venueflow::Dashboard;
use venueflow::gateway::{BookingBackend, GatewayError, RestBackend};
use venueflow::types::{BookingId, BookingStatus, Connectivity, NewBooking, NewUser, Role, UserId, minute_time};
use venueflow_testing::test_clock;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn booking_json(id: serde_json::Value, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "userId": "user01",
        "venueId": "auditorium",
        "bookingDateTime": "2025-11-15T14:30",
        "endTime": "2025-11-15T16:30",
        "details": { "seating": "VIP" },
        "status": status,
        "bookedBy": "Alex"
    })
}

#[tokio::test]
async fn fetch_bookings_reads_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            booking_json(serde_json::json!(1), "confirmed"),
            booking_json(serde_json::json!("a7"), "pending"),
        ])))
        .mount(&server)
        .await;

    let bookings = RestBackend::new(server.uri()).fetch_bookings().await.unwrap();

    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0].id, BookingId::new("1"));
    assert_eq!(bookings[1].status, BookingStatus::Pending);
}

#[tokio::test]
async fn rows_without_end_time_keep_the_dashboard_online() {
    let server = MockServer::start().await;
    let mut open_ended = booking_json(serde_json::json!(6), "pending");
    open_ended.as_object_mut().unwrap().remove("endTime");
    Mock::given(method("GET"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            booking_json(serde_json::json!(5), "confirmed"),
            open_ended,
        ])))
        .mount(&server)
        .await;
    let dashboard = Dashboard::with_clock(
        Arc::new(RestBackend::new(server.uri())),
        Arc::new(test_clock()),
        Duration::from_secs(5),
    );

    let connectivity = dashboard.refresh().await.unwrap();

    assert_eq!(connectivity, Connectivity::Online);
    let bookings = dashboard.bookings().await;
    let ids: Vec<&str> = bookings.iter().map(|booking| booking.id.as_str()).collect();
    assert_eq!(ids, ["5", "6"]);
    assert!(bookings[0].end_time.is_some());
    assert_eq!(bookings[1].end_time, None);
}

#[tokio::test]
async fn users_are_looked_up_by_email_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("email", "alex@venueflow.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": "user01",
            "email": "alex@venueflow.com",
            "password": "userpassword",
            "name": "Alex",
            "role": "user"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let users = RestBackend::new(server.uri())
        .find_users_by_email("alex@venueflow.com")
        .await
        .unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role, Role::User);
}

#[tokio::test]
async fn create_user_posts_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(serde_json::json!({
            "email": "sam@venueflow.com",
            "password": "pw",
            "name": "Sam",
            "role": "user"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 3,
            "email": "sam@venueflow.com",
            "password": "pw",
            "name": "Sam",
            "role": "user"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = RestBackend::new(server.uri())
        .create_user(NewUser {
            email: "sam@venueflow.com".to_string(),
            password: "pw".to_string(),
            name: "Sam".to_string(),
            role: Role::User,
        })
        .await
        .unwrap();

    assert_eq!(user.id, UserId::new("3"));
}

#[tokio::test]
async fn create_booking_forces_pending_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bookings"))
        .and(body_json(serde_json::json!({
            "userId": "user01",
            "venueId": "auditorium",
            "bookingDateTime": "2025-11-15T14:30",
            "endTime": "2025-11-15T16:30",
            "details": { "seating": "VIP" },
            "status": "pending",
            "bookedBy": "Alex"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(booking_json(serde_json::json!(5), "pending")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let booking = RestBackend::new(server.uri())
        .create_booking(NewBooking {
            user_id: UserId::new("user01"),
            venue_id: "auditorium".to_string(),
            booking_date_time: minute_time::parse("2025-11-15T14:30").unwrap(),
            end_time: minute_time::parse("2025-11-15T16:30").unwrap(),
            details: [("seating".to_string(), "VIP".to_string())].into_iter().collect(),
            status: BookingStatus::Confirmed,
            booked_by: "Alex".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(booking.id, BookingId::new("5"));
}

#[tokio::test]
async fn status_update_patches_and_delete_removes() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/bookings/5"))
        .and(body_json(serde_json::json!({ "status": "confirmed" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(booking_json(serde_json::json!(5), "confirmed")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/bookings/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = RestBackend::new(server.uri());
    let id = BookingId::new("5");

    let updated = backend
        .update_booking_status(&id, BookingStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(updated.status, BookingStatus::Confirmed);

    backend.delete_booking(&id).await.unwrap();
}

#[tokio::test]
async fn failures_map_to_gateway_errors() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let backend = RestBackend::new(server.uri());

    assert_eq!(
        backend.delete_booking(&BookingId::new("9")).await,
        Err(GatewayError::Status {
            status: 404,
            message: "Not Found".to_string()
        })
    );
    assert!(matches!(
        backend.fetch_bookings().await,
        Err(GatewayError::Decode(_))
    ));

    let offline = RestBackend::new("http://127.0.0.1:1");
    assert!(matches!(
        offline.fetch_bookings().await,
        Err(GatewayError::Unreachable(_))
    ));
}
