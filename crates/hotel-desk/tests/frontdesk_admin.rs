mod common;

use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use common::{user_json, MockApi};
use hotel_desk::admin::{self, AuditLogFilter};
use hotel_desk::api::schema::PermissionLevel;
use hotel_desk::frontdesk::{self, NewBookingForm, NewPaymentForm, NewRoomForm};
use hotel_desk::intent::{DeskError, ValidationError};
use rust_decimal::Decimal;
use serde_json::{json, Value};

fn booking_json(id: i64, number: &str, status: &str) -> Value {
    json!({
        "id": id,
        "booking_number": number,
        "guest": { "id": 5, "name": "Ada", "surname": "Lovelace" },
        "room_id": 12,
        "check_in": "2024-06-10",
        "check_out": "2024-06-13",
        "number_of_nights": 3,
        "total_price": "387.00",
        "status": status
    })
}

async fn me() -> Json<Value> {
    Json(user_json(1, "admin", "ADMIN"))
}

async fn bookings() -> Json<Value> {
    Json(json!([
        booking_json(1, "BK-0001", "confirmed"),
        booking_json(2, "BK-0002", "cancelled"),
        booking_json(3, "BK-0003", "checked_in")
    ]))
}

async fn create_booking(Json(body): Json<Value>) -> Json<Value> {
    let mut booking = booking_json(4, "BK-0004", "confirmed");
    booking["room_id"] = body["room_id"].clone();
    booking["check_in"] = body["check_in"].clone();
    booking["check_out"] = body["check_out"].clone();
    Json(booking)
}

async fn create_room(Json(body): Json<Value>) -> Json<Value> {
    let mut room = body;
    room["id"] = json!(31);
    Json(room)
}

async fn create_payment(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "id": 9,
        "booking_id": body["booking_id"],
        "amount": body["amount"],
        "currency": body["currency"],
        "method": body["method"],
        "status": "completed"
    }))
}

async fn invoice(Path(booking_id): Path<i64>) -> Json<Value> {
    Json(json!({
        "id": 77,
        "booking_id": booking_id,
        "invoice_number": "INV-2024-0001",
        "subtotal": "350.00",
        "tax": "37.00",
        "total": "387.00"
    }))
}

async fn invoice_pdf(Path(_id): Path<i64>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/pdf")], b"%PDF-1.4 invoice".to_vec())
}

async fn audit_logs(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let page: u32 = query
        .get("page")
        .and_then(|page| page.parse().ok())
        .unwrap_or(1);
    let window = format!(
        "{}|{}|{}",
        query.get("page_size").map(String::as_str).unwrap_or(""),
        query.get("date_from").map(String::as_str).unwrap_or(""),
        query.get("date_to").map(String::as_str).unwrap_or("")
    );
    Json(json!({
        "items": [{
            "id": 1,
            "user_id": null,
            "username": null,
            "action": query.get("action").cloned().unwrap_or_else(|| "UPDATE".to_string()),
            "entity_type": "booking",
            "entity_id": 4,
            "description": window,
            "ip_address": "10.0.0.8",
            "created_at": "2024-03-02T10:00:00"
        }],
        "total": 51,
        "page": page,
        "page_size": 50,
        "total_pages": 2
    }))
}

async fn update_user(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    let level = body["permission_level"].as_str().unwrap_or("REGULAR");
    Json(user_json(id, "clerk", level))
}

async fn mock_api() -> MockApi {
    let router = Router::new()
        .route("/users/me", get(me))
        .route("/users/:id", patch(update_user))
        .route("/bookings/", get(bookings).post(create_booking))
        .route("/rooms/", post(create_room))
        .route("/payments/create", post(create_payment))
        .route("/invoices/:id", post(invoice))
        .route("/invoices/:id/pdf", get(invoice_pdf))
        .route("/audit-logs/", get(audit_logs));
    MockApi::spawn(router).await
}

fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
}

#[tokio::test]
async fn cancelled_bookings_are_hidden() {
    let api = mock_api().await;
    let (mut session, _store) = api.session(Some("token"));

    let outcome = frontdesk::list_bookings(&mut session)
        .await
        .expect("bookings load");
    let numbers: Vec<&str> = outcome
        .data
        .iter()
        .map(|booking| booking.booking_number.as_str())
        .collect();
    assert_eq!(numbers, vec!["BK-0001", "BK-0003"]);
    assert_eq!(outcome.data[0].total_price.to_string(), "387.00");
}

#[tokio::test]
async fn booking_form_is_checked_before_sending() {
    let api = mock_api().await;
    let (mut session, _store) = api.session(Some("token"));

    let form = NewBookingForm {
        guest_id: Some(5),
        room_id: Some(12),
        check_in: Some(day("2024-06-13")),
        check_out: Some(day("2024-06-10")),
    };
    let err = frontdesk::create_booking(&mut session, &form)
        .await
        .expect_err("reversed stay");
    assert!(matches!(
        err,
        DeskError::Validation(ValidationError::StayOrder)
    ));
    assert!(api.log.entries().is_empty());

    let form = NewBookingForm {
        check_in: Some(day("2024-06-10")),
        check_out: Some(day("2024-06-13")),
        ..form
    };
    let outcome = frontdesk::create_booking(&mut session, &form)
        .await
        .expect("booking created");
    assert_eq!(outcome.data.booking_number, "BK-0004");
    assert_eq!(outcome.status.text, "Reservation created successfully");
}

#[tokio::test]
async fn rooms_and_payments_round_trip_through_the_api() {
    let api = mock_api().await;
    let (mut session, _store) = api.session(Some("token"));

    let room = frontdesk::create_room(
        &mut session,
        &NewRoomForm {
            number: "305".to_string(),
            room_type_id: Some(2),
            price_per_night: Some(Decimal::new(1495, 1)),
            square_meters: Some(30),
            floor: Some(3),
        },
    )
    .await
    .expect("room created");
    assert_eq!(room.data.id, 31);
    assert_eq!(room.data.price_per_night.to_string(), "149.5");
    assert_eq!(room.status.text, "Room added successfully");

    let payment = frontdesk::create_payment(
        &mut session,
        &NewPaymentForm {
            booking_id: Some(4),
            amount: Some(Decimal::from(120)),
            currency: None,
            method: None,
        },
    )
    .await
    .expect("payment created");
    assert_eq!(payment.data.amount, Decimal::from(120));
    assert_eq!(payment.data.currency, "USD");
    assert_eq!(payment.data.method, "card");
    assert_eq!(payment.status.text, "Payment created");
}

#[tokio::test]
async fn invoices_generate_and_download() {
    let api = mock_api().await;
    let (mut session, _store) = api.session(Some("token"));

    let outcome = frontdesk::generate_invoice(&mut session, 4)
        .await
        .expect("invoice generated");
    assert_eq!(outcome.status.text, "Invoice INV-2024-0001 generated");
    assert!(api.log.contains("POST /invoices/4"));

    let pdf = frontdesk::invoice_pdf(&mut session, outcome.data.id)
        .await
        .expect("pdf downloads");
    assert!(pdf.starts_with(b"%PDF"));
    assert!(api.log.contains("GET /invoices/77/pdf"));
}

#[tokio::test]
async fn audit_log_query_covers_whole_days() {
    let api = mock_api().await;
    let (mut session, _store) = api.session(Some("token"));
    let filter = AuditLogFilter {
        action: Some("LOGIN_FAILED".to_string()),
        entity_type: None,
        date_from: Some(day("2024-03-01")),
        date_to: Some(day("2024-03-31")),
    };

    let outcome = admin::load_audit_logs(&mut session, &filter, 2)
        .await
        .expect("audit logs load");
    assert_eq!(outcome.status.text, "Audit logs loaded successfully");

    let page = outcome.data;
    assert_eq!(page.page, 2);
    assert!(page.has_previous);
    assert!(!page.has_next);

    let row = &page.rows[0];
    assert_eq!(row.user, "SYSTEM");
    assert_eq!(row.action, "LOGIN_FAILED");
    assert_eq!(row.description, "50|2024-03-01T00:00:00|2024-03-31T23:59:59");
}

#[tokio::test]
async fn permission_cycles_to_the_next_level() {
    let api = mock_api().await;
    let (mut session, _store) = api.session(Some("token"));

    let outcome = admin::cycle_permission(&mut session, 2, PermissionLevel::Manager)
        .await
        .expect("permission updated");
    assert_eq!(outcome.data.permission_level, PermissionLevel::Admin);
    assert_eq!(outcome.status.text, "Permission updated successfully");
    assert!(api.log.contains("PATCH /users/2"));
}
