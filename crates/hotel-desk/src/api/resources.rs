use chrono::NaiveDate;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::client::ApiClient;
use super::error::ApiError;
use super::schema::{
    AssignRequest, AuditLog, Booking, CompletionRequest, Credentials, Guest,
    HousekeepingDashboard, HousekeepingTask, Invoice, NewBooking, NewGuest, NewPayment, NewRoom,
    NewTask, NewUser, OccupancyReport, Page, Payment, RevenueReport, Room, RoomStatusGrid,
    RoomType, TaskFilter, TokenResponse, TrendsReport, User, UserPatch, VerificationRequest,
};

#[derive(Serialize)]
struct ReportWindow {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl ApiClient {
    /// Password grant against the token endpoint (form-encoded).
    pub async fn request_token(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let form = [
            ("username", username),
            ("password", password),
            ("grant_type", "password"),
        ];
        self.dispatch(self.request(Method::POST, "/auth/token").form(&form))
            .await
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.send(Method::POST, "/auth/register", credentials).await
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/users/me").await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get("/users/").await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        self.send(Method::POST, "/users/", user).await
    }

    pub async fn update_user(&self, user_id: i64, patch: &UserPatch) -> Result<User, ApiError> {
        self.send(Method::PATCH, &format!("/users/{user_id}"), patch)
            .await
    }

    pub async fn deactivate_user(&self, user_id: i64) -> Result<User, ApiError> {
        self.send_empty(Method::DELETE, &format!("/users/{user_id}"))
            .await
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>, ApiError> {
        self.get("/rooms/").await
    }

    pub async fn create_room(&self, room: &NewRoom) -> Result<Room, ApiError> {
        self.send(Method::POST, "/rooms/", room).await
    }

    pub async fn delete_room(&self, room_id: i64) -> Result<(), ApiError> {
        self.send_empty::<Value>(Method::DELETE, &format!("/rooms/{room_id}"))
            .await
            .map(|_| ())
    }

    pub async fn list_room_types(&self) -> Result<Vec<RoomType>, ApiError> {
        self.get("/room-types/").await
    }

    pub async fn list_guests(&self) -> Result<Vec<Guest>, ApiError> {
        self.get("/guests/").await
    }

    pub async fn create_guest(&self, guest: &NewGuest) -> Result<Guest, ApiError> {
        self.send(Method::POST, "/guests/", guest).await
    }

    pub async fn delete_guest(&self, guest_id: i64) -> Result<(), ApiError> {
        self.send_empty::<Value>(Method::DELETE, &format!("/guests/{guest_id}"))
            .await
            .map(|_| ())
    }

    pub async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.get("/bookings/").await
    }

    pub async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError> {
        self.send(Method::POST, "/bookings/", booking).await
    }

    pub async fn cancel_booking(&self, booking_id: i64) -> Result<Booking, ApiError> {
        self.send_empty(Method::POST, &format!("/bookings/{booking_id}/cancel"))
            .await
    }

    pub async fn list_payments(&self) -> Result<Vec<Payment>, ApiError> {
        self.get("/payments/").await
    }

    pub async fn create_payment(&self, payment: &NewPayment) -> Result<Payment, ApiError> {
        self.send(Method::POST, "/payments/create", payment).await
    }

    pub async fn generate_invoice(&self, booking_id: i64) -> Result<Invoice, ApiError> {
        self.send_empty(Method::POST, &format!("/invoices/{booking_id}"))
            .await
    }

    pub async fn invoice_pdf(&self, invoice_id: i64) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(&format!("/invoices/{invoice_id}/pdf")).await
    }

    pub async fn audit_logs(&self, query: &[(&str, String)]) -> Result<Page<AuditLog>, ApiError> {
        self.get_with_query("/audit-logs/", query).await
    }

    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<HousekeepingTask>, ApiError> {
        self.get_with_query("/housekeeping/tasks/", filter).await
    }

    pub async fn get_task(&self, task_id: i64) -> Result<HousekeepingTask, ApiError> {
        self.get(&format!("/housekeeping/tasks/{task_id}")).await
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<HousekeepingTask, ApiError> {
        self.send(Method::POST, "/housekeeping/tasks/", task).await
    }

    pub async fn assign_task(&self, task_id: i64, request: &AssignRequest) -> Result<HousekeepingTask, ApiError> {
        self.send(
            Method::POST,
            &format!("/housekeeping/tasks/{task_id}/assign"),
            request,
        )
        .await
    }

    pub async fn start_task(&self, task_id: i64) -> Result<HousekeepingTask, ApiError> {
        self.send_empty(Method::POST, &format!("/housekeeping/tasks/{task_id}/start"))
            .await
    }

    pub async fn complete_task(
        &self,
        task_id: i64,
        request: &CompletionRequest,
    ) -> Result<HousekeepingTask, ApiError> {
        self.send(
            Method::POST,
            &format!("/housekeeping/tasks/{task_id}/complete"),
            request,
        )
        .await
    }

    pub async fn verify_task(
        &self,
        task_id: i64,
        request: &VerificationRequest,
    ) -> Result<HousekeepingTask, ApiError> {
        self.send(
            Method::POST,
            &format!("/housekeeping/tasks/{task_id}/verify"),
            request,
        )
        .await
    }

    pub async fn housekeeping_dashboard(&self) -> Result<HousekeepingDashboard, ApiError> {
        self.get("/reports/housekeeping/dashboard").await
    }

    pub async fn room_status_grid(&self) -> Result<RoomStatusGrid, ApiError> {
        self.get("/reports/housekeeping/room-status-grid").await
    }

    pub async fn occupancy_report(&self, start: NaiveDate, end: NaiveDate) -> Result<OccupancyReport, ApiError> {
        self.get_with_query("/occupancy", &report_window(start, end))
            .await
    }

    pub async fn revenue_report(&self, start: NaiveDate, end: NaiveDate) -> Result<RevenueReport, ApiError> {
        self.get_with_query("/revenue", &report_window(start, end))
            .await
    }

    pub async fn trends_report(&self, start: NaiveDate, end: NaiveDate) -> Result<TrendsReport, ApiError> {
        self.get_with_query("/trends", &report_window(start, end))
            .await
    }
}

fn report_window(start_date: NaiveDate, end_date: NaiveDate) -> ReportWindow {
    ReportWindow {
        start_date,
        end_date,
    }
}
