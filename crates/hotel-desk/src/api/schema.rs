//! Request and response shapes of the hotel management API.
//!
//! Every endpoint the console touches decodes into one of these types, so a payload that does
//! not match is rejected at the client boundary instead of surfacing as a missing field later.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionLevel {
    Regular,
    Manager,
    Admin,
}

impl PermissionLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Regular => "REGULAR",
            Self::Manager => "MANAGER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub permission_level: PermissionLevel,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub permission_level: PermissionLevel,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_level: Option<PermissionLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: i64,
    pub name: String,
    pub base_price: Decimal,
    pub capacity: u32,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub number: String,
    pub room_type_id: i64,
    pub price_per_night: Decimal,
    #[serde(default)]
    pub square_meters: Option<i32>,
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub maintenance_status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewRoom {
    pub number: String,
    pub room_type_id: i64,
    pub price_per_night: Decimal,
    pub square_meters: i32,
    pub floor: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub id: i64,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewGuest {
    pub name: String,
    pub surname: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestSummary {
    pub id: i64,
    pub name: String,
    pub surname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub booking_number: String,
    pub guest: GuestSummary,
    pub room_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub number_of_nights: u32,
    #[serde(default)]
    pub total_price: Decimal,
    pub status: String,
}

impl Booking {
    pub fn is_cancelled(&self) -> bool {
        self.status.eq_ignore_ascii_case("cancelled")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBooking {
    pub guest_id: i64,
    pub room_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub booking_id: i64,
    pub amount: Decimal,
    pub currency: String,
    pub method: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPayment {
    pub booking_id: i64,
    pub amount: Decimal,
    pub currency: String,
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub booking_id: i64,
    pub invoice_number: String,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    #[serde(default)]
    pub issued_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    pub action: String,
    pub entity_type: String,
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub created_at: String,
}

/// Paginated listing envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// One day of a report series.
///
/// The occupancy endpoint sends `occupied`, `total_rooms` and `occupancy_rate`; the revenue
/// endpoint only `revenue`. Absent measures default to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetric {
    pub date: NaiveDate,
    #[serde(default, rename = "occupied", alias = "occupied_count")]
    pub occupied_count: u32,
    #[serde(default)]
    pub total_rooms: u32,
    #[serde(default)]
    pub occupancy_rate: Decimal,
    #[serde(default)]
    pub revenue: Decimal,
}

impl DailyMetric {
    pub fn occupancy(
        date: NaiveDate,
        occupied_count: u32,
        total_rooms: u32,
        rate: Decimal,
    ) -> Self {
        Self {
            date,
            occupied_count,
            total_rooms,
            occupancy_rate: rate,
            revenue: Decimal::ZERO,
        }
    }

    pub fn revenue(date: NaiveDate, revenue: Decimal) -> Self {
        Self {
            date,
            occupied_count: 0,
            total_rooms: 0,
            occupancy_rate: Decimal::ZERO,
            revenue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub average_occupancy: Decimal,
    #[serde(default)]
    pub max_occupancy: Option<Decimal>,
    #[serde(default)]
    pub min_occupancy: Option<Decimal>,
    #[serde(default)]
    pub total_room_nights: Option<u64>,
    #[serde(default)]
    pub daily: Vec<DailyMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTypeRevenue {
    pub room_type: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_revenue: Decimal,
    #[serde(default)]
    pub average_daily_revenue: Option<Decimal>,
    #[serde(default)]
    pub max_daily_revenue: Option<Decimal>,
    #[serde(default)]
    pub min_daily_revenue: Option<Decimal>,
    #[serde(default)]
    pub total_paid_bookings: Option<u64>,
    #[serde(default)]
    pub room_type_breakdown: Vec<RoomTypeRevenue>,
    #[serde(default)]
    pub daily: Vec<DailyMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBookings {
    pub date: NaiveDate,
    #[serde(default)]
    pub bookings: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendsReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_bookings: u64,
    #[serde(default)]
    pub confirmed_bookings: u64,
    pub cancellations: u64,
    pub no_shows: u64,
    pub cancellation_rate: Decimal,
    pub no_show_rate: Decimal,
    #[serde(default)]
    pub avg_lead_time_days: Option<f64>,
    #[serde(default)]
    pub avg_length_of_stay_nights: Option<f64>,
    #[serde(default)]
    pub daily: Vec<DailyBookings>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Verified,
}

impl TaskStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Verified => "verified",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl TaskPriority {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "normal" => Some(Self::Normal),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Cleaning,
    Maintenance,
    Inspection,
    DeepCleaning,
    Turndown,
}

impl TaskType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cleaning => "cleaning",
            Self::Maintenance => "maintenance",
            Self::Inspection => "inspection",
            Self::DeepCleaning => "deep_cleaning",
            Self::Turndown => "turndown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cleaning" => Some(Self::Cleaning),
            "maintenance" => Some(Self::Maintenance),
            "inspection" => Some(Self::Inspection),
            "deep_cleaning" => Some(Self::DeepCleaning),
            "turndown" => Some(Self::Turndown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousekeepingTask {
    pub id: i64,
    pub room_id: i64,
    #[serde(default)]
    pub room_number: Option<String>,
    pub task_type: TaskType,
    #[serde(default)]
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[serde(default)]
    pub assigned_to: Option<i64>,
    #[serde(default)]
    pub assigned_to_username: Option<String>,
    pub scheduled_date: NaiveDate,
    #[serde(default)]
    pub scheduled_time: Option<String>,
    #[serde(default = "default_task_minutes")]
    pub estimated_duration_minutes: u32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub completion_notes: Option<String>,
    #[serde(default)]
    pub verification_notes: Option<String>,
    #[serde(default)]
    pub actual_duration_minutes: Option<u32>,
}

pub(crate) fn default_task_minutes() -> u32 {
    30
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub room_id: i64,
    pub task_type: TaskType,
    pub priority: TaskPriority,
    pub scheduled_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub estimated_duration_minutes: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignRequest {
    pub assigned_to: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub completion_notes: String,
    pub actual_duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationRequest {
    pub verification_notes: String,
}

/// Query parameters of the task listing; empty filters are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousekeepingDashboard {
    pub total_tasks: u64,
    pub pending_tasks: u64,
    pub in_progress_tasks: u64,
    pub completed_tasks: u64,
    pub verified_tasks: u64,
    #[serde(default)]
    pub urgent_tasks: u64,
    #[serde(default)]
    pub tasks_scheduled_today: u64,
    #[serde(default)]
    pub tasks_completed_today: u64,
    #[serde(default)]
    pub rooms_available: u64,
    #[serde(default)]
    pub rooms_in_maintenance: u64,
    #[serde(default)]
    pub rooms_out_of_service: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomStatusInfo {
    pub room_id: i64,
    pub room_number: String,
    pub room_type: String,
    pub maintenance_status: String,
    #[serde(default)]
    pub has_pending_tasks: bool,
    #[serde(default)]
    pub has_in_progress_tasks: bool,
    #[serde(default)]
    pub next_booking_checkin: Option<NaiveDate>,
}

impl RoomStatusInfo {
    pub fn has_open_tasks(&self) -> bool {
        self.has_pending_tasks || self.has_in_progress_tasks
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomStatusGrid {
    pub as_of_date: NaiveDate,
    pub rooms: Vec<RoomStatusInfo>,
}
