use crate::commands;
use crate::infra::parse_date;
use crate::server;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use hotel_desk::api::schema::{PermissionLevel, TaskPriority, TaskStatus, TaskType};
use hotel_desk::config::{ApiConfig, AppConfig};
use hotel_desk::error::AppError;
use hotel_desk::reports::ReportKind;
use hotel_desk::session::Theme;
use hotel_desk::telemetry;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hotel-desk",
    about = "Staff and admin console for the hotel management API",
    version
)]
struct Cli {
    /// Base URL of the hotel management API (overrides HOTEL_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Client state file holding the token and theme (overrides HOTEL_DESK_STATE)
    #[arg(long, global = true)]
    state: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the local intent API (default command)
    Serve(ServeArgs),
    /// Sign in and remember the token
    Login(CredentialArgs),
    /// Create an account; sign in afterwards
    Register(CredentialArgs),
    /// Forget the stored token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show, set or toggle the colour theme
    Theme(ThemeArgs),
    /// Occupancy, revenue and booking trend reports
    Report(ReportArgs),
    /// Housekeeping tasks
    Tasks {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Rooms and room types
    Rooms {
        #[command(subcommand)]
        command: RoomCommand,
    },
    /// Guest register
    Guests {
        #[command(subcommand)]
        command: GuestCommand,
    },
    /// Reservations
    Bookings {
        #[command(subcommand)]
        command: BookingCommand,
    },
    /// Payments against bookings
    Payments {
        #[command(subcommand)]
        command: PaymentCommand,
    },
    /// Invoice generation and download
    Invoices {
        #[command(subcommand)]
        command: InvoiceCommand,
    },
    /// User administration (admin only)
    Users {
        #[command(subcommand)]
        command: UserCommand,
    },
    /// Audit trail (admin only)
    Audit(AuditArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct CredentialArgs {
    #[arg(long)]
    pub(crate) username: String,
    #[arg(long)]
    pub(crate) password: String,
}

#[derive(Args, Debug)]
pub(crate) struct ThemeArgs {
    /// dark or light; omit to toggle
    #[arg(value_parser = parse_theme)]
    pub(crate) theme: Option<Theme>,
    /// Print the current theme without changing it
    #[arg(long, conflicts_with = "theme")]
    pub(crate) show: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// occupancy, revenue or trends
    #[arg(value_parser = parse_report_kind)]
    pub(crate) kind: ReportKind,
    /// First day of the report (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Last day of the report (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) end: Option<NaiveDate>,
    /// Write the report as CSV to this file or directory
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Write a printable HTML page to this file or directory
    #[arg(long)]
    pub(crate) html: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum TaskCommand {
    /// List tasks, optionally filtered
    List(TaskListArgs),
    /// Show one task
    Show { id: i64 },
    /// Schedule a new task
    Create(TaskCreateArgs),
    /// Assign a pending task to a staff member
    Assign {
        id: i64,
        #[arg(long)]
        user: i64,
    },
    /// Start an assigned task
    Start { id: i64 },
    /// Complete a task in progress
    Complete {
        id: i64,
        #[arg(long)]
        notes: Option<String>,
        /// Minutes actually spent
        #[arg(long)]
        minutes: Option<i64>,
    },
    /// Verify a completed task
    Verify {
        id: i64,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Housekeeping statistics
    Dashboard,
    /// Room status grid
    Grid,
}

#[derive(Args, Debug, Default)]
pub(crate) struct TaskListArgs {
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<TaskStatus>,
    #[arg(long, value_parser = parse_priority)]
    pub(crate) priority: Option<TaskPriority>,
    #[arg(long = "type", value_parser = parse_task_type)]
    pub(crate) task_type: Option<TaskType>,
    #[arg(long)]
    pub(crate) room: Option<i64>,
}

#[derive(Args, Debug)]
pub(crate) struct TaskCreateArgs {
    #[arg(long)]
    pub(crate) room: i64,
    /// cleaning, maintenance, inspection, deep_cleaning or turndown
    #[arg(long = "type")]
    pub(crate) task_type: String,
    #[arg(long)]
    pub(crate) priority: Option<String>,
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: NaiveDate,
    /// HH:MM
    #[arg(long)]
    pub(crate) time: Option<String>,
    #[arg(long)]
    pub(crate) notes: Option<String>,
    /// Estimated minutes (defaults to 30)
    #[arg(long)]
    pub(crate) minutes: Option<i64>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum RoomCommand {
    List,
    /// List room types
    Types,
    Add {
        #[arg(long)]
        number: String,
        #[arg(long = "type")]
        room_type_id: i64,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        size: i32,
        #[arg(long)]
        floor: i32,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub(crate) enum GuestCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
        #[arg(long)]
        email: String,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub(crate) enum BookingCommand {
    /// Active reservations
    List,
    Create {
        #[arg(long)]
        guest: i64,
        #[arg(long)]
        room: i64,
        #[arg(long, value_parser = parse_date)]
        check_in: NaiveDate,
        #[arg(long, value_parser = parse_date)]
        check_out: NaiveDate,
    },
    Cancel { id: i64 },
}

#[derive(Subcommand, Debug)]
pub(crate) enum PaymentCommand {
    List,
    Create {
        #[arg(long)]
        booking: i64,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        method: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum InvoiceCommand {
    /// Generate the invoice of a booking
    Generate { booking_id: i64 },
    /// Download an invoice as PDF
    Pdf {
        invoice_id: i64,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum UserCommand {
    List,
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_parser = parse_level, default_value = "REGULAR")]
        level: PermissionLevel,
    },
    /// Move a user to the next permission level
    Cycle {
        id: i64,
        /// Level the user has now
        #[arg(long, value_parser = parse_level)]
        current: PermissionLevel,
    },
    Deactivate { id: i64 },
    Activate { id: i64 },
}

#[derive(Args, Debug)]
pub(crate) struct AuditArgs {
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
    #[arg(long)]
    pub(crate) action: Option<String>,
    #[arg(long)]
    pub(crate) entity_type: Option<String>,
    #[arg(long, value_parser = parse_date)]
    pub(crate) from: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date)]
    pub(crate) to: Option<NaiveDate>,
}

fn parse_report_kind(raw: &str) -> Result<ReportKind, String> {
    raw.parse().map_err(|err: hotel_desk::intent::ValidationError| err.to_string())
}

fn parse_theme(raw: &str) -> Result<Theme, String> {
    Theme::parse(raw).ok_or_else(|| format!("unknown theme '{raw}' (dark or light)"))
}

/// Decodes a snake_case API value such as `in_progress`.
fn parse_wire<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, String> {
    let value = serde_json::Value::String(raw.trim().to_ascii_lowercase());
    serde_json::from_value(value).map_err(|_| format!("unknown value '{raw}'"))
}

fn parse_status(raw: &str) -> Result<TaskStatus, String> {
    parse_wire(raw)
}

fn parse_priority(raw: &str) -> Result<TaskPriority, String> {
    TaskPriority::parse(raw).ok_or_else(|| format!("unknown priority '{raw}'"))
}

fn parse_task_type(raw: &str) -> Result<TaskType, String> {
    TaskType::parse(raw).ok_or_else(|| format!("unknown task type '{raw}'"))
}

fn parse_level(raw: &str) -> Result<PermissionLevel, String> {
    let value = serde_json::Value::String(raw.trim().to_ascii_uppercase());
    serde_json::from_value(value)
        .map_err(|_| format!("unknown permission level '{raw}' (REGULAR, MANAGER or ADMIN)"))
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(url) = cli.api_url {
        config.api = ApiConfig::new(url)?;
    }
    if let Some(path) = cli.state {
        config.storage.state_path = path;
    }

    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args, config).await,
        Command::Login(args) => commands::login(&config, args).await,
        Command::Register(args) => commands::register(&config, args).await,
        Command::Logout => commands::logout(&config),
        Command::Whoami => commands::whoami(&config).await,
        Command::Theme(args) => commands::theme(&config, args),
        Command::Report(args) => commands::report(&config, args).await,
        Command::Tasks { command } => commands::tasks(&config, command).await,
        Command::Rooms { command } => commands::rooms(&config, command).await,
        Command::Guests { command } => commands::guests(&config, command).await,
        Command::Bookings { command } => commands::bookings(&config, command).await,
        Command::Payments { command } => commands::payments(&config, command).await,
        Command::Invoices { command } => commands::invoices(&config, command).await,
        Command::Users { command } => commands::users(&config, command).await,
        Command::Audit(args) => commands::audit(&config, args).await,
    }
}
