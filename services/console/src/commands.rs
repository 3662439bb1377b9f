use crate::cli::{
    AuditArgs, BookingCommand, CredentialArgs, GuestCommand, InvoiceCommand, PaymentCommand,
    ReportArgs, RoomCommand, TaskCommand, ThemeArgs, UserCommand,
};
use crate::infra::DeskState;
use chrono::Local;
use hotel_desk::admin::{self, AuditLogFilter, NewUserForm};
use hotel_desk::api::schema::{HousekeepingTask, TaskFilter};
use hotel_desk::config::AppConfig;
use hotel_desk::error::AppError;
use hotel_desk::frontdesk::{self, NewBookingForm, NewGuestForm, NewPaymentForm, NewRoomForm};
use hotel_desk::housekeeping::{NewTaskForm, TaskAction, TaskRow};
use hotel_desk::intent::{Outcome, StatusMessage};
use hotel_desk::reports::format::fmt_currency;
use hotel_desk::reports::{ExportFormat, ReportView};
use std::path::{Path, PathBuf};
use tracing::info;

fn print_status(status: &StatusMessage) {
    if status.is_empty() {
        return;
    }
    if status.is_error {
        eprintln!("{}", status.text);
    } else {
        println!("{}", status.text);
    }
}

/// A directory target gets the default export file name.
fn export_path(target: &Path, file_name: String) -> PathBuf {
    if target.is_dir() {
        target.join(file_name)
    } else {
        target.to_path_buf()
    }
}

pub(crate) async fn login(config: &AppConfig, args: CredentialArgs) -> Result<(), AppError> {
    let mut desk = DeskState::open(config);
    let user = desk.session.login(&args.username, &args.password).await?;
    println!(
        "Signed in as {} ({})",
        user.username, user.permission_level
    );
    Ok(())
}

pub(crate) async fn register(config: &AppConfig, args: CredentialArgs) -> Result<(), AppError> {
    let desk = DeskState::open(config);
    let user = desk.session.register(&args.username, &args.password).await?;
    println!("Registered {}. Sign in to continue.", user.username);
    Ok(())
}

pub(crate) fn logout(config: &AppConfig) -> Result<(), AppError> {
    let mut desk = DeskState::open(config);
    desk.session.logout();
    println!("Signed out");
    Ok(())
}

pub(crate) async fn whoami(config: &AppConfig) -> Result<(), AppError> {
    let mut desk = DeskState::open(config);
    let user = desk.session.restore().await?;
    let state = if user.is_active { "active" } else { "inactive" };
    println!(
        "{} (#{}) {} {}",
        user.username, user.id, user.permission_level, state
    );
    Ok(())
}

pub(crate) fn theme(config: &AppConfig, args: ThemeArgs) -> Result<(), AppError> {
    let mut desk = DeskState::open(config);
    let theme = if args.show {
        desk.session.theme()
    } else {
        match args.theme {
            Some(theme) => desk.session.set_theme(theme),
            None => desk.session.toggle_theme(),
        }
    };
    println!("Theme: {}", theme.as_str());
    Ok(())
}

pub(crate) async fn report(config: &AppConfig, args: ReportArgs) -> Result<(), AppError> {
    let mut state = DeskState::open(config);
    let desk = &mut state;
    let outcome = desk
        .reports
        .fetch(&mut desk.session, args.kind, args.start, args.end)
        .await?;
    let loaded = outcome.data;

    match &loaded.view {
        ReportView::NoData { message, .. } => println!("{message}"),
        ReportView::Ready(report) => {
            println!("{} ({})", report.heading, report.period);
            for card in &report.cards {
                println!("  {:<20} {}", card.label, card.value);
            }
            println!("{}", report.chart.title);
            for (label, value) in report.chart.labels.iter().zip(&report.chart.values) {
                println!("  {label:<26} {value:>12.2}");
            }
        }
    }

    let today = Local::now().date_naive();
    let kind = loaded.payload.kind();
    for (target, format) in [(args.csv, ExportFormat::Csv), (args.html, ExportFormat::Html)] {
        let Some(target) = target else {
            continue;
        };
        let path = export_path(&target, format.file_name(kind, today));
        std::fs::write(&path, format.render(&loaded.payload, today)?)?;
        info!(path = %path.display(), "report exported");
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn print_rows(rows: &[TaskRow]) {
    for row in rows {
        let actions: Vec<&str> = row.actions.iter().map(|action| action.as_str()).collect();
        println!(
            "#{:<5} {:<10} {:<14} {:<8} {:<12} {:<17} {:<14} [{}]",
            row.id,
            row.room,
            row.task_type.as_str(),
            row.priority.as_str(),
            row.status.as_str(),
            row.scheduled,
            row.assignee,
            actions.join(", ")
        );
    }
}

fn print_task(outcome: &Outcome<HousekeepingTask>) {
    print_rows(&[TaskRow::from(&outcome.data)]);
    print_status(&outcome.status);
}

pub(crate) async fn tasks(config: &AppConfig, command: TaskCommand) -> Result<(), AppError> {
    let mut state = DeskState::open(config);
    let desk = &mut state;
    let session = &mut desk.session;
    let housekeeping = &mut desk.housekeeping;

    match command {
        TaskCommand::List(args) => {
            let filter = TaskFilter {
                status: args.status,
                priority: args.priority,
                task_type: args.task_type,
                room_id: args.room,
            };
            let outcome = housekeeping.load_tasks(session, filter).await?;
            print_rows(&outcome.data);
            print_status(&outcome.status);
        }
        TaskCommand::Show { id } => {
            let outcome = housekeeping.task_details(session, id).await?;
            print_task(&outcome);
            let task = &outcome.data;
            for (label, notes) in [
                ("Notes", &task.notes),
                ("Completion", &task.completion_notes),
                ("Verification", &task.verification_notes),
            ] {
                if let Some(notes) = notes {
                    println!("  {label}: {notes}");
                }
            }
        }
        TaskCommand::Create(args) => {
            let form = NewTaskForm {
                room_id: Some(args.room),
                task_type: args.task_type,
                priority: args.priority,
                scheduled_date: Some(args.date),
                scheduled_time: args.time,
                notes: args.notes,
                estimated_duration_minutes: args.minutes,
            };
            let outcome = housekeeping.create(session, &form).await?;
            print_task(&outcome);
        }
        TaskCommand::Assign { id, user } => {
            let outcome = housekeeping
                .apply(session, id, TaskAction::Assign { user_id: user })
                .await?;
            print_task(&outcome);
        }
        TaskCommand::Start { id } => {
            let outcome = housekeeping.apply(session, id, TaskAction::Start).await?;
            print_task(&outcome);
        }
        TaskCommand::Complete { id, notes, minutes } => {
            let action = TaskAction::Complete {
                notes,
                actual_duration_minutes: minutes,
            };
            let outcome = housekeeping.apply(session, id, action).await?;
            print_task(&outcome);
        }
        TaskCommand::Verify { id, notes } => {
            let outcome = housekeeping
                .apply(session, id, TaskAction::Verify { notes })
                .await?;
            print_task(&outcome);
        }
        TaskCommand::Dashboard => {
            let stats = housekeeping.load_dashboard(session).await?.data;
            println!("Total tasks        {}", stats.total_tasks);
            println!("Pending            {}", stats.pending_tasks);
            println!("In progress        {}", stats.in_progress_tasks);
            println!("Completed          {}", stats.completed_tasks);
            println!("Verified           {}", stats.verified_tasks);
            println!("Urgent             {}", stats.urgent_tasks);
            println!("Scheduled today    {}", stats.tasks_scheduled_today);
            println!("Completed today    {}", stats.tasks_completed_today);
        }
        TaskCommand::Grid => {
            let grid = housekeeping.load_room_grid(session).await?.data;
            println!("Room status as of {}", grid.as_of_date);
            for room in &grid.rooms {
                let tasks = if room.has_open_tasks() { "open tasks" } else { "-" };
                let next = room
                    .next_booking_checkin
                    .map(|date| date.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {:<6} {:<12} {:<14} {:<10} next check-in {}",
                    room.room_number, room.room_type, room.maintenance_status, tasks, next
                );
            }
        }
    }
    Ok(())
}

pub(crate) async fn rooms(config: &AppConfig, command: RoomCommand) -> Result<(), AppError> {
    let mut desk = DeskState::open(config);
    let session = &mut desk.session;
    match command {
        RoomCommand::List => {
            for room in frontdesk::list_rooms(session).await?.data {
                println!(
                    "#{:<5} {:<6} type {:<3} {:>10}/night floor {}",
                    room.id,
                    room.number,
                    room.room_type_id,
                    fmt_currency(room.price_per_night),
                    room.floor.map(|floor| floor.to_string()).unwrap_or_else(|| "-".to_string())
                );
            }
        }
        RoomCommand::Types => {
            for room_type in frontdesk::list_room_types(session).await?.data {
                println!(
                    "#{:<3} {:<16} {:>10} sleeps {}",
                    room_type.id,
                    room_type.name,
                    fmt_currency(room_type.base_price),
                    room_type.capacity
                );
            }
        }
        RoomCommand::Add {
            number,
            room_type_id,
            price,
            size,
            floor,
        } => {
            let form = NewRoomForm {
                number,
                room_type_id: Some(room_type_id),
                price_per_night: Some(price),
                square_meters: Some(size),
                floor: Some(floor),
            };
            print_status(&frontdesk::create_room(session, &form).await?.status);
        }
        RoomCommand::Delete { id } => {
            print_status(&frontdesk::delete_room(session, id).await?.status);
        }
    }
    Ok(())
}

pub(crate) async fn guests(config: &AppConfig, command: GuestCommand) -> Result<(), AppError> {
    let mut desk = DeskState::open(config);
    let session = &mut desk.session;
    match command {
        GuestCommand::List => {
            for guest in frontdesk::list_guests(session).await?.data {
                println!(
                    "#{:<5} {} {} {}",
                    guest.id,
                    guest.name,
                    guest.surname,
                    guest.email.as_deref().unwrap_or("-")
                );
            }
        }
        GuestCommand::Add {
            name,
            surname,
            email,
        } => {
            let form = NewGuestForm {
                name,
                surname,
                email,
            };
            let outcome = frontdesk::create_guest(session, &form).await?;
            println!("Guest #{}", outcome.data.id);
            print_status(&outcome.status);
        }
        GuestCommand::Delete { id } => {
            print_status(&frontdesk::delete_guest(session, id).await?.status);
        }
    }
    Ok(())
}

pub(crate) async fn bookings(config: &AppConfig, command: BookingCommand) -> Result<(), AppError> {
    let mut desk = DeskState::open(config);
    let session = &mut desk.session;
    match command {
        BookingCommand::List => {
            for booking in frontdesk::list_bookings(session).await?.data {
                println!(
                    "#{:<5} {:<12} {} {} room {:<4} {} to {} ({} nights) {:>10} {}",
                    booking.id,
                    booking.booking_number,
                    booking.guest.name,
                    booking.guest.surname,
                    booking.room_id,
                    booking.check_in,
                    booking.check_out,
                    booking.number_of_nights,
                    fmt_currency(booking.total_price),
                    booking.status
                );
            }
        }
        BookingCommand::Create {
            guest,
            room,
            check_in,
            check_out,
        } => {
            let form = NewBookingForm {
                guest_id: Some(guest),
                room_id: Some(room),
                check_in: Some(check_in),
                check_out: Some(check_out),
            };
            let outcome = frontdesk::create_booking(session, &form).await?;
            println!(
                "{} total {}",
                outcome.data.booking_number,
                fmt_currency(outcome.data.total_price)
            );
            print_status(&outcome.status);
        }
        BookingCommand::Cancel { id } => {
            print_status(&frontdesk::cancel_booking(session, id).await?.status);
        }
    }
    Ok(())
}

pub(crate) async fn payments(config: &AppConfig, command: PaymentCommand) -> Result<(), AppError> {
    let mut desk = DeskState::open(config);
    let session = &mut desk.session;
    match command {
        PaymentCommand::List => {
            for payment in frontdesk::list_payments(session).await?.data {
                println!(
                    "#{:<5} booking {:<5} {:>10.2} {} {} {}",
                    payment.id,
                    payment.booking_id,
                    payment.amount,
                    payment.currency,
                    payment.method,
                    payment.status
                );
            }
        }
        PaymentCommand::Create {
            booking,
            amount,
            currency,
            method,
        } => {
            let form = NewPaymentForm {
                booking_id: Some(booking),
                amount: Some(amount),
                currency,
                method,
            };
            print_status(&frontdesk::create_payment(session, &form).await?.status);
        }
    }
    Ok(())
}

pub(crate) async fn invoices(config: &AppConfig, command: InvoiceCommand) -> Result<(), AppError> {
    let mut desk = DeskState::open(config);
    let session = &mut desk.session;
    match command {
        InvoiceCommand::Generate { booking_id } => {
            let outcome = frontdesk::generate_invoice(session, booking_id).await?;
            let invoice = &outcome.data;
            println!(
                "#{} subtotal {} tax {} total {}",
                invoice.id,
                fmt_currency(invoice.subtotal),
                fmt_currency(invoice.tax),
                fmt_currency(invoice.total)
            );
            print_status(&outcome.status);
        }
        InvoiceCommand::Pdf { invoice_id, out } => {
            let bytes = frontdesk::invoice_pdf(session, invoice_id).await?;
            std::fs::write(&out, &bytes)?;
            println!("Invoice written to {} ({} bytes)", out.display(), bytes.len());
        }
    }
    Ok(())
}

pub(crate) async fn users(config: &AppConfig, command: UserCommand) -> Result<(), AppError> {
    let mut desk = DeskState::open(config);
    let session = &mut desk.session;
    match command {
        UserCommand::List => {
            let directory = admin::list_users(session).await?.data;
            let stats = directory.stats;
            println!(
                "{} users, {} active, {} admins, {} managers",
                stats.total, stats.active, stats.admins, stats.managers
            );
            for user in &directory.users {
                let state = if user.is_active { "active" } else { "inactive" };
                println!(
                    "#{:<5} {:<20} {:<8} {}",
                    user.id, user.username, user.permission_level, state
                );
            }
        }
        UserCommand::Create {
            username,
            password,
            level,
        } => {
            let form = NewUserForm {
                username,
                password,
                permission_level: level,
            };
            print_status(&admin::create_user(session, &form).await?.status);
        }
        UserCommand::Cycle { id, current } => {
            let outcome = admin::cycle_permission(session, id, current).await?;
            println!("{} is now {}", outcome.data.username, outcome.data.permission_level);
            print_status(&outcome.status);
        }
        UserCommand::Deactivate { id } => {
            print_status(&admin::deactivate_user(session, id).await?.status);
        }
        UserCommand::Activate { id } => {
            print_status(&admin::activate_user(session, id).await?.status);
        }
    }
    Ok(())
}

pub(crate) async fn audit(config: &AppConfig, args: AuditArgs) -> Result<(), AppError> {
    let mut desk = DeskState::open(config);
    let filter = AuditLogFilter {
        action: args.action,
        entity_type: args.entity_type,
        date_from: args.from,
        date_to: args.to,
    };
    let outcome = admin::load_audit_logs(&mut desk.session, &filter, args.page).await?;
    let page = &outcome.data;
    for row in &page.rows {
        println!(
            "{} {:<12} {:<16} {:<12} {:<6} {} ({})",
            row.timestamp,
            row.user,
            row.action,
            row.entity_type,
            row.entity,
            row.description,
            row.ip_address
        );
    }
    println!(
        "Page {} of {} ({} entries)",
        page.page, page.total_pages, page.total
    );
    print_status(&outcome.status);
    Ok(())
}
