//! Rooms, guests, bookings, payments and invoices.
//!
//! Each intent checks its input, calls the API through the session and reports a status
//! line. Business rules such as pricing or double-booking checks stay with the API.

mod forms;

pub use forms::{
    NewBookingForm, NewGuestForm, NewPaymentForm, NewRoomForm, DEFAULT_CURRENCY,
    DEFAULT_PAYMENT_METHOD,
};

use tracing::{info, warn};

use crate::api::schema::{Booking, Guest, Invoice, Payment, Room, RoomType};
use crate::intent::{DeskError, Outcome, StatusMessage, ValidationError};
use crate::session::Session;

fn rejected(screen: &'static str, err: ValidationError) -> DeskError {
    warn!(screen, error = %err, "input rejected");
    err.into()
}

pub async fn list_rooms(session: &mut Session) -> Result<Outcome<Vec<Room>>, DeskError> {
    let result = session.require_authenticated()?.list_rooms().await;
    let rooms = session.settle(result)?;
    Ok(Outcome::new(rooms, StatusMessage::cleared()))
}

pub async fn list_room_types(session: &mut Session) -> Result<Outcome<Vec<RoomType>>, DeskError> {
    let result = session.require_authenticated()?.list_room_types().await;
    let types = session.settle(result)?;
    Ok(Outcome::new(types, StatusMessage::cleared()))
}

pub async fn create_room(
    session: &mut Session,
    form: &NewRoomForm,
) -> Result<Outcome<Room>, DeskError> {
    let request = form.validate().map_err(|err| rejected("rooms", err))?;
    let result = session.require_authenticated()?.create_room(&request).await;
    let room = session.settle(result)?;
    info!(room = %room.number, "room added");
    Ok(Outcome::new(room, StatusMessage::info("Room added successfully")))
}

pub async fn delete_room(session: &mut Session, room_id: i64) -> Result<Outcome<()>, DeskError> {
    let result = session.require_authenticated()?.delete_room(room_id).await;
    session.settle(result)?;
    info!(room_id, "room deleted");
    Ok(Outcome::new((), StatusMessage::info("Room deleted")))
}

pub async fn list_guests(session: &mut Session) -> Result<Outcome<Vec<Guest>>, DeskError> {
    let result = session.require_authenticated()?.list_guests().await;
    let guests = session.settle(result)?;
    Ok(Outcome::new(guests, StatusMessage::cleared()))
}

pub async fn create_guest(
    session: &mut Session,
    form: &NewGuestForm,
) -> Result<Outcome<Guest>, DeskError> {
    let request = form.validate().map_err(|err| rejected("guests", err))?;
    let result = session.require_authenticated()?.create_guest(&request).await;
    let guest = session.settle(result)?;
    info!(guest = guest.id, "guest registered");
    Ok(Outcome::new(guest, StatusMessage::info("Guest registered successfully")))
}

pub async fn delete_guest(session: &mut Session, guest_id: i64) -> Result<Outcome<()>, DeskError> {
    let result = session.require_authenticated()?.delete_guest(guest_id).await;
    session.settle(result)?;
    info!(guest_id, "guest deleted");
    Ok(Outcome::new((), StatusMessage::info("Guest deleted")))
}

/// Active bookings only; cancelled ones are left out of the list.
pub async fn list_bookings(session: &mut Session) -> Result<Outcome<Vec<Booking>>, DeskError> {
    let result = session.require_authenticated()?.list_bookings().await;
    let bookings = session.settle(result)?;
    let active = bookings
        .into_iter()
        .filter(|booking| !booking.is_cancelled())
        .collect();
    Ok(Outcome::new(active, StatusMessage::cleared()))
}

pub async fn create_booking(
    session: &mut Session,
    form: &NewBookingForm,
) -> Result<Outcome<Booking>, DeskError> {
    let request = form.validate().map_err(|err| rejected("bookings", err))?;
    let result = session.require_authenticated()?.create_booking(&request).await;
    let booking = session.settle(result)?;
    info!(booking = %booking.booking_number, room = booking.room_id, "reservation created");
    Ok(Outcome::new(
        booking,
        StatusMessage::info("Reservation created successfully"),
    ))
}

pub async fn cancel_booking(
    session: &mut Session,
    booking_id: i64,
) -> Result<Outcome<Booking>, DeskError> {
    let result = session.require_authenticated()?.cancel_booking(booking_id).await;
    let booking = session.settle(result)?;
    info!(booking = %booking.booking_number, "reservation cancelled");
    Ok(Outcome::new(booking, StatusMessage::info("Reservation cancelled")))
}

pub async fn list_payments(session: &mut Session) -> Result<Outcome<Vec<Payment>>, DeskError> {
    let result = session.require_authenticated()?.list_payments().await;
    let payments = session.settle(result)?;
    Ok(Outcome::new(payments, StatusMessage::cleared()))
}

pub async fn create_payment(
    session: &mut Session,
    form: &NewPaymentForm,
) -> Result<Outcome<Payment>, DeskError> {
    let request = form.validate().map_err(|err| rejected("payments", err))?;
    let result = session.require_authenticated()?.create_payment(&request).await;
    let payment = session.settle(result)?;
    info!(payment = payment.id, booking = payment.booking_id, "payment created");
    Ok(Outcome::new(payment, StatusMessage::info("Payment created")))
}

pub async fn generate_invoice(
    session: &mut Session,
    booking_id: i64,
) -> Result<Outcome<Invoice>, DeskError> {
    let result = session.require_authenticated()?.generate_invoice(booking_id).await;
    let invoice = session.settle(result)?;
    info!(invoice = %invoice.invoice_number, booking_id, "invoice generated");
    let status = StatusMessage::info(format!("Invoice {} generated", invoice.invoice_number));
    Ok(Outcome::new(invoice, status))
}

/// Raw PDF bytes of an invoice.
pub async fn invoice_pdf(session: &mut Session, invoice_id: i64) -> Result<Vec<u8>, DeskError> {
    let result = session.require_authenticated()?.invoice_pdf(invoice_id).await;
    session.settle(result)
}
