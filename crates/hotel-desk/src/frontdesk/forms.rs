use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::schema::{NewBooking, NewGuest, NewPayment, NewRoom};
use crate::intent::{require_text, ValidationError};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_PAYMENT_METHOD: &str = "card";

const ROOM_FIELDS: &str = "Please fill all room fields with valid values";
const GUEST_FIELDS: &str = "Please fill all guest fields";
const BOOKING_FIELDS: &str = "Please fill all booking fields";
const PAYMENT_FIELDS: &str = "Please provide booking id and amount";

fn positive_id(value: Option<i64>, message: &'static str) -> Result<i64, ValidationError> {
    value
        .filter(|id| *id > 0)
        .ok_or(ValidationError::Incomplete(message))
}

fn text_or(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(default)
        .to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewRoomForm {
    #[serde(default)]
    pub number: String,
    pub room_type_id: Option<i64>,
    pub price_per_night: Option<Decimal>,
    pub square_meters: Option<i32>,
    pub floor: Option<i32>,
}

impl NewRoomForm {
    pub fn validate(&self) -> Result<NewRoom, ValidationError> {
        let number = require_text(&self.number, ROOM_FIELDS)?;
        let room_type_id = positive_id(self.room_type_id, ROOM_FIELDS)?;
        let price_per_night = self
            .price_per_night
            .filter(|price| price.is_sign_positive() && !price.is_zero())
            .ok_or(ValidationError::Incomplete(ROOM_FIELDS))?;
        let square_meters = self
            .square_meters
            .filter(|size| *size > 0)
            .ok_or(ValidationError::Incomplete(ROOM_FIELDS))?;
        let floor = self.floor.ok_or(ValidationError::Incomplete(ROOM_FIELDS))?;
        Ok(NewRoom {
            number,
            room_type_id,
            price_per_night,
            square_meters,
            floor,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewGuestForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub email: String,
}

impl NewGuestForm {
    pub fn validate(&self) -> Result<NewGuest, ValidationError> {
        let name = require_text(&self.name, GUEST_FIELDS)?;
        let surname = require_text(&self.surname, GUEST_FIELDS)?;
        let email = require_text(&self.email, GUEST_FIELDS)?;
        if !email.contains('@') {
            return Err(ValidationError::invalid("email", format!("'{email}' is not an address")));
        }
        Ok(NewGuest {
            name,
            surname,
            email,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBookingForm {
    pub guest_id: Option<i64>,
    pub room_id: Option<i64>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
}

impl NewBookingForm {
    pub fn validate(&self) -> Result<NewBooking, ValidationError> {
        let guest_id = positive_id(self.guest_id, BOOKING_FIELDS)?;
        let room_id = positive_id(self.room_id, BOOKING_FIELDS)?;
        let (Some(check_in), Some(check_out)) = (self.check_in, self.check_out) else {
            return Err(ValidationError::Incomplete(BOOKING_FIELDS));
        };
        if check_out <= check_in {
            return Err(ValidationError::StayOrder);
        }
        Ok(NewBooking {
            guest_id,
            room_id,
            check_in,
            check_out,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPaymentForm {
    pub booking_id: Option<i64>,
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

impl NewPaymentForm {
    pub fn validate(&self) -> Result<NewPayment, ValidationError> {
        let booking_id = positive_id(self.booking_id, PAYMENT_FIELDS)?;
        let amount = self
            .amount
            .filter(|amount| amount.is_sign_positive() && !amount.is_zero())
            .ok_or(ValidationError::Incomplete(PAYMENT_FIELDS))?;
        Ok(NewPayment {
            booking_id,
            amount,
            currency: text_or(self.currency.as_deref(), DEFAULT_CURRENCY).to_ascii_uppercase(),
            method: text_or(self.method.as_deref(), DEFAULT_PAYMENT_METHOD),
        })
    }
}
