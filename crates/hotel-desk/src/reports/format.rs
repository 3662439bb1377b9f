use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds half away from zero and pads to exactly two places.
fn two_places(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

pub fn fmt_percent(value: Decimal) -> String {
    format!("{}%", two_places(value))
}

/// `$1,234.50`; negative amounts keep the sign in front of the symbol.
pub fn fmt_currency(value: Decimal) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    let cents = two_places(value.abs()).to_string();
    let (whole, fraction) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    format!("{sign}${}.{fraction}", group_thousands(whole))
}

pub fn fmt_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn fmt_days(value: f64, unit: &str) -> String {
    format!("{} {unit}", value.round())
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(raw: &str) -> Decimal {
        raw.parse().expect("decimal")
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(fmt_currency(Decimal::ZERO), "$0.00");
        assert_eq!(fmt_currency(dec("999.5")), "$999.50");
        assert_eq!(fmt_currency(dec("1234.5")), "$1,234.50");
        assert_eq!(fmt_currency(dec("1234567.891")), "$1,234,567.89");
        assert_eq!(fmt_currency(dec("-2500")), "-$2,500.00");
    }

    #[test]
    fn percent_and_days() {
        assert_eq!(fmt_percent(dec("72.456")), "72.46%");
        assert_eq!(fmt_percent(dec("50")), "50.00%");
        assert_eq!(fmt_percent(dec("12.345")), "12.35%");
        assert_eq!(fmt_days(3.6, "days"), "4 days");
        assert_eq!(fmt_days(0.0, "nights"), "0 nights");
    }
}
