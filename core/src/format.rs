//! Display helpers for amounts, dates, document ids, phones and member lookups.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::Member;

/// Placeholder for a reference to a member absent from the fetched list.
pub const MEMBER_NOT_FOUND: &str = "member not found";

/// Placeholder for a missing optional value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Shown when a date string cannot be parsed.
pub const INVALID_DATE: &str = "Fecha inválida";

/// Peso amount with `.` thousands, `,` decimals and up to 2 fraction digits,
/// e.g. `$ 1.234.567,5`. A missing amount renders as `$0`.
pub fn format_currency(amount: Option<Decimal>) -> String {
    let Some(amount) = amount else {
        return "$0".to_string();
    };
    let rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut out = String::from(if rounded.is_sign_negative() && !rounded.is_zero() {
        "-$ "
    } else {
        "$ "
    });
    out.push_str(&group_thousands(whole));
    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }
    out
}

/// Server date or date-time as `dd/MM/yyyy`, with ` HH:MM` when
/// `include_time` is set. Offsets are dropped; the wall-clock time is shown.
pub fn format_date(date: Option<&str>, include_time: bool) -> String {
    let Some(date) = date.filter(|d| !d.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };
    match parse_moment(date) {
        Some(moment) if include_time => moment.format("%d/%m/%Y %H:%M").to_string(),
        Some(moment) => moment.format("%d/%m/%Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// `YYYY-MM-DD` for a date input; empty when missing or unparsable.
pub fn format_date_for_input(date: Option<&str>) -> String {
    date.and_then(parse_moment)
        .map(|moment| moment.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn parse_moment(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(moment) = DateTime::parse_from_rfc3339(value) {
        return Some(moment.naive_local());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(moment) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(moment);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
}

/// Document id grouped in threes from the right: `1020304050` → `1.020.304.050`.
pub fn format_cedula(cedula: Option<&str>) -> String {
    match cedula.filter(|c| !c.is_empty()) {
        Some(cedula) => {
            let cleaned: String = cedula.chars().filter(|c| *c != '.' && *c != ',').collect();
            group_thousands(&cleaned)
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `(xxx) xxx-xxxx` for 10 digits, `xxx-xxxx` for 7, otherwise unchanged.
pub fn format_phone(phone: Option<&str>) -> String {
    let Some(phone) = phone.filter(|p| !p.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        7 => format!("{}-{}", &digits[..3], &digits[3..]),
        _ => phone.to_string(),
    }
}

/// Full name of the member with `id`, or `MEMBER_NOT_FOUND`.
pub fn member_label(members: &[Member], id: i64) -> String {
    members
        .iter()
        .find(|m| m.id == id)
        .map(Member::full_name)
        .unwrap_or_else(|| MEMBER_NOT_FOUND.to_string())
}

/// Up to two uppercase initials; `??` for a missing name.
pub fn initials(name: Option<&str>) -> String {
    match name.filter(|n| !n.trim().is_empty()) {
        Some(name) => name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect(),
        None => "??".to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn currency_groups_and_trims_fraction() {
        assert_eq!(format_currency(Some(dec!(1234567.50))), "$ 1.234.567,5");
        assert_eq!(format_currency(Some(dec!(1000))), "$ 1.000");
        assert_eq!(format_currency(Some(dec!(12.345))), "$ 12,35");
        assert_eq!(format_currency(Some(dec!(-2500))), "-$ 2.500");
        assert_eq!(format_currency(None), "$0");
    }

    #[test]
    fn dates_render_day_first() {
        assert_eq!(format_date(Some("2024-03-05"), false), "05/03/2024");
        assert_eq!(format_date(Some("2024-03-05T14:07:33.25"), false), "05/03/2024");
        assert_eq!(format_date(Some("2024-03-05T14:07:33"), true), "05/03/2024 14:07");
        assert_eq!(format_date(Some("2024-03-05T09:30:00-05:00"), true), "05/03/2024 09:30");
        assert_eq!(format_date(None, false), NOT_AVAILABLE);
        assert_eq!(format_date(Some(""), true), NOT_AVAILABLE);
        assert_eq!(format_date(Some("ayer"), false), INVALID_DATE);
    }

    #[test]
    fn date_input_value_is_iso_or_empty() {
        assert_eq!(format_date_for_input(Some("2024-03-05T14:07:33")), "2024-03-05");
        assert_eq!(format_date_for_input(Some("2024-13-40")), "");
        assert_eq!(format_date_for_input(None), "");
    }

    #[test]
    fn cedula_is_grouped() {
        assert_eq!(format_cedula(Some("1020304050")), "1.020.304.050");
        assert_eq!(format_cedula(Some("1.234.567")), "1.234.567");
        assert_eq!(format_cedula(Some("123")), "123");
        assert_eq!(format_cedula(None), "N/A");
    }

    #[test]
    fn phone_formats_known_lengths() {
        assert_eq!(format_phone(Some("3001234567")), "(300) 123-4567");
        assert_eq!(format_phone(Some("234 5678")), "234-5678");
        assert_eq!(format_phone(Some("+57 1")), "+57 1");
        assert_eq!(format_phone(Some("")), "N/A");
    }

    #[test]
    fn initials_take_two_words() {
        assert_eq!(initials(Some("ana maria ruiz")), "AM");
        assert_eq!(initials(Some("  ")), "??");
        assert_eq!(initials(None), "??");
    }

    #[test]
    fn unknown_member_renders_placeholder() {
        let members = vec![Member {
            id: 1,
            member_number: None,
            document_id: None,
            first_names: Some("Luis".to_string()),
            last_names: Some("Paz".to_string()),
            email: None,
            phone: None,
            address: None,
            birth_date: None,
            city: None,
            joined_on: String::new(),
            status: None,
            created_at: None,
            notes: None,
        }];
        assert_eq!(member_label(&members, 1), "Luis Paz");
        assert_eq!(member_label(&members, 2), MEMBER_NOT_FOUND);
    }
}
