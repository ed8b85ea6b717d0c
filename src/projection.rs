// src/projection.rs
//! Read-time derived fields. Nothing here is persisted and nothing here fails:
//! absent inputs give absent outputs.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};

/// First/last name pair of a linked user account.
#[derive(Debug, Clone, Copy)]
pub struct AccountName<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// Current local calendar date, read fresh on every call.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole years between `dob` and `today`, one less if this year's birthday
/// has not been reached yet.
pub fn age(dob: Option<NaiveDate>, today: NaiveDate) -> Option<i32> {
    let dob = dob?;
    let before_birthday = (today.month(), today.day()) < (dob.month(), dob.day());
    Some(today.year() - dob.year() - i32::from(before_birthday))
}

pub fn display_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name)
}

/// Account holder's full name with surrounding whitespace removed, so an
/// account without a last name does not leave a trailing space.
pub fn full_name(account: AccountName<'_>) -> String {
    display_name(account.first_name, account.last_name).trim().to_string()
}

/// The reorder rule shared by the per-item flag and the low-stock listing.
pub fn needs_reorder(stock: i64, min_stock: i64) -> bool {
    stock <= min_stock
}

pub fn appointment_date(scheduled_at: NaiveDateTime) -> String {
    scheduled_at.date().format("%Y-%m-%d").to_string()
}

/// 12-hour clock with AM/PM suffix, e.g. `09:00 AM`.
pub fn appointment_time(scheduled_at: NaiveDateTime) -> String {
    scheduled_at.time().format("%I:%M %p").to_string()
}

/// Generic text form of a doctor record: `"<full name> - <department>"`,
/// with `Doctor` standing in for a missing account and `None` for a missing
/// department.
pub fn doctor_label(account: Option<AccountName<'_>>, department: Option<&str>) -> String {
    let name = account.map(full_name).unwrap_or_else(|| "Doctor".to_string());
    format!("{} - {}", name, department.unwrap_or("None"))
}

/// Name shown for the doctor on an appointment.
pub fn doctor_name(
    has_doctor: bool,
    account: Option<AccountName<'_>>,
    department: Option<&str>,
) -> Option<String> {
    if !has_doctor {
        return None;
    }
    match account {
        Some(account) => Some(full_name(account)),
        None => Some(doctor_label(None, department)),
    }
}
