//! Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{DateTime, Datelike, Utc};

/// A value the date filters can read a UTC timestamp from.
///
/// Implemented for references too, so templates can pass fields as-is.
pub trait Timestamp {
    fn utc(&self) -> DateTime<Utc>;
}

impl Timestamp for DateTime<Utc> {
    fn utc(&self) -> DateTime<Utc> {
        *self
    }
}

impl<T: Timestamp + ?Sized> Timestamp for &T {
    fn utc(&self) -> DateTime<Utc> {
        (**self).utc()
    }
}

/// Footer copyright year: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(Utc::now().year())
}

/// Order date as shown to shoppers, e.g. `May 17, 2024`.
#[askama::filter_fn]
pub fn order_date(value: impl Timestamp, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(value.utc().format("%b %d, %Y").to_string())
}
