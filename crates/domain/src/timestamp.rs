// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Parses an ISO-8601 timestamp.
///
/// RFC 3339 values keep their offset. Values without an offset
/// (`2024-01-15T09:00:00`, `2024-01-15 09:00`) are read as UTC.
///
/// # Arguments
///
/// * `field` - The column the value came from, used in the error
/// * `value` - The raw text
///
/// # Errors
///
/// Returns `DomainError::InvalidTimestamp` if no supported form matches.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<OffsetDateTime, DomainError> {
    let trimmed: &str = value.trim();

    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(parsed);
    }

    let naive: Option<PrimitiveDateTime> = PrimitiveDateTime::parse(
        trimmed,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            trimmed,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
    })
    .or_else(|_| {
        PrimitiveDateTime::parse(
            trimmed,
            format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        )
    })
    .or_else(|_| {
        PrimitiveDateTime::parse(
            trimmed,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        )
    })
    .or_else(|_| {
        PrimitiveDateTime::parse(
            trimmed,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        )
    })
    .or_else(|_| {
        PrimitiveDateTime::parse(
            trimmed,
            format_description!("[year]-[month]-[day] [hour]:[minute]"),
        )
    })
    .ok();

    naive
        .map(PrimitiveDateTime::assume_utc)
        .ok_or_else(|| DomainError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

/// Formats a timestamp as RFC 3339 in UTC.
#[must_use]
pub fn format_timestamp(value: OffsetDateTime) -> String {
    let utc: OffsetDateTime = value.to_offset(time::UtcOffset::UTC);
    utc.format(&Rfc3339).unwrap_or_else(|_| utc.to_string())
}
