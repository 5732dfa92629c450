// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::interval::TimeSlot;
use crate::types::RoomDraft;
use time::OffsetDateTime;

/// Returns the trimmed value, or an error if it is blank.
///
/// # Errors
///
/// Returns `DomainError::MissingField` if the value is empty or whitespace.
pub fn require_text(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField { field });
    }
    Ok(trimmed.to_string())
}

/// Validates the caller-supplied fields of a new booking.
///
/// Required fields are checked before the interval.
///
/// # Arguments
///
/// * `title` - The booking title
/// * `start` - Start of the requested slot
/// * `end` - End of the requested slot (exclusive)
///
/// # Returns
///
/// The trimmed title and the validated slot.
///
/// # Errors
///
/// Returns an error if the title is blank or `start >= end`.
pub fn validate_booking_fields(
    title: &str,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<(String, TimeSlot), DomainError> {
    let title: String = require_text("title", title)?;
    let slot: TimeSlot = TimeSlot::new(start, end)?;
    Ok((title, slot))
}

/// Validates room details before they are stored.
///
/// # Errors
///
/// Returns an error if the name is blank or the capacity is not positive.
pub fn validate_room_draft(draft: &RoomDraft) -> Result<(), DomainError> {
    require_text("name", &draft.name)?;
    if draft.capacity <= 0 {
        return Err(DomainError::InvalidCapacity(draft.capacity));
    }
    Ok(())
}

/// Validates the identifying fields of a user record.
///
/// # Errors
///
/// Returns `DomainError::MissingField` for a blank username or full name.
pub fn validate_user_fields(username: &str, full_name: &str) -> Result<(), DomainError> {
    require_text("username", username)?;
    require_text("full_name", full_name)?;
    Ok(())
}
