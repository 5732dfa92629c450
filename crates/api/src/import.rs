// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk reconciliation of CSV user and booking data.
//!
//! A batch goes through three steps:
//!
//! 1. The text is parsed into rows keyed by normalized header name. A
//!    structurally broken file fails the whole batch here.
//! 2. Each row is parsed into a typed record for its schema.
//! 3. Each record is reconciled against the repository, one row at a time.
//!
//! Row failures are collected as `"{key}: {reason}"` and never stop the
//! batch. There is no rollback, so a batch may be partially applied.

use csv::{ReaderBuilder, StringRecord, Trim};
use roombook_domain::{
    AccountStatus, Booking, BookingStatus, DomainError, IntervalIndex, RoomId, TimeSlot, UserId,
    UserRole, parse_timestamp, validate_booking_fields, validate_user_fields,
};
use roombook_persistence::{
    BookingQuery, BookingRepository, NewBooking, PersistenceError, UpsertOutcome, UserRecord,
};
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::error::ApiError;

/// Columns a user row must fill.
pub const USER_REQUIRED_COLUMNS: &[&str] = &["username", "password_hash", "full_name"];

/// Columns a booking row must fill.
pub const BOOKING_REQUIRED_COLUMNS: &[&str] = &[
    "room_id",
    "user_id",
    "title",
    "start_datetime",
    "end_datetime",
];

const USERS_TEMPLATE: &str = "\
username,password_hash,email,full_name,role,status
john_doe,password123,john@example.com,John Doe,MEMBER,ACTIVE
jane_smith,password456,jane@example.com,Jane Smith,APPROVER,ACTIVE
";

const BOOKINGS_TEMPLATE: &str = "\
room_id,user_id,title,purpose,start_datetime,end_datetime,status
1,1,Team meeting,Weekly planning,2024-01-15T09:00:00,2024-01-15T10:00:00,PENDING
";

/// The two tabular schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Users,
    Bookings,
}

impl RecordKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Bookings => "bookings",
        }
    }

    /// The column whose value names a row in error messages.
    const fn key_column(self) -> &'static str {
        match self {
            Self::Users => "username",
            Self::Bookings => "title",
        }
    }
}

impl FromStr for RecordKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "users" | "user" => Ok(Self::Users),
            "bookings" | "booking" => Ok(Self::Bookings),
            _ => Err(ApiError::InvalidInput {
                field: String::from("kind"),
                message: format!("Unknown data kind '{s}' (must be users or bookings)"),
            }),
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Importer switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Store `PENDING` and `APPROVED` booking rows without checking them
    /// for overlaps. Meant for trusted historical loads.
    pub bypass_conflicts: bool,
}

/// Outcome of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    pub success_count: usize,
    pub failed_count: usize,
    /// One `"{key}: {reason}"` entry per failed row, in row order.
    pub errors: Vec<String>,
}

impl ImportResult {
    const fn record_success(&mut self) {
        self.success_count += 1;
    }

    fn record_failure(&mut self, key: &str, err: &ImportRowError) {
        self.failed_count += 1;
        self.errors.push(format!("{key}: {err}"));
    }
}

/// Why a single row was not applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportRowError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error(transparent)]
    Invalid(#[from] DomainError),
    #[error("room {0} does not exist")]
    UnknownRoom(RoomId),
    #[error("user {0} does not exist")]
    UnknownUser(UserId),
    #[error("approver {0} does not exist")]
    UnknownApprover(UserId),
    #[error("PENDING bookings cannot carry approver_id or approved_at")]
    UnexpectedApproval,
    #[error("overlaps an existing booking on room {0}")]
    Conflict(RoomId),
    #[error(transparent)]
    Storage(#[from] PersistenceError),
}

/// One data row, keyed by normalized header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    row_number: usize,
    fields: HashMap<String, String>,
}

impl CsvRow {
    /// The 1-based position of this record after the header. Records whose
    /// cells are all blank are skipped but still counted.
    #[must_use]
    pub const fn row_number(&self) -> usize {
        self.row_number
    }

    /// Returns the trimmed value of `column`, or `None` if absent or blank.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// The name used for this row in error messages.
    ///
    /// Falls back to `row N` when the key column is blank.
    #[must_use]
    pub fn key(&self, kind: RecordKind) -> String {
        self.get(kind.key_column()).map_or_else(
            || format!("row {}", self.row_number),
            str::to_string,
        )
    }

    fn required(&self, column: &'static str) -> Result<&str, ImportRowError> {
        self.get(column)
            .ok_or_else(|| ImportRowError::MissingFields(vec![column]))
    }

    fn require_columns(&self, columns: &[&'static str]) -> Result<(), ImportRowError> {
        let missing: Vec<&'static str> = columns
            .iter()
            .copied()
            .filter(|column| self.get(column).is_none())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ImportRowError::MissingFields(missing))
        }
    }

    fn parse_or_default<T>(&self, column: &str) -> Result<T, ImportRowError>
    where
        T: FromStr<Err = DomainError> + Default,
    {
        self.get(column).map_or_else(
            || Ok(T::default()),
            |value| value.parse::<T>().map_err(ImportRowError::from),
        )
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Rejects text with a quoted field that is never closed.
///
/// A `"` opens a quoted field only as the first character of a field and
/// is literal anywhere else. Inside a quoted field `""` is an escaped quote
/// and a lone `"` closes the field.
fn check_quoting(text: &str) -> Result<(), ApiError> {
    let mut chars = text.chars().peekable();
    let mut at_field_start: bool = true;
    let mut in_quotes: bool = false;
    let mut line: usize = 1;
    let mut opened_on: usize = 1;

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }
        if in_quotes {
            if c == '"' && chars.next_if_eq(&'"').is_none() {
                in_quotes = false;
            }
            continue;
        }
        match c {
            '"' if at_field_start => {
                in_quotes = true;
                opened_on = line;
                at_field_start = false;
            }
            ',' | '\n' | '\r' => at_field_start = true,
            _ => at_field_start = false,
        }
    }

    if in_quotes {
        return Err(ApiError::InvalidCsvFormat {
            reason: format!("unterminated quoted field starting on line {opened_on}"),
        });
    }
    Ok(())
}

/// Parses CSV text into rows.
///
/// A leading UTF-8 BOM is dropped. Header names are trimmed, lower-cased,
/// and have spaces replaced with underscores. Unknown columns are kept but
/// never read. Rows whose cells are all blank are skipped.
///
/// # Errors
///
/// Returns `InvalidCsvFormat` if a quoted field is left open or a record
/// cannot be decoded.
pub fn parse_csv(text: &str) -> Result<Vec<CsvRow>, ApiError> {
    let text: &str = text.strip_prefix('\u{feff}').unwrap_or(text);
    check_quoting(text)?;

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ApiError::InvalidCsvFormat {
            reason: format!("Failed to read headers: {e}"),
        })?
        .iter()
        .map(normalize_header)
        .collect();

    let mut rows: Vec<CsvRow> = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let row_number: usize = index + 1;
        let record: StringRecord = record.map_err(|e| ApiError::InvalidCsvFormat {
            reason: format!("Failed to read row {row_number}: {e}"),
        })?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let fields: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();
        rows.push(CsvRow { row_number, fields });
    }

    Ok(rows)
}

/// A user row after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserImportRecord {
    pub username: String,
    /// A bcrypt hash, or a plain password that storage will hash.
    pub password_hash: String,
    pub email: Option<String>,
    pub full_name: String,
    pub role: UserRole,
    pub status: AccountStatus,
}

impl UserImportRecord {
    /// Parses a user row. Blank `role` means `MEMBER`, blank `status`
    /// means `ACTIVE`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required column is blank or an enumerated
    /// value is not recognised.
    pub fn parse(row: &CsvRow) -> Result<Self, ImportRowError> {
        row.require_columns(USER_REQUIRED_COLUMNS)?;
        let username: &str = row.required("username")?;
        let full_name: &str = row.required("full_name")?;
        validate_user_fields(username, full_name)?;

        Ok(Self {
            username: username.to_string(),
            password_hash: row.required("password_hash")?.to_string(),
            email: row.get("email").map(str::to_string),
            full_name: full_name.to_string(),
            role: row.parse_or_default::<UserRole>("role")?,
            status: row.parse_or_default::<AccountStatus>("status")?,
        })
    }

    fn into_user_record(self) -> UserRecord {
        UserRecord {
            username: self.username,
            password_hash: self.password_hash,
            email: self.email,
            full_name: self.full_name,
            role: self.role,
            status: self.status,
        }
    }
}

/// A booking row after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingImportRecord {
    pub room_id: RoomId,
    pub requester_id: UserId,
    pub title: String,
    pub purpose: String,
    pub slot: TimeSlot,
    pub status: BookingStatus,
    pub approver_id: Option<UserId>,
    pub approved_at: Option<OffsetDateTime>,
}

impl BookingImportRecord {
    /// Parses a booking row. Blank `status` means `PENDING`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required column is blank, an identifier or
    /// timestamp is malformed, `start >= end`, the status is not
    /// recognised, or a `PENDING` row carries approval details.
    pub fn parse(row: &CsvRow) -> Result<Self, ImportRowError> {
        row.require_columns(BOOKING_REQUIRED_COLUMNS)?;

        let room_id: RoomId = RoomId::parse(row.required("room_id")?)?;
        let requester_id: UserId = UserId::parse(row.required("user_id")?)?;
        let start: OffsetDateTime =
            parse_timestamp("start_datetime", row.required("start_datetime")?)?;
        let end: OffsetDateTime = parse_timestamp("end_datetime", row.required("end_datetime")?)?;
        let (title, slot): (String, TimeSlot) =
            validate_booking_fields(row.required("title")?, start, end)?;
        let status: BookingStatus = row.parse_or_default::<BookingStatus>("status")?;

        let approver_id: Option<UserId> = row.get("approver_id").map(UserId::parse).transpose()?;
        let approved_at: Option<OffsetDateTime> = row
            .get("approved_at")
            .map(|value| parse_timestamp("approved_at", value))
            .transpose()?;
        if status == BookingStatus::Pending && (approver_id.is_some() || approved_at.is_some()) {
            return Err(ImportRowError::UnexpectedApproval);
        }

        Ok(Self {
            room_id,
            requester_id,
            title,
            purpose: row.get("purpose").unwrap_or_default().to_string(),
            slot,
            status,
            approver_id,
            approved_at,
        })
    }

    fn to_new_booking(&self) -> NewBooking {
        NewBooking {
            room_id: self.room_id,
            requester_id: self.requester_id,
            title: self.title.clone(),
            purpose: self.purpose.clone(),
            slot: self.slot,
            status: self.status,
            approver_id: self.approver_id,
            approved_at: self.approved_at,
        }
    }
}

/// Imports user rows, updating users matched by `username` in place.
///
/// # Errors
///
/// Returns `InvalidCsvFormat` if the batch cannot be parsed. Row failures
/// are reported in the result.
pub async fn import_users(
    repository: &dyn BookingRepository,
    csv_text: &str,
) -> Result<ImportResult, ApiError> {
    let rows: Vec<CsvRow> = parse_csv(csv_text)?;
    let mut result: ImportResult = ImportResult::default();

    for row in &rows {
        let key: String = row.key(RecordKind::Users);
        match import_user_row(repository, row).await {
            Ok(outcome) => {
                debug!(row = row.row_number(), username = %key, ?outcome, "User row imported");
                result.record_success();
            }
            Err(err) => {
                warn!(row = row.row_number(), key = %key, error = %err, "User row rejected");
                result.record_failure(&key, &err);
            }
        }
    }

    info!(
        success_count = result.success_count,
        failed_count = result.failed_count,
        "User import finished"
    );
    Ok(result)
}

async fn import_user_row(
    repository: &dyn BookingRepository,
    row: &CsvRow,
) -> Result<UpsertOutcome, ImportRowError> {
    let record: UserImportRecord = UserImportRecord::parse(row)?;
    let (_, outcome) = repository
        .upsert_user_by_username(&record.into_user_record())
        .await?;
    Ok(outcome)
}

/// Imports booking rows. Every valid row is inserted as a new booking.
///
/// Unless `options.bypass_conflicts` is set, `PENDING` and `APPROVED` rows
/// are checked for overlaps against stored bookings, including rows stored
/// earlier in the same batch.
///
/// # Errors
///
/// Returns `InvalidCsvFormat` if the batch cannot be parsed. Row failures
/// are reported in the result.
pub async fn import_bookings(
    repository: &dyn BookingRepository,
    csv_text: &str,
    options: ImportOptions,
) -> Result<ImportResult, ApiError> {
    let rows: Vec<CsvRow> = parse_csv(csv_text)?;
    let mut result: ImportResult = ImportResult::default();

    for row in &rows {
        let key: String = row.key(RecordKind::Bookings);
        match import_booking_row(repository, row, options).await {
            Ok(booking) => {
                debug!(
                    row = row.row_number(),
                    booking_id = %booking.booking_id,
                    status = %booking.status,
                    "Booking row imported"
                );
                result.record_success();
            }
            Err(err) => {
                warn!(row = row.row_number(), key = %key, error = %err, "Booking row rejected");
                result.record_failure(&key, &err);
            }
        }
    }

    info!(
        success_count = result.success_count,
        failed_count = result.failed_count,
        bypass_conflicts = options.bypass_conflicts,
        "Booking import finished"
    );
    Ok(result)
}

async fn import_booking_row(
    repository: &dyn BookingRepository,
    row: &CsvRow,
    options: ImportOptions,
) -> Result<Booking, ImportRowError> {
    let record: BookingImportRecord = BookingImportRecord::parse(row)?;

    if repository.get_room(record.room_id).await?.is_none() {
        return Err(ImportRowError::UnknownRoom(record.room_id));
    }
    if repository.get_user(record.requester_id).await?.is_none() {
        return Err(ImportRowError::UnknownUser(record.requester_id));
    }
    if let Some(approver_id) = record.approver_id {
        if repository.get_user(approver_id).await?.is_none() {
            return Err(ImportRowError::UnknownApprover(approver_id));
        }
    }

    if record.status.is_blocking() && !options.bypass_conflicts {
        let existing: Vec<Booking> = repository
            .list_bookings(&BookingQuery::for_room(record.room_id))
            .await?;
        if IntervalIndex::new(&existing).has_conflict(record.room_id, &record.slot, None) {
            return Err(ImportRowError::Conflict(record.room_id));
        }
    }

    Ok(repository.insert_booking(&record.to_new_booking()).await?)
}

/// Imports a batch of either kind.
///
/// # Errors
///
/// Returns `InvalidCsvFormat` if the batch cannot be parsed.
pub async fn import_csv(
    repository: &dyn BookingRepository,
    kind: RecordKind,
    csv_text: &str,
    options: ImportOptions,
) -> Result<ImportResult, ApiError> {
    match kind {
        RecordKind::Users => import_users(repository, csv_text).await,
        RecordKind::Bookings => import_bookings(repository, csv_text, options).await,
    }
}

/// Validity of a previewed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowStatus {
    Valid,
    Invalid,
}

/// Preview of one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    pub row_number: usize,
    pub key: String,
    pub status: RowStatus,
    pub errors: Vec<String>,
}

/// Preview of a whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportPreview {
    pub rows: Vec<PreviewRow>,
    pub total_rows: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
}

/// Parses and validates a batch without touching storage.
///
/// References to rooms and users and slot conflicts are only checked by
/// the import itself.
///
/// # Errors
///
/// Returns `InvalidCsvFormat` if the batch cannot be parsed.
pub fn preview_import(kind: RecordKind, csv_text: &str) -> Result<ImportPreview, ApiError> {
    let rows: Vec<PreviewRow> = parse_csv(csv_text)?
        .iter()
        .map(|row| {
            let outcome: Result<(), ImportRowError> = match kind {
                RecordKind::Users => UserImportRecord::parse(row).map(|_| ()),
                RecordKind::Bookings => BookingImportRecord::parse(row).map(|_| ()),
            };
            let errors: Vec<String> = outcome.err().map(|e| e.to_string()).into_iter().collect();
            PreviewRow {
                row_number: row.row_number(),
                key: row.key(kind),
                status: if errors.is_empty() {
                    RowStatus::Valid
                } else {
                    RowStatus::Invalid
                },
                errors,
            }
        })
        .collect();

    let valid_count: usize = rows
        .iter()
        .filter(|row| row.status == RowStatus::Valid)
        .count();
    Ok(ImportPreview {
        total_rows: rows.len(),
        valid_count,
        invalid_count: rows.len() - valid_count,
        rows,
    })
}

/// Returns a CSV header line with sample rows for `kind`.
#[must_use]
pub const fn import_template(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Users => USERS_TEMPLATE,
        RecordKind::Bookings => BOOKINGS_TEMPLATE,
    }
}
