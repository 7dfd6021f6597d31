//! Vacation form model: field values, "set field" messages, and validation.

use chrono::{Datelike, NaiveDate};
use shared::{domain::Reason, protocol::VacationRequest};
use thiserror::Error;

/// Calendar days before this year are never selectable.
const EARLIEST_YEAR: i32 = 1900;
const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Destination,
    StartDate,
    EndDate,
    Reason,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Destination => "Destination",
            FormField::StartDate => "Start date",
            FormField::EndDate => "End date",
            FormField::Reason => "Reason for your vacation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", .field.label())]
pub struct ValidationFailure {
    pub field: FormField,
    pub message: String,
}

impl ValidationFailure {
    fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Range of days the date inputs accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    pub allow_future: bool,
}

impl Default for DateBounds {
    fn default() -> Self {
        Self { allow_future: true }
    }
}

impl DateBounds {
    pub fn past_only() -> Self {
        Self {
            allow_future: false,
        }
    }

    fn check(&self, date: NaiveDate, today: NaiveDate) -> Result<(), &'static str> {
        if date.year() < EARLIEST_YEAR {
            return Err("dates before 1900-01-01 cannot be picked");
        }
        if !self.allow_future && date > today {
            return Err("dates after today cannot be picked");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMessage {
    SetDestination(String),
    SetStartDate(String),
    SetEndDate(String),
    SetReason(Option<Reason>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormModel {
    destination: String,
    start_date: String,
    end_date: String,
    reason: Option<Reason>,
    bounds: DateBounds,
}

impl Default for FormModel {
    fn default() -> Self {
        Self::new(DateBounds::default())
    }
}

impl FormModel {
    pub fn new(bounds: DateBounds) -> Self {
        Self {
            destination: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            reason: Some(Reason::default()),
            bounds,
        }
    }

    pub fn apply(&mut self, message: FormMessage) {
        match message {
            FormMessage::SetDestination(value) => self.destination = value,
            FormMessage::SetStartDate(value) => self.start_date = value,
            FormMessage::SetEndDate(value) => self.end_date = value,
            FormMessage::SetReason(value) => self.reason = value,
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn end_date(&self) -> &str {
        &self.end_date
    }

    pub fn reason(&self) -> Option<Reason> {
        self.reason
    }

    /// Validates every field in one step and snapshots the request.
    /// Start and end dates are not compared with each other.
    pub fn validate_on(&self, today: NaiveDate) -> Result<VacationRequest, ValidationFailure> {
        let destination = self.destination.trim();
        if destination.is_empty() {
            return Err(ValidationFailure::new(
                FormField::Destination,
                "enter the destination",
            ));
        }

        let start_date = self.checked_date(FormField::StartDate, &self.start_date, today)?;
        let end_date = self.checked_date(FormField::EndDate, &self.end_date, today)?;

        let reason = self.reason.ok_or_else(|| {
            ValidationFailure::new(FormField::Reason, "select a reason for the vacation")
        })?;

        Ok(VacationRequest {
            destination: destination.to_string(),
            reason,
            start_date,
            end_date,
        })
    }

    fn checked_date(
        &self,
        field: FormField,
        raw: &str,
        today: NaiveDate,
    ) -> Result<NaiveDate, ValidationFailure> {
        let date = match parse_date_input(raw) {
            DateInput::Unset => return Err(ValidationFailure::new(field, "pick a date")),
            DateInput::Invalid => {
                return Err(ValidationFailure::new(
                    field,
                    "not a valid calendar date (use YYYY-MM-DD)",
                ))
            }
            DateInput::Valid(date) => date,
        };
        self.bounds
            .check(date, today)
            .map_err(|message| ValidationFailure::new(field, message))?;
        Ok(date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    Unset,
    Invalid,
    Valid(NaiveDate),
}

pub fn parse_date_input(raw: &str) -> DateInput {
    let raw = raw.trim();
    if raw.is_empty() {
        return DateInput::Unset;
    }
    match NaiveDate::parse_from_str(raw, DATE_INPUT_FORMAT) {
        Ok(date) => DateInput::Valid(date),
        Err(_) => DateInput::Invalid,
    }
}

/// Text shown under a date input.
pub fn date_preview(raw: &str) -> String {
    match parse_date_input(raw) {
        DateInput::Unset => "Pick a date".to_string(),
        DateInput::Invalid => "Not a valid date".to_string(),
        DateInput::Valid(date) => format_display_date(date),
    }
}

/// Long form with an ordinal day, e.g. `May 1st, 2024`.
pub fn format_display_date(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{} {day}{suffix}, {}", date.format("%B"), date.year())
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
