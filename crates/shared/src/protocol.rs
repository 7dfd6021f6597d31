use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Reason;

/// Payload posted to the planning service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationRequest {
    pub destination: String,
    pub reason: Reason,
    #[serde(with = "wire_date")]
    pub start_date: NaiveDate,
    #[serde(with = "wire_date")]
    pub end_date: NaiveDate,
}

/// Reply from the planning service. Only `vacation` is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationResponse {
    pub vacation: String,
}

/// Dates travel as midnight UTC timestamps with millisecond precision,
/// e.g. `2024-05-01T00:00:00.000Z`.
pub mod wire_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    const WIRE_FORMAT: &str = "%Y-%m-%dT00:00:00.000Z";

    pub fn format(date: &NaiveDate) -> String {
        date.format(WIRE_FORMAT).to_string()
    }

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(timestamp.naive_utc().date());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid wire date '{raw}'")))
    }
}
