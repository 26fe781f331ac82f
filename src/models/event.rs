use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseStatus {
    Taken,
    Missed,
    Skipped,
}

impl FromStr for DoseStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "taken" => Ok(Self::Taken),
            "missed" => Ok(Self::Missed),
            "skipped" => Ok(Self::Skipped),
            other => Err(Error::invalid(format!(
                "unknown dose status '{other}' (expected taken/missed/skipped)"
            ))),
        }
    }
}

impl fmt::Display for DoseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Taken => write!(f, "taken"),
            Self::Missed => write!(f, "missed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// The recorded outcome of one scheduled dose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseEvent {
    pub id: String,
    pub profile_id: String,
    pub medication_id: String,
    pub slot_id: String,
    pub status: DoseStatus,
    pub scheduled_time: DateTime<Utc>,
    /// Absent for outcomes inferred by the missed-dose sweep.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DoseEvent {
    pub fn new(
        profile_id: &str,
        medication_id: &str,
        slot_id: &str,
        status: DoseStatus,
        scheduled_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            profile_id: profile_id.to_string(),
            medication_id: medication_id.to_string(),
            slot_id: slot_id.to_string(),
            status,
            scheduled_time,
            action_time: None,
            reason: None,
        }
    }
}

// ---------------------------------------------------------------------------
// DoseEventRecord: untyped form used by import
// ---------------------------------------------------------------------------

/// A dose event as it arrives from an external file, timestamps still text.
#[derive(Debug, Clone, Deserialize)]
pub struct DoseEventRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub profile_id: String,
    pub medication_id: String,
    pub slot_id: String,
    pub status: String,
    pub scheduled_time: String,
    #[serde(default)]
    pub action_time: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl TryFrom<DoseEventRecord> for DoseEvent {
    type Error = Error;

    fn try_from(r: DoseEventRecord) -> Result<Self, Self::Error> {
        let status: DoseStatus = r.status.parse()?;
        let scheduled_time = parse_timestamp("scheduled_time", &r.scheduled_time)?;
        let action_time = match r.action_time.as_deref() {
            Some(s) if !s.trim().is_empty() => Some(parse_timestamp("action_time", s)?),
            _ => None,
        };
        Ok(Self {
            id: r.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            profile_id: r.profile_id,
            medication_id: r.medication_id,
            slot_id: r.slot_id,
            status,
            scheduled_time,
            action_time,
            reason: r.reason,
        })
    }
}

/// Parse an RFC 3339 timestamp, naming the offending field on failure.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::invalid(format!("{field} '{value}': {e}")))
}
