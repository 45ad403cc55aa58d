use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Raised when a status string stored in the database does not map to a
/// known enum value.
#[derive(Debug, thiserror::Error)]
#[error("unknown status value: {0}")]
pub struct ParseStatusError(pub String);

/// Sub-state of a lead's quoting process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum EstimateStatus {
    Pending,
    Scheduled,
    Completed,
    NoShow,
}

impl EstimateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimateStatus::Pending => "PENDING",
            EstimateStatus::Scheduled => "SCHEDULED",
            EstimateStatus::Completed => "COMPLETED",
            EstimateStatus::NoShow => "NO_SHOW",
        }
    }

    /// True once the estimate has reached a terminal sub-state, which is
    /// the precondition for closing the lead.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EstimateStatus::Completed | EstimateStatus::NoShow)
    }
}

impl FromStr for EstimateStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(EstimateStatus::Pending),
            "SCHEDULED" => Ok(EstimateStatus::Scheduled),
            "COMPLETED" => Ok(EstimateStatus::Completed),
            "NO_SHOW" => Ok(EstimateStatus::NoShow),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl fmt::Display for EstimateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome state of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum CloseStatus {
    Open,
    Won,
    Lost,
}

impl CloseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseStatus::Open => "OPEN",
            CloseStatus::Won => "WON",
            CloseStatus::Lost => "LOST",
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, CloseStatus::Won | CloseStatus::Lost)
    }
}

impl FromStr for CloseStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(CloseStatus::Open),
            "WON" => Ok(CloseStatus::Won),
            "LOST" => Ok(CloseStatus::Lost),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl fmt::Display for CloseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Lead {
    pub id: String,
    pub org_id: String,
    pub service: String,
    pub source: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub estimate_amount: Option<f64>,
    pub estimate_status: EstimateStatus,
    pub close_status: CloseStatus,
    pub revenue: Option<f64>,
    pub notes: Option<String>,
    /// JSON-encoded array of tag strings, NULL when the lead has no tags.
    pub tags: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct CreateLeadRequest {
    pub org_id: String,
    pub service: String,
    pub source: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub estimate_amount: Option<f64>,
    pub notes: Option<String>,
}

/// Partial update for a lead. A `None` field means "leave unchanged";
/// clearing a stored value is not expressible through this type.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct LeadPatch {
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub source: Option<String>,
    pub estimate_amount: Option<f64>,
    pub estimate_status: Option<EstimateStatus>,
    pub close_status: Option<CloseStatus>,
    pub revenue: Option<f64>,
    pub notes: Option<String>,
}

impl LeadPatch {
    /// True when applying the patch can change the pipeline position of the
    /// lead, which is what triggers the external sync fan-out on update.
    pub fn touches_status(&self) -> bool {
        self.estimate_status.is_some() || self.close_status.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct UpdateLeadStatusRequest {
    pub estimate_status: Option<EstimateStatus>,
    pub close_status: Option<CloseStatus>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct LeadsResponse {
    pub leads: Vec<Lead>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            EstimateStatus::Pending,
            EstimateStatus::Scheduled,
            EstimateStatus::Completed,
            EstimateStatus::NoShow,
        ] {
            assert_eq!(status.as_str().parse::<EstimateStatus>().unwrap(), status);
        }
        for status in [CloseStatus::Open, CloseStatus::Won, CloseStatus::Lost] {
            assert_eq!(status.as_str().parse::<CloseStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_serde_uses_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&EstimateStatus::NoShow).unwrap(),
            "\"NO_SHOW\""
        );
        let parsed: CloseStatus = serde_json::from_str("\"WON\"").unwrap();
        assert_eq!(parsed, CloseStatus::Won);
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        assert!("CLOSED".parse::<CloseStatus>().is_err());
        assert!("".parse::<EstimateStatus>().is_err());
    }
}
