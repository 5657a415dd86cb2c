// 📬 RSVP Status - closed set of guest responses
//
// "attending" / "declined" are the only values a guest can request from an
// emailed link. "pending" is the unset state every guest starts in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    /// No response recorded yet
    Pending,

    /// Guest confirmed they will come
    Attending,

    /// Guest said they can't make it
    Declined,
}

impl RsvpStatus {
    /// Literal stored in the `rsvp_status` column and used in links
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Pending => "pending",
            RsvpStatus::Attending => "attending",
            RsvpStatus::Declined => "declined",
        }
    }

    /// Parse a status requested through a confirmation link.
    ///
    /// Only the exact literals `attending` and `declined` are accepted.
    /// No trimming, no case folding, and `pending` can't be requested.
    pub fn parse_requested(value: &str) -> Option<RsvpStatus> {
        match value {
            "attending" => Some(RsvpStatus::Attending),
            "declined" => Some(RsvpStatus::Declined),
            _ => None,
        }
    }
}

impl Default for RsvpStatus {
    fn default() -> Self {
        RsvpStatus::Pending
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses any stored value, including `pending`
impl FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RsvpStatus::Pending),
            other => RsvpStatus::parse_requested(other)
                .ok_or_else(|| format!("unknown RSVP status: {}", other)),
        }
    }
}
