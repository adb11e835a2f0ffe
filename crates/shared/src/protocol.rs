use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{EventId, RsvpId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRsvpRequest {
    pub name: String,
    pub guest_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsvpPayload {
    pub rsvp_id: RsvpId,
    pub event_id: EventId,
    pub name: String,
    /// Absent on legacy rows written before guest counts were collected;
    /// such rows aggregate as zero guests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<u32>,
    pub submitted_at: DateTime<Utc>,
}

/// Derived aggregate over one fetched response list. Recomputed from the
/// list on every fetch, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpTally {
    pub total_responses: u32,
    pub total_guests: u32,
}

impl RsvpTally {
    pub fn from_payloads(payloads: &[RsvpPayload]) -> Self {
        Self {
            total_responses: payloads.len() as u32,
            total_guests: payloads
                .iter()
                .map(|payload| payload.guest_count.unwrap_or(0))
                .sum(),
        }
    }
}
