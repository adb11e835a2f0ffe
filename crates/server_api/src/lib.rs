use shared::{
    domain::{EventId, GuestCount},
    error::{ApiError, ErrorCode},
    protocol::RsvpPayload,
};
use storage::{RsvpStore, Storage, StoredRsvp};
use tracing::{info, warn};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
    pub event_id: EventId,
}

/// Trims the name, clamps the guest count into [1, 10], attaches the
/// context's event id and performs exactly one insert. A whitespace-only
/// name fails validation before the store is touched.
pub async fn submit_rsvp(
    ctx: &ApiContext,
    name: &str,
    guest_count: u32,
) -> Result<RsvpPayload, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::new(ErrorCode::Validation, "name cannot be empty"));
    }
    let guest_count = GuestCount::new(guest_count);

    let stored = ctx
        .storage
        .insert_rsvp(&ctx.event_id, name, guest_count.get())
        .await
        .map_err(unavailable)?;
    info!(
        rsvp_id = stored.rsvp_id.0,
        guest_count = guest_count.get(),
        "rsvp stored"
    );
    Ok(payload_from(stored))
}

/// Full response list for the context's event, newest first. Side-effect
/// free; callers retry by calling again.
pub async fn list_rsvps(ctx: &ApiContext) -> Result<Vec<RsvpPayload>, ApiError> {
    let rows = ctx
        .storage
        .list_rsvps_for_event(&ctx.event_id)
        .await
        .map_err(unavailable)?;
    Ok(rows.into_iter().map(payload_from).collect())
}

fn payload_from(row: StoredRsvp) -> RsvpPayload {
    RsvpPayload {
        rsvp_id: row.rsvp_id,
        event_id: row.event_id,
        name: row.name,
        guest_count: row.guest_count.and_then(|n| u32::try_from(n).ok()),
        submitted_at: row.submitted_at,
    }
}

fn unavailable(err: anyhow::Error) -> ApiError {
    warn!(%err, "storage operation failed");
    ApiError::new(ErrorCode::Unavailable, err.to_string())
}
