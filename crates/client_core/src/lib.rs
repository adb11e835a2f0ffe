use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::GuestCount,
    error::ApiError,
    protocol::{RsvpPayload, RsvpTally, SubmitRsvpRequest},
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub mod countdown;

/// Backend collaborator the composer and guest list are wired to. The
/// production implementation talks HTTP to the rsvp server; tests inject
/// fakes.
#[async_trait]
pub trait RsvpBackend: Send + Sync {
    async fn submit(&self, request: SubmitRsvpRequest) -> Result<RsvpPayload, BackendError>;
    async fn list(&self) -> Result<Vec<RsvpPayload>, BackendError>;
}

#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("store unreachable: {0}")]
    Unreachable(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("store rejected request: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("a submission is already in flight")]
    InFlight,
    #[error("store unreachable: {0}")]
    Unreachable(String),
    #[error("store rejected submission: {0}")]
    Rejected(String),
}

impl From<BackendError> for SubmitError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unreachable(message) => Self::Unreachable(message),
            BackendError::PermissionDenied(message) | BackendError::Rejected(message) => {
                Self::Rejected(message)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("store unreachable: {0}")]
    Unreachable(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("store rejected query: {0}")]
    Rejected(String),
}

impl From<BackendError> for FetchError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unreachable(message) => Self::Unreachable(message),
            BackendError::PermissionDenied(message) => Self::PermissionDenied(message),
            BackendError::Rejected(message) => Self::Rejected(message),
        }
    }
}

/// Null object for contexts where no server is configured.
pub struct MissingBackend;

#[async_trait]
impl RsvpBackend for MissingBackend {
    async fn submit(&self, _request: SubmitRsvpRequest) -> Result<RsvpPayload, BackendError> {
        Err(BackendError::Unreachable("no backend configured".into()))
    }

    async fn list(&self) -> Result<Vec<RsvpPayload>, BackendError> {
        Err(BackendError::Unreachable("no backend configured".into()))
    }
}

pub struct HttpBackend {
    http: Client,
    server_url: String,
}

impl HttpBackend {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
        }
    }
}

#[async_trait]
impl RsvpBackend for HttpBackend {
    async fn submit(&self, request: SubmitRsvpRequest) -> Result<RsvpPayload, BackendError> {
        let response = self
            .http
            .post(format!("{}/rsvps", self.server_url))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn list(&self) -> Result<Vec<RsvpPayload>, BackendError> {
        let response = self
            .http
            .get(format!("{}/rsvps", self.server_url))
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }
}

fn transport_error(err: reqwest::Error) -> BackendError {
    BackendError::Unreachable(err.to_string())
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, BackendError> {
    let status = response.status();
    if status == reqwest::StatusCode::FORBIDDEN {
        return Err(BackendError::PermissionDenied(
            api_error_message(response).await,
        ));
    }
    if !status.is_success() {
        let message = api_error_message(response).await;
        return Err(BackendError::Rejected(format!("{status}: {message}")));
    }
    response
        .json()
        .await
        .map_err(|err| BackendError::Rejected(format!("invalid response payload: {err}")))
}

async fn api_error_message(response: reqwest::Response) -> String {
    match response.json::<ApiError>().await {
        Ok(err) => err.message,
        Err(_) => "unknown error".to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct FormSnapshot {
    pub name: String,
    pub guests: GuestCount,
    pub submit_in_flight: bool,
}

struct ComposerState {
    name: String,
    guests: GuestCount,
    submit_in_flight: bool,
}

/// The RSVP form, decoupled from any UI event mechanism. Holds the transient
/// name and guest count, clamps guest adjustments into [1, 10], and performs
/// at most one store write per successful submit.
pub struct RsvpComposer {
    backend: Arc<dyn RsvpBackend>,
    inner: Mutex<ComposerState>,
}

impl RsvpComposer {
    pub fn new(backend: Arc<dyn RsvpBackend>) -> Self {
        Self {
            backend,
            inner: Mutex::new(ComposerState {
                name: String::new(),
                guests: GuestCount::default(),
                submit_in_flight: false,
            }),
        }
    }

    pub async fn set_name(&self, name: impl Into<String>) {
        self.inner.lock().await.name = name.into();
    }

    pub async fn increment_guests(&self) {
        let mut guard = self.inner.lock().await;
        guard.guests = guard.guests.increment();
    }

    pub async fn decrement_guests(&self) {
        let mut guard = self.inner.lock().await;
        guard.guests = guard.guests.decrement();
    }

    pub async fn form(&self) -> FormSnapshot {
        let guard = self.inner.lock().await;
        FormSnapshot {
            name: guard.name.clone(),
            guests: guard.guests,
            submit_in_flight: guard.submit_in_flight,
        }
    }

    /// Submits the current form. A re-entrant call while a submission is
    /// outstanding is rejected without touching the store. On success the
    /// form resets (empty name, one guest); on failure it is preserved
    /// verbatim so the respondent does not retype.
    pub async fn submit(&self) -> Result<RsvpPayload, SubmitError> {
        let request = {
            let mut guard = self.inner.lock().await;
            if guard.submit_in_flight {
                return Err(SubmitError::InFlight);
            }
            let name = guard.name.trim().to_string();
            if name.is_empty() {
                return Err(SubmitError::EmptyName);
            }
            guard.submit_in_flight = true;
            SubmitRsvpRequest {
                name,
                guest_count: guard.guests.get(),
            }
        };

        let result = self.backend.submit(request).await;

        let mut guard = self.inner.lock().await;
        guard.submit_in_flight = false;
        match result {
            Ok(payload) => {
                guard.name.clear();
                guard.guests = GuestCount::default();
                info!(rsvp_id = payload.rsvp_id.0, "rsvp submitted");
                Ok(payload)
            }
            Err(err) => {
                warn!(%err, "rsvp submission failed; form preserved");
                Err(err.into())
            }
        }
    }
}

/// One completed fetch: the ordered responses plus the tally recomputed
/// from them.
#[derive(Debug, Clone, Default)]
pub struct GuestListSnapshot {
    pub responses: Vec<RsvpPayload>,
    pub tally: RsvpTally,
}

impl GuestListSnapshot {
    /// Ordinals `#1..#N` following the descending-time order the store
    /// returned.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &RsvpPayload)> {
        self.responses
            .iter()
            .enumerate()
            .map(|(index, payload)| (index + 1, payload))
    }
}

struct GuestListState {
    fetch_generation: u64,
    snapshot: GuestListSnapshot,
}

/// The read-only guest list. `refresh` is idempotent and side-effect-free on
/// the store; retry is just calling it again. Responses from superseded
/// fetches are discarded rather than applied (last request wins).
pub struct GuestList {
    backend: Arc<dyn RsvpBackend>,
    inner: Mutex<GuestListState>,
}

impl GuestList {
    pub fn new(backend: Arc<dyn RsvpBackend>) -> Self {
        Self {
            backend,
            inner: Mutex::new(GuestListState {
                fetch_generation: 0,
                snapshot: GuestListSnapshot::default(),
            }),
        }
    }

    pub async fn snapshot(&self) -> GuestListSnapshot {
        self.inner.lock().await.snapshot.clone()
    }

    pub async fn refresh(&self) -> Result<GuestListSnapshot, FetchError> {
        let generation = {
            let mut guard = self.inner.lock().await;
            guard.fetch_generation += 1;
            guard.fetch_generation
        };

        let result = self.backend.list().await;

        let mut guard = self.inner.lock().await;
        match result {
            Ok(responses) => {
                let snapshot = GuestListSnapshot {
                    tally: RsvpTally::from_payloads(&responses),
                    responses,
                };
                if generation == guard.fetch_generation {
                    guard.snapshot = snapshot.clone();
                } else {
                    // A newer refresh was issued while this one was in
                    // flight; its result must not clobber the newer one.
                    info!(generation, "discarding stale guest list response");
                }
                Ok(snapshot)
            }
            Err(err) => {
                warn!(%err, "guest list refresh failed; previous snapshot kept");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
