//! Blocking HTTP client for the longlist server.

use std::time::Duration;

use longlist_core::error::ErrorCode;
use longlist_core::model::{
    ErrorBody, Health, MoveAck, MoveRequest, NoteRequest, SelectionRequest, WriteAck,
};
use longlist_core::{ItemId, Page, StateDocument, StatePatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures talking to the server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server could not be reached or the connection broke.
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    /// The server answered with a non-2xx status.
    #[error("server returned {status} for {url}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// The body did not decode as the expected JSON.
    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl ClientError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Network { .. } => ErrorCode::NetworkFailure,
            Self::Status { status: 409, .. } => ErrorCode::VersionConflict,
            Self::Status { .. } | Self::Decode { .. } => ErrorCode::UnexpectedResponse,
        }
    }
}

/// Operations the client needs from the server.
///
/// [`HttpClient`] is the production implementation; tests drive the
/// client against an in-process store instead.
pub trait ListApi {
    fn fetch_items(&self, search: &str, offset: u64, limit: u64) -> Result<Page, ClientError>;
    fn read_state(&self) -> Result<StateDocument, ClientError>;
    fn merge_state(&self, patch: &StatePatch) -> Result<WriteAck, ClientError>;
    fn set_selected(&self, id: ItemId, selected: bool) -> Result<WriteAck, ClientError>;
    fn move_item(&self, source: ItemId, target: ItemId) -> Result<MoveAck, ClientError>;
    fn save_note(&self, id: ItemId, note: &str) -> Result<WriteAck, ClientError>;
    fn health(&self) -> Result<Health, ClientError>;
}

/// [`ListApi`] over HTTP using `ureq`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
    base: String,
}

impl HttpClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("longlist/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base: base_url.trim_end_matches('/').to_owned(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.url(path);
        decode(&url, self.agent.post(&url).send_json(body))
    }
}

fn get_json<T: DeserializeOwned>(request: ureq::Request) -> Result<T, ClientError> {
    let url = request.url().to_owned();
    decode(&url, request.call())
}

fn decode<T: DeserializeOwned>(
    url: &str,
    result: Result<ureq::Response, ureq::Error>,
) -> Result<T, ClientError> {
    match result {
        Ok(response) => response.into_json::<T>().map_err(|err| ClientError::Decode {
            url: url.to_owned(),
            reason: err.to_string(),
        }),
        Err(ureq::Error::Status(status, response)) => {
            let body = response.into_json::<ErrorBody>().ok();
            debug!(url, status, "server rejected request");
            Err(ClientError::Status {
                url: url.to_owned(),
                status,
                message: body
                    .as_ref()
                    .map_or_else(|| "no error body".to_owned(), |b| b.error.clone()),
                code: body.map(|b| b.code),
            })
        }
        Err(ureq::Error::Transport(transport)) => Err(ClientError::Network {
            url: url.to_owned(),
            reason: transport.to_string(),
        }),
    }
}

impl ListApi for HttpClient {
    #[instrument(level = "debug", skip(self))]
    fn fetch_items(&self, search: &str, offset: u64, limit: u64) -> Result<Page, ClientError> {
        let request = self
            .agent
            .get(&self.url("/api/items"))
            .query("search", search)
            .query("offset", &offset.to_string())
            .query("limit", &limit.to_string());
        get_json(request)
    }

    fn read_state(&self) -> Result<StateDocument, ClientError> {
        get_json(self.agent.get(&self.url("/api/state")))
    }

    fn merge_state(&self, patch: &StatePatch) -> Result<WriteAck, ClientError> {
        self.post_json("/api/state", patch)
    }

    fn set_selected(&self, id: ItemId, selected: bool) -> Result<WriteAck, ClientError> {
        self.post_json("/api/selection", &SelectionRequest { id, selected })
    }

    fn move_item(&self, source: ItemId, target: ItemId) -> Result<MoveAck, ClientError> {
        self.post_json(
            "/api/order/move",
            &MoveRequest {
                source_id: source,
                target_id: target,
            },
        )
    }

    fn save_note(&self, id: ItemId, note: &str) -> Result<WriteAck, ClientError> {
        self.post_json(
            "/api/notes",
            &NoteRequest {
                id,
                note: note.to_owned(),
            },
        )
    }

    fn health(&self) -> Result<Health, ClientError> {
        get_json(self.agent.get(&self.url("/api/health")))
    }
}
