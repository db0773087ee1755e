//! Profile store client: the single point of entry for remote profile writes.
//!
//! The request is a full-record `PUT {base}/doctors/{id}`; there is no
//! partial update. There is also no retry: a failed write is reported once
//! and the caller decides whether to submit again.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::models::DoctorId;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Profile update rejected (status {status})")]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Could not encode draft: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("No profile loaded to submit to")]
    MissingTarget,

    #[error("A submission is already in flight")]
    AlreadySubmitting,
}

impl SubmitError {
    /// The string shown to the user: the remote's own message when it sent
    /// one, otherwise a generic description.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            SubmitError::Rejected { status, .. } => {
                format!("Profile update failed (status {status})")
            }
            SubmitError::Http(e) => e.to_string(),
            SubmitError::MalformedResponse(_) => {
                "Unexpected response from the profile service".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Body of every reply from the profile service, success or not.
#[derive(Debug, Deserialize)]
struct RemoteReply {
    success: Option<bool>,
    message: Option<String>,
}

/// Remote write seam. Returns the confirmation message on success.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn update_profile(&self, id: &DoctorId, payload: &Value) -> Result<String, SubmitError>;
}

#[derive(Clone)]
pub struct HttpProfileStore {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpProfileStore {
    pub fn new(config: &Config) -> Result<Self, SubmitError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.api_base_url.clone(),
            token: config.api_token.clone(),
        })
    }

    pub fn profile_url(&self, id: &DoctorId) -> String {
        format!("{}/doctors/{}", self.base_url, id)
    }
}

#[async_trait]
impl ProfileStore for HttpProfileStore {
    async fn update_profile(&self, id: &DoctorId, payload: &Value) -> Result<String, SubmitError> {
        let url = self.profile_url(id);
        debug!("PUT {url}");

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        classify_reply(status, &body)
    }
}

/// Maps a raw reply onto the success/failure split.
///
/// A 2xx reply must still be JSON carrying a `message`; anything else is
/// treated as a failure. An explicit `"success": false` also fails.
fn classify_reply(status: StatusCode, body: &str) -> Result<String, SubmitError> {
    let reply = serde_json::from_str::<RemoteReply>(body);

    if !status.is_success() {
        return Err(SubmitError::Rejected {
            status: status.as_u16(),
            message: reply.ok().and_then(|r| r.message),
        });
    }

    let reply = reply.map_err(|e| SubmitError::MalformedResponse(e.to_string()))?;
    if reply.success == Some(false) {
        return Err(SubmitError::Rejected {
            status: status.as_u16(),
            message: reply.message,
        });
    }

    reply
        .message
        .ok_or_else(|| SubmitError::MalformedResponse("reply carried no message".to_string()))
}
