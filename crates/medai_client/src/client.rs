//! HTTP client for the MedAI backend: `/multimodal_chat`, `/chat`, `/search_image_web`.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::messages::{
    ErrorBody, ImageSearchReply, MultimodalReply, MultimodalRequest, TextSearchReply,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please enter a question or upload an image.")]
    EmptyRequest,

    /// Non-2xx reply; `message` is the backend's `detail`/`message` or a generic status line.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid reply from server: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Backend client. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send whatever non-empty inputs exist to `/multimodal_chat`.
    pub async fn multimodal_chat(
        &self,
        request: &MultimodalRequest,
    ) -> Result<MultimodalReply, ClientError> {
        if request.is_empty() {
            return Err(ClientError::EmptyRequest);
        }
        let mut form = Form::new();
        if let Some(text) = &request.text_query {
            form = form.text("text_query", text.clone());
        }
        form = form.text("mode", request.mode.clone());
        if let Some(file) = &request.file {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime)?;
            form = form.part("file", part);
        }
        self.post_form("/multimodal_chat", form).await
    }

    /// Text-only web RAG + NER via `/chat`.
    pub async fn chat(&self, text_query: &str) -> Result<TextSearchReply, ClientError> {
        let text_query = text_query.trim();
        if text_query.is_empty() {
            return Err(ClientError::EmptyRequest);
        }
        let form = Form::new().text("text_query", text_query.to_string());
        self.post_form("/chat", form).await
    }

    /// Web image search via `/search_image_web`.
    pub async fn search_image_web(&self, query: &str) -> Result<ImageSearchReply, ClientError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ClientError::EmptyRequest);
        }
        let form = Form::new().text("query", query.to_string());
        self.post_form("/search_image_web", form).await
    }

    async fn post_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "sending request");

        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(%url, status = status.as_u16(), bytes = body.len(), "reply received");

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .unwrap_or_default()
                .describe(status.as_u16());
            tracing::warn!(%url, status = status.as_u16(), %message, "backend returned an error");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(%url, error = %e, "could not decode reply");
            ClientError::Decode(e)
        })
    }
}
