//! State of the single chat view: inputs, status line, loading flag and last reply.
//! The async request itself lives in [`crate::session`]; this module only
//! performs the state transitions around it.

use medai_client::{ClientError, ImageUpload, MultimodalReply, MultimodalRequest};
use thiserror::Error;

pub const WELCOME_STATUS: &str = "Welcome! Type a question and/or upload an image.";
pub const EMPTY_INPUT_STATUS: &str = "Please enter a question or upload an image.";
pub const SENDING_STATUS: &str = "Sending multimodal query to chatbot...";

/// Why a submit did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a request is already in flight")]
    Busy,
    #[error("{}", EMPTY_INPUT_STATUS)]
    EmptyInput,
}

#[derive(Debug, Clone)]
pub struct ChatView {
    text: String,
    selected_file: Option<ImageUpload>,
    status: String,
    results: Option<MultimodalReply>,
    preview: Option<String>,
    loading: bool,
    mode: String,
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            selected_file: None,
            status: WELCOME_STATUS.to_string(),
            results: None,
            preview: None,
            loading: false,
            mode: medai_client::config::DEFAULT_MODE.to_string(),
        }
    }

    /// Mode hint sent with every request.
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Choose (or clear) the image to upload with the next submit.
    pub fn select_file(&mut self, file: Option<ImageUpload>) {
        self.preview = None;
        if let Some(f) = &file {
            self.status = format!("Selected file: {}", f.file_name);
        }
        self.selected_file = file;
    }

    /// Replace the status line, e.g. to report a local failure.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Start a submit: validates inputs and switches into the loading state.
    pub fn begin_submit(&mut self) -> Result<MultimodalRequest, SubmitRejected> {
        if self.loading {
            return Err(SubmitRejected::Busy);
        }
        if self.text.trim().is_empty() && self.selected_file.is_none() {
            self.status = EMPTY_INPUT_STATUS.to_string();
            return Err(SubmitRejected::EmptyInput);
        }

        self.loading = true;
        self.results = None;
        self.preview = None;
        self.status = SENDING_STATUS.to_string();

        Ok(MultimodalRequest::new(&self.text, self.selected_file.clone()).with_mode(self.mode.clone()))
    }

    /// Finish the in-flight submit with the backend's outcome.
    pub fn finish_submit(&mut self, outcome: Result<MultimodalReply, ClientError>) {
        match outcome {
            Ok(reply) => {
                self.status = reply.status_line();
                self.preview = reply.preview_image().map(str::to_string);
                self.results = Some(reply);
                self.text.clear();
                self.selected_file = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "multimodal chat failed");
                self.status = format!("An error occurred in multimodal chat: {}", err);
            }
        }
        self.loading = false;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selected_file(&self) -> Option<&ImageUpload> {
        self.selected_file.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn results(&self) -> Option<&MultimodalReply> {
        self.results.as_ref()
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_error(&self) -> bool {
        medai_client::render::is_error_status(&self.status)
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            "Thinking..."
        } else {
            "Ask Chatbot"
        }
    }
}
