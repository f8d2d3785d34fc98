//! A chat view bound to a backend client.

use medai_client::Client;

use crate::view::{ChatView, SubmitRejected};

pub struct ChatSession {
    pub view: ChatView,
    client: Client,
}

impl ChatSession {
    pub fn new(client: Client, view: ChatView) -> Self {
        Self { view, client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Submit the current inputs and wait for the reply. Taking `&mut self`
    /// keeps at most one request in flight per session.
    pub async fn ask(&mut self) -> Result<(), SubmitRejected> {
        self.ask_with(|_| {}).await
    }

    /// Like [`ChatSession::ask`], calling `on_sending` once the view has entered
    /// the loading state (used to draw the loading indicator).
    pub async fn ask_with<F: FnOnce(&ChatView)>(&mut self, on_sending: F) -> Result<(), SubmitRejected> {
        let request = self.view.begin_submit()?;
        on_sending(&self.view);
        tracing::debug!(
            has_text = request.text_query.is_some(),
            has_file = request.file.is_some(),
            mode = %request.mode,
            "submitting"
        );
        let outcome = self.client.multimodal_chat(&request).await;
        self.view.finish_submit(outcome);
        Ok(())
    }
}
