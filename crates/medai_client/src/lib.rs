//! Shared MedAI chat client library (config, HTTP API, reply rendering).
//! Used by the `medai` CLI and the interactive `medai-chat` view.

pub mod client;
pub mod config;
pub mod images;
pub mod logging;
pub mod messages;
pub mod render;
pub mod upload;

pub use client::{Client, ClientError};
pub use config::{default_config_path, ApiSection, ChatSection, Config, ConfigError, ConfigSource};
pub use messages::{
    EntityGroup, ImageSearchReply, MultimodalReply, MultimodalRequest, NerEntity, TextSearchReply,
};
pub use render::{render_reply, render_status, RenderOptions};
pub use upload::{ImageUpload, UploadError};
