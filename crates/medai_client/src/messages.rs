//! HTTP wire types for the MedAI backend. Requests are multipart forms, replies are JSON.

use serde::{Deserialize, Serialize};

use crate::upload::ImageUpload;

/// Client → server: `/multimodal_chat` form (`text_query`, `mode`, `file`).
#[derive(Debug, Clone, PartialEq)]
pub struct MultimodalRequest {
    pub text_query: Option<String>,
    pub mode: String,
    pub file: Option<ImageUpload>,
}

impl MultimodalRequest {
    /// Trims `text`; blank text is left out of the form entirely.
    pub fn new(text: &str, file: Option<ImageUpload>) -> Self {
        let trimmed = text.trim();
        Self {
            text_query: (!trimmed.is_empty()).then(|| trimmed.to_string()),
            mode: crate::config::DEFAULT_MODE.to_string(),
            file,
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text_query.is_none() && self.file.is_none()
    }
}

/// One named entity extracted by the backend's medical NER step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NerEntity {
    pub entity_group: String,
    pub score: f64,
    pub word: String,
}

impl NerEntity {
    /// Entities without a group or word are not shown.
    pub fn is_displayable(&self) -> bool {
        !self.entity_group.is_empty() && !self.word.is_empty()
    }

    pub fn group(&self) -> EntityGroup {
        EntityGroup::parse(&self.entity_group)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityGroup {
    Disease,
    Symptom,
    Drug,
    Anatomy,
    Procedure,
    Error,
    Other(String),
}

impl EntityGroup {
    pub fn parse(group: &str) -> Self {
        match group {
            "DISEASE" => EntityGroup::Disease,
            "SYMPTOM" => EntityGroup::Symptom,
            "DRUG" => EntityGroup::Drug,
            "ANATOMY" => EntityGroup::Anatomy,
            "PROCEDURE" => EntityGroup::Procedure,
            "ERROR" => EntityGroup::Error,
            other => EntityGroup::Other(other.to_string()),
        }
    }

    /// Display colour as `#rrggbb`.
    pub fn hex(&self) -> &'static str {
        match self {
            EntityGroup::Disease => "#ff6384",
            EntityGroup::Symptom => "#36a2eb",
            EntityGroup::Drug => "#ff9f40",
            EntityGroup::Anatomy => "#4bc0c0",
            EntityGroup::Procedure => "#9966ff",
            EntityGroup::Error => "#dc3545",
            EntityGroup::Other(_) => "#cccccc",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = &self.hex()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0xcc);
        (channel(0), channel(2), channel(4))
    }
}

/// Server → client: `/multimodal_chat` reply. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultimodalReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub ner_results: Vec<NerEntity>,
    pub source_documents: Vec<String>,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MultimodalReply {
    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref().filter(|a| !a.is_empty())
    }

    pub fn is_image_mode(&self) -> bool {
        self.mode.as_deref().is_some_and(|m| m.starts_with("image_"))
    }

    /// First returned image when the backend answered in an image mode.
    pub fn preview_image(&self) -> Option<&str> {
        if !self.is_image_mode() {
            return None;
        }
        self.images.first().map(String::as_str)
    }

    /// `message` when present, otherwise the mode the backend picked.
    pub fn status_line(&self) -> String {
        match self.message.as_deref().filter(|m| !m.is_empty()) {
            Some(message) => message.to_string(),
            None => format!("Mode: {}", self.mode.as_deref().unwrap_or("unknown")),
        }
    }

    pub fn displayable_entities(&self) -> impl Iterator<Item = &NerEntity> {
        self.ner_results.iter().filter(|e| e.is_displayable())
    }
}

/// Server → client: `/chat` reply (web RAG + NER).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextSearchReply {
    pub status: String,
    pub answer: String,
    pub source_documents: Vec<String>,
    pub ner_results: Vec<NerEntity>,
}

impl From<TextSearchReply> for MultimodalReply {
    fn from(r: TextSearchReply) -> Self {
        MultimodalReply {
            status: Some(r.status),
            mode: Some("text_rag".into()),
            answer: Some(r.answer),
            ner_results: r.ner_results,
            source_documents: r.source_documents,
            images: Vec::new(),
            message: None,
        }
    }
}

/// Server → client: `/search_image_web` reply. `results` are data URLs or image URLs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageSearchReply {
    pub status: String,
    pub results: Vec<String>,
    pub message: Option<String>,
}

impl From<ImageSearchReply> for MultimodalReply {
    fn from(r: ImageSearchReply) -> Self {
        MultimodalReply {
            status: Some(r.status),
            mode: Some("web_image_search".into()),
            answer: None,
            ner_results: Vec::new(),
            source_documents: Vec::new(),
            images: r.results,
            message: r.message,
        }
    }
}

/// Server → client: error body on non-2xx. FastAPI puts a string (or a list of
/// validation errors) in `detail`; some handlers use `message`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub detail: Option<serde_json::Value>,
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn describe(&self, status: u16) -> String {
        let detail = self.detail.as_ref().and_then(|d| match d {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });
        detail
            .or_else(|| self.message.clone().filter(|m| !m.is_empty()))
            .unwrap_or_else(|| format!("HTTP error! Status: {}", status))
    }
}
