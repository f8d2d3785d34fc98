//! Terminal rendering of backend replies and status lines.

use std::fmt::Write as _;

use colored::Colorize;

use crate::config::DEFAULT_MAX_IMAGES;
use crate::images;
use crate::messages::{MultimodalReply, NerEntity};

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub color: bool,
    pub max_images: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: false,
            max_images: DEFAULT_MAX_IMAGES,
        }
    }
}

/// A status counts as an error when it mentions "error" in any case.
pub fn is_error_status(status: &str) -> bool {
    status.to_lowercase().contains("error")
}

pub fn render_status(status: &str, opts: &RenderOptions) -> String {
    if opts.color && is_error_status(status) {
        status.red().to_string()
    } else {
        status.to_string()
    }
}

fn heading(text: &str, opts: &RenderOptions) -> String {
    if opts.color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn entity_label(entity: &NerEntity, opts: &RenderOptions) -> String {
    let label = format!("{} ({})", entity.word, entity.entity_group);
    if opts.color {
        let (r, g, b) = entity.group().rgb();
        label.truecolor(r, g, b).bold().to_string()
    } else {
        label
    }
}

/// Render the answer, entities, snippets and images of a reply.
pub fn render_reply(reply: &MultimodalReply, opts: &RenderOptions) -> String {
    let mut out = String::new();

    if let Some(preview) = reply.preview_image() {
        let _ = writeln!(out, "{}", heading("Uploaded Image Preview:", opts));
        let _ = writeln!(out, "  {}", images::summarize(preview));
        let _ = writeln!(out);
    }

    if let Some(answer) = reply.answer() {
        let _ = writeln!(out, "{}", heading("AI Generated Answer:", opts));
        let _ = writeln!(out, "{}", answer);

        // The heading follows the raw list even when every entity is filtered out.
        if !reply.ner_results.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", heading("Extracted Medical Entities (NLP)", opts));
            for entity in reply.displayable_entities() {
                let _ = writeln!(
                    out,
                    "  {}  confidence {:.4}",
                    entity_label(entity, opts),
                    entity.score
                );
            }
        }

        if !reply.source_documents.is_empty() {
            let _ = writeln!(out);
            let title = format!(
                "Web Snippets Used for Context ({})",
                reply.source_documents.len()
            );
            let _ = writeln!(out, "{}", heading(&title, opts));
            for (i, doc) in reply.source_documents.iter().enumerate() {
                let _ = writeln!(out, "--- Web Snippet {} ---", i + 1);
                let _ = writeln!(out, "{}", doc);
            }
        }
    }

    let shown: Vec<&String> = reply
        .images
        .iter()
        .filter(|src| !src.is_empty())
        .take(opts.max_images)
        .collect();
    if !shown.is_empty() {
        if !out.is_empty() {
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "{}", heading("Images:", opts));
        for (i, src) in shown.into_iter().enumerate() {
            let _ = writeln!(out, "  Result {}: {}", i + 1, images::summarize(src));
        }
    }

    out
}
