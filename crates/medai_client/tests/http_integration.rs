//! Integration tests for the HTTP client against a real in-process server (no mocks).

mod common;

use std::time::Duration;

use common::spawn_json_server;
use medai_client::{Client, ClientError, ImageUpload, MultimodalRequest};

const RAG_REPLY: &str = r#"{
    "status": "success",
    "mode": "text_rag",
    "answer": "Common symptoms include a high temperature and chills.",
    "ner_results": [{"entity_group": "SYMPTOM", "score": 0.91, "word": "chills"}],
    "source_documents": ["Fever is a temporary increase in body temperature."],
    "images": []
}"#;

fn client_for(url: &str) -> Client {
    Client::new(url, Duration::from_secs(5)).expect("client should build")
}

#[tokio::test]
async fn multimodal_chat_sends_text_and_mode() {
    let server = spawn_json_server(200, RAG_REPLY);
    let client = client_for(&server.url);

    let request = MultimodalRequest::new("  What are the symptoms of fever?  ", None);
    let reply = client
        .multimodal_chat(&request)
        .await
        .expect("query should succeed");

    assert_eq!(
        reply.answer(),
        Some("Common symptoms include a high temperature and chills.")
    );
    assert_eq!(reply.ner_results.len(), 1);
    assert_eq!(reply.source_documents.len(), 1);
    assert_eq!(reply.status_line(), "Mode: text_rag");

    let captured = server.next_request();
    assert_eq!(captured.method, "POST");
    assert_eq!(captured.path, "/multimodal_chat");
    assert!(captured
        .header("content-type")
        .unwrap_or_default()
        .starts_with("multipart/form-data"));
    assert_eq!(
        captured.form_field("text_query").as_deref(),
        Some("What are the symptoms of fever?")
    );
    assert_eq!(captured.form_field("mode").as_deref(), Some("auto"));
    assert!(captured.file("file").is_none());
}

#[tokio::test]
async fn multimodal_chat_uploads_image_without_text() {
    let server = spawn_json_server(
        200,
        r#"{"mode":"image_to_image","images":["data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7"],"message":"Similar images found."}"#,
    );
    let client = client_for(&server.url);

    let upload = ImageUpload::from_bytes("xray.png", "image/png", b"PNGDATA".to_vec());
    let request = MultimodalRequest::new("", Some(upload));
    let reply = client
        .multimodal_chat(&request)
        .await
        .expect("query should succeed");

    assert!(reply.is_image_mode());
    assert!(reply.preview_image().is_some());
    assert_eq!(reply.status_line(), "Similar images found.");

    let captured = server.next_request();
    assert!(captured.form_field("text_query").is_none());
    let file = captured.file("file").expect("file part should be sent");
    assert_eq!(file.file_name.as_deref(), Some("xray.png"));
    assert_eq!(file.content_type.as_deref(), Some("image/png"));
    assert_eq!(file.data, b"PNGDATA");
    assert_eq!(captured.form_field("mode").as_deref(), Some("auto"));
}

#[tokio::test]
async fn chat_endpoint_posts_text_query() {
    let server = spawn_json_server(200, RAG_REPLY);
    let client = client_for(&server.url);

    let reply = client.chat("fever").await.expect("chat should succeed");
    assert_eq!(reply.status, "success");
    assert_eq!(reply.ner_results[0].word, "chills");

    let captured = server.next_request();
    assert_eq!(captured.path, "/chat");
    assert_eq!(captured.form_field("text_query").as_deref(), Some("fever"));
}

#[tokio::test]
async fn image_search_posts_query_field() {
    let server = spawn_json_server(
        200,
        r#"{"status":"success","results":["https://img.example/pneumonia.png"],"message":null}"#,
    );
    let client = client_for(&server.url);

    let reply = client
        .search_image_web("pneumonia x-ray")
        .await
        .expect("search should succeed");
    assert_eq!(reply.results, vec!["https://img.example/pneumonia.png"]);
    assert!(reply.message.is_none());

    let captured = server.next_request();
    assert_eq!(captured.path, "/search_image_web");
    assert_eq!(captured.form_field("query").as_deref(), Some("pneumonia x-ray"));
}

#[tokio::test]
async fn error_detail_is_surfaced() {
    let server = spawn_json_server(400, r#"{"detail":"Please provide a text query."}"#);
    let client = client_for(&server.url);

    let err = client.chat("fever").await.unwrap_err();
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Please provide a text query.");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_falls_back_to_status_line() {
    let server = spawn_json_server(500, "upstream exploded");
    let client = client_for(&server.url);

    let request = MultimodalRequest::new("fever", None);
    let err = client.multimodal_chat(&request).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP error! Status: 500");
}

#[tokio::test]
async fn undecodable_success_body_is_a_decode_error() {
    let server = spawn_json_server(200, "not json");
    let client = client_for(&server.url);

    let request = MultimodalRequest::new("fever", None);
    let err = client.multimodal_chat(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn server_down_is_an_http_error() {
    let port = common::free_port();
    let client = client_for(&format!("http://127.0.0.1:{}", port));

    let request = MultimodalRequest::new("fever", None);
    let err = client.multimodal_chat(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)), "got {err:?}");
}
