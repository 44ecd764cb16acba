use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use search_agent::config::Config;

pub const GROQ_PATH: &str = "/openai/v1/chat/completions";
pub const ARXIV_PATH: &str = "/arxiv/api/query";
pub const WIKIPEDIA_PATH: &str = "/wiki/w/api.php";
pub const DUCKDUCKGO_PATH: &str = "/ddg/html/";

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// YAML config pointing every external service at the mock server
#[allow(dead_code)]
pub fn mock_config_yaml(server: &MockServer) -> String {
    let uri = server.uri();
    format!(
        "provider:\n  groq:\n    api_base: \"{uri}/openai/v1\"\n\
         retrieval:\n  arxiv:\n    api_base: \"{uri}{arxiv}\"\n  \
         wikipedia:\n    api_base: \"{uri}{wiki}\"\n  \
         duckduckgo:\n    api_base: \"{uri}{ddg}\"\n",
        uri = uri,
        arxiv = ARXIV_PATH,
        wiki = WIKIPEDIA_PATH,
        ddg = DUCKDUCKGO_PATH,
    )
}

/// Same as [`mock_config_yaml`], as a parsed config
#[allow(dead_code)]
pub fn mock_config(server: &MockServer) -> Config {
    serde_yaml::from_str(&mock_config_yaml(server)).expect("mock config should parse")
}

/// OpenAI-style SSE body streaming the given deltas
#[allow(dead_code)]
pub fn sse_body(deltas: &[&str]) -> String {
    let mut body = String::new();
    for delta in deltas {
        let event = json!({"choices": [{"delta": {"content": delta}, "finish_reason": null}]});
        body.push_str(&format!("data: {}\n\n", event));
    }
    body.push_str("data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n");
    body.push_str("data: [DONE]\n\n");
    body
}

#[allow(dead_code)]
pub async fn mount_groq(server: &MockServer, deltas: &[&str], expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(GROQ_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(deltas), "text/event-stream"),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub async fn mount_arxiv(server: &MockServer, expected_calls: u64) {
    let feed = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All You Need</title>
    <summary>The dominant sequence transduction models are based on complex recurrent or convolutional neural networks.</summary>
    <author><name>Ashish Vaswani</name></author>
  </entry>
</feed>"#;

    Mock::given(method("GET"))
        .and(path(ARXIV_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(feed, "application/atom+xml"))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub async fn mount_wikipedia(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(WIKIPEDIA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": true,
            "query": {"pages": [
                {"pageid": 1208, "title": "Alan Turing", "index": 1,
                 "extract": "Alan Mathison Turing was an English mathematician and computer scientist."}
            ]}
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub async fn mount_duckduckgo(server: &MockServer, expected_calls: u64) {
    let html = r#"<html><body><div id="links">
  <div class="result"><a class="result__snippet" href="https://example.com">Paris is the capital of France.</a></div>
</div></body></html>"#;

    Mock::given(method("GET"))
        .and(path(DUCKDUCKGO_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .expect(expected_calls)
        .mount(server)
        .await;
}
