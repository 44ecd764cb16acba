//! End-to-end turns through the library against mocked services

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use search_agent::chat::Renderer;
use search_agent::commands::build_engine;
use search_agent::credentials::ApiKey;
use search_agent::session::{ChatMessage, Role};
use search_agent::{Session, Source};

mod common;

#[derive(Default)]
struct CapturingRenderer {
    answer: String,
    citations: Vec<Source>,
    errors: Vec<String>,
}

impl Renderer for CapturingRenderer {
    fn transcript_entry(&mut self, _message: &ChatMessage) {}

    fn routing(&mut self, _source: Source) {}

    fn fragment(&mut self, text: &str) {
        self.answer.push_str(text);
    }

    fn citation(&mut self, source: Source) {
        self.citations.push(source);
    }

    fn error(&mut self, error: &anyhow::Error) {
        self.errors.push(error.to_string());
    }
}

/// A web question hits DuckDuckGo once and the model once, with the
/// retrieved snippet embedded in the human turn
#[tokio::test]
async fn test_web_turn_streams_answer_with_citation() {
    let server = MockServer::start().await;
    let config = common::mock_config(&server);

    common::mount_duckduckgo(&server, 1).await;
    common::mount_arxiv(&server, 0).await;
    common::mount_wikipedia(&server, 0).await;

    Mock::given(method("POST"))
        .and(path(common::GROQ_PATH))
        .and(header("authorization", "Bearer gsk_integration"))
        .and(body_partial_json(json!({
            "stream": true,
            "messages": [
                {"role": "system", "content": config.chat.system_prompt},
                {"role": "user", "content": "Context:\nParis is the capital of France.\n\nQuestion:\nWhat is the capital of France?"}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(common::sse_body(&["The capital ", "is Paris."]), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let engine = build_engine(&config, ApiKey::new("gsk_integration").unwrap()).unwrap();
    let mut session = Session::new(config.chat.greeting.clone());
    let mut renderer = CapturingRenderer::default();

    let source = engine
        .run_turn(&mut session, "What is the capital of France?", &mut renderer)
        .await
        .unwrap();

    assert_eq!(source, Source::DuckDuckGo);
    assert_eq!(renderer.answer, "The capital is Paris.");
    assert_eq!(renderer.citations, vec![Source::DuckDuckGo]);
    assert!(renderer.errors.is_empty());

    assert_eq!(session.len(), 3);
    let stored = &session.messages()[2];
    assert_eq!(stored.role, Role::Assistant);
    assert_eq!(stored.content, "The capital is Paris.");
    assert_eq!(stored.source, Some(Source::DuckDuckGo));
}

/// Each turn makes exactly one retrieval call, to the routed service
#[tokio::test]
async fn test_one_retrieval_per_turn_across_sources() {
    let server = MockServer::start().await;
    let config = common::mock_config(&server);

    common::mount_arxiv(&server, 1).await;
    common::mount_wikipedia(&server, 1).await;
    common::mount_duckduckgo(&server, 1).await;
    common::mount_groq(&server, &["a", "b", "c", "d"], 3).await;

    let engine = build_engine(&config, ApiKey::new("gsk_integration").unwrap()).unwrap();
    let mut session = Session::new(config.chat.greeting.clone());
    let mut renderer = CapturingRenderer::default();

    let questions = [
        ("Explain this research paper on transformers", Source::Arxiv),
        ("Who is Alan Turing?", Source::Wikipedia),
        ("What is the capital of France?", Source::DuckDuckGo),
    ];

    for (question, expected) in questions {
        let source = engine
            .run_turn(&mut session, question, &mut renderer)
            .await
            .unwrap();
        assert_eq!(source, expected);
    }

    assert_eq!(session.len(), 2 * questions.len() + 1);
    assert_eq!(
        renderer.citations,
        vec![Source::Arxiv, Source::Wikipedia, Source::DuckDuckGo]
    );
    assert!(session
        .messages()
        .iter()
        .all(|m| !m.content.contains("Source:")));
}

/// A failing lookup aborts the turn before the model is called
#[tokio::test]
async fn test_retrieval_outage_skips_generation() {
    let server = MockServer::start().await;
    let config = common::mock_config(&server);

    Mock::given(method("GET"))
        .and(path(common::WIKIPEDIA_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    common::mount_groq(&server, &["unused"], 0).await;

    let engine = build_engine(&config, ApiKey::new("gsk_integration").unwrap()).unwrap();
    let mut session = Session::new(config.chat.greeting.clone());
    let mut renderer = CapturingRenderer::default();

    let err = engine
        .run_turn(&mut session, "define entropy", &mut renderer)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Wikipedia"));
    assert!(renderer.citations.is_empty());
    assert_eq!(session.len(), 2);
}

/// A rejected key surfaces as an authentication error after one request
#[tokio::test]
async fn test_rejected_key_aborts_turn() {
    let server = MockServer::start().await;
    let config = common::mock_config(&server);

    common::mount_duckduckgo(&server, 1).await;
    Mock::given(method("POST"))
        .and(path(common::GROQ_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API Key"))
        .expect(1)
        .mount(&server)
        .await;

    let engine = build_engine(&config, ApiKey::new("gsk_bad").unwrap()).unwrap();
    let mut session = Session::new(config.chat.greeting.clone());
    let mut renderer = CapturingRenderer::default();

    let err = engine
        .run_turn(&mut session, "weather in Oslo", &mut renderer)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Authentication"));
    assert!(renderer.answer.is_empty());
    assert!(renderer.citations.is_empty());
}
