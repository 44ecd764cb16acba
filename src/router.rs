//! Source router
//!
//! Picks one retrieval tool per question by keyword and fetches its
//! context. Classification is a pure function of the question text;
//! only [`SourceRouter::route`] touches the network.

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::retrieval::{
    ArxivRetriever, DuckDuckGoRetriever, Retriever, Source, WikipediaRetriever,
};
use serde::Serialize;

/// Keywords that send a question to the paper index
const ACADEMIC_KEYWORDS: &[&str] = &["arxiv", "paper", "research"];

/// Keywords that send a question to the encyclopedia
const ENCYCLOPEDIA_KEYWORDS: &[&str] = &["wikipedia", "who is", "define"];

/// Pick the retrieval source for a question
///
/// Case-insensitive substring match, first rule wins. Every input maps to
/// a source; anything unmatched (the empty string included) goes to web
/// search.
///
/// # Examples
///
/// ```
/// use search_agent::retrieval::Source;
/// use search_agent::router::classify;
///
/// assert_eq!(classify("Explain this research paper on transformers"), Source::Arxiv);
/// assert_eq!(classify("Who is Alan Turing?"), Source::Wikipedia);
/// assert_eq!(classify("What is the capital of France?"), Source::DuckDuckGo);
/// assert_eq!(classify(""), Source::DuckDuckGo);
/// ```
pub fn classify(question: &str) -> Source {
    let lowered = question.to_lowercase();
    let matches_any = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

    if matches_any(ACADEMIC_KEYWORDS) {
        Source::Arxiv
    } else if matches_any(ENCYCLOPEDIA_KEYWORDS) {
        Source::Wikipedia
    } else {
        Source::DuckDuckGo
    }
}

/// Context fetched for one turn and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterResult {
    /// Snippet handed to the answer composer
    pub context: String,
    /// Service that produced the snippet; drives the citation
    pub source: Source,
}

/// Owns the three retrieval tools and dispatches to one per question
pub struct SourceRouter {
    arxiv: Box<dyn Retriever>,
    wikipedia: Box<dyn Retriever>,
    web: Box<dyn Retriever>,
}

impl SourceRouter {
    /// Build a router from explicit tools
    pub fn new(
        arxiv: Box<dyn Retriever>,
        wikipedia: Box<dyn Retriever>,
        web: Box<dyn Retriever>,
    ) -> Self {
        Self {
            arxiv,
            wikipedia,
            web,
        }
    }

    /// Build a router with the HTTP-backed tools from configuration
    ///
    /// # Errors
    ///
    /// Returns error if any tool's HTTP client cannot be built
    pub fn from_config(config: &RetrievalConfig) -> Result<Self> {
        Ok(Self::new(
            Box::new(ArxivRetriever::new(config.arxiv.clone())?),
            Box::new(WikipediaRetriever::new(config.wikipedia.clone())?),
            Box::new(DuckDuckGoRetriever::new(config.duckduckgo.clone())?),
        ))
    }

    fn retriever_for(&self, source: Source) -> &dyn Retriever {
        match source {
            Source::Arxiv => self.arxiv.as_ref(),
            Source::Wikipedia => self.wikipedia.as_ref(),
            Source::DuckDuckGo => self.web.as_ref(),
        }
    }

    /// Classify the question and fetch context from the chosen tool
    ///
    /// Exactly one retrieval call is made. Its failure is returned as-is.
    pub async fn route(&self, question: &str) -> Result<RouterResult> {
        let source = classify(question);
        tracing::debug!("Routing question to {}", source);

        let context = self.retriever_for(source).fetch(question).await?;
        metrics::increment_counter!(
            "search_agent_retrievals_total",
            "source" => source.label()
        );
        tracing::debug!("Retrieved {} chars from {}", context.chars().count(), source);

        Ok(RouterResult { context, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchAgentError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubRetriever {
        source: Source,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Retriever for StubRetriever {
        fn source(&self) -> Source {
            self.source
        }

        async fn fetch(&self, question: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SearchAgentError::retrieval(self.source.label(), "offline").into());
            }
            Ok(format!("{} context for {}", self.source, question))
        }
    }

    fn stub_router(fail: bool) -> (SourceRouter, [Arc<AtomicUsize>; 3]) {
        let counters = [
            Arc::new(AtomicUsize::new(0)),
            Arc::new(AtomicUsize::new(0)),
            Arc::new(AtomicUsize::new(0)),
        ];
        let make = |source, calls: &Arc<AtomicUsize>| -> Box<dyn Retriever> {
            Box::new(StubRetriever {
                source,
                calls: Arc::clone(calls),
                fail,
            })
        };
        let router = SourceRouter::new(
            make(Source::Arxiv, &counters[0]),
            make(Source::Wikipedia, &counters[1]),
            make(Source::DuckDuckGo, &counters[2]),
        );
        (router, counters)
    }

    #[test]
    fn test_classify_scenarios() {
        assert_eq!(classify("What is the capital of France?"), Source::DuckDuckGo);
        assert_eq!(
            classify("Explain this research paper on transformers"),
            Source::Arxiv
        );
        assert_eq!(classify("Who is Alan Turing?"), Source::Wikipedia);
        assert_eq!(classify(""), Source::DuckDuckGo);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("latest ARXIV uploads"), Source::Arxiv);
        assert_eq!(classify("DEFINE entropy"), Source::Wikipedia);
        assert_eq!(classify("WiKiPeDiA article on Rust"), Source::Wikipedia);
    }

    #[test]
    fn test_academic_keywords_take_precedence() {
        assert_eq!(classify("who is the author of this paper"), Source::Arxiv);
        assert_eq!(classify("define research"), Source::Arxiv);
        assert_eq!(classify("wikipedia page about arxiv"), Source::Arxiv);
    }

    #[test]
    fn test_substring_matches_inside_words() {
        assert_eq!(classify("newspaper headlines today"), Source::Arxiv);
        assert_eq!(classify("undefined behaviour in C"), Source::Wikipedia);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let question = "Who is Grace Hopper?";
        assert_eq!(classify(question), classify(question));
        assert_eq!(classify(question), classify(&question.to_uppercase()));
    }

    #[tokio::test]
    async fn test_route_calls_exactly_one_tool() {
        let (router, counters) = stub_router(false);

        let result = router.route("Who is Alan Turing?").await.unwrap();
        assert_eq!(result.source, Source::Wikipedia);
        assert_eq!(result.context, "Wikipedia context for Who is Alan Turing?");

        assert_eq!(counters[0].load(Ordering::SeqCst), 0);
        assert_eq!(counters[1].load(Ordering::SeqCst), 1);
        assert_eq!(counters[2].load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_route_empty_question_goes_to_web() {
        let (router, counters) = stub_router(false);
        let result = router.route("").await.unwrap();
        assert_eq!(result.source, Source::DuckDuckGo);
        assert_eq!(counters[2].load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_route_propagates_retrieval_failure() {
        let (router, _) = stub_router(true);
        let err = router.route("arxiv diffusion").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SearchAgentError>(),
            Some(SearchAgentError::Retrieval { service, .. }) if service == "arXiv"
        ));
    }
}
