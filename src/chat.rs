//! Presentation loop for a single turn
//!
//! A turn moves Idle → Routing → Streaming → Idle. The question is routed
//! once; the resulting [`RouterResult`](crate::router::RouterResult) is
//! carried through streaming and supplies the citation shown under the
//! answer. Output goes through a [`Renderer`] so the same turn logic
//! drives the terminal and the tests.

use crate::composer::AnswerComposer;
use crate::error::Result;
use crate::retrieval::Source;
use crate::router::{classify, SourceRouter};
use crate::session::{ChatMessage, Role, Session};
use crate::telemetry::TurnMetrics;
use futures::StreamExt;
use std::fmt;
use std::io::Write;

/// Where a turn currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Waiting for input
    Idle,
    /// Fetching context from the chosen source
    Routing,
    /// Receiving answer fragments
    Streaming,
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnState::Idle => write!(f, "idle"),
            TurnState::Routing => write!(f, "routing"),
            TurnState::Streaming => write!(f, "streaming"),
        }
    }
}

/// Display surface for transcript entries and streamed answers
pub trait Renderer {
    /// Show a stored transcript entry, with its citation if it has one
    fn transcript_entry(&mut self, message: &ChatMessage);

    /// The question is being looked up in `source`
    fn routing(&mut self, source: Source);

    /// Show the next piece of the answer being streamed
    fn fragment(&mut self, text: &str);

    /// Close the displayed answer with its citation
    fn citation(&mut self, source: Source);

    /// Report a failed turn
    fn error(&mut self, error: &anyhow::Error);
}

/// Render every entry of the transcript in order
pub fn replay(session: &Session, renderer: &mut dyn Renderer) {
    for message in session.messages() {
        renderer.transcript_entry(message);
    }
}

/// Format the one-line citation shown under an answer
///
/// # Examples
///
/// ```
/// use search_agent::chat::citation_line;
/// use search_agent::retrieval::Source;
///
/// assert_eq!(citation_line(Source::Wikipedia), "Source: Wikipedia");
/// ```
pub fn citation_line(source: Source) -> String {
    format!("Source: {}", source)
}

/// Routes questions, streams answers and records them in the session
pub struct ChatEngine {
    router: SourceRouter,
    composer: AnswerComposer,
}

impl ChatEngine {
    /// Create an engine from a router and a composer
    pub fn new(router: SourceRouter, composer: AnswerComposer) -> Self {
        Self { router, composer }
    }

    /// Run one turn for `question`
    ///
    /// The user message is appended before anything else. On success the
    /// full answer is appended with the source it cites and that source is
    /// returned. On failure the turn is abandoned: no assistant entry is
    /// written, and if part of the answer was already shown its citation is
    /// still printed before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the retrieval or generation error that aborted the turn
    pub async fn run_turn(
        &self,
        session: &mut Session,
        question: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<Source> {
        session.push_user(question);

        let metrics = TurnMetrics::new(classify(question));
        tracing::debug!("Turn state: {} -> {}", TurnState::Idle, TurnState::Routing);
        renderer.routing(metrics.source());

        let routed = match self.router.route(question).await {
            Ok(routed) => routed,
            Err(e) => {
                metrics.record_failure("retrieval");
                return Err(e);
            }
        };

        tracing::debug!(
            "Turn state: {} -> {}",
            TurnState::Routing,
            TurnState::Streaming
        );

        let mut fragments = match self.composer.compose(&routed.context, question).await {
            Ok(fragments) => fragments,
            Err(e) => {
                metrics.record_failure("generation");
                return Err(e);
            }
        };

        let mut answer = String::new();
        let mut shown = 0usize;
        while let Some(fragment) = fragments.next().await {
            match fragment {
                Ok(text) => {
                    answer.push_str(&text);
                    shown += 1;
                    renderer.fragment(&text);
                }
                Err(e) => {
                    if shown > 0 {
                        renderer.citation(routed.source);
                    }
                    metrics.record_failure("generation");
                    return Err(e);
                }
            }
        }

        renderer.citation(routed.source);
        session.push_assistant(answer, routed.source);
        metrics.record_completion(shown);

        tracing::debug!(
            "Turn state: {} -> {} ({} fragments)",
            TurnState::Streaming,
            TurnState::Idle,
            shown
        );
        Ok(routed.source)
    }
}

/// Colored terminal renderer
///
/// Answers stream to stdout; the lookup status and errors go to stderr so
/// piped output carries only the answer and its citation.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    answering: bool,
}

impl TerminalRenderer {
    /// Create a renderer writing to the terminal
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for TerminalRenderer {
    fn transcript_entry(&mut self, message: &ChatMessage) {
        use colored::Colorize;

        match message.role {
            Role::User => println!("{} {}", "You:".green().bold(), message.content),
            Role::Assistant => {
                println!("{} {}", "Assistant:".cyan().bold(), message.content);
                if let Some(source) = message.source {
                    println!("{}", citation_line(source).dimmed());
                }
            }
        }
        println!();
    }

    fn routing(&mut self, source: Source) {
        use colored::Colorize;

        eprintln!("{}", format!("Searching {}...", source).dimmed());
    }

    fn fragment(&mut self, text: &str) {
        use colored::Colorize;

        if !self.answering {
            print!("{} ", "Assistant:".cyan().bold());
            self.answering = true;
        }
        print!("{}", text);
        let _ = std::io::stdout().flush();
    }

    fn citation(&mut self, source: Source) {
        use colored::Colorize;

        if self.answering {
            println!();
        } else {
            println!("{}", "Assistant:".cyan().bold());
        }
        self.answering = false;
        println!("{}\n", citation_line(source).dimmed());
    }

    fn error(&mut self, error: &anyhow::Error) {
        use colored::Colorize;

        self.answering = false;
        eprintln!("{}\n", format!("Error: {}", error).red());
    }
}
