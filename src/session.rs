//! Conversation store
//!
//! A [`Session`] owns the transcript of one interactive run. It starts with
//! the assistant greeting and only ever grows: entries are never edited,
//! reordered or removed. Nothing is persisted.

use crate::retrieval::Source;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Who wrote a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The search agent
    Assistant,
    /// The person asking questions
    User,
}

/// One transcript entry
///
/// `content` is exactly what was said. The citation of an assistant answer
/// lives in `source`, never in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Author of the entry
    pub role: Role,
    /// Message text
    pub content: String,
    /// Retrieval source the answer was grounded on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

/// In-memory transcript for one run
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    messages: Vec<ChatMessage>,
}

impl Session {
    /// Start a session seeded with the assistant greeting
    ///
    /// # Examples
    ///
    /// ```
    /// use search_agent::session::{Role, Session};
    ///
    /// let session = Session::new("Hi!");
    /// assert_eq!(session.len(), 1);
    /// assert_eq!(session.messages()[0].role, Role::Assistant);
    /// ```
    pub fn new(greeting: impl Into<String>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            messages: vec![ChatMessage {
                role: Role::Assistant,
                content: greeting.into(),
                source: None,
            }],
        };
        tracing::debug!("Started session {}", session.id);
        session
    }

    /// Session identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the session was created
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Append the user's question
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: Role::User,
            content: content.into(),
            source: None,
        });
    }

    /// Append a completed answer together with the source it cites
    pub fn push_assistant(&mut self, content: impl Into<String>, source: Source) {
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content: content.into(),
            source: Some(source),
        });
    }

    /// Transcript in chronological order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of entries, greeting included
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false; a session holds at least its greeting
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_holds_only_greeting() {
        let session = Session::new("Hello");
        assert_eq!(session.len(), 1);
        assert!(!session.is_empty());
        assert_eq!(session.messages()[0].content, "Hello");
        assert!(session.messages()[0].source.is_none());
    }

    #[test]
    fn test_n_turns_give_two_n_plus_one_entries() {
        let mut session = Session::new("Hello");
        for n in 1..=5 {
            session.push_user(format!("question {}", n));
            session.push_assistant(format!("answer {}", n), Source::DuckDuckGo);
            assert_eq!(session.len(), 2 * n + 1);
        }
    }

    #[test]
    fn test_order_is_preserved() {
        let mut session = Session::new("g");
        session.push_user("q1");
        session.push_assistant("a1", Source::Arxiv);
        session.push_user("q2");
        session.push_assistant("a2", Source::Wikipedia);

        let contents: Vec<&str> = session
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["g", "q1", "a1", "q2", "a2"]);

        let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant
            ]
        );
    }

    #[test]
    fn test_citation_is_kept_out_of_content() {
        let mut session = Session::new("g");
        session.push_assistant("Paris.", Source::DuckDuckGo);
        let last = &session.messages()[1];
        assert_eq!(last.content, "Paris.");
        assert_eq!(last.source, Some(Source::DuckDuckGo));
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        assert_ne!(Session::new("a").id(), Session::new("a").id());
    }

    #[test]
    fn test_message_serialization() {
        let message = ChatMessage {
            role: Role::Assistant,
            content: "x".to_string(),
            source: Some(Source::Arxiv),
        };
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"x","source":"arXiv"}"#);
    }
}
