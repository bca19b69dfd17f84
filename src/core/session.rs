// src/core/session.rs — Follow-up chat grounded in a diagnosis summary

use crate::infra::errors::OptiscopeError;
use crate::prompt::templates::{chat_seed, CHAT_SYSTEM};
use crate::provider::{Backend, Completion, Message, Prompt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No diagnosis yet; chat is refused.
    Uninitialized,
    /// Transcript holds the system turn and the seeded summary.
    Seeded,
    /// At least one follow-up exchange has happened.
    Active,
}

/// Ordered transcript owned by one session. Every follow-up sends the
/// entire transcript; it is never trimmed.
#[derive(Debug, Clone)]
pub struct ChatSession {
    state: SessionState,
    transcript: Vec<Message>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Uninitialized,
            transcript: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Replace the transcript with a fresh grounding in `summary`.
    pub fn seed(&mut self, summary: &str) {
        self.transcript = vec![Message::system(CHAT_SYSTEM), Message::user(chat_seed(summary))];
        self.state = SessionState::Seeded;
    }

    /// Append `input`, send the whole transcript, append the reply.
    ///
    /// On backend failure the pending user turn is removed again so the
    /// transcript keeps its user/assistant pairing.
    pub async fn ask(
        &mut self,
        backend: &dyn Backend,
        model: &str,
        input: &str,
    ) -> Result<Completion, OptiscopeError> {
        if self.state == SessionState::Uninitialized {
            return Err(OptiscopeError::NotReady);
        }

        self.transcript.push(Message::user(input));
        let prompt = Prompt::Messages(self.transcript.clone());

        match backend.complete(model, prompt).await {
            Ok(completion) => {
                self.transcript
                    .push(Message::assistant(completion.content.clone()));
                self.state = SessionState::Active;
                tracing::debug!("chat transcript now {} turns", self.transcript.len());
                Ok(completion)
            }
            Err(e) => {
                self.transcript.pop();
                Err(e)
            }
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
