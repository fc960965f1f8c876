use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::KprResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// A hosted language model that answers given the full message history.
pub trait ChatModel {
    fn complete(&self, messages: &[ChatMessage]) -> KprResult<String>;
}

/// Advisory chat history for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Seed with the banker context, then any extra operator instructions.
    /// Blank instructions are skipped.
    pub fn new(banker_context: &str, extra_system_prompt: &str) -> Self {
        let mut conversation = Self::default();
        conversation.seed(banker_context, extra_system_prompt);
        conversation
    }

    /// Drop the whole history and start over with fresh instructions.
    pub fn reset(&mut self, banker_context: &str, extra_system_prompt: &str) {
        self.messages.clear();
        self.seed(banker_context, extra_system_prompt);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Messages shown to the borrower (system instructions hidden).
    pub fn visible(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| m.role != ChatRole::System)
    }

    /// Record the borrower's question and ask the model.
    ///
    /// On failure the question stays in the history, no answer is recorded
    /// and the error is handed back for display.
    pub fn ask(&mut self, model: &dyn ChatModel, question: &str) -> KprResult<String> {
        self.messages.push(ChatMessage::new(ChatRole::User, question));
        let answer = model.complete(&self.messages)?;
        self.messages
            .push(ChatMessage::new(ChatRole::Assistant, answer.clone()));
        Ok(answer)
    }

    fn seed(&mut self, banker_context: &str, extra_system_prompt: &str) {
        for prompt in [banker_context, extra_system_prompt] {
            let prompt = prompt.trim();
            if !prompt.is_empty() {
                self.messages.push(ChatMessage::new(ChatRole::System, prompt));
            }
        }
    }
}
