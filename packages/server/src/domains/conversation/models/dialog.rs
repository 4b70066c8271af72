use openai_client::Message;
use serde::{Deserialize, Serialize};

/// Who wrote a dialog turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogRole {
    User,
    Assistant,
}

/// One WhatsApp message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogMessage {
    pub role: DialogRole,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl DialogMessage {
    pub fn to_chat_message(&self) -> Message {
        match self.role {
            DialogRole::User => Message::user(self.content.as_str()),
            DialogRole::Assistant => Message::assistant(self.content.as_str()),
        }
    }
}

fn default_channel() -> String {
    "whatsapp".to_string()
}

/// Webhook payload shared by the task and sales analyzers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub task_id: i64,
    pub client_phone: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default)]
    pub city: Option<String>,
    pub dialog_history: Vec<DialogMessage>,
}

impl AnalyzeRequest {
    /// The last `window` messages, oldest first.
    pub fn recent_messages(&self, window: usize) -> &[DialogMessage] {
        let start = self.dialog_history.len().saturating_sub(window);
        &self.dialog_history[start..]
    }

    /// The last `window` messages as chat-completion turns.
    pub fn recent_chat_messages(&self, window: usize) -> Vec<Message> {
        self.recent_messages(window)
            .iter()
            .map(DialogMessage::to_chat_message)
            .collect()
    }
}
