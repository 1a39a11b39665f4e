use crate::{Activity, Document, Message};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub messages: Vec<Message>,
    pub activity: Activity,
    pub pending: bool,
    pub draft: String,
    pub documents: Vec<Document>,
    /// Count reported by the stats endpoint, 0 until the first fetch.
    pub documents_count: u64,
    pub backend_status: Option<String>,
    pub upload_open: bool,
    pub show_welcome: bool,
    /// Reset is only offered when idle and there is something to clear.
    pub can_reset: bool,
    pub dirty: bool,
}

impl AppViewModel {
    /// Content of the most recent assistant turn, the target of summarize/improve.
    pub fn last_answer(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == crate::Role::Assistant)
            .map(|m| m.content.as_str())
    }
}
