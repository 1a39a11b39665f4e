use crate::prompt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the backend a question; the reply comes back as `Msg::AnswerReceived`.
    Ask {
        purpose: AskPurpose,
        request: AskRequest,
    },
    Upload {
        file_name: String,
        bytes: Vec<u8>,
    },
    IndexAll,
    /// Re-fetch the document list, then the stats.
    RefreshCatalog { after_command: bool },
    Notify(Notification),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskRequest {
    pub question: String,
    pub include_sources: bool,
    pub language: Option<String>,
}

/// Which command produced an ask; decides how the reply is folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskPurpose {
    Question,
    Summary,
    Improve,
}

impl AskPurpose {
    pub fn keeps_sources(self) -> bool {
        !matches!(self, AskPurpose::Summary)
    }

    /// Text of the error turn appended when the ask fails.
    ///
    /// Only plain questions show the backend's own message; summary and
    /// improve requests always use their fixed text.
    pub fn failure_text(self, message: &str) -> String {
        match self {
            AskPurpose::Question if message.trim().is_empty() => {
                prompt::COMMUNICATION_ERROR.to_string()
            }
            AskPurpose::Question => message.to_string(),
            AskPurpose::Summary => prompt::SUMMARY_FAILED.to_string(),
            AskPurpose::Improve => prompt::IMPROVE_FAILED.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient message for the presentation layer, kept out of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            text: text.into(),
        }
    }
}
