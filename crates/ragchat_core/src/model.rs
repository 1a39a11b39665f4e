use chrono::{DateTime, NaiveDateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    Error,
}

/// An excerpt the backend cited while producing an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub file_name: String,
    /// Similarity in `[0, 1]`, computed by the backend.
    pub relevance_score: f64,
    pub excerpt: String,
    pub page_number: Option<u32>,
}

/// One conversation turn. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub sources: Option<Vec<Source>>,
    pub processing_time_ms: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content.into())
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::plain(Role::Error, content.into())
    }

    /// Builds an assistant turn from a backend answer. Sources are dropped
    /// when `keep_sources` is false.
    pub fn assistant(answer: Answer, keep_sources: bool) -> Self {
        Self {
            role: Role::Assistant,
            content: answer.answer,
            sources: if keep_sources { answer.sources } else { None },
            processing_time_ms: Some(answer.processing_time_ms),
            timestamp: Utc::now(),
        }
    }

    fn plain(role: Role, content: String) -> Self {
        Self {
            role,
            content,
            sources: None,
            processing_time_ms: None,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub answer: String,
    pub sources: Option<Vec<Source>>,
    pub processing_time_ms: u64,
}

/// A catalog entry as last reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub file_name: String,
    /// `None` when the backend sent `null` or omitted the field.
    pub number_of_chunks: Option<u32>,
    pub file_size: u64,
    pub index_date: Option<NaiveDateTime>,
    pub indexed: bool,
}

impl Document {
    pub fn chunk_count(&self) -> u32 {
        self.number_of_chunks.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub indexed_documents: u64,
    pub status: String,
}

impl Stats {
    /// Placeholder reported when the backend could not be reached.
    pub fn unavailable() -> Self {
        Self {
            indexed_documents: 0,
            status: "error".to_string(),
        }
    }
}
