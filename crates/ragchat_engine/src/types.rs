use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use ragchat_core::{Answer, Document, Source, Stats};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Failure of a propagating gateway call. `message` is what users get to see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub kind: FailureKind,
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// No response at all (connection refused, reset, DNS...).
    Transport,
    Timeout,
    HttpStatus(u16),
    /// A success status with a body we could not read.
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Transport => write!(f, "transport error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Decode => write!(f, "undecodable response"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub number_of_chunks: u32,
}

/// Reply of both index-all and force-reindex.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexingReport {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub documents_indexed: u32,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IndexedCheck {
    #[serde(default)]
    pub indexed: bool,
}

impl IndexedCheck {
    pub fn not_indexed() -> Self {
        Self { indexed: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl Health {
    pub fn down() -> Self {
        Self {
            status: "DOWN".to_string(),
            service: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AskBody<'a> {
    pub question: &'a str,
    pub include_sources: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerDto {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    sources: Option<Vec<SourceDto>>,
    #[serde(default, deserialize_with = "null_as_zero")]
    processing_time_ms: u64,
}

impl From<AnswerDto> for Answer {
    fn from(dto: AnswerDto) -> Self {
        Answer {
            answer: dto.answer.unwrap_or_default(),
            sources: dto
                .sources
                .map(|sources| sources.into_iter().map(Source::from).collect()),
            processing_time_ms: dto.processing_time_ms,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SourceDto {
    #[serde(default)]
    file_name: String,
    #[serde(default)]
    relevance_score: f64,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    page_number: Option<u32>,
}

impl From<SourceDto> for Source {
    fn from(dto: SourceDto) -> Self {
        Source {
            file_name: dto.file_name,
            relevance_score: dto.relevance_score.clamp(0.0, 1.0),
            excerpt: dto.excerpt,
            page_number: dto.page_number,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DocumentDto {
    #[serde(default)]
    file_name: String,
    #[serde(default)]
    number_of_chunks: Option<u32>,
    #[serde(default)]
    file_size: Option<u64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    index_date: Option<NaiveDateTime>,
    #[serde(default)]
    indexed: Option<bool>,
}

impl From<DocumentDto> for Document {
    fn from(dto: DocumentDto) -> Self {
        Document {
            file_name: dto.file_name,
            number_of_chunks: dto.number_of_chunks,
            file_size: dto.file_size.unwrap_or(0),
            index_date: dto.index_date,
            indexed: dto.indexed.unwrap_or(false),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatsDto {
    #[serde(default, deserialize_with = "null_as_zero")]
    indexed_documents: u64,
    #[serde(default)]
    status: Option<String>,
}

impl From<StatsDto> for Stats {
    fn from(dto: StatsDto) -> Self {
        Stats {
            indexed_documents: dto.indexed_documents,
            status: dto.status.unwrap_or_default(),
        }
    }
}

/// Shape of non-2xx bodies.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

impl ErrorBody {
    /// First non-empty of `error` and, when allowed, `errorMessage`.
    pub fn message(self, accept_error_message: bool) -> Option<String> {
        let fallback = if accept_error_message {
            self.error_message
        } else {
            None
        };
        self.error
            .filter(|text| !text.is_empty())
            .or(fallback.filter(|text| !text.is_empty()))
    }
}

fn null_as_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `2024-05-01T10:15:30(.fff)` or RFC 3339; anything else reads as absent.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::String(text)) = value else {
        return Ok(None);
    };
    if let Ok(local) = text.parse::<NaiveDateTime>() {
        return Ok(Some(local));
    }
    Ok(DateTime::parse_from_rfc3339(&text)
        .ok()
        .map(|stamp| stamp.naive_utc()))
}
