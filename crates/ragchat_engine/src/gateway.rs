use std::time::Duration;

use chat_logging::{chat_debug, chat_warn};
use ragchat_core::{Answer, AskRequest, Document, Stats};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::types::{AnswerDto, AskBody, DocumentDto, ErrorBody, StatsDto};
use crate::{FailureKind, GatewayError, Health, IndexedCheck, IndexingReport, UploadResult};

const ASK_FALLBACK: &str = "Server error";
const UPLOAD_FALLBACK: &str = "Upload error";
const INDEX_ALL_FALLBACK: &str = "Indexing error";
const FORCE_REINDEX_FALLBACK: &str = "Force reindex error";

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Root of the backend API, e.g. `http://localhost:8080/api`.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Upper bound for any single call, answers included.
    pub request_timeout: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// Typed view of the backend HTTP contract.
///
/// Calls that mutate the index or produce an answer return `Result` so the
/// caller can react. Advisory reads never fail: they degrade to a safe
/// default so a briefly unhealthy backend cannot block the UI.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    async fn ask_question(&self, request: &AskRequest) -> Result<Answer, GatewayError>;

    /// `{ indexed_documents: 0, status: "error" }` on any failure.
    async fn get_stats(&self) -> Stats;

    /// Empty on any failure.
    async fn list_documents(&self) -> Vec<Document>;

    async fn upload_document(
        &self,
        file: Vec<u8>,
        file_name: &str,
    ) -> Result<UploadResult, GatewayError>;

    async fn index_all_documents(&self) -> Result<IndexingReport, GatewayError>;

    async fn force_reindex(&self) -> Result<IndexingReport, GatewayError>;

    /// Not indexed on any failure.
    async fn check_document_indexed(&self, file_name: &str) -> IndexedCheck;

    /// `DOWN` on any failure.
    async fn health_check(&self) -> Health;
}

#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    client: reqwest::Client,
    base: Url,
}

impl ReqwestGateway {
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| GatewayError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(GatewayError::new(
                FailureKind::InvalidUrl,
                format!("{base} cannot be used as an API root"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| GatewayError::new(FailureKind::Transport, err.to_string()))?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends path segments to the base, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        request.send().await.map_err(map_reqwest_error)
    }

    /// Sends a request whose failures must reach the caller.
    async fn call<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
        accept_error_message: bool,
    ) -> Result<T, GatewayError> {
        let response = self.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message(accept_error_message))
                .unwrap_or_else(|| fallback.to_string());
            return Err(GatewayError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }
        read_json(response).await
    }

    /// GET for the advisory reads; the caller turns any error into a default.
    async fn read<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, GatewayError> {
        let url = self.endpoint(segments);
        chat_debug!("GET {}", url);
        let response = self.send(self.client.get(url)).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl Gateway for ReqwestGateway {
    async fn ask_question(&self, request: &AskRequest) -> Result<Answer, GatewayError> {
        let url = self.endpoint(&["chat", "ask"]);
        chat_debug!(
            "POST {} question_len={} include_sources={}",
            url,
            request.question.len(),
            request.include_sources
        );
        let body = AskBody {
            question: &request.question,
            include_sources: request.include_sources,
            language: request.language.as_deref(),
        };
        let dto: AnswerDto = self
            .call(self.client.post(url).json(&body), ASK_FALLBACK, true)
            .await?;
        Ok(dto.into())
    }

    async fn get_stats(&self) -> Stats {
        match self.read::<StatsDto>(&["chat", "stats"]).await {
            Ok(dto) => dto.into(),
            Err(err) => {
                chat_warn!("Error loading statistics: {} ({})", err, err.kind);
                Stats::unavailable()
            }
        }
    }

    async fn list_documents(&self) -> Vec<Document> {
        match self.read::<Vec<DocumentDto>>(&["documents", "indexed"]).await {
            Ok(docs) => docs.into_iter().map(Document::from).collect(),
            Err(err) => {
                chat_warn!("Error loading document list: {} ({})", err, err.kind);
                Vec::new()
            }
        }
    }

    async fn upload_document(
        &self,
        file: Vec<u8>,
        file_name: &str,
    ) -> Result<UploadResult, GatewayError> {
        let url = self.endpoint(&["documents", "upload"]);
        chat_debug!("POST {} file={} bytes={}", url, file_name, file.len());
        let part = reqwest::multipart::Part::bytes(file)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(map_reqwest_error)?;
        let form = reqwest::multipart::Form::new().part("file", part);
        self.call(self.client.post(url).multipart(form), UPLOAD_FALLBACK, false)
            .await
    }

    async fn index_all_documents(&self) -> Result<IndexingReport, GatewayError> {
        let url = self.endpoint(&["documents", "index-all"]);
        chat_debug!("POST {}", url);
        self.call(self.client.post(url), INDEX_ALL_FALLBACK, false)
            .await
    }

    async fn force_reindex(&self) -> Result<IndexingReport, GatewayError> {
        let url = self.endpoint(&["documents", "force-reindex"]);
        chat_debug!("POST {}", url);
        self.call(self.client.post(url), FORCE_REINDEX_FALLBACK, false)
            .await
    }

    async fn check_document_indexed(&self, file_name: &str) -> IndexedCheck {
        match self.read(&["documents", "check", file_name]).await {
            Ok(check) => check,
            Err(err) => {
                chat_warn!("Error checking {}: {} ({})", file_name, err, err.kind);
                IndexedCheck::not_indexed()
            }
        }
    }

    async fn health_check(&self) -> Health {
        match self.read(&["chat", "health"]).await {
            Ok(health) => health,
            Err(err) => {
                chat_warn!("Health check failed: {} ({})", err, err.kind);
                Health::down()
            }
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    response
        .json::<T>()
        .await
        .map_err(|err| GatewayError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        return GatewayError::new(FailureKind::Timeout, err.to_string());
    }
    GatewayError::new(FailureKind::Transport, err.to_string())
}
