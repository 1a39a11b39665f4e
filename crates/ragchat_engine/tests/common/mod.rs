#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use ragchat_core::{Answer, AskRequest, Document, Source, Stats};
use ragchat_engine::{
    FailureKind, Gateway, GatewayError, Health, IndexedCheck, IndexingReport, UploadResult,
};
use tokio::sync::Notify;

/// In-memory gateway that records every call in order.
pub struct FakeGateway {
    calls: Mutex<Vec<&'static str>>,
    asks: Mutex<Vec<AskRequest>>,
    answer: Mutex<Result<Answer, GatewayError>>,
    upload: Mutex<Result<UploadResult, GatewayError>>,
    index_all: Mutex<Result<IndexingReport, GatewayError>>,
    reindex: Mutex<Result<IndexingReport, GatewayError>>,
    /// Successive `list_documents` replies; the last one repeats.
    documents: Mutex<VecDeque<Vec<Document>>>,
    stats: Stats,
    ask_gate: Option<Arc<Notify>>,
    panic_on: Option<&'static str>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            asks: Mutex::new(Vec::new()),
            answer: Mutex::new(Ok(answer("An LLM is..."))),
            upload: Mutex::new(Ok(UploadResult {
                file_name: Some("guide.pdf".to_string()),
                number_of_chunks: 12,
            })),
            index_all: Mutex::new(Ok(report(3))),
            reindex: Mutex::new(Ok(report(2))),
            documents: Mutex::new(VecDeque::from([Vec::new()])),
            stats: Stats {
                indexed_documents: 2,
                status: "ready".to_string(),
            },
            ask_gate: None,
            panic_on: None,
        }
    }

    pub fn with_answer(self, result: Result<Answer, GatewayError>) -> Self {
        *self.answer.lock().unwrap() = result;
        self
    }

    pub fn with_upload(self, result: Result<UploadResult, GatewayError>) -> Self {
        *self.upload.lock().unwrap() = result;
        self
    }

    pub fn with_index_all(self, result: Result<IndexingReport, GatewayError>) -> Self {
        *self.index_all.lock().unwrap() = result;
        self
    }

    pub fn with_reindex(self, result: Result<IndexingReport, GatewayError>) -> Self {
        *self.reindex.lock().unwrap() = result;
        self
    }

    pub fn with_documents(self, replies: Vec<Vec<Document>>) -> Self {
        *self.documents.lock().unwrap() = replies.into();
        self
    }

    /// Holds every ask until the returned handle is notified.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.ask_gate = Some(gate.clone());
        (self, gate)
    }

    /// Panics inside the named call, after recording it.
    pub fn panicking_on(mut self, call: &'static str) -> Self {
        self.panic_on = Some(call);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    pub fn asks(&self) -> Vec<AskRequest> {
        self.asks.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
        if self.panic_on == Some(name) {
            panic!("fake gateway failure in {name}");
        }
    }
}

#[async_trait::async_trait]
impl Gateway for FakeGateway {
    async fn ask_question(&self, request: &AskRequest) -> Result<Answer, GatewayError> {
        self.record("ask_question");
        self.asks.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.ask_gate {
            gate.notified().await;
        }
        self.answer.lock().unwrap().clone()
    }

    async fn get_stats(&self) -> Stats {
        self.record("get_stats");
        self.stats.clone()
    }

    async fn list_documents(&self) -> Vec<Document> {
        self.record("list_documents");
        let mut replies = self.documents.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap_or_default()
        } else {
            replies.front().cloned().unwrap_or_default()
        }
    }

    async fn upload_document(
        &self,
        _file: Vec<u8>,
        _file_name: &str,
    ) -> Result<UploadResult, GatewayError> {
        self.record("upload_document");
        self.upload.lock().unwrap().clone()
    }

    async fn index_all_documents(&self) -> Result<IndexingReport, GatewayError> {
        self.record("index_all_documents");
        self.index_all.lock().unwrap().clone()
    }

    async fn force_reindex(&self) -> Result<IndexingReport, GatewayError> {
        self.record("force_reindex");
        self.reindex.lock().unwrap().clone()
    }

    async fn check_document_indexed(&self, _file_name: &str) -> IndexedCheck {
        self.record("check_document_indexed");
        IndexedCheck::not_indexed()
    }

    async fn health_check(&self) -> Health {
        self.record("health_check");
        Health::down()
    }
}

pub fn answer(text: &str) -> Answer {
    Answer {
        answer: text.to_string(),
        sources: Some(vec![Source {
            file_name: "a.pdf".to_string(),
            relevance_score: 0.9,
            excerpt: "...".to_string(),
            page_number: None,
        }]),
        processing_time_ms: 1200,
    }
}

pub fn report(documents_indexed: u32) -> IndexingReport {
    IndexingReport {
        documents_indexed,
        message: None,
    }
}

pub fn server_error(message: &str) -> GatewayError {
    GatewayError::new(FailureKind::HttpStatus(500), message)
}

pub fn doc(name: &str, chunks: Option<u32>) -> Document {
    Document {
        file_name: name.to_string(),
        number_of_chunks: chunks,
        ..Document::default()
    }
}
