use std::sync::Arc;

use chat_logging::{chat_error, chat_info};
use ragchat_core::{needs_reindex, Document, Stats};

use crate::{Gateway, IndexingReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReindexOutcome {
    NotNeeded,
    Completed(IndexingReport),
    /// The documents in the snapshot are the ones fetched before the attempt.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupSnapshot {
    pub stats: Stats,
    pub documents: Vec<Document>,
    pub reindex: ReindexOutcome,
}

/// Startup pass that repairs a catalog whose documents have no chunks.
///
/// Steps run strictly one after another: stats, document list, then, only
/// if every listed document is chunkless, a forced reindex followed by a
/// second document list. A failed reindex is logged and never retried.
pub struct ReindexCoordinator {
    gateway: Arc<dyn Gateway>,
}

impl ReindexCoordinator {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn run(&self) -> StartupSnapshot {
        let stats = self.gateway.get_stats().await;
        let documents = self.gateway.list_documents().await;

        if !needs_reindex(&documents) {
            return StartupSnapshot {
                stats,
                documents,
                reindex: ReindexOutcome::NotNeeded,
            };
        }

        chat_info!(
            "All {} documents report zero chunks, forcing reindex",
            documents.len()
        );
        match self.gateway.force_reindex().await {
            Ok(report) => {
                chat_info!(
                    "Reindex completed: {} documents indexed",
                    report.documents_indexed
                );
                let documents = self.gateway.list_documents().await;
                StartupSnapshot {
                    stats,
                    documents,
                    reindex: ReindexOutcome::Completed(report),
                }
            }
            Err(err) => {
                chat_error!("Reindex failed: {} [{}]", err, err.kind);
                StartupSnapshot {
                    stats,
                    documents,
                    reindex: ReindexOutcome::Failed(err.message),
                }
            }
        }
    }
}
