//! Ragchat engine: backend gateway and effect execution.
mod controller;
mod gateway;
mod reindex;
mod types;

pub use controller::ConversationController;
pub use gateway::{Gateway, GatewaySettings, ReqwestGateway};
pub use reindex::{ReindexCoordinator, ReindexOutcome, StartupSnapshot};
pub use types::{FailureKind, GatewayError, Health, IndexedCheck, IndexingReport, UploadResult};
