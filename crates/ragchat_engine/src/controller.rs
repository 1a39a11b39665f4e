use std::sync::Arc;

use chat_logging::{chat_debug, chat_error, chat_info, chat_warn};
use ragchat_core::{
    update, AppState, AppViewModel, AskPurpose, AskRequest, Effect, Msg, Notification,
    NotificationLevel, Stats,
};
use tokio::sync::mpsc;

use crate::reindex::{ReindexCoordinator, ReindexOutcome};
use crate::Gateway;

/// Owns the conversation state and runs its effects against a [`Gateway`].
///
/// Commands go through [`update`] synchronously; any backend call they need
/// is spawned on the current tokio runtime and its result comes back as a
/// `Msg` that [`process_next_completion`](Self::process_next_completion)
/// folds in. Between the two, further commands are refused by the pending
/// slot rather than queued. Must be used from within a tokio runtime.
pub struct ConversationController {
    state: AppState,
    gateway: Arc<dyn Gateway>,
    completions_tx: mpsc::UnboundedSender<Msg>,
    completions_rx: mpsc::UnboundedReceiver<Msg>,
    notifications_tx: mpsc::UnboundedSender<Notification>,
    in_flight: usize,
}

impl ConversationController {
    /// Returns the controller and the receiving end of its notification channel.
    pub fn new(gateway: Arc<dyn Gateway>) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (notifications_tx, notifications_rx) = mpsc::unbounded_channel();
        let controller = Self {
            state: AppState::new(),
            gateway,
            completions_tx,
            completions_rx,
            notifications_tx,
            in_flight: 0,
        };
        (controller, notifications_rx)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    /// Number of spawned gateway calls whose completion has not been folded yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn dispatch(&mut self, msg: Msg) {
        chat_debug!("dispatch {:?}", MsgName(&msg));
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.run_effect(effect);
        }
    }

    /// Waits for one backend call to finish and folds its result.
    ///
    /// Returns `false` immediately when nothing is in flight.
    pub async fn process_next_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.completions_rx.recv().await {
            Some(msg) => {
                self.in_flight -= 1;
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    /// Folds completions until no backend call is outstanding.
    pub async fn run_until_idle(&mut self) {
        while self.process_next_completion().await {}
    }

    /// Loads the catalog, repairing an unsearchable index first if needed.
    pub async fn startup(&mut self) -> ReindexOutcome {
        let snapshot = ReindexCoordinator::new(self.gateway.clone()).run().await;
        self.dispatch(Msg::CatalogLoaded {
            documents: snapshot.documents,
            stats: snapshot.stats,
            after_command: false,
        });
        snapshot.reindex
    }

    pub fn send_question(&mut self, text: impl Into<String>) {
        self.dispatch(Msg::QuestionSubmitted(text.into()));
    }

    pub fn summarize(&mut self, content: impl Into<String>) {
        self.dispatch(Msg::SummarizeRequested {
            content: content.into(),
        });
    }

    pub fn improve(&mut self, content: impl Into<String>) {
        self.dispatch(Msg::ImproveRequested {
            content: content.into(),
        });
    }

    pub fn upload_document(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) {
        self.dispatch(Msg::UploadRequested {
            file_name: file_name.into(),
            bytes,
        });
    }

    pub fn index_all_documents(&mut self) {
        self.dispatch(Msg::IndexAllRequested);
    }

    pub fn refresh_catalog(&mut self) {
        self.dispatch(Msg::CatalogRefreshRequested);
    }

    pub fn reset(&mut self) {
        self.dispatch(Msg::ResetClicked);
    }

    fn run_effect(&mut self, effect: Effect) {
        let job = match effect {
            Effect::Notify(notification) => return self.notify(notification),
            Effect::Ask { purpose, request } => Job::Ask { purpose, request },
            Effect::Upload { file_name, bytes } => Job::Upload { file_name, bytes },
            Effect::IndexAll => Job::IndexAll,
            Effect::RefreshCatalog { after_command } => Job::RefreshCatalog { after_command },
        };
        self.spawn_job(job);
    }

    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => chat_info!("{}", notification.text),
            NotificationLevel::Error => chat_warn!("{}", notification.text),
        }
        let _ = self.notifications_tx.send(notification);
    }

    /// Every spawned job reports exactly one completion, even when it panics.
    fn spawn_job(&mut self, job: Job) {
        self.in_flight += 1;
        let abandoned = job.abandoned();
        let gateway = self.gateway.clone();
        let completions_tx = self.completions_tx.clone();
        let task = tokio::spawn(async move { job.run(gateway.as_ref()).await });
        tokio::spawn(async move {
            let msg = match task.await {
                Ok(msg) => msg,
                Err(err) => {
                    chat_error!("Backend task ended abnormally: {}", err);
                    abandoned
                }
            };
            let _ = completions_tx.send(msg);
        });
    }
}

/// A backend call requested by [`update`].
enum Job {
    Ask {
        purpose: AskPurpose,
        request: AskRequest,
    },
    Upload {
        file_name: String,
        bytes: Vec<u8>,
    },
    IndexAll,
    RefreshCatalog {
        after_command: bool,
    },
}

impl Job {
    async fn run(self, gateway: &dyn Gateway) -> Msg {
        match self {
            Job::Ask { purpose, request } => {
                let result = gateway.ask_question(&request).await.map_err(|err| {
                    chat_error!("askQuestion failed ({:?}): {} [{}]", purpose, err, err.kind);
                    err.message
                });
                Msg::AnswerReceived { purpose, result }
            }
            Job::Upload { file_name, bytes } => {
                let result = gateway
                    .upload_document(bytes, &file_name)
                    .await
                    .map(|uploaded| uploaded.number_of_chunks)
                    .map_err(|err| {
                        chat_error!("uploadDocument {} failed: {} [{}]", file_name, err, err.kind);
                        err.message
                    });
                Msg::UploadFinished { file_name, result }
            }
            Job::IndexAll => {
                let result = gateway
                    .index_all_documents()
                    .await
                    .map(|report| report.documents_indexed)
                    .map_err(|err| {
                        chat_error!("indexAllDocuments failed: {} [{}]", err, err.kind);
                        err.message
                    });
                Msg::IndexAllFinished { result }
            }
            Job::RefreshCatalog { after_command } => {
                let documents = gateway.list_documents().await;
                let stats = gateway.get_stats().await;
                Msg::CatalogLoaded {
                    documents,
                    stats,
                    after_command,
                }
            }
        }
    }

    /// Completion reported when the job dies before producing one.
    fn abandoned(&self) -> Msg {
        match self {
            // Blank so the question path shows its generic communication error.
            Job::Ask { purpose, .. } => Msg::AnswerReceived {
                purpose: *purpose,
                result: Err(String::new()),
            },
            Job::Upload { file_name, .. } => Msg::UploadFinished {
                file_name: file_name.clone(),
                result: Err(TASK_ABORTED.to_string()),
            },
            Job::IndexAll => Msg::IndexAllFinished {
                result: Err(TASK_ABORTED.to_string()),
            },
            Job::RefreshCatalog { after_command } => Msg::CatalogLoaded {
                documents: Vec::new(),
                stats: Stats::unavailable(),
                after_command: *after_command,
            },
        }
    }
}

const TASK_ABORTED: &str = "request aborted";

/// Logs the variant without dumping upload bytes or whole answers.
struct MsgName<'a>(&'a Msg);

impl std::fmt::Debug for MsgName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self.0 {
            Msg::DraftChanged(_) => "DraftChanged",
            Msg::DraftSubmitted => "DraftSubmitted",
            Msg::QuestionSubmitted(_) => "QuestionSubmitted",
            Msg::SuggestionChosen(_) => "SuggestionChosen",
            Msg::SummarizeRequested { .. } => "SummarizeRequested",
            Msg::ImproveRequested { .. } => "ImproveRequested",
            Msg::UploadOpened => "UploadOpened",
            Msg::UploadClosed => "UploadClosed",
            Msg::UploadRequested { .. } => "UploadRequested",
            Msg::IndexAllRequested => "IndexAllRequested",
            Msg::ResetClicked => "ResetClicked",
            Msg::CatalogRefreshRequested => "CatalogRefreshRequested",
            Msg::AnswerReceived { .. } => "AnswerReceived",
            Msg::UploadFinished { .. } => "UploadFinished",
            Msg::IndexAllFinished { .. } => "IndexAllFinished",
            Msg::CatalogLoaded { .. } => "CatalogLoaded",
            Msg::NoOp => "NoOp",
        };
        f.write_str(name)
    }
}
