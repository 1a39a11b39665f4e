use crate::view_model::AppViewModel;
use crate::{AskPurpose, Document, Message, Stats};

/// What the single command slot is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    Asking(AskPurpose),
    Uploading,
    Indexing,
    /// Re-reading the catalog after a successful upload or index-all.
    Refreshing,
}

/// Conversation proper: history, the in-flight slot and the input box.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    messages: Vec<Message>,
    activity: Activity,
    draft: String,
}

impl SessionState {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    /// True for the whole lifetime of exactly one command.
    pub fn pending(&self) -> bool {
        self.activity != Activity::Idle
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }
}

/// Last fetched view of the backend catalog. Replaced wholesale on each fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogState {
    documents: Vec<Document>,
    stats: Option<Stats>,
    upload_open: bool,
}

impl CatalogState {
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    pub fn upload_open(&self) -> bool {
        self.upload_open
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    session: SessionState,
    catalog: CatalogState,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn is_pending(&self) -> bool {
        self.session.pending()
    }

    pub fn view(&self) -> AppViewModel {
        let stats = self.catalog.stats.as_ref();
        AppViewModel {
            messages: self.session.messages.clone(),
            activity: self.session.activity,
            pending: self.session.pending(),
            draft: self.session.draft.clone(),
            documents: self.catalog.documents.clone(),
            documents_count: stats.map_or(0, |s| s.indexed_documents),
            backend_status: stats.map(|s| s.status.clone()),
            upload_open: self.catalog.upload_open,
            show_welcome: self.session.messages.is_empty(),
            can_reset: !self.session.pending() && !self.session.messages.is_empty(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn push_message(&mut self, message: Message) {
        self.session.messages.push(message);
        self.mark_dirty();
    }

    pub(crate) fn set_draft(&mut self, draft: String) {
        if self.session.draft != draft {
            self.session.draft = draft;
            self.mark_dirty();
        }
    }

    pub(crate) fn begin(&mut self, activity: Activity) {
        self.session.activity = activity;
        self.mark_dirty();
    }

    /// Returns the slot to idle. Called on every completion path.
    pub(crate) fn finish(&mut self) {
        self.session.activity = Activity::Idle;
        self.mark_dirty();
    }

    pub(crate) fn reset_conversation(&mut self) {
        self.session.messages.clear();
        self.session.draft.clear();
        self.mark_dirty();
    }

    pub(crate) fn set_upload_open(&mut self, open: bool) {
        if self.catalog.upload_open != open {
            self.catalog.upload_open = open;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_catalog(&mut self, documents: Vec<Document>, stats: Stats) {
        self.catalog.documents = documents;
        self.catalog.stats = Some(stats);
        self.mark_dirty();
    }
}
