#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the chat input box.
    DraftChanged(String),
    /// User pressed send with whatever is in the input box.
    DraftSubmitted,
    /// Ask a question directly.
    QuestionSubmitted(String),
    /// User picked one of the starter questions.
    SuggestionChosen(String),
    /// Summarize an earlier answer.
    SummarizeRequested { content: String },
    /// Expand an earlier answer.
    ImproveRequested { content: String },
    UploadOpened,
    UploadClosed,
    UploadRequested { file_name: String, bytes: Vec<u8> },
    IndexAllRequested,
    /// Back to the welcome screen.
    ResetClicked,
    /// Re-read documents and stats without occupying the command slot.
    CatalogRefreshRequested,
    /// Backend reply to an `Effect::Ask`. The error side carries the failure message.
    AnswerReceived {
        purpose: crate::AskPurpose,
        result: Result<crate::Answer, String>,
    },
    /// Backend reply to an `Effect::Upload`, with the number of chunks created.
    UploadFinished {
        file_name: String,
        result: Result<u32, String>,
    },
    /// Backend reply to `Effect::IndexAll`, with the number of documents indexed.
    IndexAllFinished { result: Result<u32, String> },
    /// Fresh catalog snapshot, from startup or from `Effect::RefreshCatalog`.
    CatalogLoaded {
        documents: Vec<crate::Document>,
        stats: crate::Stats,
        after_command: bool,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
