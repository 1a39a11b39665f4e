use crate::prompt;
use crate::{Activity, AppState, AskPurpose, AskRequest, Effect, Message, Msg, Notification};

/// Pure update function: applies a message to state and returns any effects.
///
/// Every command other than reset is refused while a previous command is
/// in flight. Every completion message returns the slot to idle, whether
/// the backend call succeeded or not.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DraftChanged(text) => {
            state.set_draft(text);
            Vec::new()
        }
        Msg::DraftSubmitted => {
            let text = state.session().draft().to_string();
            ask_question(&mut state, text)
        }
        Msg::QuestionSubmitted(text) => ask_question(&mut state, text),
        Msg::SuggestionChosen(text) => {
            state.set_draft(text.clone());
            ask_question(&mut state, text)
        }
        Msg::SummarizeRequested { content } => {
            ask_derived(&mut state, AskPurpose::Summary, &content)
        }
        Msg::ImproveRequested { content } => ask_derived(&mut state, AskPurpose::Improve, &content),
        Msg::UploadOpened => {
            state.set_upload_open(true);
            Vec::new()
        }
        Msg::UploadClosed => {
            state.set_upload_open(false);
            Vec::new()
        }
        Msg::UploadRequested { file_name, bytes } => {
            if state.is_pending() {
                return (state, Vec::new());
            }
            if !prompt::is_accepted_upload(&file_name) {
                return (
                    state,
                    vec![Effect::Notify(Notification::error(prompt::PDF_ONLY))],
                );
            }
            state.begin(Activity::Uploading);
            vec![Effect::Upload { file_name, bytes }]
        }
        Msg::IndexAllRequested => {
            if state.is_pending() {
                return (state, Vec::new());
            }
            state.begin(Activity::Indexing);
            vec![Effect::IndexAll]
        }
        Msg::ResetClicked => {
            state.reset_conversation();
            Vec::new()
        }
        Msg::CatalogRefreshRequested => vec![Effect::RefreshCatalog {
            after_command: false,
        }],
        Msg::AnswerReceived { purpose, result } => {
            let message = match result {
                Ok(answer) => Message::assistant(answer, purpose.keeps_sources()),
                Err(failure) => Message::error(purpose.failure_text(&failure)),
            };
            state.push_message(message);
            state.finish();
            Vec::new()
        }
        Msg::UploadFinished { file_name, result } => match result {
            Ok(chunks) => {
                state.set_upload_open(false);
                state.begin(Activity::Refreshing);
                vec![
                    Effect::Notify(Notification::success(prompt::upload_succeeded(
                        &file_name, chunks,
                    ))),
                    Effect::RefreshCatalog {
                        after_command: true,
                    },
                ]
            }
            Err(failure) => {
                state.finish();
                vec![Effect::Notify(Notification::error(prompt::upload_failed(&failure)))]
            }
        },
        Msg::IndexAllFinished { result } => match result {
            Ok(documents) => {
                state.begin(Activity::Refreshing);
                vec![
                    Effect::Notify(Notification::success(prompt::index_all_succeeded(
                        documents,
                    ))),
                    Effect::RefreshCatalog {
                        after_command: true,
                    },
                ]
            }
            Err(failure) => {
                state.finish();
                vec![Effect::Notify(Notification::error(prompt::index_all_failed(&failure)))]
            }
        },
        Msg::CatalogLoaded {
            documents,
            stats,
            after_command,
        } => {
            state.set_catalog(documents, stats);
            if after_command {
                state.finish();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn ask_question(state: &mut AppState, text: String) -> Vec<Effect> {
    if text.trim().is_empty() || state.is_pending() {
        return Vec::new();
    }
    state.set_draft(String::new());
    state.push_message(Message::user(text.clone()));
    state.begin(Activity::Asking(AskPurpose::Question));
    vec![Effect::Ask {
        purpose: AskPurpose::Question,
        request: AskRequest {
            question: text,
            include_sources: true,
            language: None,
        },
    }]
}

fn ask_derived(state: &mut AppState, purpose: AskPurpose, content: &str) -> Vec<Effect> {
    if state.is_pending() {
        return Vec::new();
    }
    let (marker, question) = match purpose {
        AskPurpose::Summary => (prompt::SUMMARY_MARKER, prompt::summary_prompt(content)),
        AskPurpose::Improve => (prompt::IMPROVE_MARKER, prompt::improve_prompt(content)),
        AskPurpose::Question => return Vec::new(),
    };
    state.push_message(Message::user(marker));
    state.begin(Activity::Asking(purpose));
    vec![Effect::Ask {
        purpose,
        request: AskRequest {
            question,
            include_sources: purpose.keeps_sources(),
            language: Some(prompt::DERIVED_LANGUAGE.to_string()),
        },
    }]
}
