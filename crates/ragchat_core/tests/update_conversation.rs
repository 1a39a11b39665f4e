use std::sync::Once;

use pretty_assertions::assert_eq;
use ragchat_core::{
    update, Activity, Answer, AppState, AskPurpose, AskRequest, Effect, Msg, Role, Source,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(chat_logging::initialize_for_tests);
}

fn answer(text: &str) -> Answer {
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

fn ask(state: AppState, text: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::QuestionSubmitted(text.to_string()))
}

#[test]
fn question_appends_user_turn_and_emits_ask() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::DraftChanged("What is an LLM?".into()));
    let (state, effects) = update(state, Msg::DraftSubmitted);

    assert_eq!(
        effects,
        vec![Effect::Ask {
            purpose: AskPurpose::Question,
            request: AskRequest {
                question: "What is an LLM?".to_string(),
                include_sources: true,
                language: None,
            },
        }]
    );
    let session = state.session();
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.messages()[0].role, Role::User);
    assert_eq!(session.messages()[0].content, "What is an LLM?");
    assert_eq!(session.draft(), "");
    assert_eq!(session.activity(), Activity::Asking(AskPurpose::Question));
    assert!(state.is_pending());
}

#[test]
fn answer_is_folded_with_sources_and_timing() {
    init_logging();
    let (state, _) = ask(AppState::new(), "What is an LLM?");
    let (state, effects) = update(
        state,
        Msg::AnswerReceived {
            purpose: AskPurpose::Question,
            result: Ok(answer("An LLM is...")),
        },
    );

    assert!(effects.is_empty());
    assert!(!state.is_pending());
    let messages = state.session().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "An LLM is...");
    assert_eq!(messages[1].processing_time_ms, Some(1200));
    let sources = messages[1].sources.as_ref().expect("sources");
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].file_name, "a.pdf");
}

#[test]
fn failed_question_shows_backend_message() {
    init_logging();
    let (state, _) = ask(AppState::new(), "hello");
    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            purpose: AskPurpose::Question,
            result: Err("db down".to_string()),
        },
    );

    let last = state.session().messages().last().unwrap();
    assert_eq!(last.role, Role::Error);
    assert_eq!(last.content, "db down");
    assert!(!state.is_pending());
}

#[test]
fn failed_question_without_message_uses_fallback() {
    let (state, _) = ask(AppState::new(), "hello");
    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            purpose: AskPurpose::Question,
            result: Err(String::new()),
        },
    );

    assert_eq!(
        state.session().messages().last().unwrap().content,
        "Communication error with the server"
    );
}

#[test]
fn summary_uses_marker_prompt_and_masks_failures() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::SummarizeRequested {
            content: "Long answer".to_string(),
        },
    );

    assert_eq!(state.session().messages()[0].content, "Generate a concise summary");
    assert_eq!(
        effects,
        vec![Effect::Ask {
            purpose: AskPurpose::Summary,
            request: AskRequest {
                question: "Please provide a concise summary in bullet points of this text:\n\nLong answer"
                    .to_string(),
                include_sources: false,
                language: Some("en".to_string()),
            },
        }]
    );

    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            purpose: AskPurpose::Summary,
            result: Err("db down".to_string()),
        },
    );
    let last = state.session().messages().last().unwrap();
    assert_eq!(last.role, Role::Error);
    assert_eq!(last.content, "Error generating summary");
    assert!(!state.is_pending());
}

#[test]
fn summary_answer_drops_sources() {
    let (state, _) = update(
        AppState::new(),
        Msg::SummarizeRequested {
            content: "x".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            purpose: AskPurpose::Summary,
            result: Ok(answer("- point")),
        },
    );

    let last = state.session().messages().last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert!(last.sources.is_none());
}

#[test]
fn improve_keeps_sources_and_masks_failures() {
    let (state, effects) = update(
        AppState::new(),
        Msg::ImproveRequested {
            content: "Short".to_string(),
        },
    );

    assert_eq!(state.session().messages()[0].content, "Improve and expand this answer");
    match &effects[..] {
        [Effect::Ask { purpose, request }] => {
            assert_eq!(*purpose, AskPurpose::Improve);
            assert!(request.include_sources);
            assert_eq!(request.language.as_deref(), Some("en"));
            assert!(request.question.ends_with("comprehensive information:\n\nShort"));
        }
        other => panic!("unexpected effects {other:?}"),
    }

    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            purpose: AskPurpose::Improve,
            result: Err("boom".to_string()),
        },
    );
    assert_eq!(
        state.session().messages().last().unwrap().content,
        "Error improving answer"
    );
}

#[test]
fn commands_are_refused_while_pending() {
    init_logging();
    let (state, _) = ask(AppState::new(), "first");
    let before = state.session().messages().len();

    let commands = vec![
        Msg::QuestionSubmitted("second".to_string()),
        Msg::SuggestionChosen("What is an LLM?".to_string()),
        Msg::SummarizeRequested {
            content: "x".to_string(),
        },
        Msg::ImproveRequested {
            content: "x".to_string(),
        },
        Msg::UploadRequested {
            file_name: "a.pdf".to_string(),
            bytes: vec![1, 2, 3],
        },
        Msg::IndexAllRequested,
    ];

    let mut state = state;
    for command in commands {
        let (next, effects) = update(state, command.clone());
        assert!(effects.is_empty(), "{command:?} should be refused");
        assert_eq!(next.session().messages().len(), before);
        assert!(next.is_pending());
        state = next;
    }
}

#[test]
fn messages_only_grow_until_reset() {
    let mut state = AppState::new();
    let mut last_len = 0;
    for text in ["one", "two", "three"] {
        let (next, _) = ask(state, text);
        let (next, _) = update(
            next,
            Msg::AnswerReceived {
                purpose: AskPurpose::Question,
                result: Ok(answer("ok")),
            },
        );
        let len = next.session().messages().len();
        assert!(len > last_len);
        last_len = len;
        state = next;
    }
    assert_eq!(last_len, 6);
    assert!(state.view().can_reset);

    let (state, _) = update(state, Msg::DraftChanged("half typed".to_string()));
    let (state, effects) = update(state, Msg::ResetClicked);
    assert!(effects.is_empty());
    assert!(state.session().messages().is_empty());
    assert_eq!(state.session().draft(), "");
    assert!(state.view().show_welcome);
}

#[test]
fn reset_does_not_touch_pending() {
    let (state, _) = ask(AppState::new(), "hello");
    assert!(!state.view().can_reset);

    let (state, _) = update(state, Msg::ResetClicked);
    assert!(state.session().messages().is_empty());
    assert!(state.is_pending());
}

#[test]
fn suggestion_fills_draft_and_asks() {
    let (state, effects) = update(
        AppState::new(),
        Msg::SuggestionChosen("Explain RAG to me".to_string()),
    );

    assert_eq!(effects.len(), 1);
    assert_eq!(state.session().draft(), "");
    assert_eq!(state.session().messages()[0].content, "Explain RAG to me");
}

#[test]
fn last_answer_targets_latest_assistant_turn() {
    let (state, _) = ask(AppState::new(), "q1");
    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            purpose: AskPurpose::Question,
            result: Ok(answer("first")),
        },
    );
    let (state, _) = ask(state, "q2");
    let (state, _) = update(
        state,
        Msg::AnswerReceived {
            purpose: AskPurpose::Question,
            result: Err("nope".to_string()),
        },
    );

    assert_eq!(state.view().last_answer(), Some("first"));
}
