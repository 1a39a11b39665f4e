//! Turns view-model snapshots into terminal lines.
//!
//! The terminal is append-only, so [`Screen`] remembers what it already
//! printed and emits only the difference on each frame.

use ragchat_core::{
    Activity, AppViewModel, AskPurpose, Document, Message, Notification, NotificationLevel, Role,
    Source, SUGGESTIONS,
};

#[derive(Debug, Default)]
pub struct Screen {
    printed: usize,
    welcomed: bool,
    activity: Activity,
    upload_open: bool,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        if view.messages.len() < self.printed {
            lines.push("--- conversation cleared ---".to_string());
            self.printed = 0;
            self.welcomed = false;
        }

        if view.show_welcome && !self.welcomed {
            lines.extend(welcome(view.documents_count));
            self.welcomed = true;
        }

        for message in &view.messages[self.printed..] {
            lines.extend(format_message(message));
        }
        self.printed = view.messages.len();

        if view.upload_open != self.upload_open {
            lines.push(if view.upload_open {
                "Upload: type /upload PATH to send a PDF, /cancel to close.".to_string()
            } else {
                "Upload closed.".to_string()
            });
            self.upload_open = view.upload_open;
        }

        if view.activity != self.activity {
            if let Some(status) = activity_line(view.activity) {
                lines.push(status.to_string());
            }
            self.activity = view.activity;
        }

        lines
    }
}

fn activity_line(activity: Activity) -> Option<&'static str> {
    match activity {
        Activity::Idle => None,
        Activity::Asking(AskPurpose::Question) => Some("... thinking"),
        Activity::Asking(AskPurpose::Summary) => Some("... summarizing"),
        Activity::Asking(AskPurpose::Improve) => Some("... improving"),
        Activity::Uploading => Some("... uploading and indexing"),
        Activity::Indexing => Some("... indexing all documents"),
        Activity::Refreshing => Some("... refreshing documents"),
    }
}

pub fn welcome(documents_count: u64) -> Vec<String> {
    let mut lines = vec![
        "Ask anything about your indexed documents.".to_string(),
        format!("{documents_count} documents indexed. Try one of these (/suggest N):"),
    ];
    lines.extend(
        SUGGESTIONS
            .iter()
            .enumerate()
            .map(|(i, question)| format!("  {}. {question}", i + 1)),
    );
    lines
}

pub fn format_message(message: &Message) -> Vec<String> {
    let prefix = match message.role {
        Role::User => "you>",
        Role::Assistant => "assistant>",
        Role::Error => "error>",
    };
    let mut lines = vec![format!(
        "[{}] {prefix} {}",
        message.timestamp.format("%H:%M"),
        message.content
    )];

    if let Some(sources) = message.sources.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("  Sources ({}):", sources.len()));
        lines.extend(sources.iter().map(format_source));
    }
    if let Some(ms) = message.processing_time_ms {
        lines.push(format!("  Generated in {:.2}s", ms as f64 / 1000.0));
    }
    lines
}

fn format_source(source: &Source) -> String {
    let page = source
        .page_number
        .map(|p| format!(", page {p}"))
        .unwrap_or_default();
    format!(
        "    - {} ({:.0}%{page}): {}",
        source.file_name,
        source.relevance_score * 100.0,
        source.excerpt
    )
}

pub fn format_documents(documents: &[Document]) -> Vec<String> {
    if documents.is_empty() {
        return vec!["No documents indexed.".to_string()];
    }
    documents
        .iter()
        .map(|doc| {
            let indexed = doc
                .index_date
                .map(|date| format!(", indexed {}", date.format("%Y-%m-%d %H:%M")))
                .unwrap_or_default();
            format!(
                "  {} ({} chunks, {:.1} KB{indexed})",
                doc.file_name,
                doc.chunk_count(),
                doc.file_size as f64 / 1024.0
            )
        })
        .collect()
}

pub fn format_notification(notification: &Notification) -> String {
    match notification.level {
        NotificationLevel::Success => format!("[ok] {}", notification.text),
        NotificationLevel::Error => format!("[error] {}", notification.text),
    }
}
