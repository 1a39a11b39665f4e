//! Fixed texts and synthesized prompts used by the derived commands.

/// Language tag forced on summary and improve requests.
pub(crate) const DERIVED_LANGUAGE: &str = "en";

pub(crate) const SUMMARY_MARKER: &str = "Generate a concise summary";
pub(crate) const IMPROVE_MARKER: &str = "Improve and expand this answer";

pub(crate) const COMMUNICATION_ERROR: &str = "Communication error with the server";
pub(crate) const SUMMARY_FAILED: &str = "Error generating summary";
pub(crate) const IMPROVE_FAILED: &str = "Error improving answer";
pub(crate) const PDF_ONLY: &str = "Only PDF files are accepted";

/// Starter questions offered while the conversation is empty.
pub const SUGGESTIONS: [&str; 4] = [
    "What is an LLM?",
    "Explain RAG to me",
    "How does chunking work?",
    "What is an embedding?",
];

pub(crate) fn summary_prompt(content: &str) -> String {
    format!("Please provide a concise summary in bullet points of this text:\n\n{content}")
}

pub(crate) fn improve_prompt(content: &str) -> String {
    format!(
        "Please improve and expand this answer with more details, examples, and comprehensive information:\n\n{content}"
    )
}

/// The backend only indexes PDFs.
pub fn is_accepted_upload(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".pdf")
}

pub(crate) fn upload_succeeded(file_name: &str, chunks: u32) -> String {
    format!("Document \"{file_name}\" uploaded and indexed successfully! {chunks} chunks created.")
}

pub(crate) fn upload_failed(message: &str) -> String {
    format!("Upload error: {message}")
}

pub(crate) fn index_all_succeeded(documents: u32) -> String {
    format!("{documents} documents indexed successfully!")
}

pub(crate) fn index_all_failed(message: &str) -> String {
    format!("Indexing error: {message}")
}
