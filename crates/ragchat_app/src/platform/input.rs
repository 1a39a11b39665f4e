use std::path::PathBuf;

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Summarize,
    Improve,
    /// 1-based index into the starter questions.
    Suggest(usize),
    OpenUpload,
    Upload(PathBuf),
    CancelUpload,
    IndexAll,
    Documents,
    Stats,
    Health,
    Check(String),
    Refresh,
    Reset,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub fn parse(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Ask(line.trim_end_matches(['\r', '\n']).to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match (name, arg) {
        ("summarize", _) => Command::Summarize,
        ("improve", _) => Command::Improve,
        ("suggest", n) => n
            .parse()
            .map(Command::Suggest)
            .unwrap_or_else(|_| Command::Unknown(trimmed.to_string())),
        ("upload", "") => Command::OpenUpload,
        ("upload", path) => Command::Upload(PathBuf::from(path)),
        ("cancel", _) => Command::CancelUpload,
        ("index", _) => Command::IndexAll,
        ("docs", _) => Command::Documents,
        ("stats", _) => Command::Stats,
        ("health", _) => Command::Health,
        ("check", "") => Command::Unknown(trimmed.to_string()),
        ("check", file_name) => Command::Check(file_name.to_string()),
        ("refresh", _) => Command::Refresh,
        ("reset", _) => Command::Reset,
        ("help", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

pub const HELP: &[&str] = &[
    "  <text>          ask a question",
    "  /summarize      summarize the last answer",
    "  /improve        expand the last answer",
    "  /suggest N      ask starter question N",
    "  /upload [PATH]  open the upload prompt, or upload a PDF",
    "  /cancel         close the upload prompt",
    "  /index          index every document on the server",
    "  /docs           list indexed documents",
    "  /stats          show index statistics",
    "  /health         ping the backend",
    "  /check NAME     ask whether a document is indexed",
    "  /refresh        re-read documents and statistics",
    "  /reset          clear the conversation",
    "  /quit           leave",
];
