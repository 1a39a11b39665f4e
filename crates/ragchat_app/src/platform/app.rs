use std::sync::Arc;

use chat_logging::{chat_error, chat_info, chat_warn};
use ragchat_core::{Msg, SUGGESTIONS};
use ragchat_engine::{ConversationController, Gateway, ReindexOutcome, ReqwestGateway};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::config::AppConfig;
use super::input::{self, Command};
use super::logging;
use super::render::{self, Screen};

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    logging::initialize(config.log_destination, config.log_level);
    chat_info!(
        "Starting ragchat against {} (connect {:?}, request {:?})",
        config.gateway.base_url,
        config.gateway.connect_timeout,
        config.gateway.request_timeout
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(config))
}

enum Flow {
    Continue,
    Quit,
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let gateway: Arc<dyn Gateway> = Arc::new(ReqwestGateway::new(config.gateway)?);
    let (mut controller, mut notifications) = ConversationController::new(gateway.clone());
    let mut screen = Screen::new();

    match controller.startup().await {
        ReindexOutcome::NotNeeded => {}
        ReindexOutcome::Completed(report) => println!(
            "[ok] Index repaired: {} documents reindexed.",
            report.documents_indexed
        ),
        ReindexOutcome::Failed(message) => {
            println!("[error] Automatic reindex failed: {message}")
        }
    }
    print_frame(&mut screen, &mut controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Flow::Quit = handle_line(&line, &mut controller, gateway.as_ref()).await {
                    break;
                }
            }
            _ = controller.process_next_completion(), if controller.in_flight() > 0 => {}
            Some(notification) = notifications.recv() => {
                println!("{}", render::format_notification(&notification));
            }
        }
        print_frame(&mut screen, &mut controller);
    }

    if controller.in_flight() > 0 {
        chat_warn!(
            "Leaving with {} backend calls still running",
            controller.in_flight()
        );
    }
    chat_info!("ragchat stopped");
    Ok(())
}

fn print_frame(screen: &mut Screen, controller: &mut ConversationController) {
    if !controller.consume_dirty() {
        return;
    }
    for line in screen.frame(&controller.view()) {
        println!("{line}");
    }
}

async fn handle_line(
    line: &str,
    controller: &mut ConversationController,
    gateway: &dyn Gateway,
) -> Flow {
    match input::parse(line) {
        Command::Empty => {}
        Command::Ask(text) => {
            controller.dispatch(Msg::DraftChanged(text));
            controller.dispatch(Msg::DraftSubmitted);
        }
        Command::Suggest(n) => match n.checked_sub(1).and_then(|i| SUGGESTIONS.get(i)) {
            Some(question) => controller.dispatch(Msg::SuggestionChosen(question.to_string())),
            None => println!("Pick a suggestion between 1 and {}.", SUGGESTIONS.len()),
        },
        Command::Summarize => match controller.view().last_answer() {
            Some(answer) => controller.summarize(answer),
            None => println!("No answer to summarize yet."),
        },
        Command::Improve => match controller.view().last_answer() {
            Some(answer) => controller.improve(answer),
            None => println!("No answer to improve yet."),
        },
        Command::OpenUpload => controller.dispatch(Msg::UploadOpened),
        Command::CancelUpload => controller.dispatch(Msg::UploadClosed),
        Command::Upload(path) => {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                println!("[error] Not a file: {}", path.display());
                return Flow::Continue;
            };
            match tokio::fs::read(&path).await {
                Ok(bytes) => controller.upload_document(file_name, bytes),
                Err(err) => {
                    chat_error!("Cannot read {}: {}", path.display(), err);
                    println!("[error] Cannot read {}: {err}", path.display());
                }
            }
        }
        Command::IndexAll => controller.index_all_documents(),
        Command::Refresh => controller.refresh_catalog(),
        Command::Reset => {
            if controller.view().can_reset {
                controller.reset();
            } else {
                println!("Nothing to reset right now.");
            }
        }
        Command::Documents => {
            for line in render::format_documents(&controller.view().documents) {
                println!("{line}");
            }
        }
        Command::Stats => {
            let view = controller.view();
            println!(
                "{} documents indexed, status: {}",
                view.documents_count,
                view.backend_status.as_deref().unwrap_or("unknown")
            );
        }
        Command::Health => {
            let health = gateway.health_check().await;
            match health.service {
                Some(service) => println!("{service}: {}", health.status),
                None => println!("backend: {}", health.status),
            }
        }
        Command::Check(file_name) => {
            let check = gateway.check_document_indexed(&file_name).await;
            let verdict = if check.indexed { "indexed" } else { "not indexed" };
            println!("{file_name}: {verdict}");
        }
        Command::Help => {
            for line in input::HELP {
                println!("{line}");
            }
        }
        Command::Quit => return Flow::Quit,
        Command::Unknown(text) => println!("Unknown command {text}. Type /help."),
    }
    Flow::Continue
}
