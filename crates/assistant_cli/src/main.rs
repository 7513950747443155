//! Line-oriented front end for the customer-discussion assistant.
//!
//! Mirrors the chat command surface (/ask, /query, /products, /end, /save,
//! /cancel) over stdin; the chat transport itself is out of scope here.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use knowledge_client::KnowledgeClient;
use profile_client::ProfileStoreClient;
use session_core::SessionError;
use session_engine::{EngineConfig, EngineReply, SessionEngine};
use session_store::FileSessionStore;

#[derive(Parser)]
#[command(name = "assistant-cli")]
#[command(about = "Customer-discussion assistant over the profile store and knowledge backend")]
#[command(version)]
struct Args {
    /// Owner identity for this session.
    #[arg(long, default_value = "local")]
    user: String,

    /// Directory for persisted session records.
    #[arg(long, env = "SESSION_STORE_DIR", default_value = ".sessions")]
    store_dir: PathBuf,

    #[arg(long, env = "PROFILE_API_KEY", hide_env_values = true)]
    profile_api_key: String,

    #[arg(long, env = "PROFILE_API_URL")]
    profile_api_url: Option<String>,

    #[arg(long, env = "KNOWLEDGE_API_KEY", hide_env_values = true)]
    knowledge_api_key: String,

    #[arg(long, env = "KNOWLEDGE_API_URL")]
    knowledge_api_url: Option<String>,

    #[arg(long, env = "KNOWLEDGE_MODEL")]
    knowledge_model: Option<String>,

    /// Session TTL in seconds.
    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = 604_800)]
    ttl_secs: u64,

    /// Per-call timeout for backend requests, in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

const HELP: &str = "\
Commands:
  /ask <customer> [question]  bind a session to a customer, optionally asking right away
  /query <question>           ask the AI in the context of the current discussion
  /products <question>        search the product corpus, grounded in the discussion
  /lookup <question>          search the product corpus without a session
  /end                        summarize the discussion and review the draft
  /save                       write the confirmed summary to the profile
  /cancel                     discard the current session
  /quit                       exit
Plain text is recorded as team discussion, or treated as a summary revision
while a draft is pending.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let engine = build_engine(&args);

    println!("Customer-discussion assistant. {}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" || line == "/exit" {
            break;
        }

        match run_command(&engine, &args.user, line).await {
            Ok(Some(output)) => println!("{}", output),
            Ok(None) => {}
            Err(err) => println!("{}", render_error(&err)),
        }
    }

    Ok(())
}

fn build_engine(args: &Args) -> SessionEngine<FileSessionStore> {
    let mut profiles = ProfileStoreClient::new(&args.profile_api_key);
    if let Some(url) = &args.profile_api_url {
        profiles = profiles.with_base_url(url.clone());
    }
    let profiles = Arc::new(profiles);

    let mut knowledge = KnowledgeClient::new(&args.knowledge_api_key);
    if let Some(url) = &args.knowledge_api_url {
        knowledge = knowledge.with_base_url(url.clone());
    }
    if let Some(model) = &args.knowledge_model {
        knowledge = knowledge.with_model(model.clone());
    }

    SessionEngine::new(
        FileSessionStore::new(&args.store_dir),
        profiles.clone(),
        Arc::new(knowledge),
        profiles,
        EngineConfig {
            session_ttl: Duration::from_secs(args.ttl_secs),
            call_timeout: Duration::from_secs(args.timeout_secs),
            ..EngineConfig::default()
        },
    )
}

async fn run_command(
    engine: &SessionEngine<FileSessionStore>,
    owner: &str,
    line: &str,
) -> Result<Option<String>, SessionError> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let reply = match command {
        "/help" | "/start" => return Ok(Some(HELP.to_string())),
        "/ask" => {
            // First token is the customer name, the remainder the question.
            let (name, question) = match rest.split_once(char::is_whitespace) {
                Some((name, question)) => (name, Some(question.trim())),
                None if !rest.is_empty() => (rest, None),
                None => return Ok(Some("Usage: /ask <customer> [question]".to_string())),
            };
            engine.bind(owner, name, question).await?
        }
        "/query" => {
            if rest.is_empty() {
                return Ok(Some("Usage: /query <question>".to_string()));
            }
            engine.query(owner, rest).await?
        }
        "/products" => {
            if rest.is_empty() {
                return Ok(Some("Usage: /products <question>".to_string()));
            }
            engine.search_products(owner, rest).await?
        }
        "/lookup" => {
            if rest.is_empty() {
                return Ok(Some("Usage: /lookup <question>".to_string()));
            }
            engine.search_products_standalone(rest).await?
        }
        "/end" => engine.end_session(owner).await?,
        "/save" => engine.save(owner).await?,
        "/cancel" => engine.cancel(owner).await?,
        _ if command.starts_with('/') => {
            return Ok(Some(format!(
                "Unrecognized command {}. Type /help for the command list.",
                command
            )));
        }
        _ => engine.dispatch_free_text(owner, owner, line).await?,
    };

    Ok(render_reply(reply))
}

fn render_reply(reply: EngineReply) -> Option<String> {
    match reply {
        EngineReply::Bound { profile_name } => Some(format!(
            "Session bound to {}. Use /query, /products, or /end when the discussion is done.",
            profile_name
        )),
        EngineReply::Answer(answer) => Some(answer),
        EngineReply::SearchResult(result) => Some(result),
        EngineReply::DraftSummary(draft) => Some(format!(
            "Draft summary (reply with edits, /save to confirm, /cancel to discard):\n{}",
            draft
        )),
        EngineReply::Saved { profile_name } => Some(format!(
            "Summary written to the profile of {}. Session closed.",
            profile_name
        )),
        EngineReply::Cancelled { had_session: true } => Some("Session discarded.".to_string()),
        EngineReply::Cancelled { had_session: false } => {
            Some("No session to cancel.".to_string())
        }
        EngineReply::NoteRecorded => None,
        EngineReply::Ignored => None,
    }
}

/// Map every error kind to a distinct, actionable message. Raw collaborator
/// detail goes to the log, never to the user.
fn render_error(err: &SessionError) -> String {
    match err {
        SessionError::ProfileNotFound => {
            "No customer matched that name. Check the spelling and try again.".to_string()
        }
        SessionError::AmbiguousProfile(candidates) => {
            let names: Vec<_> = candidates
                .iter()
                .map(|c| format!("- {}", c.display_name))
                .collect();
            format!(
                "Multiple customers matched, please be more specific:\n{}",
                names.join("\n")
            )
        }
        SessionError::NoActiveSession => {
            "No active session. Start one with /ask <customer> [question].".to_string()
        }
        SessionError::SessionAlreadyActive => {
            "A session is already active. Use /end or /cancel before starting another.".to_string()
        }
        SessionError::NoPendingSummary => {
            "No summary is awaiting confirmation. Use /end to generate one.".to_string()
        }
        SessionError::BackendUnavailable(detail) => {
            log::warn!("backend unavailable: {}", detail);
            "The assistant backend did not respond. Nothing was changed, please try again."
                .to_string()
        }
        SessionError::PersistenceFailure(detail) => {
            log::warn!("persistence failure: {}", detail);
            "Saving failed. The session is unchanged, please retry.".to_string()
        }
    }
}
