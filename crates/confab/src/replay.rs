// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `confab replay` command implementation.
//!
//! Drives a store, router, and listener set from a JSON-lines script, then
//! prints the resulting buffer, conversation list, and typing state. The
//! backend is scripted by the same file (`page` operations queue the pages
//! later fetches will serve), so a replay is fully deterministic and runs
//! without any network collaborator.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use confab_channel::{EventRouter, RouteTotals};
use confab_config::ConfabConfig;
use confab_core::{
    ChannelFrame, ChatContext, ConfabError, Conversation, Message, MessageBackend, PageQuery,
    SessionProvider, SessionUser,
};
use confab_sync::{ConversationList, MessageStore, StoreSnapshot, TypingIndicator};

/// One line of a replay script.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
enum ScriptOp {
    /// Queue a history page the backend will serve for `chat_id`. Pages are
    /// consumed in queue order, one per fetch.
    Page {
        chat_id: String,
        messages: Vec<Message>,
    },
    /// Select the active conversation, or deselect with `null`.
    SetChat { chat_id: Option<String> },
    /// Insert a locally-authored message ahead of server confirmation.
    Optimistic { message: Message },
    /// Route one raw push frame, exactly as the channel would deliver it.
    Push { frame: ChannelFrame },
    /// Page older history into the buffer.
    LoadOlder,
    /// Probe the session and reset the store if it is no longer valid.
    SelfClean,
}

/// Backend whose pages come from the script instead of a server.
#[derive(Default)]
struct ScriptBackend {
    pages: Mutex<HashMap<String, VecDeque<Vec<Message>>>>,
}

impl ScriptBackend {
    fn pages(&self) -> MutexGuard<'_, HashMap<String, VecDeque<Vec<Message>>>> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn queue_page(&self, chat_id: &str, messages: Vec<Message>) {
        self.pages()
            .entry(chat_id.to_string())
            .or_default()
            .push_back(messages);
    }
}

#[async_trait]
impl MessageBackend for ScriptBackend {
    async fn fetch_page(
        &self,
        chat_id: &str,
        _query: PageQuery,
    ) -> Result<Vec<Message>, ConfabError> {
        // An exhausted queue serves empty pages, like a fully-paged history.
        Ok(self
            .pages()
            .get_mut(chat_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_default())
    }
}

/// Session collaborator for replays: signed in for the whole run, with the
/// active conversation mirroring the script's latest `set-chat`.
#[derive(Default)]
struct ScriptSession {
    active: Mutex<Option<String>>,
}

impl ScriptSession {
    fn set_active(&self, chat_id: Option<String>) {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = chat_id;
    }
}

#[async_trait]
impl SessionProvider for ScriptSession {
    async fn current_user(&self) -> Result<Option<SessionUser>, ConfabError> {
        Ok(Some(SessionUser {
            id: "replay".to_string(),
            email: None,
        }))
    }
}

impl ChatContext for ScriptSession {
    fn active_chat_id(&self) -> Option<String> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// The store and its collaborators, wired the way a client embedding would.
struct ReplayHarness {
    store: Arc<MessageStore>,
    conversations: Arc<ConversationList>,
    typing: Arc<TypingIndicator>,
    router: EventRouter,
    backend: Arc<ScriptBackend>,
    session: Arc<ScriptSession>,
}

fn build_harness(config: &ConfabConfig) -> ReplayHarness {
    let backend = Arc::new(ScriptBackend::default());
    let session = Arc::new(ScriptSession::default());
    let store = Arc::new(MessageStore::new(
        config.store.clone(),
        backend.clone(),
        session.clone(),
        session.clone(),
    ));
    let conversations = Arc::new(ConversationList::new());
    let typing = Arc::new(TypingIndicator::new());
    let router = EventRouter::new(store.clone(), conversations.clone(), typing.clone());
    ReplayHarness {
        store,
        conversations,
        typing,
        router,
        backend,
        session,
    }
}

async fn apply_op(harness: &ReplayHarness, op: ScriptOp) {
    match op {
        ScriptOp::Page { chat_id, messages } => {
            debug!(chat_id = %chat_id, count = messages.len(), "queueing scripted page");
            harness.backend.queue_page(&chat_id, messages);
        }
        ScriptOp::SetChat { chat_id } => {
            harness.session.set_active(chat_id.clone());
            harness.store.set_chat_id(chat_id).await;
        }
        ScriptOp::Optimistic { message } => {
            harness.store.add_optimistic_message(message);
        }
        ScriptOp::Push { frame } => {
            harness.router.route(frame);
        }
        ScriptOp::LoadOlder => {
            harness.store.load_older().await;
        }
        ScriptOp::SelfClean => {
            harness.store.self_clean().await;
        }
    }
}

/// Runs a whole script, one operation per non-empty line. Lines starting
/// with `#` are comments.
async fn run_script(harness: &ReplayHarness, script: &str) -> Result<usize, ConfabError> {
    let mut applied = 0;
    for (index, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let op: ScriptOp = serde_json::from_str(line)
            .map_err(|e| ConfabError::Internal(format!("script line {}: {e}", index + 1)))?;
        apply_op(harness, op).await;
        applied += 1;
    }
    Ok(applied)
}

fn print_report(
    snapshot: &StoreSnapshot,
    conversations: &[Conversation],
    typing: &[String],
    totals: RouteTotals,
) {
    let chat = snapshot.chat_id.as_deref().unwrap_or("(none)");
    println!(
        "chat: {chat} ({} buffered, has_older: {})",
        snapshot.messages.len(),
        snapshot.has_older
    );
    if let Some(error) = &snapshot.error {
        println!("error: {error}");
    }
    for entry in &snapshot.messages {
        let number = entry
            .message
            .message_number
            .map_or_else(|| "--".to_string(), |n| format!("#{n}"));
        let state = if entry.pending { "pending" } else { "settled" };
        println!(
            "  {} {} {} {}/{}: {}",
            entry.id(),
            entry.message.role,
            number,
            state,
            entry.source,
            entry.message.text
        );
    }
    println!("conversations: {}", conversations.len());
    for thread in conversations {
        println!(
            "  {} updated {} {}",
            thread.id,
            thread.updated_at.to_rfc3339(),
            thread.title.as_deref().unwrap_or("(untitled)")
        );
    }
    if typing.is_empty() {
        println!("typing: (none)");
    } else {
        println!("typing: {}", typing.join(", "));
    }
    println!(
        "frames: {} routed, {} dropped, {} malformed",
        totals.routed, totals.dropped, totals.malformed
    );
}

/// Runs the `confab replay` command.
pub async fn run_replay(config: ConfabConfig, script: &Path) -> Result<(), ConfabError> {
    init_tracing(&config.log.level);

    let text = std::fs::read_to_string(script).map_err(|e| {
        ConfabError::Internal(format!("cannot read script {}: {e}", script.display()))
    })?;

    let harness = build_harness(&config);
    let applied = run_script(&harness, &text).await?;
    info!(operations = applied, "replay complete");

    print_report(
        &harness.store.snapshot(),
        &harness.conversations.snapshot(),
        &harness.typing.snapshot(),
        harness.router.totals(),
    );
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "confab={log_level},confab_sync={log_level},confab_channel={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
