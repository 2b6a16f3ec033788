// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the suspending store flows: fetches, pagination,
//! conversation switches mid-flight, and the self-clean probe.
//!
//! The mock backend's hold/release gate stands in for network latency, so
//! every race here is scheduled explicitly rather than timed.

use std::sync::Arc;
use std::time::Duration;

use confab_config::StoreConfig;
use confab_core::SessionUser;
use confab_sync::MessageStore;
use confab_test_utils::{message, page, MockBackend, MockSession};
use tracing_test::traced_test;

fn small_config() -> StoreConfig {
    StoreConfig {
        max_buffered: 10,
        page_size: 3,
    }
}

fn harness(config: StoreConfig) -> (Arc<MessageStore>, Arc<MockBackend>, Arc<MockSession>) {
    let backend = Arc::new(MockBackend::new());
    let session = Arc::new(MockSession::new());
    let store = Arc::new(MessageStore::new(
        config,
        backend.clone(),
        session.clone(),
        session.clone(),
    ));
    (store, backend, session)
}

/// Selecting a conversation fetches its newest page and replaces the buffer.
/// A full page means older history may exist.
#[tokio::test]
async fn selecting_a_conversation_loads_its_newest_page() {
    let (store, backend, _) = harness(small_config());
    backend.queue_page("A", page("A", 10, 3)).await;

    store.set_chat_id(Some("A".into())).await;

    let snapshot = store.snapshot();
    assert_eq!(snapshot.chat_id.as_deref(), Some("A"));
    assert_eq!(snapshot.messages.len(), 3);
    assert!(!snapshot.loading);
    assert!(snapshot.has_older);

    // A short page settles has_older.
    backend.queue_page("A", page("A", 10, 2)).await;
    store.fetch_messages().await;
    assert!(!store.has_older());
}

/// Re-selecting the already-active conversation neither refetches nor
/// disturbs the buffer.
#[tokio::test]
async fn reselecting_the_active_conversation_is_a_no_op() {
    let (store, backend, _) = harness(small_config());
    backend.queue_page("A", page("A", 10, 3)).await;
    store.set_chat_id(Some("A".into())).await;
    assert_eq!(backend.fetch_count().await, 1);

    store.set_chat_id(Some("A".into())).await;

    assert_eq!(backend.fetch_count().await, 1);
    assert_eq!(store.snapshot().messages.len(), 3);
}

/// Deselecting resets the store to its initial state without a fetch.
#[tokio::test]
async fn deselecting_resets_the_store() {
    let (store, backend, _) = harness(small_config());
    backend.queue_page("A", page("A", 10, 3)).await;
    store.set_chat_id(Some("A".into())).await;

    store.set_chat_id(None).await;

    let snapshot = store.snapshot();
    assert!(snapshot.chat_id.is_none());
    assert!(snapshot.messages.is_empty());
    assert!(!snapshot.has_older);
    assert_eq!(backend.fetch_count().await, 1);
}

/// A failed fetch lands in the error field and leaves the buffer intact.
#[tokio::test]
async fn fetch_failure_surfaces_error_and_keeps_buffer() {
    let (store, backend, _) = harness(small_config());
    backend.queue_page("A", page("A", 10, 3)).await;
    store.set_chat_id(Some("A".into())).await;

    backend.fail_next();
    store.fetch_messages().await;

    let snapshot = store.snapshot();
    assert_eq!(snapshot.messages.len(), 3);
    assert!(!snapshot.loading);
    let error = snapshot.error.expect("fetch failure must surface");
    assert!(error.contains("backend"), "unexpected error text: {error}");
}

/// A fetch that resolves after the user switched conversations is discarded
/// without touching the buffer. The discard is diagnostics-only: logged, not
/// surfaced as an error.
#[traced_test]
#[tokio::test]
async fn stale_fetch_resolution_is_discarded() {
    let (store, backend, _) = harness(small_config());
    backend.hold("A").await;
    backend.queue_page("A", page("A", 10, 3)).await;
    backend.queue_page("B", page("B", 50, 2)).await;

    let switching = {
        let store = store.clone();
        tokio::spawn(async move { store.set_chat_id(Some("A".into())).await })
    };
    while backend.fetch_count().await == 0 {
        tokio::task::yield_now().await;
    }

    // User navigates away while A's page is still in flight.
    store.set_chat_id(Some("B".into())).await;
    assert_eq!(store.chat_id().as_deref(), Some("B"));

    backend.release("A").await;
    tokio::time::timeout(Duration::from_secs(2), switching)
        .await
        .expect("held fetch never resolved")
        .unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.chat_id.as_deref(), Some("B"));
    let ids: Vec<&str> = snapshot.messages.iter().map(|m| m.id()).collect();
    assert_eq!(ids, ["B-m50", "B-m51"]);
    assert!(!snapshot.loading);
    assert!(snapshot.error.is_none());
    assert!(logs_contain("discarding stale page"));
}

/// Switching conversations keeps exactly the pending messages that already
/// belong to the destination, until the fetch replaces the buffer.
#[tokio::test]
async fn switch_preserves_only_matching_pending_messages() {
    let (store, backend, _) = harness(small_config());
    backend.queue_page("A", page("A", 10, 1)).await;
    store.set_chat_id(Some("A".into())).await;

    let mut draft = message("tmp-b", "B", 90);
    draft.client_msg_id = Some("c-1".into());
    store.add_optimistic_message(draft);
    assert_eq!(store.snapshot().messages.len(), 2);

    backend.hold("B").await;
    let switching = {
        let store = store.clone();
        tokio::spawn(async move { store.set_chat_id(Some("B".into())).await })
    };
    while backend.fetch_count().await < 2 {
        tokio::task::yield_now().await;
    }

    // Between the switch and the fetch resolution: only the pending draft
    // for B survives.
    let snapshot = store.snapshot();
    assert_eq!(snapshot.chat_id.as_deref(), Some("B"));
    assert_eq!(snapshot.messages.len(), 1);
    assert_eq!(snapshot.messages[0].id(), "tmp-b");
    assert!(snapshot.messages[0].pending);

    // The fetch result is authoritative for the recent window; the draft
    // is dropped with the rest of the stale buffer.
    backend.release("B").await;
    tokio::time::timeout(Duration::from_secs(2), switching)
        .await
        .expect("held fetch never resolved")
        .unwrap();
    assert!(store.snapshot().messages.is_empty());
}

/// Older pages prepend before the oldest message's timestamp.
#[tokio::test]
async fn load_older_prepends_before_the_cursor() {
    let (store, backend, _) = harness(small_config());
    backend.queue_page("A", page("A", 10, 3)).await;
    store.set_chat_id(Some("A".into())).await;

    backend.queue_page("A", page("A", 0, 3)).await;
    store.load_older().await;

    let calls = backend.recorded_calls().await;
    assert_eq!(calls.len(), 2);
    let cursor = calls[1].query.before.expect("older fetch must carry a cursor");
    assert_eq!(cursor, confab_test_utils::base_time() + chrono::Duration::seconds(10));

    let snapshot = store.snapshot();
    let ids: Vec<&str> = snapshot.messages.iter().map(|m| m.id()).collect();
    assert_eq!(ids, ["A-m0", "A-m1", "A-m2", "A-m10", "A-m11", "A-m12"]);
    assert!(snapshot.has_older);

    // A short older page means history is exhausted.
    backend.queue_page("A", page("A", -5, 1)).await;
    store.load_older().await;
    assert!(!store.has_older());
    assert_eq!(store.snapshot().messages.len(), 7);
}

/// A message timestamped exactly on the cursor arrives in both pages; the
/// merge keeps one copy.
#[tokio::test]
async fn load_older_drops_cursor_overlap() {
    let (store, backend, _) = harness(small_config());
    backend.queue_page("A", page("A", 10, 3)).await;
    store.set_chat_id(Some("A".into())).await;

    let older = vec![
        message("A-m8", "A", 8),
        message("A-m9", "A", 9),
        message("A-m10", "A", 10),
    ];
    backend.queue_page("A", older).await;
    store.load_older().await;

    let snapshot = store.snapshot();
    let ids: Vec<&str> = snapshot.messages.iter().map(|m| m.id()).collect();
    assert_eq!(ids, ["A-m8", "A-m9", "A-m10", "A-m11", "A-m12"]);
}

/// With no buffered message there is no cursor, so load_older does nothing.
#[tokio::test]
async fn load_older_without_messages_is_a_no_op() {
    let (store, backend, _) = harness(small_config());
    store.set_chat_id(Some("A".into())).await;
    assert!(store.snapshot().messages.is_empty());

    store.load_older().await;

    assert_eq!(backend.fetch_count().await, 1);
}

/// A failed older fetch surfaces the error and leaves the buffer intact.
#[tokio::test]
async fn load_older_failure_surfaces_error() {
    let (store, backend, _) = harness(small_config());
    backend.queue_page("A", page("A", 10, 3)).await;
    store.set_chat_id(Some("A".into())).await;

    backend.fail_next();
    store.load_older().await;

    let snapshot = store.snapshot();
    assert_eq!(snapshot.messages.len(), 3);
    assert!(snapshot.error.is_some());
}

/// The capacity bound trims from the new oldest end after a prepend, even
/// when that discards part of the just-fetched page.
#[tokio::test]
async fn load_older_eviction_trims_the_new_oldest_end() {
    let (store, backend, _) = harness(StoreConfig {
        max_buffered: 4,
        page_size: 3,
    });
    backend.queue_page("A", page("A", 10, 3)).await;
    store.set_chat_id(Some("A".into())).await;

    backend.queue_page("A", page("A", 0, 3)).await;
    store.load_older().await;

    let snapshot = store.snapshot();
    let ids: Vec<&str> = snapshot.messages.iter().map(|m| m.id()).collect();
    assert_eq!(ids, ["A-m2", "A-m10", "A-m11", "A-m12"]);
}

/// An older page resolving after a conversation switch is discarded.
#[tokio::test]
async fn stale_older_page_is_discarded() {
    let (store, backend, _) = harness(small_config());
    backend.queue_page("A", page("A", 10, 3)).await;
    store.set_chat_id(Some("A".into())).await;

    backend.hold("A").await;
    backend.queue_page("A", page("A", 0, 3)).await;
    backend.queue_page("B", page("B", 50, 1)).await;
    let loading_older = {
        let store = store.clone();
        tokio::spawn(async move { store.load_older().await })
    };
    while backend.fetch_count().await < 2 {
        tokio::task::yield_now().await;
    }

    store.set_chat_id(Some("B".into())).await;
    backend.release("A").await;
    tokio::time::timeout(Duration::from_secs(2), loading_older)
        .await
        .expect("held fetch never resolved")
        .unwrap();

    let ids: Vec<String> = store
        .snapshot()
        .messages
        .iter()
        .map(|m| m.id().to_string())
        .collect();
    assert_eq!(ids, ["B-m50"]);
}

/// Signed out: the probe demands a reset regardless of buffer contents.
#[tokio::test]
async fn self_clean_resets_when_signed_out() {
    let (store, backend, session) = harness(small_config());
    session.set_user(None);
    backend.queue_page("A", page("A", 10, 3)).await;
    store.set_chat_id(Some("A".into())).await;

    store.self_clean().await;

    let snapshot = store.snapshot();
    assert!(snapshot.chat_id.is_none());
    assert!(snapshot.messages.is_empty());
}

/// A live session with an active selection keeps the store untouched, and
/// repeating the call stays a no-op.
#[tokio::test]
async fn self_clean_keeps_state_with_session_and_selection() {
    let (store, backend, session) = harness(small_config());
    session.set_user(Some(SessionUser {
        id: "user-1".into(),
        email: None,
    }));
    session.set_active_chat(Some("A"));
    backend.queue_page("A", page("A", 10, 3)).await;
    store.set_chat_id(Some("A".into())).await;

    store.self_clean().await;
    store.self_clean().await;

    let snapshot = store.snapshot();
    assert_eq!(snapshot.chat_id.as_deref(), Some("A"));
    assert_eq!(snapshot.messages.len(), 3);
}

/// Signed in but nothing selected: the store resets.
#[tokio::test]
async fn self_clean_resets_without_active_selection() {
    let (store, backend, session) = harness(small_config());
    session.set_user(Some(SessionUser {
        id: "user-1".into(),
        email: None,
    }));
    session.set_active_chat(None);
    backend.queue_page("A", page("A", 10, 3)).await;
    store.set_chat_id(Some("A".into())).await;

    store.self_clean().await;

    assert!(store.snapshot().chat_id.is_none());
}

/// A failing session probe is treated as an invalid session.
#[tokio::test]
async fn self_clean_treats_probe_failure_as_invalid() {
    let (store, backend, session) = harness(small_config());
    session.set_user(Some(SessionUser {
        id: "user-1".into(),
        email: None,
    }));
    session.set_active_chat(Some("A"));
    backend.queue_page("A", page("A", 10, 3)).await;
    store.set_chat_id(Some("A".into())).await;

    session.fail_next_probe();
    store.self_clean().await;

    assert!(store.snapshot().chat_id.is_none());
}
