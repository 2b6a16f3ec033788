// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock authentication session and conversation selection.
//!
//! One object implements both `SessionProvider` and `ChatContext`, the two
//! collaborators the self-clean probe consults, so a test controls the whole
//! probe from a single handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use confab_core::{ChatContext, ConfabError, SessionProvider, SessionUser};

pub struct MockSession {
    user: Mutex<Option<SessionUser>>,
    active_chat: Mutex<Option<String>>,
    fail_probe: AtomicBool,
}

impl MockSession {
    /// Signed out, nothing selected.
    pub fn new() -> Self {
        Self {
            user: Mutex::new(None),
            active_chat: Mutex::new(None),
            fail_probe: AtomicBool::new(false),
        }
    }

    /// Signed in as `user_id`, nothing selected.
    pub fn signed_in(user_id: &str) -> Self {
        let session = Self::new();
        session.set_user(Some(SessionUser {
            id: user_id.into(),
            email: Some(format!("{user_id}@example.com")),
        }));
        session
    }

    pub fn set_user(&self, user: Option<SessionUser>) {
        *self.user.lock().unwrap() = user;
    }

    pub fn set_active_chat(&self, chat_id: Option<&str>) {
        *self.active_chat.lock().unwrap() = chat_id.map(str::to_string);
    }

    /// Makes the next `current_user` probe fail, one time.
    pub fn fail_next_probe(&self) {
        self.fail_probe.store(true, Ordering::SeqCst);
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionProvider for MockSession {
    async fn current_user(&self) -> Result<Option<SessionUser>, ConfabError> {
        if self.fail_probe.swap(false, Ordering::SeqCst) {
            return Err(ConfabError::Session {
                message: "injected probe failure".into(),
                source: None,
            });
        }
        Ok(self.user.lock().unwrap().clone())
    }
}

impl ChatContext for MockSession {
    fn active_chat_id(&self) -> Option<String> {
        self.active_chat.lock().unwrap().clone()
    }
}
