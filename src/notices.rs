//! Short-lived user feedback messages. Independent of server state.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::AbortHandle;

pub const DEFAULT_NOTICE_LIFETIME: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub kind: NoticeKind,
    pub created_at: DateTime<Local>,
}

#[derive(Default)]
struct QueueState {
    notices: Mutex<Vec<Notice>>,
    timers: Mutex<HashMap<u64, AbortHandle>>,
}

impl QueueState {
    fn dismiss(&self, id: u64) -> bool {
        if let Some(timer) = self
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
        {
            timer.abort();
        }
        self.drop_notice(id)
    }

    fn expire(&self, id: u64) {
        self.timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        if self.drop_notice(id) {
            tracing::debug!(id, "notice expired");
        }
    }

    fn drop_notice(&self, id: u64) -> bool {
        let mut notices = self.notices.lock().unwrap_or_else(PoisonError::into_inner);
        let before = notices.len();
        notices.retain(|n| n.id != id);
        notices.len() != before
    }
}

pub struct NoticeQueue {
    next_id: AtomicU64,
    state: Arc<QueueState>,
    default_lifetime: Duration,
}

impl NoticeQueue {
    pub fn new(default_lifetime: Duration) -> Self {
        Self {
            next_id: AtomicU64::new(0),
            state: Arc::new(QueueState::default()),
            default_lifetime,
        }
    }

    /// Append a notice. A non-zero `lifetime` schedules its removal; a zero
    /// lifetime keeps it until dismissed.
    pub fn enqueue(&self, message: impl Into<String>, kind: NoticeKind, lifetime: Duration) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.state
            .notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notice {
                id,
                message: message.into(),
                kind,
                created_at: Local::now(),
            });

        if !lifetime.is_zero() {
            self.schedule_expiry(id, lifetime);
        }
        id
    }

    /// Remove a notice now. Returns false if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        self.state.dismiss(id)
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.state
            .notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        for (_, timer) in self
            .state
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
        {
            timer.abort();
        }
        self.state
            .notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.enqueue(message, NoticeKind::Info, self.default_lifetime)
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.enqueue(message, NoticeKind::Success, self.default_lifetime)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.enqueue(message, NoticeKind::Warning, self.default_lifetime)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.enqueue(message, NoticeKind::Error, self.default_lifetime)
    }

    fn schedule_expiry(&self, id: u64, lifetime: Duration) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(id, "no async runtime, notice will not expire on its own");
            return;
        };

        // Hold the timer map while spawning so the expiry task cannot look
        // for its handle before it is registered.
        let mut timers = self
            .state
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let state = Arc::clone(&self.state);
        let task = runtime.spawn(async move {
            tokio::time::sleep(lifetime).await;
            state.expire(id);
        });
        timers.insert(id, task.abort_handle());
    }
}

impl Default for NoticeQueue {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_LIFETIME)
    }
}
