use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::warn;

use super::Outcome;
use crate::error::PlannerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient banner that dismisses itself after `ttl`.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub shown_at: Instant,
    pub ttl: Duration,
}

impl Notice {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            shown_at: Instant::now(),
            ttl: Self::DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NoticeKind::Success => write!(f, "✓ {}", self.message),
            NoticeKind::Error => write!(f, "✗ {}", self.message),
        }
    }
}

/// Holds the most recent notice of one screen.
#[derive(Debug)]
pub struct NoticeBoard {
    ttl: Duration,
    last: Mutex<Option<Notice>>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(Notice::DEFAULT_TTL)
    }
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            last: Mutex::new(None),
        }
    }

    pub fn last(&self) -> Option<Notice> {
        self.last.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Posts the notice for a finished action. `Ok` carries the success
    /// message; errors are shown with their user message or `failure`.
    pub fn post(&self, result: Result<String, PlannerError>, failure: &str) -> Outcome {
        let notice = match result {
            Ok(message) => Notice::success(message),
            Err(e) => {
                warn!("{}: {}", failure, e);
                Notice::error(e.user_message(failure))
            }
        };
        self.show(notice)
    }

    pub fn show(&self, notice: Notice) -> Outcome {
        let notice = notice.with_ttl(self.ttl);
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = Some(notice.clone());
        Outcome::Completed(Some(notice))
    }
}
