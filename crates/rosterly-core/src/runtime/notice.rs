// ── User-visible notices ──

use chrono::{DateTime, Utc};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient, user-visible notification.
///
/// Effects emit these for operation results; the rendering shell
/// subscribes and decides presentation. Nothing in core persists them.
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    pub at: DateTime<Utc>,
}

impl Notice {
    pub(crate) fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            at: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
