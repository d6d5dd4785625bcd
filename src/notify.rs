//! Transient on-screen notifications.

use std::time::{Duration, Instant};
use tracing::info;

use crate::config::NOTIFICATION_TTL;
use crate::render::escape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    fn css_class(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    shown_at: Instant,
}

impl Notification {
    pub fn to_markup(&self) -> String {
        format!(
            "<div class=\"notification {}\">{}</div>",
            self.kind.css_class(),
            escape(&self.message)
        )
    }
}

/// Holds at most one notification and dismisses it after a fixed delay.
#[derive(Debug)]
pub struct Notifier {
    ttl: Duration,
    current: Option<Notification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NOTIFICATION_TTL)
    }
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    /// Show a notification, replacing any still on screen.
    pub fn show(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) {
        let message = message.into();
        info!(?kind, %message, "notification");
        self.current = Some(Notification {
            kind,
            message,
            shown_at: now,
        });
    }

    /// The notification visible at `now`, dismissing it once its delay has passed.
    pub fn visible(&mut self, now: Instant) -> Option<&Notification> {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|n| now.saturating_duration_since(n.shown_at) >= self.ttl);
        if expired {
            self.current = None;
        }
        self.current.as_ref()
    }
}
