//! User-facing notices.
//!
//! Views get a [`Notifier`] handed to them at construction; whoever owns the
//! matching [`NoticeFeed`] decides how notices are shown.

use tokio::sync::mpsc;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A single message for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Sending half. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notice>,
}

/// Receiving half.
#[derive(Debug)]
pub struct NoticeFeed {
    rx: mpsc::UnboundedReceiver<Notice>,
}

/// Create a connected notifier/feed pair.
pub fn channel() -> (Notifier, NoticeFeed) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Notifier { tx }, NoticeFeed { rx })
}

impl Notifier {
    pub fn notify(&self, level: NoticeLevel, message: impl Into<String>) {
        let notice = Notice {
            level,
            message: message.into(),
        };
        if self.tx.send(notice).is_err() {
            tracing::debug!("Notice dropped, feed is closed");
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Info, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Error, message);
    }
}

impl NoticeFeed {
    /// Take every notice queued so far without waiting.
    pub fn drain(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(notice) = self.rx.try_recv() {
            notices.push(notice);
        }
        notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_in_order() {
        let (notifier, mut feed) = channel();
        notifier.success("Saved");
        notifier.clone().error("Boom");

        let notices = feed.drain();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(notices[1].message, "Boom");
        assert!(feed.drain().is_empty());
    }

    #[test]
    fn test_notify_after_feed_dropped_is_silent() {
        let (notifier, feed) = channel();
        drop(feed);
        notifier.info("nobody listening");
    }
}
