//! User-facing notifications.
//!
//! Cart operations never return errors to their caller. When an operation is
//! rejected, a [`Notice`] message is sent to the configured
//! [`NotificationSink`]. Sinks are fire-and-forget: delivery failures are
//! dropped, never retried.

use std::fmt;

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Messages shown to the user when a cart operation is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// Requested amount is larger than current stock.
    StockExceeded,
    /// `add_product` failed for a reason other than stock.
    AddFailed,
    /// `remove_product` failed.
    RemoveFailed,
    /// `update_product_amount` failed for a reason other than stock.
    UpdateFailed,
}

impl Notice {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::StockExceeded => "requested quantity exceeds stock",
            Self::AddFailed => "failed to add product",
            Self::RemoveFailed => "failed to remove product",
            Self::UpdateFailed => "failed to update quantity",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Destination for user-facing error messages.
pub trait NotificationSink: Send + Sync {
    fn error(&self, message: &str);
}

impl<T: NotificationSink + ?Sized> NotificationSink for std::sync::Arc<T> {
    fn error(&self, message: &str) {
        (**self).error(message);
    }
}

/// Logs notifications through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(notification = %message, "Cart notification");
    }
}

/// Forwards notifications to a channel, e.g. a UI task.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<String>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its channel.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelNotifier {
    fn error(&self, message: &str) {
        // Receiver gone means nobody is listening anymore
        let _ = self.sender.send(message.to_string());
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages received so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Most recent message.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.messages.lock().last().cloned()
    }
}

impl NotificationSink for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_messages() {
        assert_eq!(
            Notice::StockExceeded.to_string(),
            "requested quantity exceeds stock"
        );
        assert_eq!(Notice::AddFailed.message(), "failed to add product");
        assert_eq!(Notice::RemoveFailed.message(), "failed to remove product");
        assert_eq!(Notice::UpdateFailed.message(), "failed to update quantity");
    }

    #[test]
    fn test_recording_notifier() {
        let sink = RecordingNotifier::new();
        sink.error("one");
        sink.error("two");

        assert_eq!(sink.messages(), vec!["one", "two"]);
        assert_eq!(sink.last().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_channel_notifier_delivers() {
        let (sink, mut receiver) = ChannelNotifier::new();
        sink.error(Notice::RemoveFailed.message());

        assert_eq!(receiver.recv().await.as_deref(), Some("failed to remove product"));
    }

    #[test]
    fn test_channel_notifier_ignores_closed_receiver() {
        let (sink, receiver) = ChannelNotifier::new();
        drop(receiver);
        sink.error("nobody listening");
    }
}
