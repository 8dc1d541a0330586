//! services/api/src/adapters/notify.rs
//!
//! Best-effort notification adapter. The reference deployment popped a
//! desktop toast; here notifications surface through the structured log so
//! headless runs keep the signal. Fire and forget, nothing propagates.

use async_trait::async_trait;
use reading_coach_core::ports::Notifier;
use tracing::info;

const NOTIFICATION_TITLE: &str = "Daily English Reading";

/// A `Notifier` that emits notifications as log events.
#[derive(Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) {
        info!(title = NOTIFICATION_TITLE, "{}", message);
    }
}
