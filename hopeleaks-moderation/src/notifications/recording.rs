use std::sync::{Arc, Mutex};

use hopeleaks_shared::errors::{AppError, AppResult};

use crate::models::NewNotification;
use crate::notifications::NotificationSink;

/// Captures notifications instead of storing them.
#[derive(Clone, Default)]
pub struct RecordingSink {
    sent: Arc<Mutex<Vec<NewNotification>>>,
    fail_for: Option<String>,
}

impl RecordingSink {
    /// Rejects every notification addressed to `user_id`.
    pub fn failing_for(user_id: &str) -> Self {
        Self {
            fail_for: Some(user_id.to_string()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<NewNotification> {
        self.sent.lock().expect("sink poisoned").clone()
    }

    pub fn sent_to(&self, user_id: &str) -> Vec<NewNotification> {
        self.sent().into_iter().filter(|n| n.user_id == user_id).collect()
    }
}

impl NotificationSink for RecordingSink {
    async fn create_and_push(&self, notification: NewNotification) -> AppResult<i64> {
        if self.fail_for.as_deref() == Some(notification.user_id.as_str()) {
            return Err(AppError::unavailable("notification transport down"));
        }

        let mut sent = self.sent.lock().expect("sink poisoned");
        sent.push(notification);
        Ok(sent.len() as i64)
    }
}
