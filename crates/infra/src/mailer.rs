//! Mail sender test/dev double.

use std::sync::Mutex;

use stockroom_auth::{MailSender, OutboundMail};
use stockroom_core::{AuthError, AuthResult};

/// Captures outbound mail instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingMailSender {
    sent: Mutex<Vec<OutboundMail>>,
}

impl RecordingMailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything "sent" so far, in order.
    pub fn sent(&self) -> Vec<OutboundMail> {
        self.sent.lock().expect("lock poisoned").clone()
    }
}

impl MailSender for RecordingMailSender {
    fn send(&self, mail: OutboundMail) -> AuthResult<()> {
        tracing::debug!(to = %mail.to, template = ?mail.template, "recording outbound mail");
        self.sent
            .lock()
            .map_err(|_| AuthError::internal("lock poisoned"))?
            .push(mail);
        Ok(())
    }
}
