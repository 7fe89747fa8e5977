//! Recording email sender for testing.
//!
//! Keeps every envelope it is asked to send, optionally failing instead.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::contact::EmailEnvelope;
use crate::ports::{EmailError, EmailSender};

/// Email sender that records instead of sending.
#[derive(Debug, Clone, Default)]
pub struct RecordingEmailSender {
    sent: Arc<Mutex<Vec<EmailEnvelope>>>,
    fail: bool,
}

impl RecordingEmailSender {
    /// Creates a sender that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sender whose every send fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Envelopes sent so far.
    pub fn sent(&self) -> Vec<EmailEnvelope> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of sends so far (failed attempts excluded).
    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, envelope: &EmailEnvelope) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::Transport("simulated send failure".to_string()));
        }
        self.sent.lock().unwrap().push(envelope.clone());
        Ok(())
    }
}
