//! Recording contact delivery for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::contact::{ContactMetadata, ContactSubmission};
use crate::ports::{ContactDelivery, DeliveryError};

/// Contact delivery that records instead of delivering.
#[derive(Debug, Clone, Default)]
pub struct RecordingDelivery {
    delivered: Arc<Mutex<Vec<(ContactSubmission, ContactMetadata)>>>,
    fail: bool,
}

impl RecordingDelivery {
    /// Creates a delivery that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a delivery whose every attempt fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Submissions delivered so far.
    pub fn delivered(&self) -> Vec<(ContactSubmission, ContactMetadata)> {
        self.delivered.lock().unwrap().clone()
    }

    /// Number of deliveries so far (failed attempts excluded).
    pub fn delivery_count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }
}

#[async_trait]
impl ContactDelivery for RecordingDelivery {
    async fn deliver(
        &self,
        submission: &ContactSubmission,
        metadata: &ContactMetadata,
    ) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Transport("simulated delivery failure".to_string()));
        }
        self.delivered
            .lock()
            .unwrap()
            .push((submission.clone(), metadata.clone()));
        Ok(())
    }
}
